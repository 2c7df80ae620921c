//! Clients for the hosted, OpenAI-compatible model API.

pub mod completion;
pub mod embeddings;
pub mod prompt;
