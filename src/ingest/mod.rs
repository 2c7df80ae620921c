//! Corpus loading and startup index construction.

pub mod index;
pub mod loader;

pub use index::{build_or_load, IndexSummary};
pub use loader::load_documents;
