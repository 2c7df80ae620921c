//! # docs-qa
//!
//! A small HTTP service that answers questions about a documentation corpus
//! with retrieval-augmented generation against an OpenAI-compatible API.
//!
//! ## Architecture
//!
//! ```text
//!   startup                               request
//!   ───────                               ───────
//!   data/*.txt                            POST /query {"question"}
//!       │                                      │
//!       ▼                                      ▼
//!   ┌──────────────┐                     ┌──────────────┐
//!   │   Loader     │                     │  Validation  │  5..=500 chars
//!   └──────┬───────┘                     └──────┬───────┘
//!          ▼                                    ▼
//!   ┌──────────────┐                     ┌──────────────┐
//!   │  Markdown    │ 600 chars,          │ Embed query  │
//!   │  splitter    │ 175 overlap         └──────┬───────┘
//!   └──────┬───────┘                            ▼
//!          ▼                             ┌──────────────┐
//!   ┌──────────────┐                     │ Top fetch_k  │ cosine
//!   │ Embed chunks │                     └──────┬───────┘
//!   └──────┬───────┘                            ▼
//!          ▼                             ┌──────────────┐
//!   ┌──────────────┐   reused on         │  MMR → k     │
//!   │ Vector store │── next start ──────▶└──────┬───────┘
//!   │ (JSON file)  │                            ▼
//!   └──────────────┘                     ┌──────────────┐
//!                                        │ Chat model   │ answer + sources
//!                                        └──────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration (with `.env` support)
//! - [`models`] - Documents, chunks, request/response types
//! - [`ingest`] - Corpus loading and startup index build/reuse
//! - [`chunking`] - Markdown-aware recursive text splitter with overlap
//! - [`llm::embeddings`] - Batch embeddings via the `/v1/embeddings` API
//! - [`llm::completion`] - Non-streaming chat completions
//! - [`llm::prompt`] - Prompt assembly from retrieved chunks
//! - [`search::vector`] - In-memory vector store with cosine similarity and disk persistence
//! - [`search::mmr`] - Maximal marginal relevance selection
//! - [`search::retriever`] - Query embedding + similarity fetch + MMR
//! - [`qa`] - Retrieval followed by answer generation
//! - [`api`] - Axum handlers for `/health` and `/query`
//! - [`state`] - Shared application state

pub mod api;
pub mod chunking;
pub mod config;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod qa;
pub mod search;
pub mod state;
