use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::chunking::{split_documents, MarkdownSplitter};
use crate::config::Config;
use crate::llm::embeddings::embed_batch;
use crate::models::Document;
use crate::search::vector::VectorStore;

use super::loader::load_documents;

/// Result of preparing the index at startup.
pub struct IndexSummary {
    pub vectors: Arc<VectorStore>,
    pub document_count: usize,
    /// Chunks produced in this run; zero when an existing store was reused.
    pub chunk_count: usize,
    pub reused: bool,
}

/// Load the corpus and either reuse the persisted vector store or build a new
/// one from it.
pub async fn build_or_load(config: &Config, client: &reqwest::Client) -> Result<IndexSummary> {
    let documents = load_documents(&config.data_dir)?;
    let store_path = config.vector_path();

    if VectorStore::exists(&store_path) {
        let vectors = VectorStore::open(&store_path)?;
        if vectors.is_empty() {
            tracing::warn!(
                "Vector store {} holds no chunks; rebuilding.",
                store_path.display()
            );
            return build(config, client, &store_path, &documents).await;
        }
        tracing::info!(
            "Loaded existing vector store ({} chunks from {} sources, created {}).",
            vectors.len(),
            vectors.source_count(),
            vectors.created_at()
        );
        return Ok(IndexSummary {
            vectors: Arc::new(vectors),
            document_count: documents.len(),
            chunk_count: 0,
            reused: true,
        });
    }

    build(config, client, &store_path, &documents).await
}

async fn build(
    config: &Config,
    client: &reqwest::Client,
    store_path: &Path,
    documents: &[Document],
) -> Result<IndexSummary> {
    let splitter = MarkdownSplitter::new(config.chunk_size, config.chunk_overlap);
    let chunks = split_documents(&splitter, documents);
    let vectors = VectorStore::open(store_path)?;

    // An empty store on disk would be reused forever
    if chunks.is_empty() {
        tracing::warn!("Corpus produced no chunks; vector store not persisted.");
        return Ok(IndexSummary {
            vectors: Arc::new(vectors),
            document_count: documents.len(),
            chunk_count: 0,
            reused: false,
        });
    }

    let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = embed_batch(client, &config.llm, &texts)
        .await
        .context("Failed to embed document chunks")?;

    vectors.add_chunks(&chunks, embeddings)?;
    tracing::info!(
        "Created and persisted new vector store at {}.",
        store_path.display()
    );

    Ok(IndexSummary {
        vectors: Arc::new(vectors),
        document_count: documents.len(),
        chunk_count: chunks.len(),
        reused: false,
    })
}
