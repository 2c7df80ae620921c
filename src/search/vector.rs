use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::Chunk;

/// A stored vector entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorEntry {
    id: Uuid,
    source: String,
    start_index: usize,
    content: String,
    embedding: Vec<f32>,
}

/// On-disk layout of the store.
#[derive(Debug, Deserialize)]
struct StoreFile {
    created_at: DateTime<Utc>,
    entries: Vec<VectorEntry>,
}

/// In-memory vector store with disk persistence and cosine similarity search.
pub struct VectorStore {
    entries: RwLock<Vec<VectorEntry>>,
    created_at: DateTime<Utc>,
    persist_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct VectorHit {
    pub id: Uuid,
    pub source: String,
    pub start_index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
    pub score: f32,
}

impl VectorStore {
    /// Whether a store has already been persisted at `path`.
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Load the store at `path`, or start an empty one that will be written
    /// there on the first insert.
    pub fn open(path: &Path) -> Result<Self> {
        let (entries, created_at) = if path.exists() {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read vector store {}", path.display()))?;
            let file: StoreFile = serde_json::from_str(&data)
                .with_context(|| format!("Corrupt vector store {}", path.display()))?;
            (file.entries, file.created_at)
        } else {
            (Vec::new(), Utc::now())
        };

        Ok(Self {
            entries: RwLock::new(entries),
            created_at,
            persist_path: path.to_path_buf(),
        })
    }

    /// Add vectors for chunks. `embeddings` must be parallel with `chunks`.
    pub fn add_chunks(&self, chunks: &[Chunk], embeddings: Vec<Vec<f32>>) -> Result<()> {
        if chunks.len() != embeddings.len() {
            anyhow::bail!(
                "Got {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            );
        }

        let mut entries = self.entries.write();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            entries.push(VectorEntry {
                id: chunk.id,
                source: chunk.source.clone(),
                start_index: chunk.start_index,
                content: chunk.content.clone(),
                embedding,
            });
        }

        self.persist(&entries)
    }

    /// Write to a temp file and rename over the store file.
    fn persist(&self, entries: &[VectorEntry]) -> Result<()> {
        if let Some(parent) = self.persist_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let file = StoreFileRef {
            created_at: self.created_at,
            entries,
        };
        let data = serde_json::to_string(&file)?;
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.persist_path)
            .with_context(|| format!("Failed to replace {}", self.persist_path.display()))?;
        Ok(())
    }

    /// Nearest entries by cosine similarity, best first.
    pub fn similarity_search(&self, query_embedding: &[f32], limit: usize) -> Vec<VectorHit> {
        let entries = self.entries.read();

        let mut scored: Vec<(f32, &VectorEntry)> = entries
            .iter()
            .map(|e| (cosine_similarity(query_embedding, &e.embedding), e))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);

        scored
            .into_iter()
            .map(|(score, e)| VectorHit {
                id: e.id,
                source: e.source.clone(),
                start_index: e.start_index,
                content: e.content.clone(),
                embedding: e.embedding.clone(),
                score,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Number of distinct source files in the store.
    pub fn source_count(&self) -> usize {
        let entries = self.entries.read();
        entries
            .iter()
            .map(|e| e.source.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    created_at: DateTime<Utc>,
    entries: &'a [VectorEntry],
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source: &str, content: &str) -> Chunk {
        Chunk {
            id: Uuid::new_v4(),
            source: source.into(),
            start_index: 0,
            content: content.into(),
        }
    }

    #[test]
    fn test_cosine_identical() {
        assert!((cosine_similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_mismatched_or_zero() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_orders_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::open(&dir.path().join("vectors.json")).unwrap();
        store
            .add_chunks(
                &[chunk("a.txt", "alpha"), chunk("b.txt", "beta"), chunk("c.txt", "gamma")],
                vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.7, 0.7]],
            )
            .unwrap();

        let hits = store.similarity_search(&[1.0, 0.1], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].source, "a.txt");
        assert_eq!(hits[1].source, "c.txt");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_add_chunks_length_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::open(&dir.path().join("vectors.json")).unwrap();
        let err = store
            .add_chunks(&[chunk("a.txt", "alpha")], vec![])
            .unwrap_err();
        assert!(err.to_string().contains("embeddings"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("vectors.json");
        assert!(!VectorStore::exists(&path));

        let store = VectorStore::open(&path).unwrap();
        store
            .add_chunks(
                &[chunk("a.txt", "alpha"), chunk("a.txt", "more alpha"), chunk("b.txt", "beta")],
                vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]],
            )
            .unwrap();
        assert!(VectorStore::exists(&path));

        let reloaded = VectorStore::open(&path).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.source_count(), 2);
        assert_eq!(reloaded.created_at(), store.created_at());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vectors.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(VectorStore::open(&path).is_err());
    }
}
