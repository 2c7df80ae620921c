use anyhow::Result;
use std::sync::Arc;

use crate::config::{LlmConfig, RetrievalConfig};
use crate::llm::embeddings::embed_single;
use crate::search::mmr::maximal_marginal_relevance;
use crate::search::vector::{VectorHit, VectorStore};

/// Embeds a question and picks a relevant, non-redundant set of chunks.
#[derive(Clone)]
pub struct Retriever {
    vectors: Arc<VectorStore>,
    http_client: reqwest::Client,
    llm: LlmConfig,
    params: RetrievalConfig,
}

impl Retriever {
    pub fn new(
        vectors: Arc<VectorStore>,
        http_client: reqwest::Client,
        llm: LlmConfig,
        params: RetrievalConfig,
    ) -> Self {
        Self {
            vectors,
            http_client,
            llm,
            params,
        }
    }

    /// Fetch `fetch_k` nearest chunks, then keep `k` of them by MMR, in
    /// selection order.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<VectorHit>> {
        let query_embedding = embed_single(&self.http_client, &self.llm, question).await?;
        Ok(self.select(&query_embedding))
    }

    fn select(&self, query_embedding: &[f32]) -> Vec<VectorHit> {
        let candidates = self
            .vectors
            .similarity_search(query_embedding, self.params.fetch_k);

        let embeddings: Vec<Vec<f32>> = candidates.iter().map(|h| h.embedding.clone()).collect();
        let picked = maximal_marginal_relevance(
            query_embedding,
            &embeddings,
            self.params.k,
            self.params.lambda_mult,
        );

        tracing::debug!(
            "MMR kept {} of {} candidates",
            picked.len(),
            candidates.len()
        );

        let mut slots: Vec<Option<VectorHit>> = candidates.into_iter().map(Some).collect();
        picked
            .into_iter()
            .filter_map(|i| slots.get_mut(i).and_then(Option::take))
            .collect()
    }
}
