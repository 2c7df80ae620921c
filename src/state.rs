use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::ingest::IndexSummary;
use crate::qa::QaChain;
use crate::search::retriever::Retriever;
use crate::search::vector::VectorStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub vectors: Arc<VectorStore>,
    pub chain: QaChain,
    /// Number of corpus files found at startup
    pub document_count: usize,
}

impl AppState {
    pub fn new(config: Config, http_client: reqwest::Client, index: IndexSummary) -> Self {
        let retriever = Retriever::new(
            index.vectors.clone(),
            http_client.clone(),
            config.llm.clone(),
            config.retrieval.clone(),
        );
        let chain = QaChain::new(retriever, http_client, config.llm.clone());

        Self {
            config,
            vectors: index.vectors,
            chain,
            document_count: index.document_count,
        }
    }

    /// Whether there is anything to retrieve from.
    pub fn has_documents(&self) -> bool {
        self.document_count > 0 && !self.vectors.is_empty()
    }
}

/// HTTP client shared by the embedding and completion calls.
pub fn build_http_client() -> anyhow::Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(120))
        .build()?)
}
