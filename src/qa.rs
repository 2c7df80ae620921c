use anyhow::Result;
use std::collections::HashSet;

use crate::config::LlmConfig;
use crate::llm::completion::complete;
use crate::llm::prompt::{build_context, build_messages};
use crate::models::QueryResponse;
use crate::search::retriever::Retriever;

/// Retrieval followed by answer generation over the retrieved chunks.
#[derive(Clone)]
pub struct QaChain {
    retriever: Retriever,
    http_client: reqwest::Client,
    llm: LlmConfig,
}

impl QaChain {
    pub fn new(retriever: Retriever, http_client: reqwest::Client, llm: LlmConfig) -> Self {
        Self {
            retriever,
            http_client,
            llm,
        }
    }

    pub async fn invoke(&self, question: &str) -> Result<QueryResponse> {
        let hits = self.retriever.retrieve(question).await?;
        tracing::info!("Retrieved {} chunks", hits.len());

        let context = build_context(hits.iter().map(|h| h.content.as_str()));
        let messages = build_messages(&context, question);
        let answer = complete(&self.http_client, &self.llm, &messages).await?;

        Ok(QueryResponse {
            answer,
            sources: unique_sources(hits.iter().map(|h| h.source.as_str())),
        })
    }
}

/// De-duplicate source names, keeping the first occurrence order.
pub fn unique_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_sources_preserves_order() {
        let sources = unique_sources(["b.txt", "a.txt", "b.txt", "c.txt", "a.txt"]);
        assert_eq!(sources, vec!["b.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn test_unique_sources_empty() {
        assert!(unique_sources(Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_unique_sources_keeps_empty_string_once() {
        assert_eq!(unique_sources(["", "", "x"]), vec!["", "x"]);
    }
}
