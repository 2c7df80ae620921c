use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

/// Inputs per embeddings request.
const EMBED_BATCH_SIZE: usize = 100;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    index: usize,
    embedding: Vec<f32>,
}

/// Generate embeddings for a batch of texts. The result is parallel with
/// `texts`.
pub async fn embed_batch(
    client: &reqwest::Client,
    config: &LlmConfig,
    texts: &[String],
) -> Result<Vec<Vec<f32>>> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let url = format!("{}/v1/embeddings", config.base_url);
    let mut all_embeddings = Vec::with_capacity(texts.len());

    for batch in texts.chunks(EMBED_BATCH_SIZE) {
        let req = EmbedRequest {
            model: &config.embedding_model,
            input: batch,
        };

        let resp = client
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&req)
            .send()
            .await
            .context("Failed to call embeddings API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Embeddings API returned {status}: {body}");
        }

        let body: EmbedResponse = resp
            .json()
            .await
            .context("Failed to parse embeddings response")?;

        all_embeddings.extend(order_by_index(body.data, batch.len())?);
    }

    tracing::debug!("Embedded {} texts", all_embeddings.len());
    Ok(all_embeddings)
}

/// Generate embedding for a single text.
pub async fn embed_single(
    client: &reqwest::Client,
    config: &LlmConfig,
    text: &str,
) -> Result<Vec<f32>> {
    let results = embed_batch(client, config, &[text.to_string()]).await?;
    results
        .into_iter()
        .next()
        .context("No embedding returned")
}

fn order_by_index(mut data: Vec<EmbedData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        anyhow::bail!(
            "Embeddings API returned {} vectors for {} inputs",
            data.len(),
            expected
        );
    }
    data.sort_by_key(|d| d.index);
    Ok(data.into_iter().map(|d| d.embedding).collect())
}
