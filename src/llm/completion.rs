use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::models::ChatMessage;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Run a single non-streaming chat completion and return the first choice's
/// text.
pub async fn complete(
    client: &reqwest::Client,
    config: &LlmConfig,
    messages: &[ChatMessage],
) -> Result<String> {
    let url = format!("{}/v1/chat/completions", config.base_url);

    let req = ChatRequest {
        model: &config.chat_model,
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let resp = client
        .post(&url)
        .bearer_auth(&config.api_key)
        .json(&req)
        .send()
        .await
        .context("Failed to call chat completions API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Chat completions API returned {status}: {body}");
    }

    let body: ChatResponse = resp
        .json()
        .await
        .context("Failed to parse chat completions response")?;

    Ok(first_content(body))
}

fn first_content(body: ChatResponse) -> String {
    body.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_content_picks_first_choice() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"first"}},{"message":{"role":"assistant","content":"second"}}]}"#;
        let body: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_content(body), "first");
    }

    #[test]
    fn test_first_content_null_content() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        let body: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(first_content(body), "");
    }

    #[test]
    fn test_first_content_no_choices() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(first_content(body), "");
    }

    #[test]
    fn test_request_serialization() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("q")];
        let req = ChatRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: 0.0,
            max_tokens: 350,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 350);
        assert_eq!(json["messages"][1]["role"], "user");
    }
}
