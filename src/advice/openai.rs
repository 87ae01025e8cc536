//! OpenAI chat-completions provider.

use super::AdviceProvider;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Chat completion response, reduced to what advice needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    /// May be null when the model refuses or calls a tool
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Trimmed content of the first choice
    pub fn first_text(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
    }
}

/// Primary advice provider.
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_for(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        }
    }
}

#[async_trait]
impl AdviceProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = self.request_for(prompt);
        debug!("Sending chat completion request with model {}", request.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| "OpenAI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("OpenAI API error {}: {}", status, body);
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenAI response")?;

        completion
            .first_text()
            .with_context(|| "OpenAI response contained no text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_has_single_user_message() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o-mini", "https://api.openai.com/v1/").unwrap();
        let request = serde_json::to_value(provider.request_for("Stay safe?")).unwrap();
        assert_eq!(
            request,
            serde_json::json!({
                "model": "gpt-4o-mini",
                "messages": [{"role": "user", "content": "Stay safe?"}]
            })
        );
        assert_eq!(provider.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_first_text_is_trimmed() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id": "chatcmpl-1", "object": "chat.completion", "created": 1,
                "model": "gpt-4o-mini",
                "choices": [{"index": 0, "finish_reason": "stop",
                             "message": {"role": "assistant", "content": "\n Evacuate now. \n"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("Evacuate now."));
    }

    #[test]
    fn test_first_text_missing() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        assert!(response.first_text().is_none());

        let response: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(response.first_text().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o-mini", "http://127.0.0.1:9").unwrap();
        assert!(provider.complete("prompt").await.is_err());
    }
}
