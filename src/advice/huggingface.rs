//! Hugging Face inference text-generation provider.

use super::AdviceProvider;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// The inference API answers with a list, a single object or a bare string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<GeneratedText>),
    Single(GeneratedText),
    Raw(String),
}

/// Pull the generated text out of a response body, trimmed.
///
/// Bodies that are not JSON are taken as plain generated text. JSON bodies
/// without a `generated_text` field (errors, other task outputs) yield `None`.
fn extract_generated_text(body: &str) -> Option<String> {
    let text = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => match serde_json::from_value::<GenerationResponse>(value).ok()? {
            GenerationResponse::Batch(items) => items.into_iter().next()?.generated_text,
            GenerationResponse::Single(item) => item.generated_text,
            GenerationResponse::Raw(text) => text,
        },
        Err(_) => body.to_string(),
    };

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Secondary advice provider.
pub struct HuggingFaceProvider {
    client: Client,
    model: String,
    api_token: Option<String>,
    base_url: String,
    max_new_tokens: u32,
}

impl HuggingFaceProvider {
    pub fn new(
        model: &str,
        api_token: Option<&str>,
        base_url: &str,
        max_new_tokens: u32,
    ) -> Result<Self> {
        let client = Client::builder()
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            model: model.to_string(),
            api_token: api_token.map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_new_tokens,
        })
    }
}

#[async_trait]
impl AdviceProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}", self.base_url, self.model);
        let request = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: self.max_new_tokens,
                return_full_text: false,
            },
        };
        debug!("Sending text generation request to {}", self.model);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .with_context(|| "Hugging Face request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| "Failed to read Hugging Face response")?;
        if !status.is_success() {
            bail!("Hugging Face API error {}: {}", status, body);
        }

        extract_generated_text(&body).with_context(|| "Hugging Face response contained no text")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#"[{"generated_text": " Seek shelter. "}]"#, Some("Seek shelter."))]
    #[case(r#"{"generated_text": "Stay indoors."}"#, Some("Stay indoors."))]
    #[case(r#""Boil drinking water.""#, Some("Boil drinking water."))]
    #[case("Plain text advice\n", Some("Plain text advice"))]
    #[case("[]", None)]
    #[case(r#"[{"generated_text": "   "}]"#, None)]
    #[case("   ", None)]
    #[case(r#"{"error": "Model is currently loading", "estimated_time": 20.0}"#, None)]
    #[case(r#"[{"summary_text": "x"}]"#, None)]
    #[case("42", None)]
    fn test_extract_generated_text(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_generated_text(body).as_deref(), expected);
    }

    #[test]
    fn test_request_caps_new_tokens() {
        let request = GenerationRequest {
            inputs: "prompt",
            parameters: GenerationParameters {
                max_new_tokens: 150,
                return_full_text: false,
            },
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["parameters"]["max_new_tokens"], 150);
        assert_eq!(value["inputs"], "prompt");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let provider =
            HuggingFaceProvider::new("HuggingFaceH4/zephyr-7b-beta", None, "http://127.0.0.1:9", 150)
                .unwrap();
        assert!(provider.complete("prompt").await.is_err());
    }
}
