//! Best-effort translation of generated advice
//!
//! Without a backend, or when the backend fails, the input text is returned
//! unchanged. Failures are logged and never reach the caller.

use crate::config::TranslationConfig;
use crate::i18n::Language;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

/// A machine-translation service
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Translate `text` into the language with the two-letter `target_code`
    async fn translate(&self, text: &str, target_code: &str) -> Result<String>;
}

/// Google Translate web endpoint (the one used by browser extensions)
pub struct GoogleTranslateBackend {
    client: Client,
    base_url: String,
}

impl GoogleTranslateBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Concatenate the translated segments of a `translate_a/single` response.
///
/// The payload looks like `[[["Hola ", "Hello ", ...], ["mundo", "world", ...]], ...]`.
fn join_segments(payload: &Value) -> Option<String> {
    let segments = payload.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl TranslationBackend for GoogleTranslateBackend {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String> {
        let url = format!(
            "{}/translate_a/single?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.base_url,
            target_code,
            urlencoding::encode(text)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Translation request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Translation service returned status {}", status);
        }

        let payload: Value = response
            .json()
            .await
            .with_context(|| "Failed to parse translation response")?;

        join_segments(&payload).with_context(|| "Translation response contained no text")
    }
}

/// Translator with identity fallback
#[derive(Default)]
pub struct Translator {
    backend: Option<Box<dyn TranslationBackend>>,
}

impl Translator {
    /// A translator that always returns its input
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(backend: impl TranslationBackend + 'static) -> Self {
        Self {
            backend: Some(Box::new(backend)),
        }
    }

    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }
        Ok(Self::new(GoogleTranslateBackend::new(&config.base_url)?))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Translate into `language`, or return `text` unchanged on any failure
    pub async fn translate(&self, text: &str, language: Language) -> String {
        let Some(backend) = &self.backend else {
            return text.to_string();
        };

        match backend.translate(text, language.code()).await {
            Ok(translated) if !translated.trim().is_empty() => {
                debug!("Translated advice into {}", language);
                translated
            }
            Ok(_) => {
                warn!("Empty translation into {}, keeping original text", language);
                text.to_string()
            }
            Err(e) => {
                warn!("Translation into {} failed: {:#}, keeping original text", language, e);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use rstest::rstest;
    use std::sync::Mutex;

    /// Records the requested code and prefixes it to the text
    #[derive(Default)]
    struct TaggingBackend {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TranslationBackend for &'static TaggingBackend {
        async fn translate(&self, text: &str, target_code: &str) -> Result<String> {
            self.requested.lock().unwrap().push(target_code.to_string());
            Ok(format!("[{target_code}] {text}"))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl TranslationBackend for FailingBackend {
        async fn translate(&self, _text: &str, _target_code: &str) -> Result<String> {
            Err(anyhow!("quota exceeded"))
        }
    }

    #[rstest]
    #[case("Stay alert!", Language::English)]
    #[case("", Language::Hindi)]
    #[case("సురక్షితంగా ఉండండి", Language::Telugu)]
    #[tokio::test]
    async fn test_identity_without_backend(#[case] text: &str, #[case] language: Language) {
        let translator = Translator::disabled();
        assert!(!translator.is_enabled());
        assert_eq!(translator.translate(text, language).await, text);
    }

    #[tokio::test]
    async fn test_language_codes_are_sent_to_backend() {
        let backend: &'static TaggingBackend = Box::leak(Box::new(TaggingBackend::default()));
        let translator = Translator::new(backend);

        assert_eq!(translator.translate("Evacuate", Language::Hindi).await, "[hi] Evacuate");
        assert_eq!(translator.translate("Evacuate", Language::Telugu).await, "[te] Evacuate");
        assert_eq!(translator.translate("Evacuate", Language::English).await, "[en] Evacuate");
        assert_eq!(*backend.requested.lock().unwrap(), vec!["hi", "te", "en"]);
    }

    #[tokio::test]
    async fn test_failure_returns_input_unchanged() {
        let translator = Translator::new(FailingBackend);
        assert_eq!(translator.translate("Evacuate", Language::Hindi).await, "Evacuate");
    }

    #[test]
    fn test_join_segments() {
        let payload: Value = serde_json::from_str(
            r#"[[["सतर्क रहें! ", "Stay alert! ", null, null, 10],
                 ["सुरक्षित रहें।", "Stay safe.", null, null, 10]],
                null, "en"]"#,
        )
        .unwrap();
        assert_eq!(join_segments(&payload).as_deref(), Some("सतर्क रहें! सुरक्षित रहें।"));
    }

    #[test]
    fn test_join_segments_rejects_unexpected_shapes() {
        assert!(join_segments(&serde_json::json!({"error": "bad"})).is_none());
        assert!(join_segments(&serde_json::json!([[]])).is_none());
        assert!(join_segments(&serde_json::json!(null)).is_none());
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let disabled = Translator::from_config(&TranslationConfig {
            enabled: false,
            ..TranslationConfig::default()
        })
        .unwrap();
        assert!(!disabled.is_enabled());

        let enabled = Translator::from_config(&TranslationConfig::default()).unwrap();
        assert!(enabled.is_enabled());
    }
}
