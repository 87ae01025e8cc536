//! Safety advice generation
//!
//! Builds a prompt from a report and asks an ordered list of language-model
//! providers for advice. The first provider that answers with non-empty text
//! wins; when every provider fails (or none is configured) the localized
//! default advice is used. Generation therefore never fails and never
//! yields empty text.

pub mod huggingface;
pub mod openai;

use crate::config::LlmConfig;
use crate::i18n::Language;
use crate::models::{Report, WeatherSnapshot};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiProvider;

/// A text-generation backend
#[async_trait]
pub trait AdviceProvider: Send + Sync {
    /// Short name used in logs and in [`AdviceSource`]
    fn name(&self) -> &str;

    /// Complete the prompt; implementations return the trimmed text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Where a piece of advice came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "provider", rename_all = "snake_case")]
pub enum AdviceSource {
    Provider(String),
    Default,
}

/// Generated safety guidance; the text is never empty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advice {
    text: String,
    source: AdviceSource,
}

impl Advice {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn source(&self) -> &AdviceSource {
        &self.source
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.source == AdviceSource::Default
    }
}

/// Build the natural-language prompt for a report
#[must_use]
pub fn build_prompt(report: &Report, weather: Option<&WeatherSnapshot>) -> String {
    let summary = weather.map(WeatherSnapshot::summary).unwrap_or_default();
    format!(
        "Disaster in {}, severity: {}. Report: {}. {} Give clear, life-saving advice.",
        report.place.trim(),
        report.severity,
        report.description.trim(),
        summary
    )
}

/// Ordered provider fallback chain
#[derive(Default)]
pub struct AdviceGenerator {
    providers: Vec<Box<dyn AdviceProvider>>,
}

impl AdviceGenerator {
    /// A generator without providers; it always returns the default advice
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider at the end of the chain
    #[must_use]
    pub fn with_provider(mut self, provider: impl AdviceProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Primary (OpenAI) when a key is present, then secondary (Hugging Face)
    /// when a token is present
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let mut generator = Self::new();

        if let Some(api_key) = config.openai_api_key.as_deref() {
            generator = generator.with_provider(OpenAiProvider::new(
                api_key,
                &config.openai_model,
                &config.openai_base_url,
            )?);
        }

        if let Some(token) = config.hf_api_token.as_deref() {
            generator = generator.with_provider(HuggingFaceProvider::new(
                &config.hf_model,
                Some(token),
                &config.hf_base_url,
                config.max_new_tokens,
            )?);
        }

        info!(
            "Advice providers configured: [{}]",
            generator.provider_names().join(", ")
        );
        Ok(generator)
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Try each provider in order; fall back to the language's default advice
    pub async fn generate(&self, prompt: &str, language: Language) -> Advice {
        for provider in &self.providers {
            debug!("Requesting advice from {}", provider.name());
            match provider.complete(prompt).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!("Advice generated by {}", provider.name());
                    return Advice {
                        text: text.trim().to_string(),
                        source: AdviceSource::Provider(provider.name().to_string()),
                    };
                }
                Ok(_) => warn!("{} returned empty advice, trying next provider", provider.name()),
                Err(e) => warn!("{} failed: {:#}, trying next provider", provider.name(), e),
            }
        }

        info!("No advice provider succeeded, using default advice");
        Advice {
            text: language.ui_text().default_advice.to_string(),
            source: AdviceSource::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use anyhow::anyhow;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedProvider {
        name: &'static str,
        reply: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, reply: Option<&'static str>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name,
                    reply,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl AdviceProvider for ScriptedProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| anyhow!("{} is down", self.name))
        }
    }

    #[test]
    fn test_prompt_without_weather() {
        let report = Report::new("Hyderabad", Severity::High, "Flooding on main road");
        assert_eq!(
            build_prompt(&report, None),
            "Disaster in Hyderabad, severity: High. Report: Flooding on main road.  Give clear, life-saving advice."
        );
    }

    #[test]
    fn test_prompt_with_weather() {
        let report = Report::new("Chennai", Severity::Extreme, "Cyclone landfall");
        let weather = WeatherSnapshot {
            temperature: Some(26.0),
            description: Some("heavy intensity rain".to_string()),
        };
        let prompt = build_prompt(&report, Some(&weather));
        assert!(prompt.starts_with("Disaster in Chennai, severity: Extreme. Report: Cyclone landfall."));
        assert!(prompt.contains("Temp 26°C, weather: heavy intensity rain."));
        assert!(prompt.ends_with("Give clear, life-saving advice."));
    }

    #[rstest]
    #[case(Language::English)]
    #[case(Language::Hindi)]
    #[case(Language::Telugu)]
    #[tokio::test]
    async fn test_default_advice_without_providers(#[case] language: Language) {
        let advice = AdviceGenerator::new().generate("prompt", language).await;
        assert!(advice.is_default());
        assert_eq!(advice.text(), language.ui_text().default_advice);
    }

    #[tokio::test]
    async fn test_primary_wins_and_secondary_is_not_called() {
        let (primary, primary_calls) = ScriptedProvider::new("primary", Some("  Move to higher ground.  "));
        let (secondary, secondary_calls) = ScriptedProvider::new("secondary", Some("unused"));
        let generator = AdviceGenerator::new()
            .with_provider(primary)
            .with_provider(secondary);

        let advice = generator.generate("prompt", Language::English).await;
        assert_eq!(advice.text(), "Move to higher ground.");
        assert_eq!(advice.source(), &AdviceSource::Provider("primary".to_string()));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_primary_falls_back_to_secondary() {
        let (primary, primary_calls) = ScriptedProvider::new("primary", None);
        let (secondary, secondary_calls) = ScriptedProvider::new("secondary", Some("Avoid flood water."));
        let generator = AdviceGenerator::new()
            .with_provider(primary)
            .with_provider(secondary);

        let advice = generator.generate("prompt", Language::English).await;
        assert_eq!(advice.text(), "Avoid flood water.");
        assert_eq!(advice.source(), &AdviceSource::Provider("secondary".to_string()));
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_counts_as_failure() {
        let (primary, _) = ScriptedProvider::new("primary", Some("   "));
        let generator = AdviceGenerator::new().with_provider(primary);

        let advice = generator.generate("prompt", Language::Hindi).await;
        assert!(advice.is_default());
        assert_eq!(advice.text(), Language::Hindi.ui_text().default_advice);
    }

    #[tokio::test]
    async fn test_all_providers_failing_yields_default() {
        let (primary, _) = ScriptedProvider::new("primary", None);
        let (secondary, _) = ScriptedProvider::new("secondary", None);
        let generator = AdviceGenerator::new()
            .with_provider(primary)
            .with_provider(secondary);

        let advice = generator.generate("prompt", Language::English).await;
        assert!(advice.is_default());
        assert!(!advice.text().is_empty());
    }

    #[test]
    fn test_from_config_provider_selection() {
        let config = LlmConfig::default();
        assert!(AdviceGenerator::from_config(&config).unwrap().provider_names().is_empty());

        let config = LlmConfig {
            openai_api_key: Some("sk-test".to_string()),
            hf_api_token: Some("hf_test".to_string()),
            ..LlmConfig::default()
        };
        let generator = AdviceGenerator::from_config(&config).unwrap();
        assert_eq!(generator.provider_names(), vec!["openai", "huggingface"]);
    }
}
