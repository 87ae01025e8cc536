//! Configuration management for the Disaster Whisperer application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::{Language, WhisperError};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Disaster Whisperer application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhisperConfig {
    /// Geocoding service configuration
    pub geocoding: GeocodingConfig,
    /// Weather API configuration
    pub weather: WeatherConfig,
    /// Advice provider configuration
    pub llm: LlmConfig,
    /// Translation backend configuration
    pub translation: TranslationConfig,
    /// SMS gateway configuration
    pub sms: SmsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Interface settings
    pub ui: UiConfig,
}

/// Geocoding service configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of the Nominatim-compatible search API
    pub base_url: String,
    /// User agent sent with every lookup
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeather API key; weather enrichment is skipped without it
    pub api_key: Option<String>,
    /// Base URL for weather API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Language model provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI API key for the primary provider
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    /// Hugging Face model for the secondary provider
    pub hf_model: String,
    /// Hugging Face token; the secondary provider is disabled without it
    pub hf_api_token: Option<String>,
    pub hf_base_url: String,
    /// Generation cap for the secondary provider
    pub max_new_tokens: u32,
}

/// Translation backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub base_url: String,
}

/// SMS gateway settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender phone number, e.g. +1234567890
    pub from_number: String,
    /// Phone numbers alerted on every submission
    pub recipients: Vec<String>,
    pub base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

/// Interface settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub language: Language,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_user_agent() -> String {
    "disaster-whisperer".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_hf_model() -> String {
    "HuggingFaceH4/zephyr-7b-beta".to_string()
}

fn default_hf_base_url() -> String {
    "https://api-inference.huggingface.co".to_string()
}

fn default_max_new_tokens() -> u32 {
    150
}

fn default_translation_base_url() -> String {
    "https://translate.googleapis.com".to_string()
}

fn default_sms_base_url() -> String {
    "https://api.twilio.com".to_string()
}

fn default_recipients() -> Vec<String> {
    vec![
        "+916301475493".to_string(),
        "+917075297477".to_string(),
        "+919666030209".to_string(),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_geocoding_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            hf_model: default_hf_model(),
            hf_api_token: None,
            hf_base_url: default_hf_base_url(),
            max_new_tokens: default_max_new_tokens(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_translation_base_url(),
        }
    }
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: String::new(),
            auth_token: String::new(),
            from_number: String::new(),
            recipients: default_recipients(),
            base_url: default_sms_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WhisperConfig {
    /// Load configuration from `config_path`, or the default location when
    /// `None`, then apply environment overrides
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WHISPER_SMS__AUTH_TOKEN
        builder = builder.add_source(
            Environment::with_prefix("WHISPER")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("sms.recipients"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WhisperConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("disaster-whisperer").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_geocoding_user_agent();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.llm.openai_model.is_empty() {
            self.llm.openai_model = default_openai_model();
        }
        if self.llm.openai_base_url.is_empty() {
            self.llm.openai_base_url = default_openai_base_url();
        }
        if self.llm.hf_model.is_empty() {
            self.llm.hf_model = default_hf_model();
        }
        if self.llm.hf_base_url.is_empty() {
            self.llm.hf_base_url = default_hf_base_url();
        }
        if self.llm.max_new_tokens == 0 {
            self.llm.max_new_tokens = default_max_new_tokens();
        }
        if self.translation.base_url.is_empty() {
            self.translation.base_url = default_translation_base_url();
        }
        if self.sms.base_url.is_empty() {
            self.sms.base_url = default_sms_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }

        // Blank optional keys behave as unset
        for key in [
            &mut self.weather.api_key,
            &mut self.llm.openai_api_key,
            &mut self.llm.hf_api_token,
        ] {
            if key.as_deref().is_some_and(|k| k.trim().is_empty()) {
                *key = None;
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_recipients()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Geocoding", self.geocoding.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 300 {
                return Err(WhisperError::config(format!(
                    "{name} timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        if self.llm.max_new_tokens > 4096 {
            return Err(WhisperError::config("max_new_tokens cannot exceed 4096").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WhisperError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WhisperError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Weather", &self.weather.base_url),
            ("OpenAI", &self.llm.openai_base_url),
            ("Hugging Face", &self.llm.hf_base_url),
            ("Translation", &self.translation.base_url),
            ("SMS", &self.sms.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WhisperError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_recipients(&self) -> Result<()> {
        if self.sms.recipients.is_empty() {
            return Err(WhisperError::config("At least one alert recipient is required").into());
        }
        if let Some(blank) = self.sms.recipients.iter().position(|r| r.trim().is_empty()) {
            return Err(WhisperError::config(format!(
                "Alert recipient #{} is empty",
                blank + 1
            ))
            .into());
        }
        Ok(())
    }
}
