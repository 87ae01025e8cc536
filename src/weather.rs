//! Weather API client for OpenWeather integration
//!
//! Fetches the current conditions at a coordinate pair from the One Call
//! API. The result only enriches the advice prompt, so every failure mode
//! (no key, network error, timeout, non-success status, odd payload)
//! resolves to `None`.

use crate::config::WeatherConfig;
use crate::models::WeatherSnapshot;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Coordinates → current-conditions lookup
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot>;
}

/// OpenWeather One Call client
pub struct OpenWeatherClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new weather API client
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("DisasterWhisperer/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Whether an API key is configured
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    fn onecall_url(&self, api_key: &str, lat: f64, lon: f64) -> String {
        format!(
            "{}/onecall?lat={}&lon={}&exclude=minutely,hourly&units=metric&appid={}",
            self.base_url,
            lat,
            lon,
            urlencoding::encode(api_key)
        )
    }

    async fn current_conditions(
        &self,
        api_key: &str,
        lat: f64,
        lon: f64,
    ) -> Result<WeatherSnapshot> {
        let url = self.onecall_url(api_key, lat, lon);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Weather API request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "Weather API request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            );
        }

        let body: openweather::OneCallResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenWeather response")?;

        body.current
            .map(WeatherSnapshot::from)
            .with_context(|| "No current weather data in OpenWeather response")
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn fetch(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No weather API key configured, skipping enrichment");
            return None;
        };

        let start_time = Instant::now();
        match self.current_conditions(api_key, lat, lon).await {
            Ok(snapshot) => {
                info!(
                    "Retrieved current weather in {:.3}s: {}",
                    start_time.elapsed().as_secs_f64(),
                    snapshot.summary()
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!("Weather enrichment unavailable: {:#}", e);
                None
            }
        }
    }
}

/// OpenWeather One Call response structures
mod openweather {
    use super::WeatherSnapshot;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct OneCallResponse {
        pub current: Option<CurrentData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        pub temp: Option<f64>,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: Option<String>,
    }

    impl From<CurrentData> for WeatherSnapshot {
        fn from(current: CurrentData) -> Self {
            Self {
                temperature: current.temp,
                description: current
                    .weather
                    .into_iter()
                    .next()
                    .and_then(|condition| condition.description),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_conditions() {
        let body: openweather::OneCallResponse = serde_json::from_str(
            r#"{"lat": 17.38, "lon": 78.48, "timezone": "Asia/Kolkata",
                "current": {"dt": 1700000000, "temp": 24.3, "humidity": 90,
                            "weather": [{"id": 501, "main": "Rain", "description": "moderate rain"}]},
                "daily": []}"#,
        )
        .unwrap();
        let snapshot = WeatherSnapshot::from(body.current.unwrap());
        assert_eq!(snapshot.temperature, Some(24.3));
        assert_eq!(snapshot.description.as_deref(), Some("moderate rain"));
    }

    #[test]
    fn test_onecall_url_encodes_key() {
        let client = OpenWeatherClient::new(&WeatherConfig {
            api_key: Some("a&b=c".to_string()),
            base_url: "https://api.openweathermap.org/data/3.0/".to_string(),
            ..WeatherConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.onecall_url("a&b=c", 17.38, 78.48),
            "https://api.openweathermap.org/data/3.0/onecall?lat=17.38&lon=78.48\
             &exclude=minutely,hourly&units=metric&appid=a%26b%3Dc"
        );
    }

    #[test]
    fn test_parse_current_without_weather_array() {
        let body: openweather::OneCallResponse =
            serde_json::from_str(r#"{"current": {"temp": 30.0}}"#).unwrap();
        let snapshot = WeatherSnapshot::from(body.current.unwrap());
        assert_eq!(snapshot.temperature, Some(30.0));
        assert!(snapshot.description.is_none());
    }

    #[test]
    fn test_missing_current_section() {
        let body: openweather::OneCallResponse =
            serde_json::from_str(r#"{"lat": 1.0, "lon": 2.0}"#).unwrap();
        assert!(body.current.is_none());
    }

    #[tokio::test]
    async fn test_no_api_key_skips_request() {
        let client = OpenWeatherClient::new(&WeatherConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 10,
        })
        .unwrap();
        assert!(!client.is_enabled());
        assert!(client.fetch(17.38, 78.48).await.is_none());
    }

    #[tokio::test]
    async fn test_blank_api_key_counts_as_missing() {
        let client = OpenWeatherClient::new(&WeatherConfig {
            api_key: Some("  ".to_string()),
            ..WeatherConfig::default()
        })
        .unwrap();
        assert!(!client.is_enabled());
    }

    #[tokio::test]
    async fn test_unreachable_service_resolves_to_none() {
        let client = OpenWeatherClient::new(&WeatherConfig {
            api_key: Some("test-key".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_seconds: 2,
        })
        .unwrap();
        assert!(client.fetch(17.38, 78.48).await.is_none());
    }
}
