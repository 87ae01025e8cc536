//! Disaster Whisperer - multilingual disaster reporting assistant
//!
//! This library geocodes an emergency report, enriches it with live weather,
//! generates safety advice through language-model providers, translates it,
//! keeps it in the user's session together with map data and dispatches SMS
//! alerts to a configured contact list.

pub mod advice;
pub mod alerts;
pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod location_resolver;
pub mod logging;
pub mod map;
pub mod models;
pub mod pipeline;
pub mod session;
pub mod translate;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use advice::{Advice, AdviceGenerator, AdviceProvider, AdviceSource};
pub use alerts::{AlertDispatcher, AlertOutcome, DispatchReport, SmsCredentials, SmsGateway};
pub use config::WhisperConfig;
pub use error::WhisperError;
pub use i18n::{Language, UiText};
pub use location_resolver::{Geocoder, NominatimGeocoder};
pub use map::MapView;
pub use models::{Location, Report, Severity, WeatherSnapshot};
pub use pipeline::{PipelineStage, ReportPipeline, Submission};
pub use session::{MapData, SessionState};
pub use translate::{TranslationBackend, Translator};
pub use weather::{OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, WhisperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
