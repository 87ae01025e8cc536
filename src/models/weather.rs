//! Weather snapshot model and display methods

use serde::{Deserialize, Serialize};

/// Current conditions at a reported location
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature: Option<f64>,
    /// Human-readable description of weather conditions
    pub description: Option<String>,
}

impl WeatherSnapshot {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        match self.temperature {
            Some(temp) => format!("{temp}°C"),
            None => "n/a".to_string(),
        }
    }

    /// One-line summary appended to the advice prompt
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Temp {}, weather: {}.",
            self.format_temperature(),
            self.description.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary() {
        let snapshot = WeatherSnapshot {
            temperature: Some(27.5),
            description: Some("moderate rain".to_string()),
        };
        assert_eq!(snapshot.summary(), "Temp 27.5°C, weather: moderate rain.");
    }

    #[test]
    fn test_summary_with_missing_fields() {
        let snapshot = WeatherSnapshot::default();
        assert_eq!(snapshot.summary(), "Temp n/a, weather: .");
    }
}
