//! Emergency report submitted by the user

use crate::WhisperError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Emergency intensity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Severity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::Extreme,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Extreme => "Extreme",
        }
    }

    /// Position in [`Severity::ALL`], also the index into localized option lists
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = WhisperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                WhisperError::validation(format!(
                    "Invalid severity '{wanted}'. Must be one of: Low, Moderate, High, Extreme"
                ))
            })
    }
}

impl TryFrom<String> for Severity {
    type Error = WhisperError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single emergency report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// City, pincode or landmark as typed by the user
    pub place: String,
    pub severity: Severity,
    /// Free-text description of the situation
    pub description: String,
}

impl Report {
    #[must_use]
    pub fn new(place: impl Into<String>, severity: Severity, description: impl Into<String>) -> Self {
        Self {
            place: place.into(),
            severity,
            description: description.into(),
        }
    }

    /// Both place and description must contain something other than whitespace
    pub fn validate(&self) -> Result<(), WhisperError> {
        if self.place.trim().is_empty() || self.description.trim().is_empty() {
            return Err(WhisperError::validation(
                "Please enter both place and report.",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Moderate);
        assert!(Severity::Moderate < Severity::High);
        assert!(Severity::High < Severity::Extreme);
    }

    #[rstest]
    #[case("low", Severity::Low)]
    #[case("Moderate", Severity::Moderate)]
    #[case(" HIGH ", Severity::High)]
    #[case("extreme", Severity::Extreme)]
    fn test_severity_parsing(#[case] input: &str, #[case] expected: Severity) {
        assert_eq!(input.parse::<Severity>().unwrap(), expected);
    }

    #[test]
    fn test_invalid_severity() {
        assert!("catastrophic".parse::<Severity>().is_err());
    }

    #[rstest]
    #[case(r#""high""#, Severity::High)]
    #[case(r#""Extreme""#, Severity::Extreme)]
    #[case(r#"" moderate ""#, Severity::Moderate)]
    fn test_severity_deserializes_case_insensitively(
        #[case] json: &str,
        #[case] expected: Severity,
    ) {
        assert_eq!(serde_json::from_str::<Severity>(json).unwrap(), expected);
    }

    #[test]
    fn test_severity_deserialize_rejects_unknown() {
        let err = serde_json::from_str::<Severity>(r#""catastrophic""#).unwrap_err();
        assert!(err.to_string().contains("Invalid severity"));
    }

    #[test]
    fn test_severity_serializes_canonical_name() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), r#""High""#);
    }

    #[test]
    fn test_severity_index_matches_all() {
        for (i, severity) in Severity::ALL.into_iter().enumerate() {
            assert_eq!(severity.index(), i);
        }
    }

    #[rstest]
    #[case("", "Flooding")]
    #[case("   ", "Flooding")]
    #[case("Hyderabad", "")]
    #[case("Hyderabad", "\n\t")]
    fn test_report_validation_rejects_blank_fields(#[case] place: &str, #[case] description: &str) {
        let report = Report::new(place, Severity::High, description);
        assert!(matches!(
            report.validate(),
            Err(WhisperError::Validation { .. })
        ));
    }

    #[test]
    fn test_report_validation_accepts_complete_report() {
        let report = Report::new("Hyderabad", Severity::High, "Flooding on main road");
        assert!(report.validate().is_ok());
    }
}
