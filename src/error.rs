//! Error types and handling for the Disaster Whisperer application

use thiserror::Error;

/// Main error type for the Disaster Whisperer application
#[derive(Error, Debug)]
pub enum WhisperError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The geocoder could not resolve the reported place
    #[error("Could not locate place: {place}")]
    LocationNotFound { place: String },
}

impl WhisperError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(place: S) -> Self {
        Self::LocationNotFound {
            place: place.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WhisperError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file and API keys.")
            }
            WhisperError::Validation { message } => message.clone(),
            WhisperError::LocationNotFound { .. } => "Could not locate this place.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = WhisperError::config("missing SMS token");
        assert!(matches!(config_err, WhisperError::Config { .. }));

        let validation_err = WhisperError::validation("empty place");
        assert!(matches!(validation_err, WhisperError::Validation { .. }));

        let not_found = WhisperError::location_not_found("Atlantis");
        assert!(matches!(not_found, WhisperError::LocationNotFound { .. }));
        assert!(not_found.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_user_messages() {
        let config_err = WhisperError::config("Twilio keys missing");
        assert!(config_err.user_message().contains("Twilio keys missing"));

        let validation_err = WhisperError::validation("Please enter both place and report.");
        assert_eq!(
            validation_err.user_message(),
            "Please enter both place and report."
        );

        let not_found = WhisperError::location_not_found("nowhere");
        assert_eq!(not_found.user_message(), "Could not locate this place.");
    }
}
