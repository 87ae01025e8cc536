//! Location model for geocoded coordinates and address

use serde::{Deserialize, Serialize};

/// Resolved location of a report
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Canonical address returned by the geocoder
    pub address: String,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, address: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
        }
    }

    /// Finite coordinates inside the WGS84 range and a non-empty address
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && !self.address.trim().is_empty()
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let location = Location::new(17.385_044, 78.486_671, "Hyderabad, Telangana, India");
        assert_eq!(location.format_coordinates(), "17.3850, 78.4867");
    }

    #[test]
    fn test_validity() {
        assert!(Location::new(17.385, 78.4867, "Hyderabad").is_valid());
        assert!(!Location::new(f64::NAN, 78.4867, "Hyderabad").is_valid());
        assert!(!Location::new(17.385, f64::INFINITY, "Hyderabad").is_valid());
        assert!(!Location::new(95.0, 78.4867, "Hyderabad").is_valid());
        assert!(!Location::new(17.385, 78.4867, "  ").is_valid());
    }
}
