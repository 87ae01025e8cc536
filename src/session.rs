//! Per-session record of the latest generated advice
//!
//! A `SessionState` is owned by whichever surface drives the pipeline (one
//! per CLI run, one per HTTP server) and is handed to the pipeline by
//! mutable reference. It is only written at the end of a submission, and
//! always wholesale.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display format of the generation timestamp, e.g. `03:07 PM • Oct 19, 2026`
pub const GENERATED_TIME_FORMAT: &str = "%I:%M %p • %b %d, %Y";

/// Map center for the last report: coordinates plus the place as typed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    pub latitude: f64,
    pub longitude: f64,
    pub place: String,
}

impl MapData {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, place: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            place: place.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    advice: Option<String>,
    map_data: Option<MapData>,
    generated_time: Option<DateTime<Local>>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole record with the result of a submission
    pub fn record(&mut self, advice: String, map_data: MapData, generated_time: DateTime<Local>) {
        *self = Self {
            advice: Some(advice),
            map_data: Some(map_data),
            generated_time: Some(generated_time),
        };
    }

    #[must_use]
    pub fn advice(&self) -> Option<&str> {
        self.advice.as_deref()
    }

    #[must_use]
    pub fn map_data(&self) -> Option<&MapData> {
        self.map_data.as_ref()
    }

    #[must_use]
    pub fn generated_time(&self) -> Option<DateTime<Local>> {
        self.generated_time
    }

    #[must_use]
    pub fn formatted_time(&self) -> Option<String> {
        self.generated_time
            .map(|time| time.format(GENERATED_TIME_FORMAT).to_string())
    }

    #[must_use]
    pub fn has_advice(&self) -> bool {
        self.advice.is_some()
    }
}
