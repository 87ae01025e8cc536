//! Data models for the Disaster Whisperer application
//!
//! This module contains the core domain models organized by concern:
//! - Report: what the user submitted
//! - Location: geocoded coordinates and address
//! - Weather: current-conditions snapshot used to enrich the prompt

pub mod location;
pub mod report;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Location;
pub use report::{Report, Severity};
pub use weather::WeatherSnapshot;
