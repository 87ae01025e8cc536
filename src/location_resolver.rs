//! Location Resolution Module
//!
//! Resolves a freeform place (city, pincode or landmark) into coordinates and
//! a canonical address through a Nominatim-compatible search API.
//!
//! A miss is never an error at this boundary: lookup failures, timeouts and
//! empty results all resolve to `None` and the caller decides what to do.

use crate::config::GeocodingConfig;
use crate::models::Location;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Place name → location lookup
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a place, or `None` when it cannot be located
    async fn resolve(&self, place: &str) -> Option<Location>;
}

/// Geocoder backed by the OpenStreetMap Nominatim search API
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

/// One entry of a Nominatim search response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl TryFrom<NominatimPlace> for Location {
    type Error = anyhow::Error;

    fn try_from(place: NominatimPlace) -> Result<Self> {
        let latitude: f64 = place
            .lat
            .parse()
            .with_context(|| format!("Invalid latitude in response: {}", place.lat))?;
        let longitude: f64 = place
            .lon
            .parse()
            .with_context(|| format!("Invalid longitude in response: {}", place.lon))?;

        let location = Location::new(latitude, longitude, place.display_name);
        if !location.is_valid() {
            bail!("Geocoder returned an unusable location: {:?}", location);
        }
        Ok(location)
    }
}

impl NominatimGeocoder {
    /// Create a new geocoder
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search(&self, place: &str) -> Result<Vec<NominatimPlace>> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(place)
        );
        debug!("Geocoding request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| "Geocoding API request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Geocoding API returned status {}", status);
        }

        response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, place: &str) -> Option<Location> {
        let place = place.trim();
        if place.is_empty() {
            debug!("Refusing to geocode an empty place");
            return None;
        }

        let start_time = Instant::now();
        match self.search(place).await {
            Ok(results) => {
                let location = first_location(results);
                match &location {
                    Some(location) => info!(
                        "Resolved '{}' to {} ({}) in {:.3}s",
                        place,
                        location.address,
                        location.format_coordinates(),
                        start_time.elapsed().as_secs_f64()
                    ),
                    None => warn!("No results found for location '{}'", place),
                }
                location
            }
            Err(e) => {
                warn!("Geocoding '{}' failed: {:#}", place, e);
                None
            }
        }
    }
}

/// Use the first (best) result that converts into a valid location
fn first_location(results: Vec<NominatimPlace>) -> Option<Location> {
    let first = results.into_iter().next()?;
    match Location::try_from(first) {
        Ok(location) => Some(location),
        Err(e) => {
            warn!("Discarding geocoding result: {:#}", e);
            None
        }
    }
}
