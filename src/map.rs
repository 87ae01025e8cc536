//! Map view of the reported location
//!
//! A red marker at the reported coordinates plus a highlighted 10 km circle,
//! exported as GeoJSON for web maps and as an OpenStreetMap link for the CLI.

use crate::session::{MapData, SessionState};
use serde_json::{Value, json};
use std::f64::consts::PI;

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: MapData,
    pub zoom: u8,
    pub radius_m: f64,
}

impl MapView {
    pub const DEFAULT_ZOOM: u8 = 9;
    pub const HIGHLIGHT_RADIUS_M: f64 = 10_000.0;
    pub const MARKER_TOOLTIP: &'static str = "Reported Location";
    pub const CIRCLE_VERTICES: usize = 64;

    #[must_use]
    pub fn new(center: MapData) -> Self {
        Self {
            center,
            zoom: Self::DEFAULT_ZOOM,
            radius_m: Self::HIGHLIGHT_RADIUS_M,
        }
    }

    /// Map of the session's last report, if any
    #[must_use]
    pub fn from_session(session: &SessionState) -> Option<Self> {
        session.map_data().cloned().map(Self::new)
    }

    #[must_use]
    pub fn osm_url(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.5}&mlon={lon:.5}#map={zoom}/{lat:.5}/{lon:.5}",
            lat = self.center.latitude,
            lon = self.center.longitude,
            zoom = self.zoom
        )
    }

    /// Closed ring of `[lon, lat]` points approximating the highlight circle
    #[must_use]
    pub fn circle_ring(&self, vertices: usize) -> Vec<[f64; 2]> {
        let vertices = vertices.max(3);
        let lat_rad = self.center.latitude.to_radians();
        let dlat = (self.radius_m / EARTH_RADIUS_M).to_degrees();
        // Clamp near the poles where a degree of longitude shrinks to nothing
        let dlon = (self.radius_m / (EARTH_RADIUS_M * lat_rad.cos().max(1e-6))).to_degrees();

        let mut ring: Vec<[f64; 2]> = (0..vertices)
            .map(|i| {
                let theta = 2.0 * PI * i as f64 / vertices as f64;
                [
                    self.center.longitude + dlon * theta.sin(),
                    self.center.latitude + dlat * theta.cos(),
                ]
            })
            .collect();
        ring.push(ring[0]);
        ring
    }

    /// FeatureCollection with the marker point and the circle polygon
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [self.center.longitude, self.center.latitude]
                    },
                    "properties": {
                        "role": "marker",
                        "popup": self.center.place,
                        "tooltip": Self::MARKER_TOOLTIP,
                        "color": "red"
                    }
                },
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [self.circle_ring(Self::CIRCLE_VERTICES)]
                    },
                    "properties": {
                        "role": "highlight",
                        "radius_m": self.radius_m,
                        "color": "crimson",
                        "fill_opacity": 0.1
                    }
                }
            ],
            "zoom": self.zoom
        })
    }
}
