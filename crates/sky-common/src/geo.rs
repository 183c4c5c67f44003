//! Geographic points, resolved locations, and chart series points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair in decimal degrees.
///
/// `(0, 0)` is reserved as the "no fix" sentinel; a point with either axis at
/// exactly zero is treated as having no fix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const NO_FIX: GeoPoint = GeoPoint { lat: 0.0, lon: 0.0 };

    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn has_fix(&self) -> bool {
        self.lat != 0.0 && self.lon != 0.0
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// How a location display name was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// Reverse geocoding succeeded.
    Geocoded,
    /// Geocoding was unavailable; the name is the formatted coordinate.
    CoordinateFallback,
    /// The reading carried no fix.
    NoSignal,
}

/// A human-readable place name for a coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub display_name: String,
    pub source: LocationSource,
}

impl ResolvedLocation {
    pub fn geocoded(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            source: LocationSource::Geocoded,
        }
    }

    pub fn coordinate_fallback(point: GeoPoint) -> Self {
        Self {
            display_name: point.to_string(),
            source: LocationSource::CoordinateFallback,
        }
    }

    pub fn no_signal() -> Self {
        Self {
            display_name: "No GPS Signal".to_string(),
            source: LocationSource::NoSignal,
        }
    }

    /// Placeholder used before any data has arrived.
    pub fn waiting() -> Self {
        Self {
            display_name: "Waiting for Data...".to_string(),
            source: LocationSource::NoSignal,
        }
    }
}

/// One entry of the AQI-vs-position chart feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub aqi: u32,
    pub lat: f64,
    pub lon: f64,
}

impl SeriesPoint {
    pub fn new(aqi: u32, point: GeoPoint) -> Self {
        Self {
            aqi,
            lat: point.lat,
            lon: point.lon,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}
