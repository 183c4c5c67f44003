//! Reverse geocoding provider interface.

use serde::Deserialize;
use sky_common::GeoPoint;
use thiserror::Error;

/// Errors returned by geocoding providers. Never surfaced past the resolver.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding disabled")]
    Disabled,

    #[error("provider returned HTTP {status}")]
    Http { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("no usable address for coordinate")]
    NoAddress,
}

/// Address components returned by a reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub county: Option<String>,
}

impl Address {
    /// Most specific local component followed by the next-broadest locality.
    ///
    /// `"Koramangala, Bengaluru"`; either half alone when the other is missing.
    pub fn display_name(&self) -> Option<String> {
        let pick = |parts: [&Option<String>; 4]| {
            parts
                .into_iter()
                .flatten()
                .map(|s| s.trim())
                .find(|s| !s.is_empty())
                .map(str::to_string)
        };
        let specific = pick([&self.neighbourhood, &self.suburb, &self.road, &None]);
        let broad = pick([&self.city, &self.town, &self.village, &self.county]);

        match (specific, broad) {
            (Some(s), Some(b)) if s != b => Some(format!("{s}, {b}")),
            (Some(s), _) => Some(s),
            (None, Some(b)) => Some(b),
            (None, None) => None,
        }
    }
}

/// Reverse geocoding provider.
pub trait ReverseGeocoder: Send + Sync {
    /// Provider name used for logs.
    fn name(&self) -> &str;
    /// Look up address components for a coordinate. One attempt, bounded by
    /// the provider's own timeout.
    fn reverse(&self, point: GeoPoint) -> Result<Address, GeocodeError>;
}

/// Provider used in offline mode; every lookup fails immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

impl ReverseGeocoder for DisabledGeocoder {
    fn name(&self) -> &str {
        "disabled"
    }

    fn reverse(&self, _point: GeoPoint) -> Result<Address, GeocodeError> {
        Err(GeocodeError::Disabled)
    }
}
