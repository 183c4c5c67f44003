//! Nominatim-compatible reverse geocoding over HTTP.

use super::provider::{Address, GeocodeError, ReverseGeocoder};
use serde::Deserialize;
use sky_common::GeoPoint;
use sky_config::GeocoderConfig;
use std::time::Duration;
use tracing::debug;

/// Reverse geocoder calling a Nominatim `/reverse` endpoint.
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    error: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(endpoint: impl Into<String>, user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self {
            agent,
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &GeocoderConfig) -> Self {
        Self::new(config.endpoint.clone(), &config.user_agent, config.timeout())
    }
}

impl ReverseGeocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    fn reverse(&self, point: GeoPoint) -> Result<Address, GeocodeError> {
        let response = self
            .agent
            .get(&self.endpoint)
            .query("format", "jsonv2")
            .query("lat", &point.lat.to_string())
            .query("lon", &point.lon.to_string())
            .query("addressdetails", "1")
            .query("accept-language", "en")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(status, _) => GeocodeError::Http { status },
                ureq::Error::Transport(t) => GeocodeError::Transport(t.to_string()),
            })?;

        let body: ReverseResponse = response
            .into_json()
            .map_err(|e| GeocodeError::Decode(e.to_string()))?;
        if let Some(message) = body.error {
            debug!(%point, reason = %message, "provider reported no result");
            return Err(GeocodeError::NoAddress);
        }
        body.address.ok_or(GeocodeError::NoAddress)
    }
}
