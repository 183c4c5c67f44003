//! Streaming sample payloads.
//!
//! A transmitter pushes one JSON object per reading. Every field is optional;
//! a known field with a non-numeric value makes the whole payload malformed.

use serde::Deserialize;
use sky_common::{CanonicalReading, Error, Result};

/// Wire form of a single streamed reading.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SamplePayload {
    pub pm1: Option<f64>,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
    #[serde(alias = "press")]
    pub pressure: Option<f64>,
    pub gas: Option<f64>,
    #[serde(alias = "alt")]
    pub altitude: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl SamplePayload {
    fn is_empty(&self) -> bool {
        *self == SamplePayload::default()
    }

    /// Fold into a canonical reading; absent fields become 0.
    pub fn into_reading(self) -> CanonicalReading {
        CanonicalReading {
            pm1: self.pm1.unwrap_or(0.0),
            pm25: self.pm25.unwrap_or(0.0),
            pm10: self.pm10.unwrap_or(0.0),
            temp: self.temp.unwrap_or(0.0),
            hum: self.hum.unwrap_or(0.0),
            pressure: self.pressure.unwrap_or(0.0),
            gas: self.gas.unwrap_or(0.0),
            altitude: self.altitude.unwrap_or(0.0),
            lat: self.lat.unwrap_or(0.0),
            lon: self.lon.unwrap_or(0.0),
        }
    }
}

/// Parse a raw JSON body into a reading.
pub fn parse_sample(body: &[u8]) -> Result<CanonicalReading> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| Error::MalformedPayload(format!("invalid JSON: {e}")))?;
    parse_sample_value(value)
}

/// Parse an already-decoded JSON value into a reading.
pub fn parse_sample_value(value: serde_json::Value) -> Result<CanonicalReading> {
    if !value.is_object() {
        return Err(Error::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    let payload: SamplePayload =
        serde_json::from_value(value).map_err(|e| Error::MalformedPayload(e.to_string()))?;
    if payload.is_empty() {
        return Err(Error::MalformedPayload(
            "payload carries no sensor fields".to_string(),
        ));
    }
    Ok(payload.into_reading())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
