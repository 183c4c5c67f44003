//! Canonical sensor readings.
//!
//! Every upstream format (uploaded tables, streamed JSON samples) is folded
//! onto the fixed field set defined here.

use crate::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed internal attribute names that input columns map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Pm1,
    Pm25,
    Pm10,
    Temp,
    Hum,
    Pressure,
    Gas,
    Altitude,
    Lat,
    Lon,
}

impl CanonicalField {
    /// All fields in declaration order.
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Pm1,
        CanonicalField::Pm25,
        CanonicalField::Pm10,
        CanonicalField::Temp,
        CanonicalField::Hum,
        CanonicalField::Pressure,
        CanonicalField::Gas,
        CanonicalField::Altitude,
        CanonicalField::Lat,
        CanonicalField::Lon,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::Pm1 => "pm1",
            CanonicalField::Pm25 => "pm25",
            CanonicalField::Pm10 => "pm10",
            CanonicalField::Temp => "temp",
            CanonicalField::Hum => "hum",
            CanonicalField::Pressure => "pressure",
            CanonicalField::Gas => "gas",
            CanonicalField::Altitude => "altitude",
            CanonicalField::Lat => "lat",
            CanonicalField::Lon => "lon",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single normalized reading. Absent fields are 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalReading {
    pub pm1: f64,
    pub pm25: f64,
    pub pm10: f64,
    pub temp: f64,
    pub hum: f64,
    pub pressure: f64,
    pub gas: f64,
    pub altitude: f64,
    pub lat: f64,
    pub lon: f64,
}

impl CanonicalReading {
    pub fn get(&self, field: CanonicalField) -> f64 {
        match field {
            CanonicalField::Pm1 => self.pm1,
            CanonicalField::Pm25 => self.pm25,
            CanonicalField::Pm10 => self.pm10,
            CanonicalField::Temp => self.temp,
            CanonicalField::Hum => self.hum,
            CanonicalField::Pressure => self.pressure,
            CanonicalField::Gas => self.gas,
            CanonicalField::Altitude => self.altitude,
            CanonicalField::Lat => self.lat,
            CanonicalField::Lon => self.lon,
        }
    }

    /// Builder-style setter used while a reading is being assembled.
    pub fn with(mut self, field: CanonicalField, value: f64) -> Self {
        let slot = match field {
            CanonicalField::Pm1 => &mut self.pm1,
            CanonicalField::Pm25 => &mut self.pm25,
            CanonicalField::Pm10 => &mut self.pm10,
            CanonicalField::Temp => &mut self.temp,
            CanonicalField::Hum => &mut self.hum,
            CanonicalField::Pressure => &mut self.pressure,
            CanonicalField::Gas => &mut self.gas,
            CanonicalField::Altitude => &mut self.altitude,
            CanonicalField::Lat => &mut self.lat,
            CanonicalField::Lon => &mut self.lon,
        };
        *slot = value;
        self
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }

    /// Field-wise mean over `readings`, rounded to one decimal place.
    ///
    /// Returns the all-zero reading for an empty slice.
    pub fn mean_of(readings: &[CanonicalReading]) -> CanonicalReading {
        if readings.is_empty() {
            return CanonicalReading::default();
        }
        let n = readings.len() as f64;
        CanonicalField::ALL
            .iter()
            .fold(CanonicalReading::default(), |acc, &field| {
                let sum: f64 = readings.iter().map(|r| r.get(field)).sum();
                acc.with(field, round1(sum / n))
            })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
