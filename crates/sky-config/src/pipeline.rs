//! Pipeline configuration types.
//!
//! Every field carries a default so a partial (or empty) JSON object is a
//! valid configuration file.

use serde::{Deserialize, Serialize};
use sky_common::HistoryOrder;
use std::time::Duration;

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub schema_version: String,
    pub series: SeriesConfig,
    pub geocoder: GeocoderConfig,
    pub streaming: StreamingConfig,
    pub history: HistoryConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            series: SeriesConfig::default(),
            geocoder: GeocoderConfig::default(),
            streaming: StreamingConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Bounded series buffer and movement filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Maximum retained points; older points are evicted first.
    pub capacity: usize,
    /// Minimum per-axis displacement (degrees) for a point to count as movement.
    pub movement_threshold_deg: f64,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            movement_threshold_deg: 0.0001,
        }
    }
}

/// Reverse geocoding provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub enabled: bool,
    /// Nominatim-compatible `/reverse` endpoint.
    pub endpoint: String,
    pub user_agent: String,
    /// Per-attempt timeout.
    pub timeout_secs: u64,
    pub max_attempts: u32,
    /// Consecutive failed resolutions before the provider is skipped.
    pub failure_threshold: u32,
    pub cooldown_secs: u64,
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://nominatim.openstreetmap.org/reverse".to_string(),
            user_agent: concat!("skysense/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 8,
            max_attempts: 2,
            failure_threshold: 3,
            cooldown_secs: 60,
        }
    }
}

/// Streaming (single-sample) ingest settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Minimum age of the last location resolution before re-resolving.
    pub relocate_interval_secs: u64,
    /// Lines retained in the telemetry console log.
    pub telemetry_log_capacity: usize,
}

impl StreamingConfig {
    pub fn relocate_interval(&self) -> Duration {
        Duration::from_secs(self.relocate_interval_secs)
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            relocate_interval_secs: 30,
            telemetry_log_capacity: 20,
        }
    }
}

/// Upload history presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub default_order: HistoryOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: PipelineConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.series.capacity, 50);
        assert_eq!(config.geocoder.max_attempts, 2);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let json = r#"{"series": {"capacity": 10}, "history": {"default_order": "insertion"}}"#;
        let config: PipelineConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(config.series.capacity, 10);
        assert_eq!(config.series.movement_threshold_deg, 0.0001);
        assert_eq!(config.history.default_order, HistoryOrder::Insertion);
        assert!(config.geocoder.enabled);
    }
}
