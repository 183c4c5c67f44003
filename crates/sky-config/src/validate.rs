//! Semantic validation of pipeline configuration.

use crate::pipeline::PipelineConfig;
use sky_common::schema::is_compatible;
use std::fmt;
use std::ops::RangeInclusive;

/// Accepted range for `series.capacity`.
pub const SERIES_CAPACITY_RANGE: RangeInclusive<usize> = 1..=10_000;
/// Accepted range for `streaming.telemetry_log_capacity`.
pub const TELEMETRY_LOG_CAPACITY_RANGE: RangeInclusive<usize> = 1..=10_000;
/// Accepted per-attempt geocoder timeout, in seconds.
pub const GEOCODER_TIMEOUT_RANGE: RangeInclusive<u64> = 5..=10;
/// Accepted geocoder attempts per lookup.
pub const GEOCODER_ATTEMPTS_RANGE: RangeInclusive<u32> = 1..=2;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All problems found in a configuration; empty means valid.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

impl PipelineConfig {
    /// Check value ranges, collecting every problem instead of stopping at the first.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &'static str, message: String| {
            if !ok {
                errors.push(ValidationError { field, message });
            }
        };

        if !is_compatible(&self.schema_version, crate::CONFIG_SCHEMA_VERSION) {
            check(
                false,
                "schema_version",
                format!("unsupported schema version {}", self.schema_version),
            );
        }

        check(
            SERIES_CAPACITY_RANGE.contains(&self.series.capacity),
            "series.capacity",
            format!(
                "must be in {:?}, got {}",
                SERIES_CAPACITY_RANGE, self.series.capacity
            ),
        );
        check(
            self.series.movement_threshold_deg.is_finite()
                && self.series.movement_threshold_deg >= 0.0,
            "series.movement_threshold_deg",
            format!(
                "must be a non-negative number, got {}",
                self.series.movement_threshold_deg
            ),
        );

        let geo = &self.geocoder;
        check(
            GEOCODER_TIMEOUT_RANGE.contains(&geo.timeout_secs),
            "geocoder.timeout_secs",
            format!(
                "must be in {:?}, got {}",
                GEOCODER_TIMEOUT_RANGE, geo.timeout_secs
            ),
        );
        check(
            GEOCODER_ATTEMPTS_RANGE.contains(&geo.max_attempts),
            "geocoder.max_attempts",
            format!(
                "must be in {:?}, got {}",
                GEOCODER_ATTEMPTS_RANGE, geo.max_attempts
            ),
        );
        check(
            geo.failure_threshold >= 1,
            "geocoder.failure_threshold",
            "must be at least 1".to_string(),
        );
        if geo.enabled {
            check(
                geo.endpoint.starts_with("http://") || geo.endpoint.starts_with("https://"),
                "geocoder.endpoint",
                format!("must be an http(s) URL, got '{}'", geo.endpoint),
            );
            check(
                !geo.user_agent.trim().is_empty(),
                "geocoder.user_agent",
                "must not be empty".to_string(),
            );
        }

        check(
            TELEMETRY_LOG_CAPACITY_RANGE.contains(&self.streaming.telemetry_log_capacity),
            "streaming.telemetry_log_capacity",
            format!(
                "must be in {:?}, got {}",
                TELEMETRY_LOG_CAPACITY_RANGE, self.streaming.telemetry_log_capacity
            ),
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
