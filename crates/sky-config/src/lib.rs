//! SkySense configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the pipeline configuration file
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod pipeline;
pub mod resolve;
pub mod validate;

pub use pipeline::{GeocoderConfig, HistoryConfig, PipelineConfig, SeriesConfig, StreamingConfig};
pub use resolve::{resolve_config, ConfigError, ConfigSource, ResolvedConfig};
pub use validate::{
    ValidationError, ValidationResult, GEOCODER_ATTEMPTS_RANGE, GEOCODER_TIMEOUT_RANGE,
    SERIES_CAPACITY_RANGE, TELEMETRY_LOG_CAPACITY_RANGE,
};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
