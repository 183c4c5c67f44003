//! SkySense common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the sky-* crates:
//! - Canonical sensor readings and geographic points
//! - Health risk records and severity tiers
//! - Upload history entries and ingest identifiers
//! - The unified error type and output format specifications

pub mod error;
pub mod geo;
pub mod history;
pub mod id;
pub mod output;
pub mod reading;
pub mod risk;
pub mod schema;

pub use error::{Error, Result};
pub use geo::{GeoPoint, LocationSource, ResolvedLocation, SeriesPoint};
pub use history::{HistoryEntry, HistoryOrder};
pub use id::IngestId;
pub use output::OutputFormat;
pub use reading::{CanonicalField, CanonicalReading};
pub use risk::{RiskRecord, Severity};
pub use schema::SCHEMA_VERSION;
