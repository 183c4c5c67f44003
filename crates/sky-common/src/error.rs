//! Error types for SkySense.

use thiserror::Error;

/// Result type alias for SkySense operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for SkySense.
///
/// Geocoding failures have no variant: the location resolver absorbs
/// them and degrades to a coordinate fallback.
#[derive(Error, Debug)]
pub enum Error {
    // Batch ingest errors (10-19)
    #[error("no file provided")]
    NoFile,

    #[error("unreadable file '{filename}': {reason}")]
    UnreadableFile { filename: String, reason: String },

    #[error("no GPS data: none of {rows} rows carry a valid coordinate")]
    NoGpsData { rows: usize },

    // Streaming ingest errors (20-29)
    #[error("malformed sensor payload: {0}")]
    MalformedPayload(String),

    // Configuration errors (30-39)
    #[error("configuration error: {0}")]
    Config(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::NoFile => 10,
            Error::UnreadableFile { .. } => 11,
            Error::NoGpsData { .. } => 12,
            Error::MalformedPayload(_) => 20,
            Error::Config(_) => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Whether the error rejected a request without touching shared state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::NoFile
                | Error::UnreadableFile { .. }
                | Error::NoGpsData { .. }
                | Error::MalformedPayload(_)
        )
    }
}
