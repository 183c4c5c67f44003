//! Output format specifications.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering format for command output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Machine-readable JSON.
    #[default]
    Json,
    /// Plain-text report for humans.
    Text,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}
