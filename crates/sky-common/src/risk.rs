//! Health risk records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a single health risk, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Good,
    Low,
    Moderate,
    High,
    Severe,
    Critical,
    Emergency,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Good => "Good",
            Severity::Low => "Low",
            Severity::Moderate => "Moderate",
            Severity::High => "High",
            Severity::Severe => "Severe",
            Severity::Critical => "Critical",
            Severity::Emergency => "Emergency",
        };
        f.write_str(label)
    }
}

/// A fixed health-risk entry from the tier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub name: String,
    pub description: String,
    /// Likelihood in percent, 0..=100.
    pub probability: u8,
    pub severity: Severity,
    pub recommendations: Vec<String>,
}
