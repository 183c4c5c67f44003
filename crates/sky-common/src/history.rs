//! Upload history log entries.

use crate::id::IngestId;
use serde::{Deserialize, Serialize};

/// One completed batch ingest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: IngestId,
    /// Calendar date supplied by the uploader (`YYYY-MM-DD`).
    pub date: String,
    pub filename: String,
    pub location: String,
    pub aqi: u32,
    /// Rows that survived the fix and movement filters.
    pub accepted_rows: usize,
}

/// Ordering applied when reading the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrder {
    /// Date descending; same-date entries most recently inserted first.
    #[default]
    Date,
    /// Most recently inserted first.
    Insertion,
}
