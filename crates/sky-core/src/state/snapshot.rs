//! Externally visible snapshot of the aggregation state.

use crate::series::ChartSeries;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sky_common::{CanonicalReading, HistoryEntry, LocationSource, RiskRecord};
use std::collections::VecDeque;

/// What last changed the snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    /// No data received since start.
    #[default]
    Waiting,
    /// Replaced by a batch upload.
    Updated,
    /// Updated by streamed samples.
    Streaming,
}

/// Whether any data source has delivered data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

/// Point-in-time copy of the live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: String,
    pub aqi: u32,
    /// Band label of `aqi`.
    pub tier: String,
    #[serde(flatten)]
    pub readings: CanonicalReading,
    pub location_name: String,
    pub location_source: LocationSource,
    pub health_risks: Vec<RiskRecord>,
    pub series: ChartSeries,
    pub status: IngestStatus,
    pub connection: ConnectionStatus,
    /// `None` until the first successful ingest.
    pub last_updated: Option<DateTime<Utc>>,
    pub telemetry_log: Vec<String>,
    pub history: Vec<HistoryEntry>,
}

/// Bounded console of recent streaming activity.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl TelemetryLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut lines = VecDeque::new();
        lines.push_back("> System Initialized...".to_string());
        lines.push_back("> Ready for connection...".to_string());
        while lines.len() > capacity {
            lines.pop_front();
        }
        Self { lines, capacity }
    }

    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }
}

/// Next `last_updated` value: wall-clock time, forced strictly past `previous`.
pub fn next_timestamp(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    match previous {
        Some(prev) if now <= prev => prev + chrono::Duration::microseconds(1),
        _ => now,
    }
}
