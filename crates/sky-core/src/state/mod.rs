//! Aggregation state: the live snapshot, upload history and telemetry log.
//!
//! All writers serialize on a single ingest lock, which also covers the
//! location resolver's cache writes. Readers take a consistent copy under a
//! read lock that writers hold only for the final swap, so a batch ingest and
//! a streaming ingest never interleave a partial update.

pub mod history;
pub mod snapshot;

pub use history::HistoryLog;
pub use snapshot::{next_timestamp, ConnectionStatus, IngestStatus, Snapshot, TelemetryLog};

use crate::aqi::compute_aqi;
use crate::health::{classify, tier_label};
use crate::ingest::{normalize, parse_sample, read_table};
use crate::location::LocationResolver;
use crate::series::{ChartSeries, SeriesBuffer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sky_common::{
    CanonicalReading, Error, HistoryEntry, HistoryOrder, IngestId, ResolvedLocation, Result,
    RiskRecord, SeriesPoint, SCHEMA_VERSION,
};
use sky_config::PipelineConfig;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Acknowledgement for one accepted streamed sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleAck {
    pub aqi: u32,
    pub tier: String,
    pub location: String,
    /// Whether the sample entered the series buffer.
    pub appended: bool,
    /// Whether the location was re-resolved for this sample.
    pub relocated: bool,
    pub series_len: usize,
}

#[derive(Debug)]
struct LiveState {
    readings: CanonicalReading,
    aqi: u32,
    risks: Vec<RiskRecord>,
    location: ResolvedLocation,
    series: SeriesBuffer,
    status: IngestStatus,
    connection: ConnectionStatus,
    last_updated: Option<DateTime<Utc>>,
    last_resolved_at: Option<DateTime<Utc>>,
    telemetry: TelemetryLog,
    history: HistoryLog,
}

impl LiveState {
    fn new(config: &PipelineConfig) -> Self {
        Self {
            readings: CanonicalReading::default(),
            aqi: 0,
            risks: classify(0),
            location: ResolvedLocation::waiting(),
            series: SeriesBuffer::new(
                config.series.capacity,
                config.series.movement_threshold_deg,
            ),
            status: IngestStatus::Waiting,
            connection: ConnectionStatus::Disconnected,
            last_updated: None,
            last_resolved_at: None,
            telemetry: TelemetryLog::new(config.streaming.telemetry_log_capacity),
            history: HistoryLog::default(),
        }
    }

    fn snapshot(&self, order: HistoryOrder) -> Snapshot {
        Snapshot {
            schema_version: SCHEMA_VERSION.to_string(),
            aqi: self.aqi,
            tier: tier_label(i64::from(self.aqi)).to_string(),
            readings: self.readings,
            location_name: self.location.display_name.clone(),
            location_source: self.location.source,
            health_risks: self.risks.clone(),
            series: ChartSeries::from(&self.series),
            status: self.status,
            connection: self.connection,
            last_updated: self.last_updated,
            telemetry_log: self.telemetry.to_vec(),
            history: self.history.ordered(order),
        }
    }
}

/// Fully computed result of a batch upload, applied in one swap.
struct BatchUpdate {
    readings: CanonicalReading,
    aqi: u32,
    risks: Vec<RiskRecord>,
    location: ResolvedLocation,
    series: SeriesBuffer,
    accepted_rows: usize,
}

/// The pipeline's single shared state object.
#[derive(Debug)]
pub struct AirQualityState {
    config: PipelineConfig,
    resolver: LocationResolver,
    ingest_lock: Mutex<()>,
    live: RwLock<LiveState>,
}

impl AirQualityState {
    pub fn new(config: PipelineConfig, resolver: LocationResolver) -> Self {
        let live = RwLock::new(LiveState::new(&config));
        Self {
            config,
            resolver,
            ingest_lock: Mutex::new(()),
            live,
        }
    }

    /// State with the resolver described by `config.geocoder`.
    pub fn from_config(config: PipelineConfig) -> Self {
        let resolver = LocationResolver::from_config(&config.geocoder);
        Self::new(config, resolver)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn resolver(&self) -> &LocationResolver {
        &self.resolver
    }

    // ── Batch ingest ────────────────────────────────────────────────────

    /// Ingest a whole sensor log file.
    ///
    /// The file is read, normalized and movement-filtered in full before
    /// anything is published. On any error the snapshot is left untouched.
    /// `date` defaults to today's UTC date.
    pub fn ingest_batch(&self, bytes: &[u8], filename: &str, date: Option<&str>) -> Result<Snapshot> {
        if bytes.is_empty() || filename.trim().is_empty() {
            return Err(Error::NoFile);
        }

        let (table, strategy) = read_table(bytes, filename).map_err(|err| Error::UnreadableFile {
            filename: filename.to_string(),
            reason: err.to_string(),
        })?;
        let mapping = normalize(&table.headers);
        debug!(
            filename,
            %strategy,
            rows = table.len(),
            fields = mapping.fields().count(),
            "batch parsed"
        );
        if !mapping.has_coordinates() {
            warn!(filename, rows = table.len(), "batch rejected: no coordinate columns");
            return Err(Error::NoGpsData { rows: table.len() });
        }

        let readings: Vec<CanonicalReading> = table
            .records
            .iter()
            .map(|record| mapping.reading_from(record))
            .collect();

        let mut series = SeriesBuffer::new(
            self.config.series.capacity,
            self.config.series.movement_threshold_deg,
        );
        let mut accepted = Vec::new();
        for reading in &readings {
            let position = reading.position();
            if !position.has_fix() {
                continue;
            }
            let aqi = compute_aqi(reading.pm25, reading.pm10);
            if series.append(SeriesPoint::new(aqi, position)) {
                accepted.push(*reading);
            }
        }

        let first = match accepted.first() {
            Some(first) => first.position(),
            None => {
                warn!(filename, rows = readings.len(), "batch rejected: no GPS data");
                return Err(Error::NoGpsData {
                    rows: readings.len(),
                });
            }
        };

        let averages = CanonicalReading::mean_of(&accepted);
        let aqi = compute_aqi(averages.pm25, averages.pm10);
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(date) => date.to_string(),
            None => Utc::now().format("%Y-%m-%d").to_string(),
        };

        let _writer = self.writer();
        let update = BatchUpdate {
            readings: averages,
            aqi,
            risks: classify(i64::from(aqi)),
            location: self.resolver.resolve(first),
            series,
            accepted_rows: accepted.len(),
        };
        let entry = HistoryEntry {
            id: IngestId::new(),
            date,
            filename: filename.to_string(),
            location: update.location.display_name.clone(),
            aqi,
            accepted_rows: update.accepted_rows,
        };
        info!(
            ingest_id = %entry.id,
            filename,
            aqi,
            accepted_rows = update.accepted_rows,
            total_rows = readings.len(),
            location = %entry.location,
            "batch ingested"
        );

        let mut live = self.write_live();
        let now = Utc::now();
        live.readings = update.readings;
        live.aqi = update.aqi;
        live.risks = update.risks;
        live.location = update.location;
        live.series = update.series;
        live.status = IngestStatus::Updated;
        live.connection = ConnectionStatus::Connected;
        live.last_updated = Some(next_timestamp(live.last_updated, now));
        live.last_resolved_at = Some(now);
        live.history.push(entry);
        Ok(live.snapshot(self.config.history.default_order))
    }

    // ── Streaming ingest ────────────────────────────────────────────────

    /// Ingest one JSON-encoded sample. Malformed payloads leave the state
    /// untouched.
    pub fn ingest_sample_json(&self, body: &[u8]) -> Result<SampleAck> {
        let reading = parse_sample(body).map_err(|err| {
            warn!(error = %err, "sample rejected");
            err
        })?;
        self.ingest_sample(reading)
    }

    pub fn ingest_sample(&self, reading: CanonicalReading) -> Result<SampleAck> {
        self.ingest_sample_at(reading, Utc::now())
    }

    /// Ingest one reading as if received at `now`.
    ///
    /// AQI and risks come from this reading alone. The location is resolved
    /// on the first fix and afterwards only once the previous resolution is
    /// older than the configured relocate interval.
    pub fn ingest_sample_at(&self, reading: CanonicalReading, now: DateTime<Utc>) -> Result<SampleAck> {
        let _writer = self.writer();
        let aqi = compute_aqi(reading.pm25, reading.pm10);
        let position = reading.position();

        let (due, mut series) = {
            let live = self.read_live();
            let due = position.has_fix()
                && relocate_due(
                    live.last_resolved_at,
                    now,
                    self.config.streaming.relocate_interval(),
                );
            (due, live.series.clone())
        };
        let relocated = due.then(|| self.resolver.resolve(position));
        let appended = position.has_fix() && series.append(SeriesPoint::new(aqi, position));

        let mut live = self.write_live();
        live.readings = reading;
        live.aqi = aqi;
        live.risks = classify(i64::from(aqi));
        live.series = series;
        if let Some(location) = relocated.clone() {
            live.location = location;
            live.last_resolved_at = Some(now);
        }
        live.status = IngestStatus::Streaming;
        live.connection = ConnectionStatus::Connected;
        live.last_updated = Some(next_timestamp(live.last_updated, now));
        let line = format!("> [REC] AQI:{} | Loc:{}", aqi, live.location.display_name);
        live.telemetry.push(line);

        debug!(aqi, appended, relocated = relocated.is_some(), "sample ingested");
        Ok(SampleAck {
            aqi,
            tier: tier_label(i64::from(aqi)).to_string(),
            location: live.location.display_name.clone(),
            appended,
            relocated: relocated.is_some(),
            series_len: live.series.len(),
        })
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// Consistent copy of the live state, history in the configured order.
    pub fn current_snapshot(&self) -> Snapshot {
        self.read_live().snapshot(self.config.history.default_order)
    }

    pub fn history(&self, order: HistoryOrder) -> Vec<HistoryEntry> {
        self.read_live().history.ordered(order)
    }

    /// Plain-text report of the current snapshot.
    pub fn export_text(&self) -> Vec<u8> {
        crate::export::export_text(&self.current_snapshot())
    }

    fn writer(&self) -> MutexGuard<'_, ()> {
        self.ingest_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_live(&self) -> RwLockReadGuard<'_, LiveState> {
        self.live.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_live(&self) -> RwLockWriteGuard<'_, LiveState> {
        self.live.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Whether a streamed fix should trigger a fresh location lookup.
fn relocate_due(last: Option<DateTime<Utc>>, now: DateTime<Utc>, interval: Duration) -> bool {
    match last {
        None => true,
        Some(last) => match (now - last).to_std() {
            Ok(elapsed) => elapsed >= interval,
            // Clock went backwards.
            Err(_) => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_common::LocationSource;

    fn state() -> AirQualityState {
        AirQualityState::new(PipelineConfig::default(), LocationResolver::offline())
    }

    const LOG: &str = "pm1,pm25,pm10,temp,hum,lat,lon\n\
                       10,20,40,25,60,12.9716,77.5946\n\
                       12,30,50,26,61,12.9726,77.5956\n";

    #[test]
    fn initial_snapshot_is_waiting() {
        let snap = state().current_snapshot();
        assert_eq!(snap.status, IngestStatus::Waiting);
        assert_eq!(snap.connection, ConnectionStatus::Disconnected);
        assert_eq!(snap.location_name, "Waiting for Data...");
        assert_eq!(snap.health_risks.len(), 4);
        assert!(snap.last_updated.is_none());
        assert!(snap.history.is_empty());
    }

    #[test]
    fn batch_averages_accepted_rows() {
        let state = state();
        let snap = state
            .ingest_batch(LOG.as_bytes(), "walk.csv", Some("2026-10-18"))
            .unwrap();
        assert_eq!(snap.readings.pm25, 25.0);
        assert_eq!(snap.readings.pm10, 45.0);
        // floor(25*2 + 45*0.5) = 72
        assert_eq!(snap.aqi, 72);
        assert_eq!(snap.series.aqi.len(), 2);
        assert_eq!(snap.status, IngestStatus::Updated);
        assert_eq!(snap.location_source, LocationSource::CoordinateFallback);
        assert_eq!(snap.location_name, "12.9716, 77.5946");
        assert_eq!(snap.history.len(), 1);
        assert_eq!(snap.history[0].accepted_rows, 2);
    }

    #[test]
    fn empty_upload_is_no_file() {
        let err = state().ingest_batch(b"", "x.csv", None).unwrap_err();
        assert!(matches!(err, Error::NoFile));
    }

    #[test]
    fn batch_without_fix_is_rejected() {
        let state = state();
        let err = state
            .ingest_batch(b"pm25,pm10,lat,lon\n10,20,0,0\n", "zero.csv", None)
            .unwrap_err();
        assert!(matches!(err, Error::NoGpsData { rows: 1 }));
        assert_eq!(state.current_snapshot().status, IngestStatus::Waiting);
    }

    #[test]
    fn sample_without_fix_keeps_location_and_series() {
        let state = state();
        state
            .ingest_sample(CanonicalReading {
                pm25: 10.0,
                lat: 1.0,
                lon: 2.0,
                ..Default::default()
            })
            .unwrap();
        let ack = state
            .ingest_sample(CanonicalReading {
                pm25: 50.0,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(ack.aqi, 100);
        assert!(!ack.appended);
        assert!(!ack.relocated);
        assert_eq!(ack.location, "1.0000, 2.0000");
        assert_eq!(ack.series_len, 1);
    }

    #[test]
    fn relocate_due_respects_interval() {
        let t0 = Utc::now();
        let interval = Duration::from_secs(30);
        assert!(relocate_due(None, t0, interval));
        assert!(!relocate_due(Some(t0), t0 + chrono::Duration::seconds(29), interval));
        assert!(relocate_due(Some(t0), t0 + chrono::Duration::seconds(30), interval));
        assert!(!relocate_due(Some(t0), t0 - chrono::Duration::seconds(5), interval));
    }
}
