//! Batch ingest scenarios against the aggregation state.

use sky_common::{Error, GeoPoint, HistoryOrder, LocationSource};
use sky_config::PipelineConfig;
use sky_core::export::{export_text, parse_report_summary};
use sky_core::ingest::{read_table, ReadStrategy};
use sky_core::location::{
    Address, GeocodeError, LocationResolver, ResolverPolicy, ReverseGeocoder,
};
use sky_core::state::{AirQualityState, ConnectionStatus, IngestStatus};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

/// Geocoder that always answers with the same neighbourhood.
struct FixedGeocoder {
    calls: Arc<AtomicUsize>,
}

impl ReverseGeocoder for FixedGeocoder {
    fn name(&self) -> &str {
        "fixed"
    }

    fn reverse(&self, _point: GeoPoint) -> Result<Address, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Address {
            suburb: Some("Koramangala".into()),
            city: Some("Bengaluru".into()),
            ..Default::default()
        })
    }
}

fn geocoded_state() -> (AirQualityState, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = LocationResolver::new(
        Box::new(FixedGeocoder {
            calls: Arc::clone(&calls),
        }),
        ResolverPolicy::default(),
    );
    (AirQualityState::new(PipelineConfig::default(), resolver), calls)
}

fn offline_state() -> AirQualityState {
    AirQualityState::new(PipelineConfig::default(), LocationResolver::offline())
}

const WALK: &str = "\
Time,PM1.0 (ug/m3),PM2.5 (ug/m3),PM10 (ug/m3),Temperature,Humidity,Latitude,Longitude
10:00,8,20,40,24.5,60,12.9716,77.5946
10:01,9,22,44,24.6,61,12.9716,77.59462
10:02,10,30,50,24.7,62,12.9730,77.5960
10:03,11,28,46,24.8,63,0,0
";

// ============================================================================
// Successful ingest
// ============================================================================

#[test]
fn averages_use_only_accepted_rows() {
    let (state, calls) = geocoded_state();
    let snap = state
        .ingest_batch(WALK.as_bytes(), "walk.csv", Some("2026-10-18"))
        .expect("ingest");

    // Row 2 is a sub-threshold duplicate of row 1; row 4 has no fix.
    assert_eq!(snap.series.aqi.len(), 2);
    assert_eq!(snap.readings.pm25, 25.0);
    assert_eq!(snap.readings.pm10, 45.0);
    assert_eq!(snap.readings.pm1, 9.0);
    assert_eq!(snap.aqi, 72);
    assert_eq!(snap.tier, "Good");
    assert_eq!(snap.health_risks.len(), 4);
    assert_eq!(snap.location_name, "Koramangala, Bengaluru");
    assert_eq!(snap.location_source, LocationSource::Geocoded);
    assert_eq!(snap.status, IngestStatus::Updated);
    assert_eq!(snap.connection, ConnectionStatus::Connected);
    assert!(snap.last_updated.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1, "location resolved once per batch");

    let entry = &snap.history[0];
    assert_eq!(entry.date, "2026-10-18");
    assert_eq!(entry.filename, "walk.csv");
    assert_eq!(entry.location, "Koramangala, Bengaluru");
    assert_eq!(entry.aqi, 72);
    assert_eq!(entry.accepted_rows, 2);
}

#[test]
fn substring_headers_map_to_distinct_fields() {
    let state = offline_state();
    let csv = "PM10 (ug/m3),pm1.0,pm2.5,lat,lon\n40,7,20,1.5,2.5\n";
    let snap = state.ingest_batch(csv.as_bytes(), "trap.csv", None).unwrap();
    assert_eq!(snap.readings.pm10, 40.0);
    assert_eq!(snap.readings.pm1, 7.0);
    assert_eq!(snap.aqi, 60);
}

#[test]
fn latin1_semicolon_file_is_read() {
    let state = offline_state();
    let mut bytes = b"pm2.5;pm10;Temp (".to_vec();
    bytes.push(0xB0); // degree sign in ISO-8859-1
    bytes.extend_from_slice(b"C);lat;lon\n12;30;21;48.85;2.35\n");
    let snap = state.ingest_batch(&bytes, "paris.csv", None).unwrap();
    assert_eq!(snap.readings.temp, 21.0);
    assert_eq!(snap.aqi, 39);
    assert_eq!(snap.location_name, "48.8500, 2.3500");
}

#[test]
fn series_keeps_newest_points() {
    let state = offline_state();
    let mut csv = String::from("pm25,pm10,lat,lon\n");
    for i in 0..60 {
        csv.push_str(&format!("{},0,{:.4},77.0\n", i, 10.0 + f64::from(i) * 0.001));
    }
    let snap = state.ingest_batch(csv.as_bytes(), "long.csv", None).unwrap();
    assert_eq!(snap.series.aqi.len(), 50);
    assert_eq!(snap.series.aqi.first(), Some(&20));
    assert_eq!(snap.series.aqi.last(), Some(&118));
    assert_eq!(snap.history[0].accepted_rows, 60);
}

// ============================================================================
// Spreadsheet input
// ============================================================================

/// One sheet with the same walk as `WALK`, minus the duplicate row.
const WALK_XLSX: &[u8] = include_bytes!("fixtures/walk.xlsx");

#[test]
fn xlsx_reads_first_row_as_headers() {
    let (table, strategy) = read_table(WALK_XLSX, "walk.xlsx").expect("workbook");
    assert_eq!(strategy, ReadStrategy::Spreadsheet);
    assert_eq!(
        table.headers,
        [
            "Time",
            "PM2.5 (ug/m3)",
            "PM10 (ug/m3)",
            "PM1.0 (ug/m3)",
            "Latitude",
            "Longitude"
        ]
    );
    assert_eq!(table.len(), 3);
    let first = table.row(0).expect("row");
    assert_eq!(first.get("Time"), Some("10:00"));
    assert_eq!(first.get("PM2.5 (ug/m3)"), Some("20"));
    assert_eq!(first.get("Latitude"), Some("12.9716"));
}

#[test]
fn xlsx_ingest_matches_csv_walk() {
    let (state, calls) = geocoded_state();
    let snap = state
        .ingest_batch(WALK_XLSX, "walk.xlsx", Some("2026-10-18"))
        .expect("ingest");

    // The third row has no fix.
    assert_eq!(snap.series.aqi.len(), 2);
    assert_eq!(snap.readings.pm25, 25.0);
    assert_eq!(snap.readings.pm10, 45.0);
    assert_eq!(snap.readings.pm1, 9.0);
    assert_eq!(snap.aqi, 72);
    assert_eq!(snap.tier, "Good");
    assert_eq!(snap.location_name, "Koramangala, Bengaluru");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(snap.history[0].filename, "walk.xlsx");
    assert_eq!(snap.history[0].accepted_rows, 2);
}

// ============================================================================
// Rejections leave the snapshot untouched
// ============================================================================

#[test]
fn no_gps_data_leaves_snapshot_byte_identical() {
    let (state, _) = geocoded_state();
    state
        .ingest_batch(WALK.as_bytes(), "walk.csv", Some("2026-10-18"))
        .unwrap();
    let before = serde_json::to_vec(&state.current_snapshot()).unwrap();

    let err = state
        .ingest_batch(
            b"pm25,pm10,lat,lon\n50,80,0,0\n60,90,0,0\n",
            "indoor.csv",
            Some("2026-10-19"),
        )
        .unwrap_err();
    assert!(matches!(err, Error::NoGpsData { rows: 2 }));
    assert!(err.is_rejection());

    let after = serde_json::to_vec(&state.current_snapshot()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn file_without_coordinate_columns_is_no_gps_data() {
    let state = offline_state();
    let err = state
        .ingest_batch(b"pm25,pm10\n10,20\n", "nogps.csv", None)
        .unwrap_err();
    assert!(matches!(err, Error::NoGpsData { rows: 1 }));

    let err = state
        .ingest_batch(b"pm25,lat\n10,12.97\n11,12.98\n", "halfgps.csv", None)
        .unwrap_err();
    assert!(matches!(err, Error::NoGpsData { rows: 2 }));
    assert!(state.history(HistoryOrder::Insertion).is_empty());
}

#[test]
fn unreadable_file_reports_reason() {
    let state = offline_state();
    let before = serde_json::to_vec(&state.current_snapshot()).unwrap();
    let garbage = [0u8, 159, 146, 150, 0, 1, 2, 3, 255, 254];
    match state.ingest_batch(&garbage, "blob.xlsx", None) {
        Err(Error::UnreadableFile { filename, reason }) => {
            assert_eq!(filename, "blob.xlsx");
            assert!(!reason.is_empty());
        }
        other => panic!("expected UnreadableFile, got {other:?}"),
    }
    assert_eq!(before, serde_json::to_vec(&state.current_snapshot()).unwrap());
}

#[test]
fn empty_upload_is_no_file() {
    let state = offline_state();
    assert!(matches!(
        state.ingest_batch(b"", "empty.csv", None),
        Err(Error::NoFile)
    ));
}

// ============================================================================
// History and export
// ============================================================================

#[test]
fn history_order_is_explicit() {
    let state = offline_state();
    let body = b"pm25,pm10,lat,lon\n10,10,1.0,1.0\n";
    for (name, date) in [
        ("a.csv", "2026-10-01"),
        ("b.csv", "2026-10-03"),
        ("c.csv", "2026-10-01"),
    ] {
        state.ingest_batch(body, name, Some(date)).unwrap();
    }

    let by_date: Vec<String> = state
        .history(HistoryOrder::Date)
        .into_iter()
        .map(|e| e.filename)
        .collect();
    assert_eq!(by_date, ["b.csv", "c.csv", "a.csv"]);

    let by_insertion: Vec<String> = state
        .history(HistoryOrder::Insertion)
        .into_iter()
        .map(|e| e.filename)
        .collect();
    assert_eq!(by_insertion, ["c.csv", "b.csv", "a.csv"]);

    assert_eq!(state.current_snapshot().history.len(), 3);
}

#[test]
fn export_round_trips_location_and_aqi() {
    let (state, _) = geocoded_state();
    state.ingest_batch(WALK.as_bytes(), "walk.csv", None).unwrap();
    let snap = state.current_snapshot();

    let text = String::from_utf8(export_text(&snap)).unwrap();
    let summary = parse_report_summary(&text).expect("summary");
    assert_eq!(summary.location, snap.location_name);
    assert_eq!(summary.aqi, snap.aqi);
    for risk in &snap.health_risks {
        assert!(text.contains(&risk.name));
        for rec in &risk.recommendations {
            assert!(text.contains(rec.as_str()));
        }
    }
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn concurrent_batch_and_stream_never_tear() {
    let state = offline_state();
    std::thread::scope(|scope| {
        scope.spawn(|| {
            for i in 0..20 {
                let csv = format!("pm25,pm10,lat,lon\n{i},0,{}.0,5.0\n", i + 1);
                state.ingest_batch(csv.as_bytes(), "batch.csv", None).unwrap();
            }
        });
        scope.spawn(|| {
            for i in 0..200 {
                let body = format!(r#"{{"pm25": 1, "lat": 40.0, "lon": {}}}"#, 1.0 + f64::from(i) * 0.01);
                state.ingest_sample_json(body.as_bytes()).unwrap();
            }
        });
        scope.spawn(|| {
            for _ in 0..200 {
                let snap = state.current_snapshot();
                assert!(snap.series.aqi.len() <= 50);
                assert_eq!(snap.series.aqi.len(), snap.series.gps.len());
                assert_eq!(snap.health_risks.len(), 4);
            }
        });
    });

    let snap = state.current_snapshot();
    assert_eq!(snap.history.len(), 20);
    let mut stamps = snap.history.iter().map(|e| e.id.to_string()).collect::<Vec<_>>();
    stamps.sort();
    stamps.dedup();
    assert_eq!(stamps.len(), 20);
}
