//! SkySense particulate telemetry pipeline.
//!
//! Turns heterogeneous sensor logs and streamed samples into AQI scores,
//! health-risk records, resolved place names and a bounded chart series,
//! held in a single [`state::AirQualityState`].

pub mod aqi;
pub mod cli;
pub mod exit_codes;
pub mod export;
pub mod health;
pub mod ingest;
pub mod location;
pub mod logging;
pub mod series;
pub mod state;

pub use aqi::compute_aqi;
pub use exit_codes::ExitCode;
pub use export::{export_text, parse_report_summary, ReportSummary};
pub use health::{classify, tier_label};
pub use location::{LocationResolver, ReverseGeocoder};
pub use series::{ChartSeries, SeriesBuffer};
pub use state::{AirQualityState, SampleAck, Snapshot};
