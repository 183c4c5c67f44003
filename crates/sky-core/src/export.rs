//! Plain-text report rendering.

use crate::state::Snapshot;
use chrono::{DateTime, Utc};
use sky_common::CanonicalField;
use std::fmt::Write as _;

const TITLE: &str = "SkySense Air Quality Report";
const LOCATION_PREFIX: &str = "Location: ";
const AQI_PREFIX: &str = "AQI: ";

/// Render `snapshot` as a plain-text report stamped with the current time.
pub fn export_text(snapshot: &Snapshot) -> Vec<u8> {
    export_text_at(snapshot, Utc::now())
}

/// Render `snapshot` as a plain-text report stamped with `generated`.
pub fn export_text_at(snapshot: &Snapshot, generated: DateTime<Utc>) -> Vec<u8> {
    let mut out = String::with_capacity(2048);
    let rule = "=".repeat(TITLE.len());
    let last_updated = snapshot
        .last_updated
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "Never".to_string());

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Generated: {}", generated.to_rfc3339());
    let _ = writeln!(out, "Last updated: {last_updated}");
    let _ = writeln!(out, "{LOCATION_PREFIX}{}", single_line(&snapshot.location_name));
    let _ = writeln!(out, "{AQI_PREFIX}{} ({})", snapshot.aqi, snapshot.tier);
    let _ = writeln!(out);

    let _ = writeln!(out, "Readings");
    for field in CanonicalField::ALL {
        let _ = writeln!(
            out,
            "  {:<9} {:>10.1} {}",
            field_label(field),
            snapshot.readings.get(field),
            field_unit(field)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Health Risks");
    for risk in &snapshot.health_risks {
        let _ = writeln!(
            out,
            "  [{}] {} ({}%)",
            risk.severity, risk.name, risk.probability
        );
        let _ = writeln!(out, "    {}", risk.description);
        for rec in &risk.recommendations {
            let _ = writeln!(out, "    - {rec}");
        }
    }

    out.into_bytes()
}

/// Location and AQI recovered from a rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub location: String,
    pub aqi: u32,
}

/// Parse the location and AQI lines back out of a report.
pub fn parse_report_summary(text: &str) -> Option<ReportSummary> {
    let mut location = None;
    let mut aqi = None;
    for line in text.lines() {
        if location.is_none() {
            if let Some(rest) = line.strip_prefix(LOCATION_PREFIX) {
                location = Some(rest.to_string());
                continue;
            }
        }
        if aqi.is_none() {
            if let Some(rest) = line.strip_prefix(AQI_PREFIX) {
                aqi = rest.split_whitespace().next().and_then(|v| v.parse().ok());
            }
        }
    }
    Some(ReportSummary {
        location: location?,
        aqi: aqi?,
    })
}

fn single_line(s: &str) -> String {
    s.replace(['\r', '\n'], " ")
}

fn field_label(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::Pm1 => "PM1.0",
        CanonicalField::Pm25 => "PM2.5",
        CanonicalField::Pm10 => "PM10",
        CanonicalField::Temp => "Temp",
        CanonicalField::Hum => "Humidity",
        CanonicalField::Pressure => "Pressure",
        CanonicalField::Gas => "Gas",
        CanonicalField::Altitude => "Altitude",
        CanonicalField::Lat => "Latitude",
        CanonicalField::Lon => "Longitude",
    }
}

fn field_unit(field: CanonicalField) -> &'static str {
    match field {
        CanonicalField::Pm1 | CanonicalField::Pm25 | CanonicalField::Pm10 => "ug/m3",
        CanonicalField::Temp => "C",
        CanonicalField::Hum => "%",
        CanonicalField::Pressure => "hPa",
        CanonicalField::Gas => "kOhm",
        CanonicalField::Altitude => "m",
        CanonicalField::Lat | CanonicalField::Lon => "deg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationResolver;
    use crate::state::AirQualityState;
    use sky_config::PipelineConfig;

    fn text_of(snapshot: &Snapshot) -> String {
        String::from_utf8(export_text(snapshot)).unwrap()
    }

    #[test]
    fn waiting_snapshot_renders() {
        let state = AirQualityState::new(PipelineConfig::default(), LocationResolver::offline());
        let text = text_of(&state.current_snapshot());
        assert!(text.starts_with(TITLE));
        assert!(text.contains("Last updated: Never"));
        assert!(text.contains("AQI: 0 (Good)"));
        assert_eq!(text.matches("  [").count(), 4);
    }

    #[test]
    fn multiline_location_is_flattened() {
        let state = AirQualityState::new(PipelineConfig::default(), LocationResolver::offline());
        let mut snap = state.current_snapshot();
        snap.location_name = "Line one\nLine two".to_string();
        snap.aqi = 150;
        let summary = parse_report_summary(&text_of(&snap)).unwrap();
        assert_eq!(summary.location, "Line one Line two");
        assert_eq!(summary.aqi, 150);
    }

    #[test]
    fn summary_requires_both_lines() {
        assert_eq!(parse_report_summary("Location: here\n"), None);
        assert_eq!(parse_report_summary("AQI: 12 (Good)\n"), None);
        assert_eq!(
            parse_report_summary("Location: here\nAQI: 12 (Good)\n"),
            Some(ReportSummary {
                location: "here".into(),
                aqi: 12
            })
        );
    }
}
