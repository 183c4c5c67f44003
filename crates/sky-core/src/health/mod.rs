//! Tiered health-risk classification.
//!
//! Classification is a table lookup over [`tiers::TIERS`]: the first tier
//! whose inclusive upper bound is `>= aqi` wins, so boundary values belong to
//! the lower tier. Records come back in table declaration order, unsorted.

pub mod tiers;

use sky_common::RiskRecord;
use tiers::{RiskTemplate, TierSpec, TIERS};

/// Locate the tier for an AQI value. Total over all of `i64`.
pub fn tier_for(aqi: i64) -> &'static TierSpec {
    TIERS
        .iter()
        .find(|tier| tier.upper.map_or(true, |upper| aqi <= upper))
        .unwrap_or(&TIERS[TIERS.len() - 1])
}

/// Zero-based index of the tier containing `aqi`.
pub fn tier_index(aqi: i64) -> usize {
    TIERS
        .iter()
        .position(|tier| tier.upper.map_or(true, |upper| aqi <= upper))
        .unwrap_or(TIERS.len() - 1)
}

/// Human-readable band label for `aqi`.
pub fn tier_label(aqi: i64) -> &'static str {
    tier_for(aqi).label
}

/// Return the four fixed risk records for the tier containing `aqi`.
pub fn classify(aqi: i64) -> Vec<RiskRecord> {
    tier_for(aqi).risks.iter().map(to_record).collect()
}

fn to_record(template: &RiskTemplate) -> RiskRecord {
    RiskRecord {
        name: template.name.to_string(),
        description: template.description.to_string(),
        probability: template.probability,
        severity: template.severity,
        recommendations: template
            .recommendations
            .iter()
            .map(|r| r.to_string())
            .collect(),
    }
}
