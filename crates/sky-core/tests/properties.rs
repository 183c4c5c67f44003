//! Property-based tests for the classifier, AQI formula, and series buffer.

use proptest::prelude::*;
use sky_common::{GeoPoint, SeriesPoint};
use sky_core::compute_aqi;
use sky_core::health::{classify, tier_index, tier_label};
use sky_core::series::{has_moved, SeriesBuffer};

const RISK_NAMES: [&str; 4] = [
    "Asthma & Allergies",
    "Respiratory Diseases",
    "Cardiovascular Diseases",
    "Eye & Throat Irritation",
];

fn point_strategy() -> impl Strategy<Value = GeoPoint> {
    (-0.01f64..0.01, -0.01f64..0.01).prop_map(|(dlat, dlon)| GeoPoint::new(12.97 + dlat, 77.59 + dlon))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    // ── Classifier ──────────────────────────────────────────────────

    /// Any AQI yields exactly four records in table order.
    #[test]
    fn classify_always_four_records(aqi in any::<i64>()) {
        let risks = classify(aqi);
        prop_assert_eq!(risks.len(), 4);
        let names: Vec<&str> = risks.iter().map(|r| r.name.as_str()).collect();
        prop_assert_eq!(names, RISK_NAMES.to_vec());
        for risk in &risks {
            prop_assert!(risk.probability <= 100);
            prop_assert!(!risk.recommendations.is_empty());
        }
    }

    /// Tiers never decrease as AQI grows.
    #[test]
    fn tiers_are_monotonic(a in -100i64..1000, b in -100i64..1000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(tier_index(lo) <= tier_index(hi));
    }

    // ── AQI ─────────────────────────────────────────────────────────

    #[test]
    fn aqi_matches_floor_formula(pm25 in 0.0f64..2000.0, pm10 in 0.0f64..2000.0) {
        let expected = (pm25 * 2.0 + pm10 * 0.5).floor() as u32;
        prop_assert_eq!(compute_aqi(pm25, pm10), expected);
    }

    #[test]
    fn aqi_is_monotonic_in_pm25(pm25 in 0.0f64..500.0, extra in 0.0f64..500.0, pm10 in 0.0f64..500.0) {
        prop_assert!(compute_aqi(pm25, pm10) <= compute_aqi(pm25 + extra, pm10));
    }

    // ── Series buffer ───────────────────────────────────────────────

    /// The buffer never exceeds capacity and holds the newest retained
    /// points in arrival order.
    #[test]
    fn series_is_bounded_fifo(
        capacity in 1usize..60,
        points in prop::collection::vec(point_strategy(), 0..200),
    ) {
        let mut buffer = SeriesBuffer::new(capacity, 0.0001);
        let mut retained = Vec::new();
        for (i, point) in points.into_iter().enumerate() {
            let sp = SeriesPoint::new(i as u32, point);
            if buffer.append(sp) {
                retained.push(sp);
            }
            prop_assert!(buffer.len() <= capacity);
        }
        let start = retained.len().saturating_sub(capacity);
        prop_assert_eq!(buffer.to_vec(), retained[start..].to_vec());
    }

    /// Consecutive retained points always differ by more than the threshold.
    #[test]
    fn retained_points_moved(points in prop::collection::vec(point_strategy(), 2..100)) {
        let mut buffer = SeriesBuffer::new(1000, 0.0001);
        for (i, point) in points.into_iter().enumerate() {
            buffer.append(SeriesPoint::new(i as u32, point));
        }
        let kept = buffer.to_vec();
        for pair in kept.windows(2) {
            prop_assert!(has_moved(Some(pair[0].position()), pair[1].position(), 0.0001));
        }
    }
}

#[test]
fn boundaries_belong_to_lower_tier() {
    for boundary in [100i64, 200, 300, 400, 500] {
        assert_eq!(tier_label(boundary), tier_label(boundary - 1), "AQI {boundary}");
        assert_ne!(tier_label(boundary), tier_label(boundary + 1), "AQI {boundary}");
    }
}

#[test]
fn reference_aqi_value() {
    assert_eq!(compute_aqi(25.0, 40.0), 70);
}
