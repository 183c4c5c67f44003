//! Simplified linear AQI score.
//!
//! `floor(pm25 * 2 + pm10 * 0.5)`, derived from PM2.5/PM10 only. This is not
//! the EPA breakpoint computation and is intentionally unclamped at the top:
//! meaning is assigned by the health classifier's tiers.

/// Compute the AQI for a pair of particulate concentrations (µg/m³).
///
/// Non-finite or negative contributions read as 0, so the score is never
/// negative. Values beyond `u32::MAX` saturate.
pub fn compute_aqi(pm25: f64, pm10: f64) -> u32 {
    let pm25 = sanitize(pm25);
    let pm10 = sanitize(pm10);
    let score = (pm25 * 2.0 + pm10 * 0.5).floor();
    if score <= 0.0 {
        0
    } else {
        score as u32
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
