//! Movement filter and bounded series buffer.
//!
//! Feeds the AQI-vs-position chart. A point is retained only when it moved
//! more than the threshold (per axis) from the most recent retained point,
//! and the buffer evicts its oldest point once capacity is exceeded.

use serde::{Deserialize, Serialize};
use sky_common::{GeoPoint, SeriesPoint};
use std::collections::VecDeque;

/// Default number of retained points.
pub const DEFAULT_CAPACITY: usize = 50;

/// Default movement threshold in degrees (~11 m).
pub const DEFAULT_MOVEMENT_THRESHOLD_DEG: f64 = 0.0001;

/// Whether `next` moved away from `last` by more than `threshold` on either axis.
///
/// With no previous point the answer is vacuously yes.
pub fn has_moved(last: Option<GeoPoint>, next: GeoPoint, threshold: f64) -> bool {
    match last {
        None => true,
        Some(last) => {
            (next.lat - last.lat).abs() > threshold || (next.lon - last.lon).abs() > threshold
        }
    }
}

/// Fixed-capacity FIFO of movement-filtered series points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesBuffer {
    points: VecDeque<SeriesPoint>,
    capacity: usize,
    threshold: f64,
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_MOVEMENT_THRESHOLD_DEG)
    }
}

impl SeriesBuffer {
    /// Create an empty buffer. A zero capacity is raised to one.
    pub fn new(capacity: usize, threshold: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::new(),
            capacity,
            threshold,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.back()
    }

    /// Append `point` if it moved; returns whether it was retained.
    pub fn append(&mut self, point: SeriesPoint) -> bool {
        let last = self.points.back().map(SeriesPoint::position);
        if !has_moved(last, point.position(), self.threshold) {
            return false;
        }
        self.points.push_back(point);
        if self.points.len() > self.capacity {
            self.points.pop_front();
        }
        true
    }

    /// Points oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &SeriesPoint> + '_ {
        self.points.iter()
    }

    pub fn to_vec(&self) -> Vec<SeriesPoint> {
        self.points.iter().copied().collect()
    }
}

/// Chart feed in columnar form: parallel AQI and position arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub aqi: Vec<u32>,
    pub gps: Vec<GeoPoint>,
}

impl From<&SeriesBuffer> for ChartSeries {
    fn from(buffer: &SeriesBuffer) -> Self {
        let (aqi, gps) = buffer.iter().map(|p| (p.aqi, p.position())).unzip();
        ChartSeries { aqi, gps }
    }
}
