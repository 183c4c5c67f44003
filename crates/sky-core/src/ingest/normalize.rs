//! Column normalization.
//!
//! Maps inconsistently named input headers ("PM2.5 (ug/m3)", "Lattitude", ...)
//! onto [`CanonicalField`]s by substring matching in a fixed priority order.
//! Several targets are substrings of each other (`pm1` ⊂ `pm10`), so the order
//! of the rules is load-bearing.

use sky_common::{CanonicalField, CanonicalReading};
use std::collections::BTreeMap;

/// Mapping from header column index to canonical field.
///
/// When several headers map to the same field, the leftmost column wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: BTreeMap<CanonicalField, usize>,
}

impl ColumnMapping {
    /// Column index feeding `field`, if any header matched it.
    pub fn column_for(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Canonical fields with a source column.
    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.columns.keys().copied()
    }

    /// Both a latitude and a longitude column were found.
    pub fn has_coordinates(&self) -> bool {
        self.columns.contains_key(&CanonicalField::Lat)
            && self.columns.contains_key(&CanonicalField::Lon)
    }

    /// Build a reading from one record. Missing columns, blank cells, and
    /// unparsable cells all read as 0.
    pub fn reading_from<S: AsRef<str>>(&self, record: &[S]) -> CanonicalReading {
        self.columns
            .iter()
            .fold(CanonicalReading::default(), |reading, (&field, &idx)| {
                let value = record
                    .get(idx)
                    .map(|cell| parse_cell(cell.as_ref()))
                    .unwrap_or(0.0);
                reading.with(field, value)
            })
    }
}

/// Classify a single header. Returns `None` for unrecognized columns.
pub fn canonical_field(header: &str) -> Option<CanonicalField> {
    let h = header.trim().to_lowercase();
    let has = |needle: &str| h.contains(needle);

    if has("pm1.0") || (has("pm1") && !has("pm10")) {
        Some(CanonicalField::Pm1)
    } else if has("pm2.5") || has("pm25") {
        Some(CanonicalField::Pm25)
    } else if has("pm10") {
        Some(CanonicalField::Pm10)
    } else if has("temp") {
        Some(CanonicalField::Temp)
    } else if has("hum") {
        Some(CanonicalField::Hum)
    } else if has("press") {
        Some(CanonicalField::Pressure)
    } else if has("gas") {
        Some(CanonicalField::Gas)
    } else if has("alt") {
        Some(CanonicalField::Altitude)
    } else if has("lat") || has("lal") {
        Some(CanonicalField::Lat)
    } else if has("lon") || has("lng") {
        Some(CanonicalField::Lon)
    } else {
        None
    }
}

/// Normalize a header row. Never fails: unknown headers are dropped.
pub fn normalize<S: AsRef<str>>(headers: &[S]) -> ColumnMapping {
    let mut columns = BTreeMap::new();
    for (idx, header) in headers.iter().enumerate() {
        if let Some(field) = canonical_field(header.as_ref()) {
            columns.entry(field).or_insert(idx);
        }
    }
    ColumnMapping { columns }
}

fn parse_cell(cell: &str) -> f64 {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
