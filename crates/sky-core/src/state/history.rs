//! Append-only upload history.

use sky_common::{HistoryEntry, HistoryOrder};

/// History log kept in insertion order; ordering is applied on read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the requested order.
    ///
    /// `Date` sorts by date descending; entries sharing a date keep
    /// most-recently-inserted first. `Insertion` is most recent first.
    pub fn ordered(&self, order: HistoryOrder) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self.entries.iter().rev().cloned().collect();
        if order == HistoryOrder::Date {
            // Stable sort keeps the newest-first tie order.
            entries.sort_by(|a, b| b.date.cmp(&a.date));
        }
        entries
    }
}
