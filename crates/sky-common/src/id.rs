//! Ingest identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier attached to every completed batch ingest.
///
/// Format: `ingest-<date>-<time>-<random>`
/// Example: `ingest-20261018-143022-3fa9c1`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngestId(pub String);

impl IngestId {
    /// Generate a new ingest ID.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        let random: String = uuid::Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(6)
            .collect();
        IngestId(format!("ingest-{}-{}", now.format("%Y%m%d-%H%M%S"), random))
    }
}

impl Default for IngestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IngestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_id_format() {
        let id = IngestId::new();
        assert!(id.0.starts_with("ingest-"));
        assert_eq!(id.0.len(), "ingest-20261018-143022-3fa9c1".len());
        assert_eq!(id.to_string(), id.0);
    }

    #[test]
    fn test_ingest_ids_are_distinct() {
        assert_ne!(IngestId::new(), IngestId::new());
    }

    #[test]
    fn test_ingest_id_serializes_as_string() {
        let id = IngestId("ingest-20261018-143022-3fa9c1".to_string());
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"ingest-20261018-143022-3fa9c1\"");
    }
}
