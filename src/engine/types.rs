//! Engine types
//!
//! Statistics reported by an ingestion cycle.

use serde::Serialize;

/// Statistics from one ingestion cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Records returned by the source
    pub records_fetched: usize,
    /// Records skipped because they were not objects
    pub records_skipped: usize,
    /// Rows in the published snapshot
    pub rows: usize,
    /// Fields in the published schema
    pub fields: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl IngestStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
