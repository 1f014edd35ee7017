//! Ingestion engine module
//!
//! Runs one ingestion cycle (source, schema inference, publish) and keeps
//! the snapshot fresh on an interval.
//!
//! # Overview
//!
//! - `IngestEngine` - Fetches records and publishes snapshots
//! - `IngestStats` - What one cycle produced
//!
//! A failed cycle never touches the store: readers keep the previous
//! snapshot (or the empty one before the first success).

mod types;

pub use types::IngestStats;

use crate::error::Result;
use crate::schema::SchemaBuilder;
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::source::RecordSource;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Ingestion engine for one record source and one snapshot store
#[derive(Clone)]
pub struct IngestEngine {
    /// Record source
    source: Arc<dyn RecordSource>,
    /// Store receiving published snapshots
    store: Arc<SnapshotStore>,
}

impl IngestEngine {
    /// Create a new ingestion engine
    pub fn new(source: Arc<dyn RecordSource>, store: Arc<SnapshotStore>) -> Self {
        Self { source, store }
    }

    /// Get the snapshot store
    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Get the record source
    pub fn source(&self) -> &Arc<dyn RecordSource> {
        &self.source
    }

    /// Fetch, infer and publish one snapshot
    ///
    /// On error nothing is published.
    pub async fn ingest_once(&self) -> Result<IngestStats> {
        let start = Instant::now();
        let mut stats = IngestStats::new();

        debug!(source = self.source.name(), "Starting ingestion");
        let records = self.source.fetch().await?;
        stats.records_fetched = records.len();

        let mut builder = SchemaBuilder::new();
        builder.extend(records);
        stats.records_skipped = builder.skipped_count();

        let (schema, rows) = builder.finish();
        stats.rows = rows.len();
        stats.fields = schema.len();

        self.store.publish(Snapshot::new(schema, rows));

        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            source = self.source.name(),
            records = stats.records_fetched,
            skipped = stats.records_skipped,
            rows = stats.rows,
            fields = stats.fields,
            duration_ms = stats.duration_ms,
            "Ingestion complete"
        );
        Ok(stats)
    }

    /// Run one cycle, logging a failure instead of returning it
    pub async fn refresh(&self) -> Option<IngestStats> {
        match self.ingest_once().await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    error = %e,
                    retryable = e.is_retryable(),
                    "Ingestion failed, keeping previous snapshot"
                );
                None
            }
        }
    }

    /// Re-ingest on every tick of `every`, forever
    ///
    /// The first tick fires after one full period.
    pub async fn refresh_forever(&self, every: Duration) {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.refresh().await;
        }
    }

    /// Spawn the refresh loop as a background task
    pub fn spawn_refresh(&self, every: Duration) -> JoinHandle<()> {
        let engine = self.clone();
        info!(
            source = self.source.name(),
            every_secs = every.as_secs(),
            "Scheduling periodic refresh"
        );
        tokio::spawn(async move { engine.refresh_forever(every).await })
    }
}

impl std::fmt::Debug for IngestEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestEngine")
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
