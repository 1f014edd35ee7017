//! Snapshot and snapshot store

use crate::error::{Error, Result};
use crate::query::{self, FilterSpec, Query};
use crate::schema::{build_schema, cast, Cell, DataKind, Row, Schema};
use crate::types::JsonValue;
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// Field used by id lookups
pub const ID_FIELD: &str = "id";

/// Immutable schema and typed rows from one ingestion cycle
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    schema: Schema,
    rows: Vec<Row>,
    /// When the snapshot was built; `None` before the first ingestion
    loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// The empty snapshot served before the first ingestion
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot from an already built schema and rows
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self {
            schema,
            rows,
            loaded_at: Some(Utc::now()),
        }
    }

    /// Infer the schema and typed rows from raw records
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = JsonValue>,
    {
        let (schema, rows) = build_schema(records);
        Self::new(schema, rows)
    }

    /// The schema of this snapshot
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Every row, in ingestion order
    pub fn all_rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Filter then order the rows
    pub fn rows(&self, query: &Query) -> Vec<Row> {
        query::run(&self.rows, query)
    }

    /// First row whose `id` equals `id` cast to an integer
    ///
    /// Returns `Error::RowNotFound` when nothing matches, including when `id`
    /// does not cast to an integer.
    pub fn row_by_id(&self, id: &JsonValue) -> Result<Row> {
        let Cell::Integer(id) = cast(id, Some(DataKind::Integer)) else {
            return Err(Error::not_found(display_id(id)));
        };

        let spec = FilterSpec::new().with(ID_FIELD, "eq", JsonValue::from(id));
        self.rows
            .iter()
            .find(|row| query::matches(row, &spec))
            .cloned()
            .ok_or_else(|| Error::not_found(id))
    }
}

fn display_id(id: &JsonValue) -> String {
    match id {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Process-wide holder of the current snapshot
///
/// Readers take an `Arc<Snapshot>` and keep it for the whole query, so a
/// publish during the query is never observed half-applied.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    /// Create a store holding the empty snapshot
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::empty())
    }

    /// Create a store holding `snapshot`
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
        }
    }

    /// The current snapshot
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Atomically replace the current snapshot
    pub fn publish(&self, snapshot: Snapshot) {
        info!(
            rows = snapshot.row_count(),
            fields = snapshot.schema().len(),
            "Publishing snapshot"
        );
        self.current.store(Arc::new(snapshot));
    }

    /// `GetSchema`: the current schema
    pub fn schema(&self) -> Schema {
        self.load().schema().clone()
    }

    /// `GetRows`: filter then order the current rows
    pub fn rows(&self, query: &Query) -> Vec<Row> {
        self.load().rows(query)
    }

    /// `GetRowById`: look a row up by its integer id
    pub fn row_by_id(&self, id: &JsonValue) -> Result<Row> {
        self.load().row_by_id(id)
    }
}
