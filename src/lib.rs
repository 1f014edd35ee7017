// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # inferdb
//!
//! Ingest an untyped collection of records, infer a column schema from the
//! values, cast every record against it and answer filter/sort queries over
//! the resulting in-memory table.
//!
//! ## Features
//!
//! - **Type Detection**: Boolean, date, integer, float and text per value
//! - **Schema Unification**: First-seen field order, low-cardinality text fields
//!   promoted to options
//! - **Key Normalization**: `"Available Bikes"` becomes `availableBikes`
//! - **Queries**: `eq`/`ne`/`gt`/`lt` filters and single-key ordering
//! - **Snapshots**: Schema and rows swapped atomically on every refresh
//! - **Sources**: HTTP (with retry and backoff) or local JSON/JSONL files
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use inferdb::query::{FilterSpec, Query};
//! use inferdb::snapshot::Snapshot;
//! use serde_json::json;
//!
//! let snapshot = Snapshot::from_records(vec![
//!     json!({"id": 1, "Station Name": "Smithfield", "bikes": 12}),
//!     json!({"id": 2, "Station Name": "Parnell", "bikes": "3"}),
//! ]);
//!
//! let query = Query::new()
//!     .with_filter(FilterSpec::new().with("bikes", "gt", json!(5)))
//!     .with_order_by("stationName");
//! let rows = snapshot.rows(&query);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────┐   ┌───────────────┐   ┌───────────────┐
//! │   Source   │──▶│  Decode  │──▶│ SchemaBuilder │──▶│ SnapshotStore │
//! │ HTTP, File │   │ JSON(L)  │   │ detect + cast │   │   (ArcSwap)   │
//! └────────────┘   └──────────┘   └───────────────┘   └───────┬───────┘
//!                                                            │
//!                         ┌──────────────────────────────────┴──┐
//!                         │ Query: filter → sort   (CLI, axum)  │
//!                         └─────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Type detection, casting and schema inference
pub mod schema;

/// Filter and sort over typed rows
pub mod query;

/// Immutable snapshots and the swappable store
pub mod snapshot;

/// Record decoders (JSON, JSONL)
pub mod decode;

/// HTTP client with retry and backoff
pub mod http;

/// Record sources
pub mod source;

/// Ingestion engine
pub mod engine;

/// Service configuration
pub mod config;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use query::{FilterSpec, Query};
pub use schema::{Cell, DataKind, Field, Row, Schema};
pub use snapshot::{Snapshot, SnapshotStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
