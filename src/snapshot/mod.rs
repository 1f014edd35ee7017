//! Snapshot module
//!
//! A [`Snapshot`] pairs a schema with the typed rows built alongside it. The
//! [`SnapshotStore`] holds the current snapshot behind an [`arc_swap::ArcSwap`]:
//! ingestion publishes a complete replacement, queries never block and always
//! read one consistent snapshot.

mod store;

pub use store::{Snapshot, SnapshotStore, ID_FIELD};
