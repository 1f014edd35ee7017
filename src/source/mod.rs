//! Record sources
//!
//! A record source produces the untyped records one ingestion cycle reads.
//! Remote sources fetch over HTTP; file sources read a local JSON or JSON
//! Lines document.

mod sources;
mod types;

pub use sources::{from_config, FileSource, HttpSource, StaticSource};
pub use types::RecordSource;
