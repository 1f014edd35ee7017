//! Schema inference module
//!
//! Infers a typed schema from untyped JSON records and casts the records into
//! typed rows.
//!
//! # Features
//!
//! - **Type Detection**: Classifies raw values as text, integer, float, boolean or date
//! - **Key Normalization**: Maps raw keys onto camel-case field names
//! - **Option Promotion**: Text fields with at most five distinct values become options
//! - **Typecasting**: Converts raw values into typed cells, never failing a batch

mod builder;
mod cast;
mod detect;
mod keys;
mod types;

pub use builder::{build_schema, SchemaBuilder, MAX_OPTIONS};
pub use cast::{cast, normalize};
pub use detect::detect_kind;
pub use keys::normalize_key;
pub use types::{Cell, DataKind, Field, Row, Schema};
