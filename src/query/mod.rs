//! Query module
//!
//! Filters and orders typed rows. Filter operands are normalized through the
//! same detection and casting rules used at ingestion, so `"5"` compares
//! equal to an integer cell holding `5`.

mod engine;
mod types;

pub use engine::{cells_equal, compare_cells, filter, matches, run, sort};
pub use types::{FilterClause, FilterSpec, Operator, Query};
