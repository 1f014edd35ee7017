//! Filter and sort over typed rows
//!
//! All functions borrow their input rows and return new vectors; the shared
//! row set is never mutated.

use super::types::{FilterClause, FilterSpec, Operator, Query};
use crate::schema::{Cell, Row};
use std::cmp::Ordering;
use tracing::debug;

/// Rows satisfying every clause of `spec`, in input order
pub fn filter(rows: &[Row], spec: &FilterSpec) -> Vec<Row> {
    if spec.is_empty() {
        return rows.to_vec();
    }
    for clause in spec.clauses() {
        if let Operator::Unsupported(symbol) = &clause.op {
            debug!(field = %clause.field, operator = %symbol, "Unsupported filter operator excludes every row");
        }
    }
    rows.iter()
        .filter(|row| matches(row, spec))
        .cloned()
        .collect()
}

/// Whether a row satisfies every clause
pub fn matches(row: &Row, spec: &FilterSpec) -> bool {
    spec.clauses().iter().all(|clause| evaluate(row, clause))
}

fn evaluate(row: &Row, clause: &FilterClause) -> bool {
    let cell = row.get(&clause.field);
    let operand = &clause.operand;
    match &clause.op {
        Operator::Eq => cells_equal(cell, operand),
        Operator::Ne => !cells_equal(cell, operand),
        Operator::Gt => compare_cells(cell, operand) == Some(Ordering::Greater),
        Operator::Lt => compare_cells(cell, operand) == Some(Ordering::Less),
        Operator::Unsupported(_) => false,
    }
}

/// Rows sorted ascending by `key`; stable, so ties keep input order
pub fn sort(rows: &[Row], key: &str) -> Vec<Row> {
    let mut sorted = rows.to_vec();
    sort_in_place(&mut sorted, key);
    sorted
}

fn sort_in_place(rows: &mut [Row], key: &str) {
    rows.sort_by(|a, b| sort_order(a.get(key), b.get(key)));
}

/// Filter, then sort when the query names an order key
pub fn run(rows: &[Row], query: &Query) -> Vec<Row> {
    let mut result = match &query.filter {
        Some(spec) => filter(rows, spec),
        None => rows.to_vec(),
    };
    if let Some(key) = &query.order_by {
        sort_in_place(&mut result, key);
    }
    result
}

/// Equality of typed values; integers and floats compare numerically
pub fn cells_equal(a: &Cell, b: &Cell) -> bool {
    match (a, b) {
        (Cell::Null, Cell::Null) => true,
        _ => compare_cells(a, b) == Some(Ordering::Equal),
    }
}

/// Ordering of two typed values of comparable kinds
///
/// Numbers compare across integer and float; dates chronologically; text
/// lexicographically; booleans with false first. Mixed kinds and nulls are
/// incomparable.
pub fn compare_cells(a: &Cell, b: &Cell) -> Option<Ordering> {
    match (a, b) {
        (Cell::Integer(x), Cell::Integer(y)) => Some(x.cmp(y)),
        (Cell::Integer(x), Cell::Float(y)) => (*x as f64).partial_cmp(y),
        (Cell::Float(x), Cell::Integer(y)) => x.partial_cmp(&(*y as f64)),
        (Cell::Float(x), Cell::Float(y)) => x.partial_cmp(y),
        (Cell::Text(x), Cell::Text(y)) => Some(x.cmp(y)),
        (Cell::Boolean(x), Cell::Boolean(y)) => Some(x.cmp(y)),
        (Cell::Date(x), Cell::Date(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order used for sorting
///
/// Comparable kinds use `compare_cells`; otherwise kinds rank boolean, number,
/// date, text, with nulls last.
fn sort_order(a: &Cell, b: &Cell) -> Ordering {
    compare_cells(a, b).unwrap_or_else(|| rank(a).cmp(&rank(b)))
}

fn rank(cell: &Cell) -> u8 {
    match cell {
        Cell::Boolean(_) => 0,
        Cell::Integer(_) | Cell::Float(_) => 1,
        Cell::Date(_) => 2,
        Cell::Text(_) => 3,
        Cell::Null => 4,
    }
}
