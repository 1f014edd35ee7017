//! Casting raw values into typed cells

use super::detect::{
    has_four_digit_year, parse_bool, parse_date, parse_integer_literal, parse_number,
};
use super::types::{Cell, DataKind};
use crate::types::JsonValue;
use chrono::{DateTime, Utc};

/// Cast a raw value into the cell representation of `kind`
///
/// Total: anything that cannot be represented as `kind` becomes `Cell::Null`.
pub fn cast(value: &JsonValue, kind: Option<DataKind>) -> Cell {
    let Some(kind) = kind else {
        return Cell::Null;
    };
    if value.is_null() {
        return Cell::Null;
    }

    let cell = match kind {
        DataKind::Text | DataKind::Option => Some(Cell::Text(text_of(value))),
        DataKind::Integer => to_integer(value).map(Cell::Integer),
        DataKind::Float => to_float(value).map(Cell::Float),
        DataKind::Boolean => to_bool(value).map(Cell::Boolean),
        DataKind::Date => to_date(value).map(Cell::Date),
    };
    cell.unwrap_or(Cell::Null)
}

/// Detect the kind of a raw value and cast it to that kind
pub fn normalize(value: &JsonValue) -> Cell {
    cast(value, super::detect_kind(value))
}

fn text_of(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn to_integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        JsonValue::Bool(b) => Some(i64::from(*b)),
        JsonValue::String(s) => parse_integer_literal(s),
        _ => None,
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, which is out of range
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn to_float(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) => parse_number(s),
        _ => None,
    }
}

fn to_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) => parse_bool(s),
        JsonValue::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

fn to_date(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::String(s) => parse_date(s),
        // Epoch milliseconds
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(|f| integral_f64(f.trunc())))
            .and_then(DateTime::from_timestamp_millis)
            .filter(has_four_digit_year),
        _ => None,
    }
}
