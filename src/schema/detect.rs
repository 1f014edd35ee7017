//! Per-value type detection
//!
//! Detection order for strings is boolean, then date, then number, then text.
//! Dates are checked before numbers, so a bare four-digit year such as `"2024"`
//! is a date while `"123"` is an integer.

use super::types::DataKind;
use crate::types::JsonValue;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Detect the data kind of a raw value; `None` for null
pub fn detect_kind(value: &JsonValue) -> Option<DataKind> {
    match value {
        JsonValue::Null => None,
        JsonValue::Bool(_) => Some(DataKind::Boolean),
        JsonValue::Number(n) => {
            if number_is_integral(n) {
                Some(DataKind::Integer)
            } else {
                Some(DataKind::Float)
            }
        }
        JsonValue::String(s) => Some(detect_string_kind(s)),
        JsonValue::Array(_) | JsonValue::Object(_) => Some(DataKind::Text),
    }
}

/// Kind of a text value
///
/// Numeric text is `Integer` only when written as an integer literal, so
/// `"3.0"` and `"1e3"` are `Float` even though a native `3.0` is `Integer`.
/// Text detected as `Integer` therefore always casts to an integer.
fn detect_string_kind(s: &str) -> DataKind {
    if parse_bool(s).is_some() {
        return DataKind::Boolean;
    }
    if parse_date(s).is_some() {
        return DataKind::Date;
    }
    if parse_number(s).is_some() {
        return if is_integer_literal(s) {
            DataKind::Integer
        } else {
            DataKind::Float
        };
    }
    DataKind::Text
}

/// Whether a JSON number has no fractional part
pub(crate) fn number_is_integral(n: &serde_json::Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
}

/// Trimmed, case-insensitive `true` / `false`
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse a finite number from trimmed text; empty text is not a number
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Optional sign followed by digits that fit in an `i64`
pub(crate) fn is_integer_literal(s: &str) -> bool {
    parse_integer_literal(s).is_some()
}

pub(crate) fn parse_integer_literal(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

// Date parsing

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").expect("valid year regex"));

static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})$").expect("valid year-month regex"));

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Permissive calendar date/time parser
///
/// Values without an offset are read as UTC. Results are truncated to
/// millisecond precision and limited to four-digit years.
pub(crate) fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    parse_date_inner(trimmed)
        .map(|d| d.trunc_subsecs(3))
        .filter(has_four_digit_year)
}

/// Dates outside years 0 to 9999 have no RFC 3339 form
pub(crate) fn has_four_digit_year(date: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&date.year())
}

fn parse_date_inner(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_rfc2822(s) {
        return Some(d.with_timezone(&Utc));
    }
    for format in OFFSET_FORMATS {
        if let Ok(d) = DateTime::parse_from_str(s, format) {
            return Some(d.with_timezone(&Utc));
        }
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&d));
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return midnight(d);
        }
    }
    if let Some(caps) = YEAR_MONTH.captures(s) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1).and_then(midnight);
    }
    if YEAR.is_match(s) {
        let year = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1).and_then(midnight);
    }
    None
}

fn midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|d| Utc.from_utc_datetime(&d))
}
