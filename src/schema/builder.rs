//! Schema unification and row typecasting

use super::cast::cast;
use super::detect::detect_kind;
use super::keys::normalize_key;
use super::types::{DataKind, Field, Row, Schema};
use crate::types::{JsonObject, JsonValue};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Maximum number of distinct values an `Option` field can enumerate
pub const MAX_OPTIONS: usize = 5;

/// Working state for one field during accumulation
#[derive(Debug)]
struct FieldState {
    field: Field,
    /// Distinct raw strings seen while the field is a provisional option,
    /// in first-seen order. Stops growing once it exceeds `MAX_OPTIONS`.
    distinct: Vec<String>,
}

impl FieldState {
    fn observe(&mut self, value: &JsonValue) {
        if self.field.kind != DataKind::Option || self.distinct.len() > MAX_OPTIONS {
            return;
        }
        if let JsonValue::String(s) = value {
            if !self.distinct.iter().any(|seen| seen == s) {
                self.distinct.push(s.clone());
            }
        }
    }

    fn finalize(mut self) -> Field {
        if self.field.kind == DataKind::Option {
            if self.distinct.len() > MAX_OPTIONS {
                debug!(field = %self.field.name, "Too many distinct values, demoting option to text");
                self.field.kind = DataKind::Text;
                self.field.options.clear();
            } else {
                self.field.options = self.distinct;
            }
        }
        self.field
    }
}

/// Builds a unified schema and typed rows from untyped records
///
/// Records are pushed one at a time; `finish` finalizes option fields and
/// casts every buffered row against the finished schema.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldState>,
    index: HashMap<String, usize>,
    rows: Vec<JsonObject>,
    skipped: usize,
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe one raw record
    ///
    /// Non-object records carry no keys and are skipped.
    pub fn push(&mut self, record: JsonValue) {
        let map = match record {
            JsonValue::Object(map) => map,
            other => {
                warn!(record = %other, "Skipping non-object record");
                self.skipped += 1;
                return;
            }
        };

        let mut buffered = JsonObject::new();
        for (raw_key, value) in map {
            let key = normalize_key(&raw_key);
            match self.index.get(&key) {
                Some(&i) => self.fields[i].observe(&value),
                None => self.register(&key, &value),
            }
            buffered.insert(key, value);
        }
        self.rows.push(buffered);
    }

    /// Register a field from its first detectable value
    fn register(&mut self, key: &str, value: &JsonValue) {
        let Some(kind) = detect_kind(value) else {
            return;
        };

        // Text stays a provisional option until every record is seen
        let kind = if kind == DataKind::Text {
            DataKind::Option
        } else {
            kind
        };
        let mut state = FieldState {
            field: Field::new(key, kind),
            distinct: Vec::new(),
        };
        state.observe(value);

        debug!(field = key, kind = %state.field.kind, "Registered field");
        self.index.insert(key.to_string(), self.fields.len());
        self.fields.push(state);
    }

    /// Number of records observed so far, excluding skipped ones
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of non-object records skipped
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Finalize the schema and typecast every buffered row
    pub fn finish(self) -> (Schema, Vec<Row>) {
        let fields: Vec<Field> = self.fields.into_iter().map(FieldState::finalize).collect();
        let kinds: HashMap<&str, DataKind> =
            fields.iter().map(|f| (f.name.as_str(), f.kind)).collect();

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|raw| {
                raw.iter()
                    .filter_map(|(key, value)| {
                        kinds
                            .get(key.as_str())
                            .map(|kind| (key.as_str(), cast(value, Some(*kind))))
                    })
                    .collect::<Row>()
            })
            .collect();

        (Schema::new(fields), rows)
    }
}

impl Extend<JsonValue> for SchemaBuilder {
    fn extend<T: IntoIterator<Item = JsonValue>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}

/// Build a schema and typed rows from raw records (convenience function)
pub fn build_schema<I>(records: I) -> (Schema, Vec<Row>)
where
    I: IntoIterator<Item = JsonValue>,
{
    let mut builder = SchemaBuilder::new();
    builder.extend(records);
    builder.finish()
}
