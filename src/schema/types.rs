//! Schema and typed row types

use crate::types::JsonValue;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Data kind inferred for a value or a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DataKind {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    /// Text with few enough distinct values to enumerate
    Option,
}

impl DataKind {
    /// Whether values of this kind are stored as text cells
    pub fn is_textual(self) -> bool {
        matches!(self, DataKind::Text | DataKind::Option)
    }
}

impl std::fmt::Display for DataKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataKind::Text => write!(f, "TEXT"),
            DataKind::Integer => write!(f, "INTEGER"),
            DataKind::Float => write!(f, "FLOAT"),
            DataKind::Boolean => write!(f, "BOOLEAN"),
            DataKind::Date => write!(f, "DATE"),
            DataKind::Option => write!(f, "OPTION"),
        }
    }
}

/// Schema metadata for one normalized key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Display label (currently the normalized name)
    pub display: String,
    /// Normalized field name
    pub name: String,
    /// Finalized data kind
    #[serde(rename = "type")]
    pub kind: DataKind,
    /// Enumerated values, only populated for `DataKind::Option`
    #[serde(default)]
    pub options: Vec<String>,
}

impl Field {
    /// Create a field whose display label equals its name
    pub fn new(name: impl Into<String>, kind: DataKind) -> Self {
        let name = name.into();
        Self {
            display: name.clone(),
            name,
            kind,
            options: Vec::new(),
        }
    }

    /// Set the enumerated options
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Ordered list of fields, in first-seen key order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from fields
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Fields in order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Iterate field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single typed cell value
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    /// Missing or uncastable value
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(DateTime<Utc>),
}

impl Cell {
    /// Kind of the stored value, `None` for null cells
    pub fn kind(&self) -> Option<DataKind> {
        match self {
            Cell::Null => None,
            Cell::Text(_) => Some(DataKind::Text),
            Cell::Integer(_) => Some(DataKind::Integer),
            Cell::Float(_) => Some(DataKind::Float),
            Cell::Boolean(_) => Some(DataKind::Boolean),
            Cell::Date(_) => Some(DataKind::Date),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Convert to the JSON value this cell serializes as
    pub fn to_json(&self) -> JsonValue {
        match self {
            Cell::Null => JsonValue::Null,
            Cell::Text(s) => JsonValue::String(s.clone()),
            Cell::Integer(i) => JsonValue::from(*i),
            Cell::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            Cell::Boolean(b) => JsonValue::Bool(*b),
            Cell::Date(d) => JsonValue::String(format_date(d)),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Integer(i) => serializer.serialize_i64(*i),
            Cell::Float(f) => serializer.serialize_f64(*f),
            Cell::Boolean(b) => serializer.serialize_bool(*b),
            Cell::Date(d) => serializer.serialize_str(&format_date(d)),
        }
    }
}

/// RFC 3339 in UTC with millisecond precision
fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

static NULL_CELL: Cell = Cell::Null;

/// A typed row: normalized field name to cell, in first-seen field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Cell)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cell for a field; missing fields read as null
    pub fn get(&self, name: &str) -> &Cell {
        self.cells
            .iter()
            .find(|(k, _)| k == name)
            .map_or(&NULL_CELL, |(_, v)| v)
    }

    /// Whether the row carries a cell for this field
    pub fn contains(&self, name: &str) -> bool {
        self.cells.iter().any(|(k, _)| k == name)
    }

    /// Set a cell; an existing field keeps its position
    pub fn insert(&mut self, name: impl Into<String>, cell: Cell) {
        let name = name.into();
        match self.cells.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = cell,
            None => self.cells.push((name, cell)),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Cell)> for Row {
    fn from_iter<T: IntoIterator<Item = (K, Cell)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (k, v) in &self.cells {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
