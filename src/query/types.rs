//! Query types

use crate::error::{Error, Result};
use crate::schema::{normalize, Cell};
use crate::types::JsonValue;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Comparison operator of a filter clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `gt`
    Gt,
    /// `lt`
    Lt,
    /// Any other symbol; the clause never matches
    Unsupported(String),
}

impl Operator {
    /// Parse an operator symbol
    pub fn parse(symbol: &str) -> Self {
        match symbol {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "gt" => Operator::Gt,
            "lt" => Operator::Lt,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Unsupported(symbol) => symbol,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Operator::Unsupported(_))
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One `field op operand` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Field name the clause reads
    pub field: String,
    /// Comparison operator
    pub op: Operator,
    /// Operand, already normalized to its detected kind
    pub operand: Cell,
}

impl FilterClause {
    /// Create a clause, normalizing the raw operand
    pub fn new(field: impl Into<String>, op: Operator, operand: &JsonValue) -> Self {
        Self {
            field: field.into(),
            op,
            operand: normalize(operand),
        }
    }
}

/// Filter tree: field → operator → operand, all clauses must hold
///
/// Deserializes from `{"age": {"gt": 18, "lt": 65}, "status": {"eq": "open"}}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, BTreeMap<String, JsonValue>>")]
pub struct FilterSpec {
    clauses: Vec<FilterClause>,
}

impl FilterSpec {
    /// Create an empty spec that matches every row
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clause
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, op: &str, operand: JsonValue) -> Self {
        let clause = FilterClause::new(field, Operator::parse(op), &operand);
        self.clauses.push(clause);
        self
    }

    /// Parse a spec from a JSON value
    pub fn from_json(value: &JsonValue) -> Result<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| Error::invalid_query(format!("Invalid filter: {e}")))
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl From<BTreeMap<String, BTreeMap<String, JsonValue>>> for FilterSpec {
    fn from(tree: BTreeMap<String, BTreeMap<String, JsonValue>>) -> Self {
        let clauses = tree
            .into_iter()
            .flat_map(|(field, ops)| {
                ops.into_iter().map(move |(op, operand)| {
                    FilterClause::new(field.clone(), Operator::parse(&op), &operand)
                })
            })
            .collect();
        Self { clauses }
    }
}

/// Row query: filter then order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Query {
    /// Filter spec; absent matches everything
    #[serde(default, rename = "where")]
    pub filter: Option<FilterSpec>,
    /// Field to sort ascending by; absent keeps input order
    #[serde(default, rename = "orderBy")]
    pub order_by: Option<String>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON request body; an empty body is the match-all query
    pub fn from_body(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| Error::invalid_query(format!("Invalid query: {e}")))
    }

    #[must_use]
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_order_by(mut self, key: impl Into<String>) -> Self {
        self.order_by = Some(key.into());
        self
    }
}
