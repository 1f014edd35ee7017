//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use super::decoders::{JsonDecoder, JsonlDecoder};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format of a record source body
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// JSON document holding an array of records (default)
    #[default]
    Json,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl std::fmt::Display for DecoderFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecoderFormat::Json => write!(f, "json"),
            DecoderFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Configuration for decoding record bodies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Body format
    pub format: DecoderFormat,
    /// Dot path to the record array inside a JSON body (e.g. `data.items`)
    pub record_path: Option<String>,
}

impl DecoderConfig {
    /// Create a JSON decoder config
    pub fn json() -> Self {
        Self {
            format: DecoderFormat::Json,
            ..Default::default()
        }
    }

    /// Create a JSON decoder config with a record path
    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            format: DecoderFormat::Json,
            record_path: Some(path.into()),
        }
    }

    /// Create a JSONL decoder config
    pub fn jsonl() -> Self {
        Self {
            format: DecoderFormat::Jsonl,
            ..Default::default()
        }
    }

    /// Set the record path
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Build the decoder this config describes
    pub fn build(&self) -> Box<dyn RecordDecoder> {
        match self.format {
            DecoderFormat::Json => match &self.record_path {
                Some(path) => Box::new(JsonDecoder::with_path(path.clone())),
                None => Box::new(JsonDecoder::new()),
            },
            DecoderFormat::Jsonl => Box::new(JsonlDecoder::new()),
        }
    }
}

/// Trait for decoding bodies into raw records
pub trait RecordDecoder: Send + Sync {
    /// Decode the body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;
}
