//! Record decoder module
//!
//! Supports: JSON, JSONL
//!
//! # Overview
//!
//! Record sources hand their raw body to a decoder, which turns it into the
//! list of untyped records fed to schema inference. JSON bodies may nest the
//! record array under a dot path.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, JsonlDecoder};
pub use types::{DecoderConfig, DecoderFormat, RecordDecoder};

#[cfg(test)]
mod tests;
