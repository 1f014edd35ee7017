//! Tests for decoder module

use super::*;
use crate::error::Error;
use serde_json::json;

// ============================================================================
// DecoderConfig Tests
// ============================================================================

#[test]
fn test_decoder_format_default() {
    let format = DecoderFormat::default();
    assert_eq!(format, DecoderFormat::Json);
    assert_eq!(format.to_string(), "json");
}

#[test]
fn test_decoder_format_serde() {
    let format: DecoderFormat = serde_json::from_str("\"jsonl\"").unwrap();
    assert_eq!(format, DecoderFormat::Jsonl);
}

#[test]
fn test_decoder_config_json_with_path() {
    let config = DecoderConfig::json_with_path("data.items");
    assert_eq!(config.format, DecoderFormat::Json);
    assert_eq!(config.record_path, Some("data.items".to_string()));
}

#[test]
fn test_decoder_config_with_record_path() {
    let config = DecoderConfig::json().with_record_path("results");
    assert_eq!(config.record_path, Some("results".to_string()));
}

#[test]
fn test_decoder_config_build() {
    let decoder = DecoderConfig::jsonl().build();
    let records = decoder.decode("{\"a\":1}\n{\"a\":2}\n").unwrap();
    assert_eq!(records.len(), 2);

    let decoder = DecoderConfig::json_with_path("rows").build();
    let records = decoder.decode(r#"{"rows": [{"a": 1}]}"#).unwrap();
    assert_eq!(records, vec![json!({"a": 1})]);
}

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_array() {
    let decoder = JsonDecoder::new();
    let body = r#"[{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}]"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "Alice");
}

#[test]
fn test_json_decoder_preserves_key_order() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode(r#"[{"zeta": 1, "alpha": 2}]"#).unwrap();

    let keys: Vec<&String> = records[0].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn test_json_decoder_rejects_non_array() {
    let decoder = JsonDecoder::new();
    let err = decoder.decode(r#"{"id": 1}"#).unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("expected an array of records"));
}

#[test]
fn test_json_decoder_invalid_json() {
    let decoder = JsonDecoder::new();
    let err = decoder.decode("not json").unwrap_err();
    assert!(err.to_string().contains("Failed to parse JSON"));
}

#[test]
fn test_json_decoder_nested_path() {
    let decoder = JsonDecoder::with_path("data.items");
    let body = r#"{"data": {"items": [{"id": 1}, {"id": 2}, {"id": 3}]}}"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn test_json_decoder_dollar_path_and_index() {
    let decoder = JsonDecoder::with_path("$.pages[-1].rows");
    let body = r#"{"pages": [{"rows": [{"id": 1}]}, {"rows": [{"id": 2}, {"id": 3}]}]}"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records, vec![json!({"id": 2}), json!({"id": 3})]);
}

#[test]
fn test_json_decoder_missing_path() {
    let decoder = JsonDecoder::with_path("missing");
    let err = decoder.decode(r#"{"data": []}"#).unwrap_err();

    match err {
        Error::RecordExtraction { path, .. } => assert_eq!(path, "missing"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_json_decoder_path_to_non_array() {
    let decoder = JsonDecoder::with_path("count");
    let err = decoder.decode(r#"{"count": 3}"#).unwrap_err();
    assert!(err.to_string().contains("found a number"));
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_decoder() {
    let decoder = JsonlDecoder::new();
    let body = "{\"id\": 1}\n\n{\"id\": 2}\n   \n{\"id\": 3}\n";

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_jsonl_decoder_reports_line() {
    let decoder = JsonlDecoder::new();
    let err = decoder.decode("{\"id\": 1}\n{broken\n").unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

#[test]
fn test_jsonl_decoder_empty() {
    let decoder = JsonlDecoder::new();
    assert!(decoder.decode("").unwrap().is_empty());
}
