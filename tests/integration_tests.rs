//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → HTTP source → schema
//! inference → snapshot store → REST API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use inferdb::cli::router;
use inferdb::config::ServiceConfig;
use inferdb::engine::IngestEngine;
use inferdb::query::{FilterSpec, Query};
use inferdb::schema::{Cell, DataKind};
use inferdb::snapshot::SnapshotStore;
use inferdb::source;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn stations() -> Value {
    json!({
        "meta": {"city": "Dublin"},
        "data": {
            "stations": [
                {"id": 42, "Name": "SMITHFIELD NORTH", "Status": "OPEN",
                 "Available Bikes": 5, "Last Update": "2024-03-01T10:00:00Z", "banking": "true"},
                {"id": 17, "Name": "HARDWICKE STREET", "Status": "OPEN",
                 "Available Bikes": "12", "Last Update": "2024-03-01T09:55:00Z", "banking": "false"},
                {"id": 8, "Name": "CUSTOM HOUSE QUAY", "Status": "CLOSED",
                 "Available Bikes": 0, "Last Update": "2024-02-28T18:30:00Z", "banking": true},
                {"id": 3, "Name": "BOLTON STREET", "Status": "OPEN",
                 "Available Bikes": "n/a", "Last Update": "garbage", "banking": "false"}
            ]
        }
    })
}

fn config_for(server: &MockServer) -> ServiceConfig {
    let yaml = format!(
        r#"
source:
  url: "{}/stations"
  record_path: data.stations
http:
  max_retries: 2
  initial_backoff_ms: 10
  backoff: constant
"#,
        server.uri()
    );
    let config = ServiceConfig::from_yaml(&yaml).unwrap();
    config.validate().unwrap();
    config
}

async fn ingested(server: &MockServer) -> IngestEngine {
    let config = config_for(server);
    let engine = IngestEngine::new(
        source::from_config(&config).unwrap(),
        Arc::new(SnapshotStore::new()),
    );
    engine.ingest_once().await.unwrap();
    engine
}

async fn mount_stations(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/stations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations()))
        .mount(server)
        .await;
}

async fn get_json(store: Arc<SnapshotStore>, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router(store).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// Ingestion
// ============================================================================

#[tokio::test]
async fn test_ingest_infers_schema() {
    let server = MockServer::start().await;
    mount_stations(&server).await;

    let engine = ingested(&server).await;
    let schema = engine.store().schema();

    let kinds: Vec<(&str, DataKind)> = schema
        .fields()
        .iter()
        .map(|f| (f.name.as_str(), f.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("id", DataKind::Integer),
            ("name", DataKind::Option),
            ("status", DataKind::Option),
            ("availableBikes", DataKind::Integer),
            ("lastUpdate", DataKind::Date),
            ("banking", DataKind::Boolean),
        ]
    );
    assert_eq!(
        schema.field("status").unwrap().options,
        vec!["OPEN".to_string(), "CLOSED".to_string()]
    );
}

#[tokio::test]
async fn test_ingest_casts_rows() {
    let server = MockServer::start().await;
    mount_stations(&server).await;

    let engine = ingested(&server).await;
    let rows = engine.store().rows(&Query::new());

    assert_eq!(rows.len(), 4);
    assert_eq!(rows[1].get("availableBikes"), &Cell::Integer(12));
    assert_eq!(rows[2].get("banking"), &Cell::Boolean(true));
    // Uncastable values become null
    assert_eq!(rows[3].get("availableBikes"), &Cell::Null);
    assert_eq!(rows[3].get("lastUpdate"), &Cell::Null);
}

#[tokio::test]
async fn test_ingest_retries_transient_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stations"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    mount_stations(&server).await;

    let engine = ingested(&server).await;
    assert_eq!(engine.store().load().row_count(), 4);
}

#[tokio::test]
async fn test_failed_refresh_keeps_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stations()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"records\"}"))
        .mount(&server)
        .await;

    let engine = ingested(&server).await;
    assert!(engine.refresh().await.is_none());
    assert_eq!(engine.store().load().row_count(), 4);
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn test_query_filter_and_sort() {
    let server = MockServer::start().await;
    mount_stations(&server).await;

    let engine = ingested(&server).await;
    let query = Query::new()
        .with_filter(
            FilterSpec::new()
                .with("status", "eq", json!("OPEN"))
                .with("availableBikes", "gt", json!("1")),
        )
        .with_order_by("id");

    let ids: Vec<Cell> = engine
        .store()
        .rows(&query)
        .iter()
        .map(|r| r.get("id").clone())
        .collect();
    assert_eq!(ids, vec![Cell::Integer(17), Cell::Integer(42)]);
}

#[tokio::test]
async fn test_query_dates() {
    let server = MockServer::start().await;
    mount_stations(&server).await;

    let engine = ingested(&server).await;
    let query = Query::new()
        .with_filter(FilterSpec::new().with("lastUpdate", "lt", json!("2024-03-01")))
        .with_order_by("lastUpdate");

    let rows = engine.store().rows(&query);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), &Cell::Text("CUSTOM HOUSE QUAY".into()));
}

// ============================================================================
// REST API
// ============================================================================

#[tokio::test]
async fn test_api_end_to_end() {
    let server = MockServer::start().await;
    mount_stations(&server).await;

    let engine = ingested(&server).await;
    let store = Arc::clone(engine.store());

    let (status, body) = get_json(Arc::clone(&store), "/schema", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 6);
    assert_eq!(body["data"][4]["type"], "DATE");

    let (status, body) = get_json(
        Arc::clone(&store),
        "/data",
        r#"{"where": {"banking": {"ne": true}}, "orderBy": "availableBikes"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    // Null sorts last
    assert_eq!(names, vec!["HARDWICKE STREET", "BOLTON STREET"]);

    let (status, body) = get_json(Arc::clone(&store), "/data/8", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["lastUpdate"], "2024-02-28T18:30:00.000Z");

    let (status, body) = get_json(store, "/data/9999", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
