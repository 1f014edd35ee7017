//! Tests for the ingestion engine

use super::*;
use crate::error::Error;
use crate::query::Query;
use crate::schema::{Cell, DataKind};
use crate::source::StaticSource;
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Source that replays a scripted sequence of fetch results
struct ScriptedSource {
    script: Mutex<VecDeque<Result<Vec<JsonValue>>>>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<Vec<JsonValue>>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

#[async_trait]
impl RecordSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch(&self) -> Result<Vec<JsonValue>> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::source("scripted", "script exhausted")))
    }
}

fn engine_for(source: impl RecordSource + 'static) -> IngestEngine {
    IngestEngine::new(Arc::new(source), Arc::new(SnapshotStore::new()))
}

#[tokio::test]
async fn test_ingest_once_publishes_snapshot() {
    let engine = engine_for(StaticSource::new(vec![
        json!({"id": 1, "Station Name": "Smithfield", "open": "true"}),
        json!({"id": 2, "Station Name": "Parnell", "open": "false"}),
        json!("not a record"),
    ]));

    let stats = engine.ingest_once().await.unwrap();
    assert_eq!(stats.records_fetched, 3);
    assert_eq!(stats.records_skipped, 1);
    assert_eq!(stats.rows, 2);
    assert_eq!(stats.fields, 3);

    let snapshot = engine.store().load();
    assert!(snapshot.loaded_at().is_some());
    assert_eq!(
        snapshot.schema().field("open").unwrap().kind,
        DataKind::Boolean
    );
    let rows = snapshot.rows(&Query::new());
    assert_eq!(rows[1].get("stationName"), &Cell::Text("Parnell".into()));
}

#[tokio::test]
async fn test_failed_ingest_keeps_previous_snapshot() {
    let engine = engine_for(ScriptedSource::new(vec![
        Ok(vec![json!({"id": 1}), json!({"id": 2})]),
        Err(Error::http_status(503, "unavailable")),
    ]));

    engine.ingest_once().await.unwrap();
    let before = engine.store().load();

    let err = engine.ingest_once().await.unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 503, .. }));

    let after = engine.store().load();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.row_count(), 2);
}

#[tokio::test]
async fn test_failed_first_ingest_leaves_store_empty() {
    let engine = engine_for(ScriptedSource::new(vec![Err(Error::decode("bad body"))]));

    assert!(engine.refresh().await.is_none());
    let snapshot = engine.store().load();
    assert!(snapshot.loaded_at().is_none());
    assert!(snapshot.schema().is_empty());
}

#[tokio::test]
async fn test_refresh_replaces_snapshot() {
    let engine = engine_for(ScriptedSource::new(vec![
        Ok(vec![json!({"id": 1})]),
        Ok(vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]),
    ]));

    assert_eq!(engine.refresh().await.unwrap().rows, 1);
    assert_eq!(engine.refresh().await.unwrap().rows, 3);
    assert_eq!(engine.store().load().row_count(), 3);
}

#[tokio::test]
async fn test_empty_source_publishes_empty_snapshot() {
    let engine = engine_for(StaticSource::new(Vec::new()));

    let stats = engine.ingest_once().await.unwrap();
    assert_eq!(stats.rows, 0);
    let snapshot = engine.store().load();
    assert!(snapshot.loaded_at().is_some());
    assert!(snapshot.schema().is_empty());
}

#[tokio::test]
async fn test_spawn_refresh_ticks() {
    let engine = engine_for(ScriptedSource::new(vec![
        Ok(vec![json!({"id": 1})]),
        Ok(vec![json!({"id": 1}), json!({"id": 2})]),
    ]));
    engine.ingest_once().await.unwrap();

    let handle = engine.spawn_refresh(Duration::from_millis(20));
    let mut rows = engine.store().load().row_count();
    for _ in 0..100 {
        if rows == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        rows = engine.store().load().row_count();
    }
    handle.abort();

    // Later ticks hit the exhausted script and keep the second snapshot
    assert_eq!(rows, 2);
}
