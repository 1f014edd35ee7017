//! HTTP server mode for REST access to the current snapshot

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::error::{Error, Result};
use crate::query::Query;
use crate::snapshot::SnapshotStore;
use crate::types::JsonValue;

/// Response wrapper
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

/// Map an error to its status code and error envelope
fn error_response(err: &Error) -> Response {
    let status = match err {
        Error::RowNotFound { .. } => StatusCode::NOT_FOUND,
        Error::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::<()>::error(err.to_string()))).into_response()
}

/// Build the API router over a snapshot store
pub fn router(store: Arc<SnapshotStore>) -> Router {
    // Allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/schema", get(get_schema))
        .route("/data", get(get_data).post(get_data))
        .route("/data/:id", get(get_row))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Start the HTTP server
pub async fn serve(store: Arc<SnapshotStore>, port: u16) -> Result<()> {
    let app = router(store);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Other(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health(State(store): State<Arc<SnapshotStore>>) -> impl IntoResponse {
    let snapshot = store.load();
    Json(json!({
        "status": "ok",
        "rows": snapshot.row_count(),
        "fields": snapshot.schema().len(),
        "loaded_at": snapshot.loaded_at(),
    }))
}

/// Current schema
async fn get_schema(State(store): State<Arc<SnapshotStore>>) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(store.schema())))
}

/// Filtered and sorted rows; the body is an optional JSON query
async fn get_data(State(store): State<Arc<SnapshotStore>>, body: Bytes) -> Response {
    let query = match Query::from_body(&body) {
        Ok(query) => query,
        Err(e) => {
            debug!(error = %e, "Rejected query body");
            return error_response(&e);
        }
    };

    let rows = store.load().rows(&query);
    (StatusCode::OK, Json(ApiResponse::success(rows))).into_response()
}

/// One row by id
async fn get_row(State(store): State<Arc<SnapshotStore>>, Path(id): Path<String>) -> Response {
    match store.row_by_id(&JsonValue::String(id)) {
        Ok(row) => (StatusCode::OK, Json(ApiResponse::success(row))).into_response(),
        Err(e) => error_response(&e),
    }
}
