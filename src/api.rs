use crate::sink::ClickHouseSink;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::error;

/// Shared state for the diagnostic HTTP front-end
#[derive(Clone)]
pub struct ApiState {
    /// Sink whose backing store the endpoints report on
    pub sink: Arc<ClickHouseSink>,
    /// Service start time for uptime calculation
    pub started_at: DateTime<Utc>,
}

/// Response for the database-version diagnostic endpoint
#[derive(Debug, Serialize)]
pub struct DbVersionResponse {
    /// ClickHouse server version string
    pub version: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current status
    pub status: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
    /// Service uptime in seconds
    pub uptime: i64,
}

/// Builds the diagnostic router with its two endpoints
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/db_version", get(db_version))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn db_version(
    State(state): State<ApiState>,
) -> Result<Json<DbVersionResponse>, (StatusCode, String)> {
    match state.sink.server_version().await {
        Ok(version) => Ok(Json(DbVersionResponse { version })),
        Err(e) => {
            error!("db_version query failed: {e}");
            Err((StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let now = Utc::now();
    Json(HealthResponse {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "ok".to_string(),
        timestamp: now,
        uptime: (now - state.started_at).num_seconds(),
    })
}
