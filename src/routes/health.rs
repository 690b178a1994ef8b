use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    database: String,
}

/// `GET /health` — liveness only, no dependencies touched.
async fn liveness() -> impl IntoResponse {
    StatusCode::OK
}

/// `GET /api/v1/health` — readiness including a database ping.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_status = match state.db.ping().await {
        Ok(()) => "connected",
        Err(_) => "disconnected",
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status.to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// Routes mounted at the server root.
pub fn root_router() -> Router<AppState> {
    Router::new().route("/health", get(liveness))
}

/// Routes mounted under `/api/v1`.
pub fn api_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
