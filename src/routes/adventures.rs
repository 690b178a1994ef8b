use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::entities::adventure;
use crate::error::AppError;
use crate::services::{DomainError, adventure_service};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the adventure route group: `/adventures/...`
///
/// All ids in this API are *logical* adventure ids; physical version rows
/// (`aid`) never leak past the response payload.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_adventures).post(create_adventure))
        .route(
            "/{adventure_id}",
            get(get_adventure).put(update_adventure).delete(disable_adventure),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListParams {
    q: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Deserialize)]
struct CreateAdventureRequest {
    name: String,
    plot: Option<String>,
}

#[derive(Deserialize)]
struct UpdateAdventureRequest {
    name: Option<String>,
    plot: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AdventureResponse {
    adventure_id: i32,
    aid: i32,
    name: String,
    plot: Option<String>,
    is_active: bool,
    is_locked: bool,
    created_at: String,
    updated_at: String,
}

fn build_adventure_response(a: &adventure::Model) -> AdventureResponse {
    AdventureResponse {
        adventure_id: a.adventure_id,
        aid: a.aid,
        name: a.name.clone(),
        plot: a.plot.clone(),
        is_active: a.is_active,
        is_locked: a.is_locked,
        created_at: a.created_at.to_rfc3339(),
        updated_at: a.updated_at.to_rfc3339(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/adventures` — latest version of every adventure.
async fn list_adventures(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<AdventureResponse>>, AppError> {
    let adventures = adventure_service::list(
        &state.db,
        params.q.as_deref(),
        params.offset.unwrap_or(0),
        params.limit.unwrap_or(100),
    )
    .await?;

    Ok(Json(adventures.iter().map(build_adventure_response).collect()))
}

/// `GET /api/v1/adventures/{adventure_id}` — the current version.
async fn get_adventure(
    State(state): State<AppState>,
    Path(adventure_id): Path<i32>,
) -> Result<Json<AdventureResponse>, AppError> {
    let found = adventure_service::current(&state.db, adventure_id)
        .await?
        .ok_or(DomainError::AdventureNotFound)?;

    Ok(Json(build_adventure_response(&found)))
}

/// `POST /api/v1/adventures` — create version 1 of a new adventure.
async fn create_adventure(
    State(state): State<AppState>,
    Json(body): Json<CreateAdventureRequest>,
) -> Result<(StatusCode, Json<AdventureResponse>), AppError> {
    let created = adventure_service::create(&state.db, body.name, body.plot).await?;
    Ok((StatusCode::CREATED, Json(build_adventure_response(&created))))
}

/// `PUT /api/v1/adventures/{adventure_id}` — partial update via the
/// versioning policy.
async fn update_adventure(
    State(state): State<AppState>,
    Path(adventure_id): Path<i32>,
    Json(body): Json<UpdateAdventureRequest>,
) -> Result<Json<AdventureResponse>, AppError> {
    let patch = adventure_service::AdventurePatch {
        name: body.name,
        plot: body.plot,
    };
    let updated = adventure_service::update(&state.db, adventure_id, patch).await?;
    Ok(Json(build_adventure_response(&updated)))
}

/// `DELETE /api/v1/adventures/{adventure_id}` — deactivate the current
/// version.
async fn disable_adventure(
    State(state): State<AppState>,
    Path(adventure_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    adventure_service::disable(&state.db, adventure_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
