use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::entities::{JoinRequestStatus, character, game, join_request};
use crate::error::AppError;
use crate::policy;
use crate::services::{DisableOutcome, DomainError, join_service};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the game route group: `/games/...`
///
/// Join-request management (list/accept/decline) is reserved to the game's
/// master; filing a request is reserved to the character's owner. The state
/// machine itself lives in `services::join_service`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_games).post(create_game))
        .route("/{game_id}", get(get_game).put(update_game).delete(disable_game))
        .route("/{game_id}/join", post(create_join_request))
        .route("/{game_id}/join_requests", get(list_join_requests))
        .route(
            "/{game_id}/join_requests/{request_id}/accept",
            post(accept_join_request),
        )
        .route(
            "/{game_id}/join_requests/{request_id}/decline",
            post(decline_join_request),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// DTOs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListParams {
    owner_id: Option<i32>,
    offset: Option<u64>,
    limit: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateGameRequest {
    game_state: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequestBody {
    character_id: i32,
    message: Option<String>,
}

#[derive(Deserialize)]
struct JoinRequestListParams {
    /// Comma-separated status names, e.g. `pending,accepted`.
    status: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameResponse {
    game_id: i32,
    game_master_id: i32,
    game_state: bool,
    disabled: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameDetailResponse {
    #[serde(flatten)]
    game: GameResponse,
    characters: Vec<RosterEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RosterEntry {
    character_id: i32,
    name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JoinRequestResponse {
    request_id: i32,
    game_id: i32,
    user_id: i32,
    character_id: i32,
    message: Option<String>,
    status: JoinRequestStatus,
}

fn build_game_response(g: &game::Model) -> GameResponse {
    GameResponse {
        game_id: g.game_id,
        game_master_id: g.game_master_id,
        game_state: g.game_state,
        disabled: g.disabled,
        created_at: g.created_at.to_rfc3339(),
        updated_at: g.updated_at.to_rfc3339(),
    }
}

fn build_join_request_response(r: &join_request::Model) -> JoinRequestResponse {
    JoinRequestResponse {
        request_id: r.request_id,
        game_id: r.game_id,
        user_id: r.user_id,
        character_id: r.character_id,
        message: r.message.clone(),
        status: r.status_code,
    }
}

/// Parse the comma-separated `status` query parameter.
fn parse_status_filter(raw: Option<&str>) -> Result<Vec<JoinRequestStatus>, AppError> {
    let Some(raw) = raw else {
        return Ok(vec![]);
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            JoinRequestStatus::from_str(s)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown status: {s}")))
        })
        .collect()
}

/// Load the principal's mastered games and require mastery of `game_id`.
async fn require_game_master(
    state: &AppState,
    principal_id: i32,
    game_id: i32,
) -> Result<(), AppError> {
    let mastered = policy::mastered_games(&state.db, principal_id).await?;
    if policy::is_game_master(&mastered, game_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "The user is not the game master of the game.".to_string(),
        ))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Game CRUD handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/games` — list games, optionally by game master.
async fn list_games(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let mut select = game::Entity::find();

    if let Some(owner_id) = params.owner_id {
        select = select.filter(game::Column::GameMasterId.eq(owner_id));
    }

    let games = select
        .order_by_asc(game::Column::GameId)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(games.iter().map(build_game_response).collect()))
}

/// `GET /api/v1/games/{game_id}` — game with its current roster.
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<i32>,
) -> Result<Json<GameDetailResponse>, AppError> {
    let found = game::Entity::find_by_id(game_id)
        .one(&state.db)
        .await?
        .ok_or(DomainError::GameNotFound)?;

    let roster = found
        .find_related(character::Entity)
        .all(&state.db)
        .await?;

    Ok(Json(GameDetailResponse {
        game: build_game_response(&found),
        characters: roster
            .into_iter()
            .map(|c| RosterEntry {
                character_id: c.character_id,
                name: c.name,
            })
            .collect(),
    }))
}

/// `POST /api/v1/games` — open a new game table; the principal becomes its
/// game master, permanently.
async fn create_game(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let now = Utc::now().fixed_offset();
    let created = game::ActiveModel {
        game_master_id: Set(principal.user_id),
        game_state: Set(true),
        disabled: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(
        game_id = created.game_id,
        game_master_id = created.game_master_id,
        "game created"
    );
    Ok((StatusCode::CREATED, Json(build_game_response(&created))))
}

/// `PUT /api/v1/games/{game_id}` — GM only.
async fn update_game(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(game_id): Path<i32>,
    Json(body): Json<UpdateGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    require_game_master(&state, principal.user_id, game_id).await?;

    let existing = game::Entity::find_by_id(game_id)
        .one(&state.db)
        .await?
        .ok_or(DomainError::GameNotFound)?;

    let mut active: game::ActiveModel = existing.into();
    if let Some(game_state) = body.game_state {
        active.game_state = Set(game_state);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    let updated = active.update(&state.db).await?;

    Ok(Json(build_game_response(&updated)))
}

/// `DELETE /api/v1/games/{game_id}` — soft-delete, GM only.
async fn disable_game(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(game_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    require_game_master(&state, principal.user_id, game_id).await?;

    let outcome = match game::Entity::find_by_id(game_id).one(&state.db).await? {
        None => DisableOutcome::NotFound,
        Some(g) if g.disabled => DisableOutcome::AlreadyDisabled,
        Some(g) => {
            let mut active: game::ActiveModel = g.into();
            active.disabled = Set(true);
            active.updated_at = Set(Utc::now().fixed_offset());
            active.update(&state.db).await?;
            DisableOutcome::Disabled
        }
    };

    match outcome {
        DisableOutcome::NotFound => Err(DomainError::GameNotFound.into()),
        DisableOutcome::AlreadyDisabled | DisableOutcome::Disabled => Ok(StatusCode::NO_CONTENT),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Join-request handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `POST /api/v1/games/{game_id}/join` — file a join request for one of the
/// principal's characters.
async fn create_join_request(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(game_id): Path<i32>,
    Json(body): Json<JoinRequestBody>,
) -> Result<(StatusCode, Json<JoinRequestResponse>), AppError> {
    let owned = policy::owned_characters(&state.db, principal.user_id).await?;
    if !policy::owns_character(&owned, body.character_id) {
        return Err(AppError::Forbidden(
            "No characters with provided id found.".to_string(),
        ));
    }

    let request = join_service::create_join_request(
        &state.db,
        game_id,
        principal.user_id,
        body.character_id,
        body.message,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(build_join_request_response(&request)),
    ))
}

/// `GET /api/v1/games/{game_id}/join_requests` — GM inbox, defaults to
/// pending requests only.
async fn list_join_requests(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(game_id): Path<i32>,
    Query(params): Query<JoinRequestListParams>,
) -> Result<Json<Vec<JoinRequestResponse>>, AppError> {
    require_game_master(&state, principal.user_id, game_id).await?;

    let statuses = parse_status_filter(params.status.as_deref())?;
    let requests = join_service::list_join_requests(&state.db, game_id, &statuses).await?;

    Ok(Json(
        requests.iter().map(build_join_request_response).collect(),
    ))
}

/// `POST /api/v1/games/{game_id}/join_requests/{request_id}/accept` — GM only.
async fn accept_join_request(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path((game_id, request_id)): Path<(i32, i32)>,
) -> Result<Json<JoinRequestResponse>, AppError> {
    require_game_master(&state, principal.user_id, game_id).await?;

    let request = join_service::accept(&state.db, game_id, request_id).await?;
    Ok(Json(build_join_request_response(&request)))
}

/// `POST /api/v1/games/{game_id}/join_requests/{request_id}/decline` — GM only.
async fn decline_join_request(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path((game_id, request_id)): Path<(i32, i32)>,
) -> Result<Json<JoinRequestResponse>, AppError> {
    require_game_master(&state, principal.user_id, game_id).await?;

    let request = join_service::decline(&state.db, game_id, request_id).await?;
    Ok(Json(build_join_request_response(&request)))
}
