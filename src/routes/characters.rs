use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::abilities::CharacterAbilities;
use crate::auth::middleware::AuthUser;
use crate::entities::character;
use crate::error::AppError;
use crate::policy;
use crate::services::{DisableOutcome, DomainError};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the character route group: `/characters/...`
///
/// All access is owner-scoped. A character that exists but belongs to someone
/// else is reported as 404, never 403: existence is hidden from non-owners.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_characters).post(create_character))
        .route(
            "/{character_id}",
            get(get_character).put(update_character).delete(disable_character),
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
struct CreateCharacterRequest {
    name: String,
    biography: Option<String>,
}

#[derive(Deserialize)]
struct UpdateCharacterRequest {
    name: Option<String>,
    biography: Option<String>,
    disabled: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CharacterResponse {
    character_id: i32,
    name: String,
    biography: Option<String>,
    disabled: bool,
    user_owner_id: i32,
    created_at: String,
    updated_at: String,
    /// Derived view, recomputed from the character id; never persisted.
    abilities: CharacterAbilities,
}

fn build_character_response(c: &character::Model) -> CharacterResponse {
    CharacterResponse {
        character_id: c.character_id,
        name: c.name.clone(),
        biography: c.biography.clone(),
        disabled: c.disabled,
        user_owner_id: c.user_owner_id,
        created_at: c.created_at.to_rfc3339(),
        updated_at: c.updated_at.to_rfc3339(),
        abilities: CharacterAbilities::for_character(c.character_id),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/characters` — the principal's own characters.
async fn list_characters(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CharacterResponse>>, AppError> {
    let mut select =
        character::Entity::find().filter(character::Column::UserOwnerId.eq(principal.user_id));

    if let Some(ref q) = params.q {
        select = select.filter(character::Column::Name.contains(q));
    }

    let characters = select
        .order_by_asc(character::Column::CharacterId)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(characters.iter().map(build_character_response).collect()))
}

/// `GET /api/v1/characters/{character_id}` — owner-scoped lookup.
async fn get_character(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(character_id): Path<i32>,
) -> Result<Json<CharacterResponse>, AppError> {
    let found = character::Entity::find()
        .filter(character::Column::UserOwnerId.eq(principal.user_id))
        .filter(character::Column::CharacterId.eq(character_id))
        .one(&state.db)
        .await?
        .ok_or(DomainError::CharacterNotFound)?;

    Ok(Json(build_character_response(&found)))
}

/// `POST /api/v1/characters` — create a character owned by the principal.
async fn create_character(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(body): Json<CreateCharacterRequest>,
) -> Result<(StatusCode, Json<CharacterResponse>), AppError> {
    let now = Utc::now().fixed_offset();
    let created = character::ActiveModel {
        name: Set(body.name),
        biography: Set(body.biography),
        disabled: Set(false),
        user_owner_id: Set(principal.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(build_character_response(&created))))
}

/// `PUT /api/v1/characters/{character_id}` — owner only, hidden otherwise.
async fn update_character(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(character_id): Path<i32>,
    Json(body): Json<UpdateCharacterRequest>,
) -> Result<Json<CharacterResponse>, AppError> {
    let owned = policy::owned_characters(&state.db, principal.user_id).await?;
    if !policy::owns_character(&owned, character_id) {
        return Err(DomainError::CharacterNotFound.into());
    }

    let existing = character::Entity::find_by_id(character_id)
        .one(&state.db)
        .await?
        .ok_or(DomainError::CharacterNotFound)?;

    let mut active: character::ActiveModel = existing.into();
    if let Some(name) = body.name {
        active.name = Set(name);
    }
    if let Some(biography) = body.biography {
        active.biography = Set(Some(biography));
    }
    if let Some(disabled) = body.disabled {
        active.disabled = Set(disabled);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    let updated = active.update(&state.db).await?;

    Ok(Json(build_character_response(&updated)))
}

/// `DELETE /api/v1/characters/{character_id}` — soft-delete, owner only.
async fn disable_character(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(character_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let owned = policy::owned_characters(&state.db, principal.user_id).await?;
    if !policy::owns_character(&owned, character_id) {
        return Err(DomainError::CharacterNotFound.into());
    }

    let outcome = match character::Entity::find_by_id(character_id)
        .one(&state.db)
        .await?
    {
        None => DisableOutcome::NotFound,
        Some(c) if c.disabled => DisableOutcome::AlreadyDisabled,
        Some(c) => {
            let mut active: character::ActiveModel = c.into();
            active.disabled = Set(true);
            active.updated_at = Set(Utc::now().fixed_offset());
            active.update(&state.db).await?;
            DisableOutcome::Disabled
        }
    };

    match outcome {
        DisableOutcome::NotFound => Err(DomainError::CharacterNotFound.into()),
        DisableOutcome::AlreadyDisabled | DisableOutcome::Disabled => Ok(StatusCode::NO_CONTENT),
    }
}
