use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::auth::middleware::AuthUser;
use crate::auth::password;
use crate::entities::{game, join_request, user};
use crate::error::AppError;
use crate::policy;
use crate::services::{DisableOutcome, DomainError};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the user route group: `/users/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register))
        .route("/me", get(get_me))
        .route(
            "/{user_id}",
            get(get_user).put(update_user).delete(disable_user),
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
struct RegisterRequest {
    username: String,
    nickname: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct UpdateUserRequest {
    nickname: Option<String>,
    password: Option<String>,
    disabled: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserResponse {
    user_id: i32,
    username: String,
    nickname: Option<String>,
    disabled: bool,
    created_at: String,
    updated_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MeResponse {
    #[serde(flatten)]
    user: UserResponse,
    characters: Vec<crate::entities::character::Model>,
    games: Vec<game::Model>,
    join_requests: Vec<join_request::Model>,
}

fn build_user_response(u: &user::Model) -> UserResponse {
    UserResponse {
        user_id: u.user_id,
        username: u.username.clone(),
        nickname: u.nickname.clone(),
        disabled: u.disabled,
        created_at: u.created_at.to_rfc3339(),
        updated_at: u.updated_at.to_rfc3339(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/users` — list users, optional substring search.
async fn list_users(
    State(state): State<AppState>,
    AuthUser(_principal): AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let mut select = user::Entity::find();

    if let Some(ref q) = params.q {
        select = select.filter(
            Condition::any()
                .add(user::Column::Username.contains(q))
                .add(user::Column::Nickname.contains(q)),
        );
    }

    let users = select
        .order_by_asc(user::Column::UserId)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(users.iter().map(build_user_response).collect()))
}

/// `POST /api/v1/users` — register a new user.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let username = body.username.trim().to_string();
    password::validate_username(&username).map_err(AppError::BadRequest)?;

    // Exact, case-sensitive match; disabled users keep their name reserved
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&username))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(DomainError::UsernameNotUnique.into());
    }

    let password_hash = match body.password.as_deref() {
        Some(pw) => Some(password::hash_password(pw)?),
        None => None,
    };

    let now = Utc::now().fixed_offset();
    let created = user::ActiveModel {
        username: Set(username),
        password_hash: Set(password_hash),
        nickname: Set(body.nickname),
        disabled: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(user_id = created.user_id, "user registered");
    Ok((StatusCode::CREATED, Json(build_user_response(&created))))
}

/// `GET /api/v1/users/me` — the principal plus its characters, mastered games
/// and submitted join requests.
async fn get_me(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    let characters = policy::owned_characters(&state.db, principal.user_id).await?;
    let games = policy::mastered_games(&state.db, principal.user_id).await?;
    let join_requests = join_request::Entity::find()
        .filter(join_request::Column::UserId.eq(principal.user_id))
        .order_by_asc(join_request::Column::RequestId)
        .all(&state.db)
        .await?;

    Ok(Json(MeResponse {
        user: build_user_response(&principal),
        characters,
        games,
        join_requests,
    }))
}

/// `GET /api/v1/users/{user_id}` — self-access only.
async fn get_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    if !policy::is_self(&principal, user_id) {
        return Err(AppError::Forbidden(
            "Not authorized to access this user.".to_string(),
        ));
    }

    let target = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    Ok(Json(build_user_response(&target)))
}

/// `PUT /api/v1/users/{user_id}` — self-access only.
async fn update_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<i32>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    if !policy::is_self(&principal, user_id) {
        return Err(AppError::Forbidden(
            "Not authorized to modify this user.".to_string(),
        ));
    }

    let target = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or(DomainError::UserNotFound)?;

    let mut active: user::ActiveModel = target.into();
    if let Some(nickname) = body.nickname {
        active.nickname = Set(Some(nickname));
    }
    if let Some(ref pw) = body.password {
        active.password_hash = Set(Some(password::hash_password(pw)?));
    }
    if let Some(disabled) = body.disabled {
        active.disabled = Set(disabled);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    let updated = active.update(&state.db).await?;

    Ok(Json(build_user_response(&updated)))
}

/// `DELETE /api/v1/users/{user_id}` — soft-delete, self-access only.
async fn disable_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !policy::is_self(&principal, user_id) {
        return Err(AppError::Forbidden(
            "Not authorized to delete this user.".to_string(),
        ));
    }

    let outcome = match user::Entity::find_by_id(user_id).one(&state.db).await? {
        None => DisableOutcome::NotFound,
        Some(u) if u.disabled => DisableOutcome::AlreadyDisabled,
        Some(u) => {
            let mut active: user::ActiveModel = u.into();
            active.disabled = Set(true);
            active.updated_at = Set(Utc::now().fixed_offset());
            active.update(&state.db).await?;
            DisableOutcome::Disabled
        }
    };

    match outcome {
        DisableOutcome::NotFound => Err(DomainError::UserNotFound.into()),
        DisableOutcome::AlreadyDisabled => {
            tracing::debug!(user_id, "disable was a no-op, user already disabled");
            Ok(StatusCode::NO_CONTENT)
        }
        DisableOutcome::Disabled => Ok(StatusCode::NO_CONTENT),
    }
}
