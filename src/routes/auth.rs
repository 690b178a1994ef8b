use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::auth::{jwt, password};
use crate::entities::user;
use crate::error::AppError;
use crate::state::AppState;

/// Build the auth route group: `/auth/...`
pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    token: String,
    user_id: i32,
    username: String,
}

/// `POST /api/v1/auth/login` — exchange username + password for a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(&body.username))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password.".to_string()))?;

    // Accounts registered without a password cannot log in
    let hash = user_model
        .password_hash
        .as_deref()
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password.".to_string()))?;

    let valid = password::verify_password(&body.password, hash)?;
    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid username or password.".to_string(),
        ));
    }

    if user_model.disabled {
        return Err(AppError::Forbidden("Account is disabled.".to_string()));
    }

    let token = jwt::generate_access_token(user_model.user_id, &state.config)?;

    Ok(Json(LoginResponse {
        token,
        user_id: user_model.user_id,
        username: user_model.username,
    }))
}
