mod adventures;
mod auth;
mod characters;
mod games;
mod health;
mod items;
mod users;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router.
///
/// Structure:
/// - `GET /health` — lightweight liveness check
/// - `/api/v1/...` — health with database ping, auth, and the entity routes
pub fn router() -> Router<AppState> {
    let api_v1 = Router::new()
        .merge(health::api_router())
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/characters", characters::router())
        .nest("/games", games::router())
        .nest("/adventures", adventures::router())
        .nest("/items", items::router());

    Router::new()
        .merge(health::root_router())
        .nest("/api/v1", api_v1)
}
