mod common;

use axum::Router;
use axum::http::StatusCode;
use serde_json::json;

async fn create_game(app: &Router, token: &str) -> serde_json::Value {
    let (status, body) = common::post_json_with_auth(app, "/api/v1/games", &json!({}), token).await;
    assert_eq!(status, StatusCode::CREATED, "create game failed: {body}");
    serde_json::from_str(&body).unwrap_or_default()
}

async fn create_character(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) =
        common::post_json_with_auth(app, "/api/v1/characters", &json!({ "name": name }), token)
            .await;
    assert_eq!(status, StatusCode::CREATED, "create character failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["characterId"].as_i64().unwrap_or_default()
}

async fn file_join_request(app: &Router, token: &str, game_id: i64, character_id: i64) -> i64 {
    let (status, body) = common::post_json_with_auth(
        app,
        &format!("/api/v1/games/{game_id}/join"),
        &json!({ "characterId": character_id, "message": "Let me in" }),
        token,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "join request failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["status"], "pending");
    json["requestId"].as_i64().unwrap_or_default()
}

async fn roster_names(app: &Router, game_id: i64) -> Vec<String> {
    let (status, body) = common::get(app, &format!("/api/v1/games/{game_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    json["characters"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

// ──────────────────────────────────────────────────────────────────────────────
// Game CRUD
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn game_master_is_fixed_at_creation() {
    let app = common::test_app().await;
    let token = common::register_and_login(&app, "gm1", "Password123").await;

    let (_status, body) = common::get_with_auth(&app, "/api/v1/users/me", &token).await;
    let me: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    let gm_id = me["userId"].as_i64().unwrap_or_default();

    let game = create_game(&app, &token).await;
    assert_eq!(game["gameMasterId"].as_i64().unwrap_or_default(), gm_id);
    assert_eq!(game["gameState"], true);
}

#[tokio::test]
async fn only_the_game_master_may_update_the_game() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let other_token = common::register_and_login(&app, "p1", "Password123").await;

    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();

    let (status, _body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}"),
        &json!({ "gameState": false }),
        &other_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = common::put_json_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}"),
        &json!({ "gameState": false }),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["gameState"], false);
}

#[tokio::test]
async fn disabled_game_is_still_readable() {
    let app = common::test_app().await;
    let token = common::register_and_login(&app, "gm1", "Password123").await;
    let game = create_game(&app, &token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();

    let (status, _body) =
        common::delete_with_auth(&app, &format!("/api/v1/games/{game_id}"), &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = common::get(&app, &format!("/api/v1/games/{game_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["disabled"], true);
}

// ──────────────────────────────────────────────────────────────────────────────
// Join-request lifecycle (end-to-end scenario 1)
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn accept_seats_character_and_flips_status() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();
    let rogue = create_character(&app, &p1_token, "Rogue").await;

    let request_id = file_join_request(&app, &p1_token, game_id, rogue).await;

    let (status, body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/join_requests/{request_id}/accept"),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "accept failed: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["status"], "accepted");

    assert_eq!(roster_names(&app, game_id).await, vec!["Rogue".to_string()]);
}

// ──────────────────────────────────────────────────────────────────────────────
// Availability invariant (end-to-end scenario 2)
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn seated_character_cannot_even_request_another_game() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let gm2_token = common::register_and_login(&app, "gm2", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game_a = create_game(&app, &gm_token).await;
    let game_a_id = game_a["gameId"].as_i64().unwrap_or_default();
    let game_b = create_game(&app, &gm2_token).await;
    let game_b_id = game_b["gameId"].as_i64().unwrap_or_default();

    let rogue = create_character(&app, &p1_token, "Rogue").await;
    let request_id = file_join_request(&app, &p1_token, game_a_id, rogue).await;

    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_a_id}/join_requests/{request_id}/accept"),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Rogue is now seated in game A: filing for game B fails at creation time
    let (status, body) = common::post_json_with_auth(
        &app,
        &format!("/api/v1/games/{game_b_id}/join"),
        &json!({ "characterId": rogue }),
        &p1_token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "expected conflict: {body}");
}

#[tokio::test]
async fn second_accept_for_same_character_fails() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let gm2_token = common::register_and_login(&app, "gm2", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game_a = create_game(&app, &gm_token).await;
    let game_a_id = game_a["gameId"].as_i64().unwrap_or_default();
    let game_b = create_game(&app, &gm2_token).await;
    let game_b_id = game_b["gameId"].as_i64().unwrap_or_default();

    let rogue = create_character(&app, &p1_token, "Rogue").await;

    // two pending requests may accumulate while the character is unseated
    let request_a = file_join_request(&app, &p1_token, game_a_id, rogue).await;
    let request_b = file_join_request(&app, &p1_token, game_b_id, rogue).await;

    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_a_id}/join_requests/{request_a}/accept"),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // the accept-time re-check refuses to double-seat the character
    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_b_id}/join_requests/{request_b}/accept"),
        &gm2_token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(roster_names(&app, game_a_id).await, vec!["Rogue".to_string()]);
    assert!(roster_names(&app, game_b_id).await.is_empty());
}

// ──────────────────────────────────────────────────────────────────────────────
// Decline
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn decline_never_touches_the_roster() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();
    let rogue = create_character(&app, &p1_token, "Rogue").await;
    let request_id = file_join_request(&app, &p1_token, game_id, rogue).await;

    let (status, body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/join_requests/{request_id}/decline"),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["status"], "declined");

    assert!(roster_names(&app, game_id).await.is_empty());

    // the character is free to request again
    file_join_request(&app, &p1_token, game_id, rogue).await;
}

// ──────────────────────────────────────────────────────────────────────────────
// Terminal states are final
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolved_request_cannot_be_resolved_again() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();
    let rogue = create_character(&app, &p1_token, "Rogue").await;
    let request_id = file_join_request(&app, &p1_token, game_id, rogue).await;

    let accept_uri = format!("/api/v1/games/{game_id}/join_requests/{request_id}/accept");
    let decline_uri = format!("/api/v1/games/{game_id}/join_requests/{request_id}/decline");

    let (status, _body) = common::post_with_auth(&app, &accept_uri, &gm_token).await;
    assert_eq!(status, StatusCode::OK);

    // repeat accept must not re-append the character to the roster
    let (status, _body) = common::post_with_auth(&app, &accept_uri, &gm_token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _body) = common::post_with_auth(&app, &decline_uri, &gm_token).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(roster_names(&app, game_id).await, vec!["Rogue".to_string()]);
}

// ──────────────────────────────────────────────────────────────────────────────
// Listing and authorization
// ──────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_defaults_to_pending_and_accepts_a_filter() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();
    let rogue = create_character(&app, &p1_token, "Rogue").await;
    let wizard = create_character(&app, &p1_token, "Wizard").await;

    let rogue_request = file_join_request(&app, &p1_token, game_id, rogue).await;
    file_join_request(&app, &p1_token, game_id, wizard).await;

    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/join_requests/{rogue_request}/accept"),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        common::get_with_auth(&app, &format!("/api/v1/games/{game_id}/join_requests"), &gm_token)
            .await;
    assert_eq!(status, StatusCode::OK);
    let pending: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(pending.as_array().map(Vec::len), Some(1));

    let (status, body) = common::get_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/join_requests?status=pending,accepted"),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let all: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(all.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn join_request_management_is_gm_only() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();
    let rogue = create_character(&app, &p1_token, "Rogue").await;
    let request_id = file_join_request(&app, &p1_token, game_id, rogue).await;

    let (status, _body) =
        common::get_with_auth(&app, &format!("/api/v1/games/{game_id}/join_requests"), &p1_token)
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/join_requests/{request_id}/accept"),
        &p1_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn filing_for_someone_elses_character_is_forbidden() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;
    let p2_token = common::register_and_login(&app, "p2", "Password123").await;

    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();
    let rogue = create_character(&app, &p1_token, "Rogue").await;

    let (status, _body) = common::post_json_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/join"),
        &json!({ "characterId": rogue }),
        &p2_token,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn resolving_a_request_through_another_game_is_not_found() {
    let app = common::test_app().await;
    let gm_a_token = common::register_and_login(&app, "gm1", "Password123").await;
    let gm_b_token = common::register_and_login(&app, "gm2", "Password123").await;
    let p1_token = common::register_and_login(&app, "p1", "Password123").await;

    let game_a = create_game(&app, &gm_a_token).await;
    let game_a_id = game_a["gameId"].as_i64().unwrap_or_default();
    let game_b = create_game(&app, &gm_b_token).await;
    let game_b_id = game_b["gameId"].as_i64().unwrap_or_default();

    let rogue = create_character(&app, &p1_token, "Rogue").await;
    let request_id = file_join_request(&app, &p1_token, game_a_id, rogue).await;

    // gm2 masters game B, but the request lives in game A's inbox
    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_b_id}/join_requests/{request_id}/accept"),
        &gm_b_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_b_id}/join_requests/{request_id}/decline"),
        &gm_b_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // the request is untouched and still resolvable by the right master
    assert!(roster_names(&app, game_a_id).await.is_empty());
    let (status, body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_a_id}/join_requests/{request_id}/accept"),
        &gm_a_token,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();
    assert_eq!(json["status"], "accepted");
}

#[tokio::test]
async fn accepting_unknown_request_is_not_found() {
    let app = common::test_app().await;
    let gm_token = common::register_and_login(&app, "gm1", "Password123").await;
    let game = create_game(&app, &gm_token).await;
    let game_id = game["gameId"].as_i64().unwrap_or_default();

    let (status, _body) = common::post_with_auth(
        &app,
        &format!("/api/v1/games/{game_id}/join_requests/999/accept"),
        &gm_token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
