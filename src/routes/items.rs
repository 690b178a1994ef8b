use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::entities::{ItemType, item};
use crate::error::AppError;
use crate::services::{DisableOutcome, DomainError};
use crate::state::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

/// Build the item route group: `/items/...`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/{item_id}",
            get(get_item).put(update_item).delete(disable_item),
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
#[serde(rename_all = "camelCase")]
struct CreateItemRequest {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    type_code: ItemType,
    reusable: Option<bool>,
    weight: Option<f64>,
    cost: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemRequest {
    name: Option<String>,
    description: Option<String>,
    #[serde(rename = "type")]
    type_code: Option<ItemType>,
    reusable: Option<bool>,
    weight: Option<f64>,
    cost: Option<i32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ItemResponse {
    item_id: i32,
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    type_code: ItemType,
    reusable: bool,
    weight: f64,
    cost: i32,
    disabled: bool,
    created_at: String,
    updated_at: String,
}

fn build_item_response(i: &item::Model) -> ItemResponse {
    ItemResponse {
        item_id: i.item_id,
        name: i.name.clone(),
        description: i.description.clone(),
        type_code: i.type_code,
        reusable: i.reusable,
        weight: i.weight,
        cost: i.cost,
        disabled: i.disabled,
        created_at: i.created_at.to_rfc3339(),
        updated_at: i.updated_at.to_rfc3339(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /api/v1/items` — list items, optional substring search.
async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    let mut select = item::Entity::find();

    if let Some(ref q) = params.q {
        select = select.filter(
            Condition::any()
                .add(item::Column::Name.contains(q))
                .add(item::Column::Description.contains(q)),
        );
    }

    let items = select
        .order_by_asc(item::Column::ItemId)
        .offset(params.offset.unwrap_or(0))
        .limit(params.limit.unwrap_or(100))
        .all(&state.db)
        .await?;

    Ok(Json(items.iter().map(build_item_response).collect()))
}

/// `GET /api/v1/items/{item_id}`
async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<Json<ItemResponse>, AppError> {
    let found = item::Entity::find_by_id(item_id)
        .one(&state.db)
        .await?
        .ok_or(DomainError::ItemNotFound)?;

    Ok(Json(build_item_response(&found)))
}

/// `POST /api/v1/items`
async fn create_item(
    State(state): State<AppState>,
    Json(body): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), AppError> {
    let now = Utc::now().fixed_offset();
    let created = item::ActiveModel {
        name: Set(body.name),
        description: Set(body.description),
        type_code: Set(body.type_code),
        reusable: Set(body.reusable.unwrap_or(false)),
        weight: Set(body.weight.unwrap_or(0.0)),
        cost: Set(body.cost.unwrap_or(0)),
        disabled: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(build_item_response(&created))))
}

/// `PUT /api/v1/items/{item_id}`
async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let existing = item::Entity::find_by_id(item_id)
        .one(&state.db)
        .await?
        .ok_or(DomainError::ItemNotFound)?;

    let mut active: item::ActiveModel = existing.into();
    if let Some(name) = body.name {
        active.name = Set(name);
    }
    if let Some(description) = body.description {
        active.description = Set(Some(description));
    }
    if let Some(type_code) = body.type_code {
        active.type_code = Set(type_code);
    }
    if let Some(reusable) = body.reusable {
        active.reusable = Set(reusable);
    }
    if let Some(weight) = body.weight {
        active.weight = Set(weight);
    }
    if let Some(cost) = body.cost {
        active.cost = Set(cost);
    }
    active.updated_at = Set(Utc::now().fixed_offset());
    let updated = active.update(&state.db).await?;

    Ok(Json(build_item_response(&updated)))
}

/// `DELETE /api/v1/items/{item_id}` — soft-delete.
async fn disable_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let outcome = match item::Entity::find_by_id(item_id).one(&state.db).await? {
        None => DisableOutcome::NotFound,
        Some(i) if i.disabled => DisableOutcome::AlreadyDisabled,
        Some(i) => {
            let mut active: item::ActiveModel = i.into();
            active.disabled = Set(true);
            active.updated_at = Set(Utc::now().fixed_offset());
            active.update(&state.db).await?;
            DisableOutcome::Disabled
        }
    };

    match outcome {
        DisableOutcome::NotFound => Err(DomainError::ItemNotFound.into()),
        DisableOutcome::AlreadyDisabled | DisableOutcome::Disabled => Ok(StatusCode::NO_CONTENT),
    }
}
