//! Item report endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domain::envelope::{ApiResponse, ListResponse};
use domain::models::{CreateItemRequest, ItemFilterQuery, ItemResponse, UpdateItemRequest};
use persistence::entities::{ItemCategoryDb, ReportTypeDb};
use persistence::repositories::{ItemRepository, ItemUpdate};
use shared::pagination::{PageMeta, PageQuery};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::record_item_reported;

/// GET /api/items (public, no authentication)
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListResponse<ItemResponse>>, ApiError> {
    let page = page.clamped(state.config.security.max_page_size);
    let repo = ItemRepository::new(state.pool.clone());

    let entities = repo.list(&filter, page.limit, page.offset()).await?;
    let total = repo.count(&filter).await?;

    let items: Vec<ItemResponse> = entities.into_iter().map(ItemResponse::from).collect();
    let meta = PageMeta::new(items.len(), total, &page);
    Ok(Json(ListResponse::new(items, meta)))
}

/// GET /api/items/mine
pub async fn my_items(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListResponse<ItemResponse>>, ApiError> {
    let page = page.clamped(state.config.security.max_page_size);
    let repo = ItemRepository::new(state.pool.clone());

    let entities = repo
        .list_for_user(user.id, page.limit, page.offset())
        .await?;
    let total = repo.count_for_user(user.id).await?;

    let items: Vec<ItemResponse> = entities.into_iter().map(ItemResponse::from).collect();
    let meta = PageMeta::new(items.len(), total, &page);
    Ok(Json(ListResponse::new(items, meta)))
}

/// GET /api/items/:id (public, no authentication)
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ItemResponse>>, ApiError> {
    let repo = ItemRepository::new(state.pool.clone());
    let entity = repo
        .find_with_reporter(id)
        .await?
        .ok_or_else(item_not_found)?;

    Ok(Json(ApiResponse::new(ItemResponse::from(entity))))
}

/// POST /api/items
pub async fn create_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ItemResponse>>), ApiError> {
    req.validate()?;

    let repo = ItemRepository::new(state.pool.clone());
    let entity = repo
        .create(
            user.id,
            req.name.trim(),
            req.description.trim(),
            ItemCategoryDb::from(req.category),
            ReportTypeDb::from(req.status),
            req.location.trim(),
            req.date,
            req.image_url.as_deref(),
        )
        .await?;

    record_item_reported(req.status.as_str());
    tracing::info!(item_id = %entity.id, user_id = %user.id, "item reported");

    let with_reporter = repo
        .find_with_reporter(entity.id)
        .await?
        .ok_or_else(item_not_found)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ItemResponse::from(with_reporter),
            "Item reported",
        )),
    ))
}

/// PUT /api/items/:id
pub async fn update_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<ItemResponse>>, ApiError> {
    req.validate()?;

    if req.is_empty() {
        return Err(ApiError::Validation("No fields to update".to_string()));
    }

    let repo = ItemRepository::new(state.pool.clone());
    let existing = repo.find_by_id(id).await?.ok_or_else(item_not_found)?;

    if existing.user_id != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Only the reporter can update this item".to_string(),
        ));
    }

    let update = ItemUpdate {
        name: req.name.as_deref().map(str::trim),
        description: req.description.as_deref().map(str::trim),
        category: req.category.map(ItemCategoryDb::from),
        status: req.status.map(ReportTypeDb::from),
        location: req.location.as_deref().map(str::trim),
        date: req.date,
        image_url: req.image_url.as_deref(),
    };
    repo.update(id, update).await?.ok_or_else(item_not_found)?;

    let with_reporter = repo
        .find_with_reporter(id)
        .await?
        .ok_or_else(item_not_found)?;

    Ok(Json(ApiResponse::with_message(
        ItemResponse::from(with_reporter),
        "Item updated",
    )))
}

/// DELETE /api/items/:id
pub async fn delete_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let repo = ItemRepository::new(state.pool.clone());
    let existing = repo.find_by_id(id).await?.ok_or_else(item_not_found)?;

    if existing.user_id != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Only the reporter can delete this item".to_string(),
        ));
    }

    repo.delete(id).await?;
    tracing::info!(item_id = %id, user_id = %user.id, "item deleted");

    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "Item deleted",
    )))
}

fn item_not_found() -> ApiError {
    ApiError::NotFound("Item not found".to_string())
}
