//! Ownership claim endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domain::envelope::{ApiResponse, ListResponse};
use domain::models::{
    ClaimDecision, ClaimFilterQuery, ClaimResponse, ClaimStatsResponse, ClaimStatus,
    CreateClaimRequest, UpdateClaimStatusRequest,
};
use persistence::repositories::{ClaimRepository, ItemRepository};
use shared::pagination::{PageMeta, PageQuery};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware::metrics::{record_claim_decided, record_claim_submitted};

/// POST /api/claims
pub async fn create_claim(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CreateClaimRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ClaimResponse>>), ApiError> {
    req.validate()?;

    let repo = ClaimRepository::new(state.pool.clone());
    let claim = repo
        .submit(req.item_id, user.id, req.verification_message.trim())
        .await?;

    record_claim_submitted();
    tracing::info!(claim_id = %claim.id, item_id = %req.item_id, user_id = %user.id, "claim submitted");

    let details = repo
        .find_with_details(claim.id)
        .await?
        .ok_or_else(claim_not_found)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            ClaimResponse::from(details),
            "Claim submitted",
        )),
    ))
}

/// GET /api/claims
///
/// Admins see every claim; everyone else sees only claims where they are
/// the claimant or the reporter of the claimed item.
pub async fn list_claims(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(filter): Query<ClaimFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListResponse<ClaimResponse>>, ApiError> {
    let page = page.clamped(state.config.security.max_page_size);
    let visible_to = (!user.is_admin()).then_some(user.id);

    let repo = ClaimRepository::new(state.pool.clone());
    let entities = repo
        .list(&filter, visible_to, page.limit, page.offset())
        .await?;
    let total = repo.count(&filter, visible_to).await?;

    let claims: Vec<ClaimResponse> = entities.into_iter().map(ClaimResponse::from).collect();
    let meta = PageMeta::new(claims.len(), total, &page);
    Ok(Json(ListResponse::new(claims, meta)))
}

/// GET /api/claims/:id
pub async fn get_claim(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClaimResponse>>, ApiError> {
    let repo = ClaimRepository::new(state.pool.clone());
    let details = repo
        .find_with_details(id)
        .await?
        .ok_or_else(claim_not_found)?;

    let involved = details.claimant_id == user.id || details.reporter_id == user.id;
    if !involved && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "You do not have access to this claim".to_string(),
        ));
    }

    Ok(Json(ApiResponse::new(ClaimResponse::from(details))))
}

/// GET /api/claims/item/:item_id
///
/// Only the item's reporter and admins may see the claims on an item.
pub async fn claims_for_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<ClaimResponse>>>, ApiError> {
    let item_repo = ItemRepository::new(state.pool.clone());
    let item = item_repo
        .find_by_id(item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    if item.user_id != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Only the reporter can view claims on this item".to_string(),
        ));
    }

    let repo = ClaimRepository::new(state.pool.clone());
    let entities = repo.list_for_item(item_id).await?;
    let claims: Vec<ClaimResponse> = entities.into_iter().map(ClaimResponse::from).collect();

    Ok(Json(ApiResponse::new(claims)))
}

/// GET /api/claims/me/stats
pub async fn my_claim_stats(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<ApiResponse<ClaimStatsResponse>>, ApiError> {
    let repo = ClaimRepository::new(state.pool.clone());
    let stats = repo.stats_for_user(user.id).await?;

    Ok(Json(ApiResponse::new(ClaimStatsResponse::from(stats))))
}

/// PUT /api/claims/:id/status (admin only)
pub async fn update_claim_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateClaimStatusRequest>,
) -> Result<Json<ApiResponse<ClaimResponse>>, ApiError> {
    let repo = ClaimRepository::new(state.pool.clone());
    let notes = req.admin_notes.as_deref();

    let claim = match req.status {
        ClaimDecision::Approved => repo.approve(id, notes).await?,
        ClaimDecision::Rejected => repo.reject(id, notes).await?,
    };

    record_claim_decided(ClaimStatus::from(req.status).as_str());
    tracing::info!(claim_id = %id, decision = %ClaimStatus::from(req.status), "claim decided");

    let details = repo
        .find_with_details(claim.id)
        .await?
        .ok_or_else(claim_not_found)?;

    let message = match req.status {
        ClaimDecision::Approved => "Claim approved",
        ClaimDecision::Rejected => "Claim rejected",
    };
    Ok(Json(ApiResponse::with_message(
        ClaimResponse::from(details),
        message,
    )))
}

/// DELETE /api/claims/:id
///
/// The claimant can withdraw their own pending or rejected claim; an
/// approved claim can only be deleted by an admin, which reverts the
/// item's claim status when no other approved claim remains.
pub async fn delete_claim(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let repo = ClaimRepository::new(state.pool.clone());
    let claim = repo.find_by_id(id).await?.ok_or_else(claim_not_found)?;

    if claim.claimant_id != user.id && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "You can only delete your own claims".to_string(),
        ));
    }

    let approved = persistence::entities::ClaimStatusDb::Approved;
    if claim.status == approved && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Approved claims can only be deleted by an admin".to_string(),
        ));
    }

    repo.delete(id).await?;
    tracing::info!(claim_id = %id, user_id = %user.id, "claim deleted");

    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "Claim deleted",
    )))
}

fn claim_not_found() -> ApiError {
    ApiError::NotFound("Claim not found".to_string())
}
