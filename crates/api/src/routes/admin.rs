//! Admin endpoints: moderation, dashboard, analytics, export and import.

use axum::extract::{Path, Query, State};
use axum::Json;
use domain::envelope::{ApiResponse, ListResponse};
use domain::models::{
    ActivityEvent, ActivityKind, AdminUserResponse, AnalyticsResponse, CategoryCount,
    ClaimStatusCount, DashboardStatsResponse, ImportItemsRequest, ImportItemsResponse, ImportMode,
    ItemSnapshot, MonthlyCount, ReportTypeCount, UpdateUserStatusRequest, UserFilterQuery,
    UserProfile, UserStatus,
};
use persistence::entities::{ActivityEntity, UserRoleDb, UserStatusDb};
use persistence::repositories::{AdminRepository, ItemRepository, UserRepository};
use shared::pagination::{PageMeta, PageQuery};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::CurrentUser;

/// GET /api/admin/stats
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardStatsResponse>>, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());

    let counts = repo.dashboard_counts().await?;
    let by_category = repo.items_by_category().await?;
    let activity = repo.recent_activity().await?;

    let response = DashboardStatsResponse {
        total_reports: counts.total_reports,
        pending_claims: counts.pending_claims,
        resolved_items: counts.resolved_items,
        active_users: counts.active_users,
        items_by_category: by_category
            .into_iter()
            .map(|row| CategoryCount {
                category: row.category.into(),
                count: row.count,
            })
            .collect(),
        recent_activity: activity
            .into_iter()
            .filter_map(activity_event)
            .collect(),
    };

    Ok(Json(ApiResponse::new(response)))
}

/// Rows with an unexpected kind are dropped rather than failing the
/// whole dashboard.
fn activity_event(row: ActivityEntity) -> Option<ActivityEvent> {
    let kind = match row.kind.as_str() {
        "item" => ActivityKind::Item,
        "claim" => ActivityKind::Claim,
        _ => return None,
    };
    Some(ActivityEvent {
        kind,
        id: row.id,
        name: row.name,
        status: row.status,
        created_at: row.created_at,
    })
}

/// GET /api/admin/analytics
pub async fn analytics(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AnalyticsResponse>>, ApiError> {
    let repo = AdminRepository::new(state.pool.clone());

    let items_by_status = repo.items_by_report_type().await?;
    let claims_by_status = repo.claims_by_status().await?;
    let monthly_trend = repo.monthly_report_trend().await?;
    let success_rate = repo.success_rate().await?;

    let response = AnalyticsResponse {
        items_by_status: items_by_status
            .into_iter()
            .map(|row| ReportTypeCount {
                status: row.status.into(),
                count: row.count,
            })
            .collect(),
        claims_by_status: claims_by_status
            .into_iter()
            .map(|row| ClaimStatusCount {
                status: row.status.into(),
                count: row.count,
            })
            .collect(),
        monthly_trend: monthly_trend
            .into_iter()
            .map(|row| MonthlyCount {
                month: row.month,
                count: row.count,
            })
            .collect(),
        success_rate,
    };

    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListResponse<AdminUserResponse>>, ApiError> {
    let page = page.clamped(state.config.security.max_page_size);
    let repo = UserRepository::new(state.pool.clone());

    let role = filter.role.map(UserRoleDb::from);
    let status = filter.status.map(UserStatusDb::from);

    let entities = repo
        .list_with_counts(role, status, page.limit, page.offset())
        .await?;
    let total = repo.count(role, status).await?;

    let users: Vec<AdminUserResponse> =
        entities.into_iter().map(AdminUserResponse::from).collect();
    let meta = PageMeta::new(users.len(), total, &page);
    Ok(Json(ListResponse::new(users, meta)))
}

/// PUT /api/admin/users/:id/status
pub async fn update_user_status(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserStatusRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    if id == admin.id {
        return Err(ApiError::Validation(
            "You cannot change your own status".to_string(),
        ));
    }

    let repo = UserRepository::new(state.pool.clone());
    let status = UserStatus::from(req.status);
    let entity = repo
        .update_status(id, UserStatusDb::from(status))
        .await?
        .ok_or_else(user_not_found)?;

    tracing::info!(user_id = %id, status = %status, admin_id = %admin.id, "user status changed");

    Ok(Json(ApiResponse::with_message(
        UserProfile::from(entity),
        "User status updated",
    )))
}

/// DELETE /api/admin/users/:id
///
/// Hard delete; the user's items and claims cascade at the schema level.
pub async fn delete_user(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    if id == admin.id {
        return Err(ApiError::Validation(
            "You cannot delete your own account".to_string(),
        ));
    }

    let repo = UserRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    if deleted == 0 {
        return Err(user_not_found());
    }

    tracing::info!(user_id = %id, admin_id = %admin.id, "user deleted");

    Ok(Json(ApiResponse::with_message(
        serde_json::Value::Null,
        "User deleted",
    )))
}

/// GET /api/admin/export/items
pub async fn export_items(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ItemSnapshot>>>, ApiError> {
    let repo = ItemRepository::new(state.pool.clone());
    let entities = repo.export_all().await?;

    let snapshots: Vec<ItemSnapshot> = entities.into_iter().map(ItemSnapshot::from).collect();
    Ok(Json(ApiResponse::new(snapshots)))
}

/// POST /api/admin/import/items
pub async fn import_items(
    State(state): State<AppState>,
    admin: CurrentUser,
    Json(req): Json<ImportItemsRequest>,
) -> Result<Json<ApiResponse<ImportItemsResponse>>, ApiError> {
    let repo = ItemRepository::new(state.pool.clone());

    let imported = match req.mode {
        ImportMode::Replace => repo.import_replace(&req.items).await?,
    };

    tracing::info!(imported, admin_id = %admin.id, "item snapshot imported");

    Ok(Json(ApiResponse::with_message(
        ImportItemsResponse { imported },
        "Import completed",
    )))
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}
