//! Admin domain models: user moderation, dashboard, analytics, export.

use crate::models::claim::ClaimStatus;
use crate::models::item::{ItemCategory, ItemClaimStatus, ReportType};
use crate::models::user::{UserRole, UserStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin request to change a user's moderation status.
///
/// Only active and suspended are accepted here; deletion goes through the
/// delete endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserStatusRequest {
    pub status: ModerationStatus,
}

/// Statuses an admin can set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Active,
    Suspended,
}

impl From<ModerationStatus> for UserStatus {
    fn from(status: ModerationStatus) -> Self {
        match status {
            ModerationStatus::Active => UserStatus::Active,
            ModerationStatus::Suspended => UserStatus::Suspended,
        }
    }
}

/// Query parameters for the admin user listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilterQuery {
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

/// User row in the admin listing, with activity counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub reports_count: i64,
    pub claims_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Count of items in one category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: ItemCategory,
    pub count: i64,
}

/// What kind of record a recent-activity entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Item,
    Claim,
}

/// One entry in the dashboard's recent activity feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub kind: ActivityKind,
    pub id: Uuid,
    /// Item name for items, claimed item name for claims.
    pub name: String,
    /// Report type for items, claim status for claims.
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Dashboard headline numbers plus breakdowns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatsResponse {
    pub total_reports: i64,
    pub pending_claims: i64,
    pub resolved_items: i64,
    pub active_users: i64,
    pub items_by_category: Vec<CategoryCount>,
    pub recent_activity: Vec<ActivityEvent>,
}

/// Count of items by report type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTypeCount {
    pub status: ReportType,
    pub count: i64,
}

/// Count of claims by status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatusCount {
    pub status: ClaimStatus,
    pub count: i64,
}

/// Reports submitted in one calendar month.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// Month in `YYYY-MM` form.
    pub month: String,
    pub count: i64,
}

/// Analytics payload for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub items_by_status: Vec<ReportTypeCount>,
    pub claims_by_status: Vec<ClaimStatusCount>,
    /// Reports per month over the last six months, oldest first.
    pub monthly_trend: Vec<MonthlyCount>,
    /// Percentage of items that ended up claimed, 0..=100.
    pub success_rate: f64,
}

/// Complete item record for export and import, including ids and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub status: ReportType,
    pub location: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub claim_status: ItemClaimStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How an import applies the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Delete all existing items (cascading their claims) and insert the
    /// snapshot verbatim.
    Replace,
}

/// Admin request to import an item snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItemsRequest {
    pub mode: ImportMode,
    pub items: Vec<ItemSnapshot>,
}

/// Result of an import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportItemsResponse {
    pub imported: usize,
}
