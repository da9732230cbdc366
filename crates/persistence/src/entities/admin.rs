//! Aggregate row mappings for admin dashboard and analytics queries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::entities::claim::ClaimStatusDb;
use crate::entities::item::{ItemCategoryDb, ReportTypeDb};

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DashboardCountsEntity {
    pub total_reports: i64,
    pub pending_claims: i64,
    pub resolved_items: i64,
    pub active_users: i64,
}

/// Item count for one category.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CategoryCountEntity {
    pub category: ItemCategoryDb,
    pub count: i64,
}

/// Item count for one report type.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReportTypeCountEntity {
    pub status: ReportTypeDb,
    pub count: i64,
}

/// Claim count for one status.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ClaimStatusCountEntity {
    pub status: ClaimStatusDb,
    pub count: i64,
}

/// Report count for one calendar month (`YYYY-MM`).
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyCountEntity {
    pub month: String,
    pub count: i64,
}

/// One row of the recent activity feed. `kind` is 'item' or 'claim'.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityEntity {
    pub kind: String,
    pub id: Uuid,
    pub name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
