//! Admin repository: dashboard and analytics aggregate queries.

use sqlx::PgPool;

use crate::entities::{
    ActivityEntity, CategoryCountEntity, ClaimStatusCountEntity, DashboardCountsEntity,
    MonthlyCountEntity, ReportTypeCountEntity,
};
use crate::metrics::QueryTimer;

/// How many recent item/claim events the dashboard shows.
const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Repository for admin aggregate queries.
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    /// Creates a new AdminRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Headline counters: total reports, pending claims, claimed items,
    /// active users.
    pub async fn dashboard_counts(&self) -> Result<DashboardCountsEntity, sqlx::Error> {
        let timer = QueryTimer::new("dashboard_counts");
        let result = sqlx::query_as::<_, DashboardCountsEntity>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM items) AS total_reports,
                (SELECT COUNT(*) FROM claims WHERE status = 'pending') AS pending_claims,
                (SELECT COUNT(*) FROM items WHERE claim_status = 'claimed') AS resolved_items,
                (SELECT COUNT(*) FROM users WHERE status = 'active') AS active_users
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Item counts grouped by category, largest first.
    pub async fn items_by_category(&self) -> Result<Vec<CategoryCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("items_by_category");
        let result = sqlx::query_as::<_, CategoryCountEntity>(
            r#"
            SELECT category, COUNT(*) AS count
            FROM items
            GROUP BY category
            ORDER BY count DESC, category
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// The latest item and claim events, merged and newest first.
    pub async fn recent_activity(&self) -> Result<Vec<ActivityEntity>, sqlx::Error> {
        let timer = QueryTimer::new("recent_activity");
        let result = sqlx::query_as::<_, ActivityEntity>(
            r#"
            SELECT kind, id, name, status, created_at FROM (
                SELECT 'item' AS kind, i.id, i.name, i.status::text AS status, i.created_at
                FROM items i
                UNION ALL
                SELECT 'claim' AS kind, c.id, i.name, c.status::text AS status, c.created_at
                FROM claims c
                JOIN items i ON c.item_id = i.id
            ) events
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(RECENT_ACTIVITY_LIMIT)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Item counts grouped by report type.
    pub async fn items_by_report_type(&self) -> Result<Vec<ReportTypeCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("items_by_report_type");
        let result = sqlx::query_as::<_, ReportTypeCountEntity>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM items
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Claim counts grouped by status.
    pub async fn claims_by_status(&self) -> Result<Vec<ClaimStatusCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("claims_by_status");
        let result = sqlx::query_as::<_, ClaimStatusCountEntity>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM claims
            GROUP BY status
            ORDER BY status
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Reports per calendar month over the last six months, oldest first.
    /// Months with no reports are absent from the result.
    pub async fn monthly_report_trend(&self) -> Result<Vec<MonthlyCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("monthly_report_trend");
        let result = sqlx::query_as::<_, MonthlyCountEntity>(
            r#"
            SELECT to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
                   COUNT(*) AS count
            FROM items
            WHERE created_at >= date_trunc('month', now()) - INTERVAL '5 months'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Percentage of items that ended up claimed, 0 when there are no items.
    pub async fn success_rate(&self) -> Result<f64, sqlx::Error> {
        let timer = QueryTimer::new("success_rate");
        let result = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT CASE
                WHEN COUNT(*) = 0 THEN 0.0
                ELSE COUNT(*) FILTER (WHERE claim_status = 'claimed')::float8 * 100.0
                     / COUNT(*)::float8
            END
            FROM items
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
