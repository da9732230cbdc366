//! Claim repository: transactional claim lifecycle plus queries.
//!
//! All lifecycle transitions run inside a transaction that locks the claim
//! and item rows with FOR UPDATE, so concurrent approvals of competing
//! claims serialize: the first commit wins and the loser observes the item
//! as already claimed.

use domain::models::ClaimFilterQuery;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{
    ClaimEntity, ClaimStatsEntity, ClaimStatusDb, ClaimWithDetailsEntity, ItemClaimStatusDb,
};
use crate::metrics::QueryTimer;

/// Auto note written on sibling pending claims when one claim is approved.
pub const SIBLING_REJECTED_NOTE: &str = "Another claim was approved for this item";

const CLAIM_COLUMNS: &str =
    "id, item_id, claimant_id, verification_message, status, admin_notes, created_at, updated_at";

const CLAIM_DETAILS_SELECT: &str = r#"
    SELECT c.id, c.status, c.verification_message, c.admin_notes,
           c.claimant_id, cu.name AS claimant_name, cu.email AS claimant_email,
           c.item_id, i.name AS item_name, i.category AS item_category,
           i.status AS item_status, i.location AS item_location,
           i.claim_status AS item_claim_status,
           i.user_id AS reporter_id, ru.name AS reporter_name, ru.email AS reporter_email,
           c.created_at, c.updated_at
    FROM claims c
    JOIN users cu ON c.claimant_id = cu.id
    JOIN items i ON c.item_id = i.id
    JOIN users ru ON i.user_id = ru.id
"#;

/// Errors from claim lifecycle transitions.
#[derive(Debug, Error)]
pub enum ClaimLifecycleError {
    #[error("Item not found")]
    ItemNotFound,

    #[error("Claim not found")]
    ClaimNotFound,

    #[error("You cannot claim your own item")]
    OwnItem,

    #[error("This item has already been claimed")]
    ItemAlreadyClaimed,

    #[error("You already have an active claim on this item")]
    DuplicateClaim,

    #[error("Only pending claims can be approved")]
    NotPending,

    #[error("Claim is already rejected")]
    AlreadyRejected,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Item fields the lifecycle needs, fetched under a row lock.
#[derive(Debug, sqlx::FromRow)]
struct LockedItem {
    user_id: Uuid,
    claim_status: ItemClaimStatusDb,
}

/// Repository for claim-related database operations.
#[derive(Clone)]
pub struct ClaimRepository {
    pool: PgPool,
}

impl ClaimRepository {
    /// Creates a new ClaimRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn lock_item(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
    ) -> Result<Option<LockedItem>, sqlx::Error> {
        sqlx::query_as::<_, LockedItem>(
            "SELECT user_id, claim_status FROM items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await
    }

    async fn lock_claim(
        tx: &mut Transaction<'_, Postgres>,
        claim_id: Uuid,
    ) -> Result<Option<ClaimEntity>, sqlx::Error> {
        sqlx::query_as::<_, ClaimEntity>(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1 FOR UPDATE",
        ))
        .bind(claim_id)
        .fetch_optional(&mut **tx)
        .await
    }

    /// Submit a new claim on an item.
    ///
    /// The item row is locked first so the claimed check cannot race an
    /// approval. The partial unique index on (item_id, claimant_id) catches
    /// duplicate active claims racing each other.
    pub async fn submit(
        &self,
        item_id: Uuid,
        claimant_id: Uuid,
        verification_message: &str,
    ) -> Result<ClaimEntity, ClaimLifecycleError> {
        let timer = QueryTimer::new("submit_claim");
        let result = self
            .submit_inner(item_id, claimant_id, verification_message)
            .await;
        timer.record();
        result
    }

    async fn submit_inner(
        &self,
        item_id: Uuid,
        claimant_id: Uuid,
        verification_message: &str,
    ) -> Result<ClaimEntity, ClaimLifecycleError> {
        let mut tx = self.pool.begin().await?;

        let item = Self::lock_item(&mut tx, item_id)
            .await?
            .ok_or(ClaimLifecycleError::ItemNotFound)?;

        if item.user_id == claimant_id {
            return Err(ClaimLifecycleError::OwnItem);
        }
        if item.claim_status == ItemClaimStatusDb::Claimed {
            return Err(ClaimLifecycleError::ItemAlreadyClaimed);
        }

        let claim = sqlx::query_as::<_, ClaimEntity>(&format!(
            r#"
            INSERT INTO claims (item_id, claimant_id, verification_message)
            VALUES ($1, $2, $3)
            RETURNING {CLAIM_COLUMNS}
            "#,
        ))
        .bind(item_id)
        .bind(claimant_id)
        .bind(verification_message)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                ClaimLifecycleError::DuplicateClaim
            }
            _ => ClaimLifecycleError::Database(e),
        })?;

        tx.commit().await?;
        Ok(claim)
    }

    /// Approve a pending claim.
    ///
    /// Atomically: the claim becomes approved, the item becomes claimed, and
    /// every other pending claim on the item is rejected with an auto note.
    pub async fn approve(
        &self,
        claim_id: Uuid,
        admin_notes: Option<&str>,
    ) -> Result<ClaimEntity, ClaimLifecycleError> {
        let timer = QueryTimer::new("approve_claim");
        let result = self.approve_inner(claim_id, admin_notes).await;
        timer.record();
        result
    }

    async fn approve_inner(
        &self,
        claim_id: Uuid,
        admin_notes: Option<&str>,
    ) -> Result<ClaimEntity, ClaimLifecycleError> {
        let mut tx = self.pool.begin().await?;

        let claim = Self::lock_claim(&mut tx, claim_id)
            .await?
            .ok_or(ClaimLifecycleError::ClaimNotFound)?;

        if claim.status != ClaimStatusDb::Pending {
            return Err(ClaimLifecycleError::NotPending);
        }

        let item = Self::lock_item(&mut tx, claim.item_id)
            .await?
            .ok_or(ClaimLifecycleError::ItemNotFound)?;

        if item.claim_status == ItemClaimStatusDb::Claimed {
            return Err(ClaimLifecycleError::ItemAlreadyClaimed);
        }

        let approved = sqlx::query_as::<_, ClaimEntity>(&format!(
            r#"
            UPDATE claims
            SET status = 'approved', admin_notes = $2
            WHERE id = $1
            RETURNING {CLAIM_COLUMNS}
            "#,
        ))
        .bind(claim_id)
        .bind(admin_notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE items SET claim_status = 'claimed' WHERE id = $1")
            .bind(claim.item_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE claims
            SET status = 'rejected', admin_notes = $3
            WHERE item_id = $1 AND id != $2 AND status = 'pending'
            "#,
        )
        .bind(claim.item_id)
        .bind(claim_id)
        .bind(SIBLING_REJECTED_NOTE)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(approved)
    }

    /// Reject a claim.
    ///
    /// Rejecting an approved claim reverts the item to unclaimed when no
    /// other approved claim remains on it.
    pub async fn reject(
        &self,
        claim_id: Uuid,
        admin_notes: Option<&str>,
    ) -> Result<ClaimEntity, ClaimLifecycleError> {
        let timer = QueryTimer::new("reject_claim");
        let result = self.reject_inner(claim_id, admin_notes).await;
        timer.record();
        result
    }

    async fn reject_inner(
        &self,
        claim_id: Uuid,
        admin_notes: Option<&str>,
    ) -> Result<ClaimEntity, ClaimLifecycleError> {
        let mut tx = self.pool.begin().await?;

        let claim = Self::lock_claim(&mut tx, claim_id)
            .await?
            .ok_or(ClaimLifecycleError::ClaimNotFound)?;

        if claim.status == ClaimStatusDb::Rejected {
            return Err(ClaimLifecycleError::AlreadyRejected);
        }

        let was_approved = claim.status == ClaimStatusDb::Approved;

        Self::lock_item(&mut tx, claim.item_id)
            .await?
            .ok_or(ClaimLifecycleError::ItemNotFound)?;

        let rejected = sqlx::query_as::<_, ClaimEntity>(&format!(
            r#"
            UPDATE claims
            SET status = 'rejected', admin_notes = $2
            WHERE id = $1
            RETURNING {CLAIM_COLUMNS}
            "#,
        ))
        .bind(claim_id)
        .bind(admin_notes)
        .fetch_one(&mut *tx)
        .await?;

        if was_approved {
            Self::unclaim_item_if_no_approved(&mut tx, claim.item_id).await?;
        }

        tx.commit().await?;
        Ok(rejected)
    }

    /// Delete a claim. Permission checks belong to the caller; this only
    /// keeps the item's claim status consistent when an approved claim goes
    /// away.
    pub async fn delete(&self, claim_id: Uuid) -> Result<(), ClaimLifecycleError> {
        let timer = QueryTimer::new("delete_claim");
        let result = self.delete_inner(claim_id).await;
        timer.record();
        result
    }

    async fn delete_inner(&self, claim_id: Uuid) -> Result<(), ClaimLifecycleError> {
        let mut tx = self.pool.begin().await?;

        let claim = Self::lock_claim(&mut tx, claim_id)
            .await?
            .ok_or(ClaimLifecycleError::ClaimNotFound)?;

        let was_approved = claim.status == ClaimStatusDb::Approved;

        Self::lock_item(&mut tx, claim.item_id)
            .await?
            .ok_or(ClaimLifecycleError::ItemNotFound)?;

        sqlx::query("DELETE FROM claims WHERE id = $1")
            .bind(claim_id)
            .execute(&mut *tx)
            .await?;

        if was_approved {
            Self::unclaim_item_if_no_approved(&mut tx, claim.item_id).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn unclaim_item_if_no_approved(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE items
            SET claim_status = 'unclaimed'
            WHERE id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM claims WHERE item_id = $1 AND status = 'approved'
              )
            "#,
        )
        .bind(item_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Find a claim by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ClaimEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_claim_by_id");
        let result = sqlx::query_as::<_, ClaimEntity>(&format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a claim by ID with claimant, item, and reporter details.
    pub async fn find_with_details(
        &self,
        id: Uuid,
    ) -> Result<Option<ClaimWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_claim_with_details");
        let result = sqlx::query_as::<_, ClaimWithDetailsEntity>(&format!(
            "{CLAIM_DETAILS_SELECT} WHERE c.id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    fn push_filters(
        query: &mut QueryBuilder<'_, Postgres>,
        filter: &ClaimFilterQuery,
        visible_to: Option<Uuid>,
    ) {
        if let Some(status) = filter.status {
            query
                .push(" AND c.status = ")
                .push_bind(ClaimStatusDb::from(status));
        }
        if let Some(item_id) = filter.item_id {
            query.push(" AND c.item_id = ").push_bind(item_id);
        }
        // Non-admins see only claims where they are the claimant or the
        // reporter of the claimed item.
        if let Some(user_id) = visible_to {
            query
                .push(" AND (c.claimant_id = ")
                .push_bind(user_id)
                .push(" OR i.user_id = ")
                .push_bind(user_id)
                .push(")");
        }
    }

    /// List claims matching the filters, newest first. Pass `visible_to` for
    /// non-admin callers to row-filter to their own claims and items.
    pub async fn list(
        &self,
        filter: &ClaimFilterQuery,
        visible_to: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ClaimWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_claims");
        let mut query = QueryBuilder::new(format!("{CLAIM_DETAILS_SELECT} WHERE 1=1"));
        Self::push_filters(&mut query, filter, visible_to);
        query.push(" ORDER BY c.created_at DESC LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let result = query
            .build_query_as::<ClaimWithDetailsEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Count claims matching the filters.
    pub async fn count(
        &self,
        filter: &ClaimFilterQuery,
        visible_to: Option<Uuid>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_claims");
        let mut query = QueryBuilder::new(
            "SELECT COUNT(*) FROM claims c JOIN items i ON c.item_id = i.id WHERE 1=1",
        );
        Self::push_filters(&mut query, filter, visible_to);
        let result = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List all claims on one item, newest first.
    pub async fn list_for_item(
        &self,
        item_id: Uuid,
    ) -> Result<Vec<ClaimWithDetailsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_claims_for_item");
        let result = sqlx::query_as::<_, ClaimWithDetailsEntity>(&format!(
            "{CLAIM_DETAILS_SELECT} WHERE c.item_id = $1 ORDER BY c.created_at DESC",
        ))
        .bind(item_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Per-status claim counters for one claimant.
    pub async fn stats_for_user(&self, user_id: Uuid) -> Result<ClaimStatsEntity, sqlx::Error> {
        let timer = QueryTimer::new("claim_stats_for_user");
        let result = sqlx::query_as::<_, ClaimStatsEntity>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                   COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                   COUNT(*) FILTER (WHERE status = 'rejected') AS rejected
            FROM claims
            WHERE claimant_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}
