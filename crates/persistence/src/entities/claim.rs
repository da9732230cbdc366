//! Claim entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{
    ClaimResponse, ClaimStatsResponse, ClaimStatus, ItemSummary, UserSummary,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::entities::item::{ItemCategoryDb, ItemClaimStatusDb, ReportTypeDb};

/// Database enum for claim status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "lowercase")]
pub enum ClaimStatusDb {
    Pending,
    Approved,
    Rejected,
}

impl From<ClaimStatus> for ClaimStatusDb {
    fn from(status: ClaimStatus) -> Self {
        match status {
            ClaimStatus::Pending => ClaimStatusDb::Pending,
            ClaimStatus::Approved => ClaimStatusDb::Approved,
            ClaimStatus::Rejected => ClaimStatusDb::Rejected,
        }
    }
}

impl From<ClaimStatusDb> for ClaimStatus {
    fn from(status: ClaimStatusDb) -> Self {
        match status {
            ClaimStatusDb::Pending => ClaimStatus::Pending,
            ClaimStatusDb::Approved => ClaimStatus::Approved,
            ClaimStatusDb::Rejected => ClaimStatus::Rejected,
        }
    }
}

/// Database row mapping for the claims table.
#[derive(Debug, Clone, FromRow)]
pub struct ClaimEntity {
    pub id: Uuid,
    pub item_id: Uuid,
    pub claimant_id: Uuid,
    pub verification_message: String,
    pub status: ClaimStatusDb,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claim row joined with claimant, item, and reporter details for responses.
#[derive(Debug, Clone, FromRow)]
pub struct ClaimWithDetailsEntity {
    pub id: Uuid,
    pub status: ClaimStatusDb,
    pub verification_message: String,
    pub admin_notes: Option<String>,
    pub claimant_id: Uuid,
    pub claimant_name: String,
    pub claimant_email: String,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_category: ItemCategoryDb,
    pub item_status: ReportTypeDb,
    pub item_location: String,
    pub item_claim_status: ItemClaimStatusDb,
    pub reporter_id: Uuid,
    pub reporter_name: String,
    pub reporter_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClaimWithDetailsEntity> for ClaimResponse {
    fn from(entity: ClaimWithDetailsEntity) -> Self {
        ClaimResponse {
            id: entity.id,
            status: entity.status.into(),
            verification_message: entity.verification_message,
            admin_notes: entity.admin_notes,
            claimant: UserSummary {
                id: entity.claimant_id,
                name: entity.claimant_name,
                email: entity.claimant_email,
            },
            item: ItemSummary {
                id: entity.item_id,
                name: entity.item_name,
                category: entity.item_category.into(),
                status: entity.item_status.into(),
                location: entity.item_location,
                claim_status: entity.item_claim_status.into(),
                reporter: UserSummary {
                    id: entity.reporter_id,
                    name: entity.reporter_name,
                    email: entity.reporter_email,
                },
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Per-status claim counters.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ClaimStatsEntity {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

impl From<ClaimStatsEntity> for ClaimStatsResponse {
    fn from(entity: ClaimStatsEntity) -> Self {
        ClaimStatsResponse {
            total: entity.total,
            pending: entity.pending,
            approved: entity.approved,
            rejected: entity.rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_status_db_conversion_roundtrip() {
        for status in [
            ClaimStatus::Pending,
            ClaimStatus::Approved,
            ClaimStatus::Rejected,
        ] {
            assert_eq!(ClaimStatus::from(ClaimStatusDb::from(status)), status);
        }
    }

    #[test]
    fn test_claim_stats_into_response() {
        let entity = ClaimStatsEntity {
            total: 5,
            pending: 2,
            approved: 1,
            rejected: 2,
        };
        let response = ClaimStatsResponse::from(entity);
        assert_eq!(response.total, 5);
        assert_eq!(response.pending, 2);
        assert_eq!(response.approved, 1);
        assert_eq!(response.rejected, 2);
    }
}
