//! Item entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{
    ItemCategory, ItemClaimStatus, ItemResponse, ItemSnapshot, ItemSummary, ReportType,
    UserSummary,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "item_category", rename_all = "lowercase")]
pub enum ItemCategoryDb {
    Electronics,
    Clothing,
    Accessories,
    Bags,
    Keys,
    Books,
    Other,
}

impl From<ItemCategory> for ItemCategoryDb {
    fn from(category: ItemCategory) -> Self {
        match category {
            ItemCategory::Electronics => ItemCategoryDb::Electronics,
            ItemCategory::Clothing => ItemCategoryDb::Clothing,
            ItemCategory::Accessories => ItemCategoryDb::Accessories,
            ItemCategory::Bags => ItemCategoryDb::Bags,
            ItemCategory::Keys => ItemCategoryDb::Keys,
            ItemCategory::Books => ItemCategoryDb::Books,
            ItemCategory::Other => ItemCategoryDb::Other,
        }
    }
}

impl From<ItemCategoryDb> for ItemCategory {
    fn from(category: ItemCategoryDb) -> Self {
        match category {
            ItemCategoryDb::Electronics => ItemCategory::Electronics,
            ItemCategoryDb::Clothing => ItemCategory::Clothing,
            ItemCategoryDb::Accessories => ItemCategory::Accessories,
            ItemCategoryDb::Bags => ItemCategory::Bags,
            ItemCategoryDb::Keys => ItemCategory::Keys,
            ItemCategoryDb::Books => ItemCategory::Books,
            ItemCategoryDb::Other => ItemCategory::Other,
        }
    }
}

/// Database enum for report type (the items.status column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "report_type", rename_all = "lowercase")]
pub enum ReportTypeDb {
    Lost,
    Found,
}

impl From<ReportType> for ReportTypeDb {
    fn from(status: ReportType) -> Self {
        match status {
            ReportType::Lost => ReportTypeDb::Lost,
            ReportType::Found => ReportTypeDb::Found,
        }
    }
}

impl From<ReportTypeDb> for ReportType {
    fn from(status: ReportTypeDb) -> Self {
        match status {
            ReportTypeDb::Lost => ReportType::Lost,
            ReportTypeDb::Found => ReportType::Found,
        }
    }
}

/// Database enum for item claim status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "item_claim_status", rename_all = "lowercase")]
pub enum ItemClaimStatusDb {
    Unclaimed,
    Claimed,
}

impl From<ItemClaimStatus> for ItemClaimStatusDb {
    fn from(status: ItemClaimStatus) -> Self {
        match status {
            ItemClaimStatus::Unclaimed => ItemClaimStatusDb::Unclaimed,
            ItemClaimStatus::Claimed => ItemClaimStatusDb::Claimed,
        }
    }
}

impl From<ItemClaimStatusDb> for ItemClaimStatus {
    fn from(status: ItemClaimStatusDb) -> Self {
        match status {
            ItemClaimStatusDb::Unclaimed => ItemClaimStatus::Unclaimed,
            ItemClaimStatusDb::Claimed => ItemClaimStatus::Claimed,
        }
    }
}

/// Database row mapping for the items table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: ItemCategoryDb,
    pub status: ReportTypeDb,
    pub location: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub claim_status: ItemClaimStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemEntity> for ItemSnapshot {
    fn from(entity: ItemEntity) -> Self {
        ItemSnapshot {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            description: entity.description,
            category: entity.category.into(),
            status: entity.status.into(),
            location: entity.location,
            date: entity.date,
            image_url: entity.image_url,
            claim_status: entity.claim_status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Item row joined with reporter name and email for responses.
#[derive(Debug, Clone, FromRow)]
pub struct ItemWithReporterEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: ItemCategoryDb,
    pub status: ReportTypeDb,
    pub location: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
    pub claim_status: ItemClaimStatusDb,
    pub reporter_name: String,
    pub reporter_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ItemWithReporterEntity> for ItemResponse {
    fn from(entity: ItemWithReporterEntity) -> Self {
        ItemResponse {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            category: entity.category.into(),
            status: entity.status.into(),
            location: entity.location,
            date: entity.date,
            image_url: entity.image_url,
            claim_status: entity.claim_status.into(),
            reporter: UserSummary {
                id: entity.user_id,
                name: entity.reporter_name,
                email: entity.reporter_email,
            },
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<ItemWithReporterEntity> for ItemSummary {
    fn from(entity: ItemWithReporterEntity) -> Self {
        ItemSummary {
            id: entity.id,
            name: entity.name,
            category: entity.category.into(),
            status: entity.status.into(),
            location: entity.location,
            claim_status: entity.claim_status.into(),
            reporter: UserSummary {
                id: entity.user_id,
                name: entity.reporter_name,
                email: entity.reporter_email,
            },
        }
    }
}
