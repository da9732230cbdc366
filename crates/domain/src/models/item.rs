//! Lost/found item domain models.

use crate::models::user::UserSummary;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Category of a reported item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Electronics,
    Clothing,
    Accessories,
    Bags,
    Keys,
    Books,
    Other,
}

impl ItemCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Electronics => "electronics",
            ItemCategory::Clothing => "clothing",
            ItemCategory::Accessories => "accessories",
            ItemCategory::Bags => "bags",
            ItemCategory::Keys => "keys",
            ItemCategory::Books => "books",
            ItemCategory::Other => "other",
        }
    }

    pub const ALL: [ItemCategory; 7] = [
        ItemCategory::Electronics,
        ItemCategory::Clothing,
        ItemCategory::Accessories,
        ItemCategory::Bags,
        ItemCategory::Keys,
        ItemCategory::Books,
        ItemCategory::Other,
    ];
}

impl FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "electronics" => Ok(ItemCategory::Electronics),
            "clothing" => Ok(ItemCategory::Clothing),
            "accessories" => Ok(ItemCategory::Accessories),
            "bags" => Ok(ItemCategory::Bags),
            "keys" => Ok(ItemCategory::Keys),
            "books" => Ok(ItemCategory::Books),
            "other" => Ok(ItemCategory::Other),
            _ => Err(format!("Invalid item category: {}", s)),
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the reporter lost the item or found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Lost,
    Found,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Lost => "lost",
            ReportType::Found => "found",
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lost" => Ok(ReportType::Lost),
            "found" => Ok(ReportType::Found),
            _ => Err(format!("Invalid report type: {}", s)),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an item has an approved claim on it.
///
/// This field changes only through the claim lifecycle, never through
/// item updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemClaimStatus {
    Unclaimed,
    Claimed,
}

impl ItemClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemClaimStatus::Unclaimed => "unclaimed",
            ItemClaimStatus::Claimed => "claimed",
        }
    }
}

impl FromStr for ItemClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unclaimed" => Ok(ItemClaimStatus::Unclaimed),
            "claimed" => Ok(ItemClaimStatus::Claimed),
            _ => Err(format!("Invalid claim status: {}", s)),
        }
    }
}

impl fmt::Display for ItemClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Full item view with reporter info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub status: ReportType,
    pub location: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub claim_status: ItemClaimStatus,
    pub reporter: UserSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Brief item info embedded in claim responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub id: Uuid,
    pub name: String,
    pub category: ItemCategory,
    pub status: ReportType,
    pub location: String,
    pub claim_status: ItemClaimStatus,
    pub reporter: UserSummary,
}

fn validate_item_name(name: &str) -> Result<(), ValidationError> {
    if shared::validation::trimmed_min_length(name, 3) {
        Ok(())
    } else {
        let mut err = ValidationError::new("item_name_length");
        err.message = Some("Item name must be at least 3 characters long".into());
        Err(err)
    }
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if shared::validation::trimmed_min_length(description, 10) {
        Ok(())
    } else {
        let mut err = ValidationError::new("description_length");
        err.message = Some("Description must be at least 10 characters long".into());
        Err(err)
    }
}

fn validate_location(location: &str) -> Result<(), ValidationError> {
    if shared::validation::trimmed_min_length(location, 3) {
        Ok(())
    } else {
        let mut err = ValidationError::new("location_length");
        err.message = Some("Location must be at least 3 characters long".into());
        Err(err)
    }
}

/// Request to report a lost or found item.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    #[validate(custom(function = "crate::models::item::validate_item_name"))]
    pub name: String,
    #[validate(custom(function = "crate::models::item::validate_description"))]
    pub description: String,
    pub category: ItemCategory,
    pub status: ReportType,
    #[validate(custom(function = "crate::models::item::validate_location"))]
    pub location: String,
    #[validate(custom(function = "shared::validation::validate_date_not_future"))]
    pub date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Request to partially update an item. Absent fields keep their value;
/// the claim status cannot be changed here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    #[validate(custom(function = "crate::models::item::validate_item_name"))]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(custom(function = "crate::models::item::validate_description"))]
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<ItemCategory>,
    #[serde(default)]
    pub status: Option<ReportType>,
    #[validate(custom(function = "crate::models::item::validate_location"))]
    #[serde(default)]
    pub location: Option<String>,
    #[validate(custom(function = "shared::validation::validate_date_not_future"))]
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UpdateItemRequest {
    /// True when no field is set, in which case the update is a no-op the
    /// handler rejects.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.location.is_none()
            && self.date.is_none()
            && self.image_url.is_none()
    }
}

/// Query parameters for the item listing. All filters are optional and
/// conjunctive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFilterQuery {
    #[serde(default)]
    pub category: Option<ItemCategory>,
    #[serde(default)]
    pub status: Option<ReportType>,
    #[serde(default)]
    pub claim_status: Option<ItemClaimStatus>,
    /// Case-insensitive substring match on location.
    #[serde(default)]
    pub location: Option<String>,
    /// Case-insensitive substring match on name or description.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}
