//! Ownership claim domain models.

use crate::models::item::ItemSummary;
use crate::models::user::UserSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a claim.
///
/// Transitions: pending -> approved, pending -> rejected, and
/// approved -> rejected (revert). Rejected is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Approved => "approved",
            ClaimStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ClaimStatus::Pending),
            "approved" => Ok(ClaimStatus::Approved),
            "rejected" => Ok(ClaimStatus::Rejected),
            _ => Err(format!("Invalid claim status: {}", s)),
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Admin decision on a claim. Setting a claim back to pending is not
/// supported, so this is narrower than [`ClaimStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimDecision {
    Approved,
    Rejected,
}

impl From<ClaimDecision> for ClaimStatus {
    fn from(decision: ClaimDecision) -> Self {
        match decision {
            ClaimDecision::Approved => ClaimStatus::Approved,
            ClaimDecision::Rejected => ClaimStatus::Rejected,
        }
    }
}

/// Request to submit an ownership claim.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClaimRequest {
    pub item_id: Uuid,
    #[validate(custom(function = "shared::validation::validate_verification_message"))]
    pub verification_message: String,
}

/// Admin request to approve or reject a claim.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClaimStatusRequest {
    pub status: ClaimDecision,
    #[serde(default)]
    pub admin_notes: Option<String>,
}

/// Full claim view with claimant, item, and reporter info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: Uuid,
    pub status: ClaimStatus,
    pub verification_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    pub claimant: UserSummary,
    pub item: ItemSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters for listing claims.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimFilterQuery {
    #[serde(default)]
    pub status: Option<ClaimStatus>,
    #[serde(default)]
    pub item_id: Option<Uuid>,
}

/// Per-status claim counters for the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimStatsResponse {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_status_roundtrip() {
        for status in [
            ClaimStatus::Pending,
            ClaimStatus::Approved,
            ClaimStatus::Rejected,
        ] {
            assert_eq!(ClaimStatus::from_str(status.as_str()).unwrap(), status);
        }
        assert!(ClaimStatus::from_str("withdrawn").is_err());
    }

    #[test]
    fn test_claim_decision_into_status() {
        assert_eq!(
            ClaimStatus::from(ClaimDecision::Approved),
            ClaimStatus::Approved
        );
        assert_eq!(
            ClaimStatus::from(ClaimDecision::Rejected),
            ClaimStatus::Rejected
        );
    }

    #[test]
    fn test_update_claim_status_rejects_pending() {
        let result =
            serde_json::from_str::<UpdateClaimStatusRequest>(r#"{"status":"pending"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_claim_status_deserialize() {
        let req: UpdateClaimStatusRequest =
            serde_json::from_str(r#"{"status":"approved","adminNotes":"ID verified"}"#).unwrap();
        assert_eq!(req.status, ClaimDecision::Approved);
        assert_eq!(req.admin_notes.as_deref(), Some("ID verified"));
    }

    #[test]
    fn test_create_claim_request_validates_message() {
        let req = CreateClaimRequest {
            item_id: Uuid::new_v4(),
            verification_message: "short".to_string(),
        };
        assert!(req.validate().is_err());

        let req = CreateClaimRequest {
            item_id: Uuid::new_v4(),
            verification_message: "It has my initials engraved on the back".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_claim_filter_query_defaults() {
        let query: ClaimFilterQuery = serde_json::from_str("{}").unwrap();
        assert!(query.status.is_none());
        assert!(query.item_id.is_none());
    }
}
