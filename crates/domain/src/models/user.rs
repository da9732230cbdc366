//! User account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Admin,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moderation status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
    Deleted,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Suspended => "suspended",
            UserStatus::Deleted => "deleted",
        }
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            "deleted" => Ok(UserStatus::Deleted),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Public view of a user account. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Brief user info embedded in item and claim responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if shared::validation::trimmed_min_length(name, 2) {
        Ok(())
    } else {
        let mut err = ValidationError::new("name_length");
        err.message = Some("Name must be at least 2 characters long".into());
        Err(err)
    }
}

/// Request to register a new account.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "crate::models::user::validate_name"))]
    pub name: String,
    #[validate(custom(function = "shared::validation::validate_email_format"))]
    pub email: String,
    #[validate(custom(function = "shared::validation::validate_password_strength"))]
    pub password: String,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom(function = "shared::validation::validate_email_format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response after register or login: the profile plus a bearer token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

/// Request to update the caller's own profile.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "crate::models::user::validate_name"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[validate(custom(function = "shared::validation::validate_email_format"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Request to change the caller's password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(custom(function = "shared::validation::validate_password_strength"))]
    pub new_password: String,
}

/// Report and claim counters for the caller's own profile page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub reports_count: i64,
    pub claims_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_roundtrip() {
        for role in [UserRole::Student, UserRole::Admin, UserRole::Staff] {
            assert_eq!(UserRole::from_str(role.as_str()).unwrap(), role);
        }
        assert!(UserRole::from_str("professor").is_err());
    }

    #[test]
    fn test_user_role_from_str_case_insensitive() {
        assert_eq!(UserRole::from_str("ADMIN").unwrap(), UserRole::Admin);
    }

    #[test]
    fn test_user_status_display() {
        assert_eq!(UserStatus::Active.to_string(), "active");
        assert_eq!(UserStatus::Suspended.to_string(), "suspended");
        assert_eq!(UserStatus::Deleted.to_string(), "deleted");
    }

    #[test]
    fn test_register_request_valid() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@campus.edu".to_string(),
            password: "Secret123".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_rejects_short_name() {
        let req = RegisterRequest {
            name: " a ".to_string(),
            email: "alice@campus.edu".to_string(),
            password: "Secret123".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_register_request_rejects_weak_password() {
        let req = RegisterRequest {
            name: "Alice".to_string(),
            email: "alice@campus.edu".to_string(),
            password: "password".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_request_requires_password() {
        let req = LoginRequest {
            email: "alice@campus.edu".to_string(),
            password: "".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_profile_request_allows_partial() {
        let req: UpdateProfileRequest = serde_json::from_str(r#"{"name":"Bob"}"#).unwrap();
        assert_eq!(req.name.as_deref(), Some("Bob"));
        assert!(req.email.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_change_password_request_validates_new_password() {
        let req = ChangePasswordRequest {
            current_password: "OldPass1".to_string(),
            new_password: "weak".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_user_profile_serializes_camel_case() {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@campus.edu".to_string(),
            role: UserRole::Student,
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["status"], "active");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("passwordHash").is_none());
    }
}
