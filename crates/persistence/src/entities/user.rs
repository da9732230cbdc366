//! User entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AdminUserResponse, UserProfile, UserRole, UserStatus, UserSummary};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum UserRoleDb {
    Student,
    Admin,
    Staff,
}

impl From<UserRole> for UserRoleDb {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Student => UserRoleDb::Student,
            UserRole::Admin => UserRoleDb::Admin,
            UserRole::Staff => UserRoleDb::Staff,
        }
    }
}

impl From<UserRoleDb> for UserRole {
    fn from(role: UserRoleDb) -> Self {
        match role {
            UserRoleDb::Student => UserRole::Student,
            UserRoleDb::Admin => UserRole::Admin,
            UserRoleDb::Staff => UserRole::Staff,
        }
    }
}

/// Database enum for user moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
pub enum UserStatusDb {
    Active,
    Suspended,
    Deleted,
}

impl From<UserStatus> for UserStatusDb {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Active => UserStatusDb::Active,
            UserStatus::Suspended => UserStatusDb::Suspended,
            UserStatus::Deleted => UserStatusDb::Deleted,
        }
    }
}

impl From<UserStatusDb> for UserStatus {
    fn from(status: UserStatusDb) -> Self {
        match status {
            UserStatusDb::Active => UserStatus::Active,
            UserStatusDb::Suspended => UserStatus::Suspended,
            UserStatusDb::Deleted => UserStatus::Deleted,
        }
    }
}

/// Database row mapping for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRoleDb,
    pub status: UserStatusDb,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    pub fn is_active(&self) -> bool {
        self.status == UserStatusDb::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRoleDb::Admin
    }
}

impl From<UserEntity> for UserProfile {
    fn from(entity: UserEntity) -> Self {
        UserProfile {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            role: entity.role.into(),
            status: entity.status.into(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<&UserEntity> for UserSummary {
    fn from(entity: &UserEntity) -> Self {
        UserSummary {
            id: entity.id,
            name: entity.name.clone(),
            email: entity.email.clone(),
        }
    }
}

/// User row with report and claim counters for the admin listing.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithCountsEntity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRoleDb,
    pub status: UserStatusDb,
    pub reports_count: i64,
    pub claims_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UserWithCountsEntity> for AdminUserResponse {
    fn from(entity: UserWithCountsEntity) -> Self {
        AdminUserResponse {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            role: entity.role.into(),
            status: entity.status.into(),
            reports_count: entity.reports_count,
            claims_count: entity.claims_count,
            created_at: entity.created_at,
        }
    }
}
