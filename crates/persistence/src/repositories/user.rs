//! User repository for database operations.

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::entities::{UserEntity, UserRoleDb, UserStatusDb, UserWithCountsEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, status, created_at, updated_at";

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new user account. The caller passes the email already
    /// lowercased and the password already hashed.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)",
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether an email is already taken, optionally excluding one user
    /// (for profile updates).
    pub async fn email_in_use(
        &self,
        email: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_email_in_use");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE lower(email) = lower($1) AND ($2::uuid IS NULL OR id != $2)
            )
            "#,
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update name and/or email; absent fields keep their value.
    pub async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user_profile");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(name)
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the stored password hash.
    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_user_password");
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Change a user's moderation status.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: UserStatusDb,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user_status");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "UPDATE users SET status = $2 WHERE id = $1 RETURNING {USER_COLUMNS}",
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a user. Items and claims cascade at the schema level.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_user");
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Report and claim counters for one user.
    pub async fn activity_counts(&self, id: Uuid) -> Result<(i64, i64), sqlx::Error> {
        let timer = QueryTimer::new("user_activity_counts");
        let result = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM items WHERE user_id = $1),
                (SELECT COUNT(*) FROM claims WHERE claimant_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List users with report/claim counters, optionally filtered by role
    /// and status.
    pub async fn list_with_counts(
        &self,
        role: Option<UserRoleDb>,
        status: Option<UserStatusDb>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserWithCountsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_users_with_counts");
        let mut query = QueryBuilder::new(
            r#"
            SELECT u.id, u.name, u.email, u.role, u.status,
                   (SELECT COUNT(*) FROM items i WHERE i.user_id = u.id) AS reports_count,
                   (SELECT COUNT(*) FROM claims c WHERE c.claimant_id = u.id) AS claims_count,
                   u.created_at
            FROM users u
            WHERE 1=1
            "#,
        );
        if let Some(role) = role {
            query.push(" AND u.role = ").push_bind(role);
        }
        if let Some(status) = status {
            query.push(" AND u.status = ").push_bind(status);
        }
        query.push(" ORDER BY u.created_at DESC LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let result = query
            .build_query_as::<UserWithCountsEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Count users matching the role/status filters.
    pub async fn count(
        &self,
        role: Option<UserRoleDb>,
        status: Option<UserStatusDb>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users");
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM users u WHERE 1=1");
        if let Some(role) = role {
            query.push(" AND u.role = ").push_bind(role);
        }
        if let Some(status) = status {
            query.push(" AND u.status = ").push_bind(status);
        }
        let result = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
