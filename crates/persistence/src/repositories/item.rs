//! Item repository for database operations.

use domain::models::{ItemFilterQuery, ItemSnapshot};
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use crate::entities::{
    ItemCategoryDb, ItemClaimStatusDb, ItemEntity, ItemWithReporterEntity, ReportTypeDb,
};
use crate::metrics::QueryTimer;

const ITEM_COLUMNS: &str = "id, user_id, name, description, category, status, location, \
                            date, image_url, claim_status, created_at, updated_at";

const ITEM_WITH_REPORTER_COLUMNS: &str =
    "i.id, i.user_id, i.name, i.description, i.category, i.status, i.location, \
     i.date, i.image_url, i.claim_status, \
     u.name AS reporter_name, u.email AS reporter_email, \
     i.created_at, i.updated_at";

/// Parameters for a partial item update. `None` fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub category: Option<ItemCategoryDb>,
    pub status: Option<ReportTypeDb>,
    pub location: Option<&'a str>,
    pub date: Option<chrono::NaiveDate>,
    pub image_url: Option<&'a str>,
}

/// Repository for item-related database operations.
#[derive(Clone)]
pub struct ItemRepository {
    pool: PgPool,
}

impl ItemRepository {
    /// Creates a new ItemRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create a new item report.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        description: &str,
        category: ItemCategoryDb,
        status: ReportTypeDb,
        location: &str,
        date: chrono::NaiveDate,
        image_url: Option<&str>,
    ) -> Result<ItemEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_item");
        let result = sqlx::query_as::<_, ItemEntity>(&format!(
            r#"
            INSERT INTO items (user_id, name, description, category, status, location, date, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(status)
        .bind(location)
        .bind(date)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an item by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_item_by_id");
        let result = sqlx::query_as::<_, ItemEntity>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = $1",
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an item by ID with reporter name and email joined in.
    pub async fn find_with_reporter(
        &self,
        id: Uuid,
    ) -> Result<Option<ItemWithReporterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_item_with_reporter");
        let result = sqlx::query_as::<_, ItemWithReporterEntity>(&format!(
            r#"
            SELECT {ITEM_WITH_REPORTER_COLUMNS}
            FROM items i
            JOIN users u ON i.user_id = u.id
            WHERE i.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    fn push_filters(query: &mut QueryBuilder<'_, sqlx::Postgres>, filter: &ItemFilterQuery) {
        if let Some(category) = filter.category {
            query
                .push(" AND i.category = ")
                .push_bind(ItemCategoryDb::from(category));
        }
        if let Some(status) = filter.status {
            query
                .push(" AND i.status = ")
                .push_bind(ReportTypeDb::from(status));
        }
        if let Some(claim_status) = filter.claim_status {
            query
                .push(" AND i.claim_status = ")
                .push_bind(ItemClaimStatusDb::from(claim_status));
        }
        if let Some(location) = &filter.location {
            query
                .push(" AND i.location ILIKE ")
                .push_bind(format!("%{}%", location));
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", search);
            query
                .push(" AND (i.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR i.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(date_from) = filter.date_from {
            query.push(" AND i.date >= ").push_bind(date_from);
        }
        if let Some(date_to) = filter.date_to {
            query.push(" AND i.date <= ").push_bind(date_to);
        }
    }

    /// List items matching the filters, newest first.
    pub async fn list(
        &self,
        filter: &ItemFilterQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ItemWithReporterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_items");
        let mut query = QueryBuilder::new(format!(
            r#"
            SELECT {ITEM_WITH_REPORTER_COLUMNS}
            FROM items i
            JOIN users u ON i.user_id = u.id
            WHERE 1=1
            "#,
        ));
        Self::push_filters(&mut query, filter);
        query.push(" ORDER BY i.created_at DESC LIMIT ").push_bind(limit);
        query.push(" OFFSET ").push_bind(offset);

        let result = query
            .build_query_as::<ItemWithReporterEntity>()
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Count items matching the filters.
    pub async fn count(&self, filter: &ItemFilterQuery) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_items");
        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM items i WHERE 1=1");
        Self::push_filters(&mut query, filter);
        let result = query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List one user's items, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ItemWithReporterEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_items_for_user");
        let result = sqlx::query_as::<_, ItemWithReporterEntity>(&format!(
            r#"
            SELECT {ITEM_WITH_REPORTER_COLUMNS}
            FROM items i
            JOIN users u ON i.user_id = u.id
            WHERE i.user_id = $1
            ORDER BY i.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count one user's items.
    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_items_for_user");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Partially update an item. The claim status column is deliberately not
    /// touchable here; it changes only through the claim lifecycle.
    pub async fn update(
        &self,
        id: Uuid,
        update: ItemUpdate<'_>,
    ) -> Result<Option<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_item");
        let result = sqlx::query_as::<_, ItemEntity>(&format!(
            r#"
            UPDATE items
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                status = COALESCE($5, status),
                location = COALESCE($6, location),
                date = COALESCE($7, date),
                image_url = COALESCE($8, image_url)
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(update.name)
        .bind(update.description)
        .bind(update.category)
        .bind(update.status)
        .bind(update.location)
        .bind(update.date)
        .bind(update.image_url)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete an item. Its claims cascade at the schema level.
    pub async fn delete(&self, id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_item");
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected());
        timer.record();
        result
    }

    /// Export every item, ordered by id for a deterministic snapshot.
    pub async fn export_all(&self) -> Result<Vec<ItemEntity>, sqlx::Error> {
        let timer = QueryTimer::new("export_items");
        let result = sqlx::query_as::<_, ItemEntity>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items ORDER BY id",
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace the whole item set with a snapshot, in one transaction.
    /// Existing items (and their claims, via cascade) are deleted first and
    /// the snapshot rows are inserted verbatim, ids and timestamps included.
    pub async fn import_replace(&self, items: &[ItemSnapshot]) -> Result<usize, sqlx::Error> {
        let timer = QueryTimer::new("import_items_replace");
        let result = self.import_replace_inner(items).await;
        timer.record();
        result
    }

    async fn import_replace_inner(&self, items: &[ItemSnapshot]) -> Result<usize, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM items").execute(&mut *tx).await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO items (id, user_id, name, description, category, status,
                                   location, date, image_url, claim_status, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(item.id)
            .bind(item.user_id)
            .bind(item.name.as_str())
            .bind(item.description.as_str())
            .bind(ItemCategoryDb::from(item.category))
            .bind(ReportTypeDb::from(item.status))
            .bind(item.location.as_str())
            .bind(item.date)
            .bind(item.image_url.as_deref())
            .bind(ItemClaimStatusDb::from(item.claim_status))
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(items.len())
    }
}
