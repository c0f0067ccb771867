use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::exists_by_id;
use crate::domains::favorite::types::{Favorite, FavoriteRow};
use crate::types::FavoriteType;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn create(&self, user_id: Uuid, item_id: Uuid, item_type: FavoriteType) -> DomainResult<Favorite>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Favorite>>;

    async fn exists(&self, user_id: Uuid, item_id: Uuid, item_type: FavoriteType) -> DomainResult<bool>;

    /// Whether the bookmarked item itself exists
    async fn item_exists(&self, item_id: Uuid, item_type: FavoriteType) -> DomainResult<bool>;

    /// Remove every favorite of `user_id` pointing at `item_id`; returns how many went away
    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> DomainResult<u64>;
}

pub struct SqliteFavoriteRepository {
    pool: SqlitePool,
}

impl SqliteFavoriteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteRepository for SqliteFavoriteRepository {
    async fn create(&self, user_id: Uuid, item_id: Uuid, item_type: FavoriteType) -> DomainResult<Favorite> {
        let id = Uuid::new_v4();
        query(
            "INSERT INTO favorites (id, user_id, item_id, item_type, created_at)
             VALUES (?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(item_id.to_string())
        .bind(item_type.as_str())
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        query_as::<_, FavoriteRow>("SELECT * FROM favorites WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_entity()
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Favorite>> {
        query_as::<_, FavoriteRow>("SELECT * FROM favorites WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(FavoriteRow::into_entity)
            .collect()
    }

    async fn exists(&self, user_id: Uuid, item_id: Uuid, item_type: FavoriteType) -> DomainResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM favorites WHERE user_id = ? AND item_id = ? AND item_type = ?"
        )
        .bind(user_id.to_string())
        .bind(item_id.to_string())
        .bind(item_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;
        Ok(found.is_some())
    }

    async fn item_exists(&self, item_id: Uuid, item_type: FavoriteType) -> DomainResult<bool> {
        let table = match item_type {
            FavoriteType::Foundation => "foundations",
            FavoriteType::Opportunity => "social_actions",
        };
        exists_by_id(&self.pool, table, item_id).await
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> DomainResult<u64> {
        let result = query("DELETE FROM favorites WHERE user_id = ? AND item_id = ?")
            .bind(user_id.to_string())
            .bind(item_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;
        Ok(result.rows_affected())
    }
}
