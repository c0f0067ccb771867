use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use crate::domains::suggestion::types::{NewSuggestion, Suggestion, SuggestionRow};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

#[async_trait]
pub trait SuggestionRepository: Send + Sync + FindById<Suggestion> + HardDeletable {
    async fn create(&self, new: &NewSuggestion) -> DomainResult<Suggestion>;

    async fn find_all(&self) -> DomainResult<Vec<Suggestion>>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Suggestion>>;

    /// Oldest first, so the backlog is worked in order
    async fn find_unprocessed(&self) -> DomainResult<Vec<Suggestion>>;

    async fn update(&self, id: Uuid, content: Option<&str>, processed: Option<bool>) -> DomainResult<Suggestion>;
}

pub struct SqliteSuggestionRepository {
    pool: SqlitePool,
}

impl SqliteSuggestionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, user_id: Option<Uuid>) -> DomainResult<Vec<Suggestion>> {
        let mut q = query_as::<_, SuggestionRow>(sql);
        if let Some(user_id) = user_id {
            q = q.bind(user_id.to_string());
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(SuggestionRow::into_entity)
            .collect()
    }
}

#[async_trait]
impl FindById<Suggestion> for SqliteSuggestionRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Suggestion> {
        query_as::<_, SuggestionRow>("SELECT * FROM suggestions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("Suggestion".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteSuggestionRepository {
    fn entity_name(&self) -> &'static str {
        "suggestions"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "Suggestion", id).await
    }
}

#[async_trait]
impl SuggestionRepository for SqliteSuggestionRepository {
    async fn create(&self, new: &NewSuggestion) -> DomainResult<Suggestion> {
        let id = Uuid::new_v4();
        query("INSERT INTO suggestions (id, user_id, content, processed, created_at) VALUES (?, ?, ?, 0, ?)")
            .bind(id.to_string())
            .bind(new.user_id.to_string())
            .bind(new.content.trim())
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Suggestion>> {
        self.fetch("SELECT * FROM suggestions ORDER BY created_at DESC", None).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Suggestion>> {
        self.fetch("SELECT * FROM suggestions WHERE user_id = ? ORDER BY created_at DESC", Some(user_id)).await
    }

    async fn find_unprocessed(&self) -> DomainResult<Vec<Suggestion>> {
        self.fetch("SELECT * FROM suggestions WHERE processed = 0 ORDER BY created_at ASC", None).await
    }

    async fn update(&self, id: Uuid, content: Option<&str>, processed: Option<bool>) -> DomainResult<Suggestion> {
        let result = query(
            "UPDATE suggestions SET
                content = COALESCE(?, content),
                processed = COALESCE(?, processed)
             WHERE id = ?"
        )
        .bind(content.map(str::trim))
        .bind(processed.map(i64::from))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("Suggestion".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
