use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::social_action::types::{NewSocialAction, SocialAction, SocialActionRow, UpdateSocialAction};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

#[async_trait]
pub trait SocialActionRepository: Send + Sync + FindById<SocialAction> + HardDeletable {
    async fn create(&self, new: &NewSocialAction) -> DomainResult<SocialAction>;

    /// Latest start first
    async fn find_all(&self) -> DomainResult<Vec<SocialAction>>;

    async fn find_by_foundation(&self, foundation_id: Uuid) -> DomainResult<Vec<SocialAction>>;

    /// Not started yet at `now`, soonest first
    async fn find_upcoming(&self, now: DateTime<Utc>) -> DomainResult<Vec<SocialAction>>;

    /// Running at `now`, ending soonest first
    async fn find_active(&self, now: DateTime<Utc>) -> DomainResult<Vec<SocialAction>>;

    async fn update(&self, id: Uuid, update: &UpdateSocialAction) -> DomainResult<SocialAction>;
}

pub struct SqliteSocialActionRepository {
    pool: SqlitePool,
}

impl SqliteSocialActionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, binds: Vec<String>) -> DomainResult<Vec<SocialAction>> {
        let mut q = query_as::<_, SocialActionRow>(sql);
        for value in binds {
            q = q.bind(value);
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(SocialActionRow::into_entity)
            .collect()
    }
}

#[async_trait]
impl FindById<SocialAction> for SqliteSocialActionRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<SocialAction> {
        query_as::<_, SocialActionRow>("SELECT * FROM social_actions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("SocialAction".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteSocialActionRepository {
    fn entity_name(&self) -> &'static str {
        "social_actions"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "SocialAction", id).await
    }
}

#[async_trait]
impl SocialActionRepository for SqliteSocialActionRepository {
    async fn create(&self, new: &NewSocialAction) -> DomainResult<SocialAction> {
        let id = Uuid::new_v4();
        query(
            "INSERT INTO social_actions (id, foundation_id, description, start_date, end_date, created_at)
             VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(new.foundation_id.to_string())
        .bind(new.description.trim())
        .bind(format_datetime(&new.start_date))
        .bind(format_datetime(&new.end_date))
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<SocialAction>> {
        self.fetch("SELECT * FROM social_actions ORDER BY start_date DESC", Vec::new()).await
    }

    async fn find_by_foundation(&self, foundation_id: Uuid) -> DomainResult<Vec<SocialAction>> {
        self.fetch(
            "SELECT * FROM social_actions WHERE foundation_id = ? ORDER BY start_date DESC",
            vec![foundation_id.to_string()],
        )
        .await
    }

    async fn find_upcoming(&self, now: DateTime<Utc>) -> DomainResult<Vec<SocialAction>> {
        self.fetch(
            "SELECT * FROM social_actions WHERE start_date > ? ORDER BY start_date ASC",
            vec![format_datetime(&now)],
        )
        .await
    }

    async fn find_active(&self, now: DateTime<Utc>) -> DomainResult<Vec<SocialAction>> {
        let now = format_datetime(&now);
        self.fetch(
            "SELECT * FROM social_actions WHERE start_date <= ? AND end_date >= ? ORDER BY end_date ASC",
            vec![now.clone(), now],
        )
        .await
    }

    async fn update(&self, id: Uuid, update: &UpdateSocialAction) -> DomainResult<SocialAction> {
        let result = query(
            "UPDATE social_actions SET
                description = COALESCE(?, description),
                start_date = COALESCE(?, start_date),
                end_date = COALESCE(?, end_date)
             WHERE id = ?"
        )
        .bind(update.description.as_deref().map(str::trim))
        .bind(update.start_date.as_ref().map(format_datetime))
        .bind(update.end_date.as_ref().map(format_datetime))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("SocialAction".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
