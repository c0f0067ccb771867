use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::notification::types::{NewNotification, Notification, NotificationRow, UpdateNotification};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

#[async_trait]
pub trait NotificationRepository: Send + Sync + FindById<Notification> + HardDeletable {
    async fn create(&self, new: &NewNotification) -> DomainResult<Notification>;

    /// Newest first
    async fn find_all(&self) -> DomainResult<Vec<Notification>>;

    /// Newest first, optionally only the unread ones
    async fn find_by_user(&self, user_id: Uuid, unread_only: bool) -> DomainResult<Vec<Notification>>;

    async fn update(&self, id: Uuid, update: &UpdateNotification) -> DomainResult<Notification>;

    /// Returns the number of notifications that changed state
    async fn mark_all_read(&self, user_id: Uuid) -> DomainResult<u64>;
}

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FindById<Notification> for SqliteNotificationRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Notification> {
        query_as::<_, NotificationRow>("SELECT * FROM notifications WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("Notification".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteNotificationRepository {
    fn entity_name(&self) -> &'static str {
        "notifications"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "Notification", id).await
    }
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, new: &NewNotification) -> DomainResult<Notification> {
        let id = Uuid::new_v4();
        query(
            "INSERT INTO notifications (id, user_id, message, read, notification_date)
             VALUES (?, ?, ?, 0, ?)"
        )
        .bind(id.to_string())
        .bind(new.user_id.to_string())
        .bind(&new.message)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Notification>> {
        query_as::<_, NotificationRow>("SELECT * FROM notifications ORDER BY notification_date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(NotificationRow::into_entity)
            .collect()
    }

    async fn find_by_user(&self, user_id: Uuid, unread_only: bool) -> DomainResult<Vec<Notification>> {
        let sql = if unread_only {
            "SELECT * FROM notifications WHERE user_id = ? AND read = 0 ORDER BY notification_date DESC"
        } else {
            "SELECT * FROM notifications WHERE user_id = ? ORDER BY notification_date DESC"
        };

        query_as::<_, NotificationRow>(sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(NotificationRow::into_entity)
            .collect()
    }

    async fn update(&self, id: Uuid, update: &UpdateNotification) -> DomainResult<Notification> {
        let result = query(
            "UPDATE notifications SET
                message = COALESCE(?, message),
                read = COALESCE(?, read)
             WHERE id = ?"
        )
        .bind(update.message.as_deref())
        .bind(update.read.map(i64::from))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("Notification".to_string(), id));
        }
        self.find_by_id(id).await
    }

    async fn mark_all_read(&self, user_id: Uuid) -> DomainResult<u64> {
        let result = query("UPDATE notifications SET read = 1 WHERE user_id = ? AND read = 0")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;
        Ok(result.rows_affected())
    }
}
