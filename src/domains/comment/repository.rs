use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::comment::types::{Comment, CommentRow};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use crate::domains::permission::ParentRef;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

/// Column holding the reference to `target`
fn target_column(target: ParentRef) -> &'static str {
    match target {
        ParentRef::Donation(_) => "donation_id",
        ParentRef::SocialAction(_) => "social_action_id",
        ParentRef::Foundation(_) => "foundation_id",
    }
}

/// Comments, newest first in every listing
#[async_trait]
pub trait CommentRepository: Send + Sync + FindById<Comment> + HardDeletable {
    async fn create(&self, user_id: Uuid, target: ParentRef, text: &str) -> DomainResult<Comment>;

    async fn find_all(&self) -> DomainResult<Vec<Comment>>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Comment>>;

    async fn find_by_target(&self, target: ParentRef) -> DomainResult<Vec<Comment>>;

    async fn update_text(&self, id: Uuid, text: &str) -> DomainResult<Comment>;
}

pub struct SqliteCommentRepository {
    pool: SqlitePool,
}

impl SqliteCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, bind: Option<Uuid>) -> DomainResult<Vec<Comment>> {
        let mut q = query_as::<_, CommentRow>(sql);
        if let Some(id) = bind {
            q = q.bind(id.to_string());
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(CommentRow::into_entity)
            .collect()
    }
}

#[async_trait]
impl FindById<Comment> for SqliteCommentRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Comment> {
        query_as::<_, CommentRow>("SELECT * FROM comments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("Comment".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteCommentRepository {
    fn entity_name(&self) -> &'static str {
        "comments"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "Comment", id).await
    }
}

#[async_trait]
impl CommentRepository for SqliteCommentRepository {
    async fn create(&self, user_id: Uuid, target: ParentRef, text: &str) -> DomainResult<Comment> {
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO comments (id, user_id, {}, text, comment_date) VALUES (?, ?, ?, ?, ?)",
            target_column(target)
        );
        query(&sql)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .bind(target.id().to_string())
            .bind(text.trim())
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Comment>> {
        self.fetch("SELECT * FROM comments ORDER BY comment_date DESC", None).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Comment>> {
        self.fetch("SELECT * FROM comments WHERE user_id = ? ORDER BY comment_date DESC", Some(user_id))
            .await
    }

    async fn find_by_target(&self, target: ParentRef) -> DomainResult<Vec<Comment>> {
        let sql = format!(
            "SELECT * FROM comments WHERE {} = ? ORDER BY comment_date DESC",
            target_column(target)
        );
        self.fetch(&sql, Some(target.id())).await
    }

    async fn update_text(&self, id: Uuid, text: &str) -> DomainResult<Comment> {
        let result = query("UPDATE comments SET text = ? WHERE id = ?")
            .bind(text.trim())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("Comment".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
