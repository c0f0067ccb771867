use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::rating::types::{Rating, RatingRow};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use crate::domains::permission::ParentRef;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

fn target_column(target: ParentRef) -> DomainResult<&'static str> {
    match target {
        ParentRef::Donation(_) => Ok("donation_id"),
        ParentRef::SocialAction(_) => Ok("social_action_id"),
        ParentRef::Foundation(_) => Err(DomainError::Internal("Foundations cannot be rated".to_string())),
    }
}

#[async_trait]
pub trait RatingRepository: Send + Sync + FindById<Rating> + HardDeletable {
    /// A second rating of the same target by the same account is a `Conflict`
    async fn create(&self, user_id: Uuid, target: ParentRef, rating: i64) -> DomainResult<Rating>;

    async fn find_all(&self) -> DomainResult<Vec<Rating>>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Rating>>;

    async fn find_by_target(&self, target: ParentRef) -> DomainResult<Vec<Rating>>;

    async fn exists_for(&self, user_id: Uuid, target: ParentRef) -> DomainResult<bool>;

    /// Mean score of `target`, `None` when it has no ratings
    async fn average_for(&self, target: ParentRef) -> DomainResult<Option<f64>>;

    async fn update_score(&self, id: Uuid, rating: i64) -> DomainResult<Rating>;
}

pub struct SqliteRatingRepository {
    pool: SqlitePool,
}

impl SqliteRatingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, bind: Option<Uuid>) -> DomainResult<Vec<Rating>> {
        let mut q = query_as::<_, RatingRow>(sql);
        if let Some(id) = bind {
            q = q.bind(id.to_string());
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(RatingRow::into_entity)
            .collect()
    }
}

#[async_trait]
impl FindById<Rating> for SqliteRatingRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Rating> {
        query_as::<_, RatingRow>("SELECT * FROM ratings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("Rating".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteRatingRepository {
    fn entity_name(&self) -> &'static str {
        "ratings"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "Rating", id).await
    }
}

#[async_trait]
impl RatingRepository for SqliteRatingRepository {
    async fn create(&self, user_id: Uuid, target: ParentRef, rating: i64) -> DomainResult<Rating> {
        let id = Uuid::new_v4();
        let sql = format!(
            "INSERT INTO ratings (id, user_id, {}, rating, rating_date) VALUES (?, ?, ?, ?, ?)",
            target_column(target)?
        );
        query(&sql)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .bind(target.id().to_string())
            .bind(rating)
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::Conflict(_) => DomainError::Conflict(format!(
                    "User already rated this {}",
                    target.entity_name().to_lowercase()
                )),
                other => DomainError::Database(other),
            })?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Rating>> {
        self.fetch("SELECT * FROM ratings ORDER BY rating_date DESC", None).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Rating>> {
        self.fetch("SELECT * FROM ratings WHERE user_id = ? ORDER BY rating_date DESC", Some(user_id))
            .await
    }

    async fn find_by_target(&self, target: ParentRef) -> DomainResult<Vec<Rating>> {
        let sql = format!(
            "SELECT * FROM ratings WHERE {} = ? ORDER BY rating_date DESC",
            target_column(target)?
        );
        self.fetch(&sql, Some(target.id())).await
    }

    async fn exists_for(&self, user_id: Uuid, target: ParentRef) -> DomainResult<bool> {
        let sql = format!("SELECT 1 FROM ratings WHERE user_id = ? AND {} = ?", target_column(target)?);
        let found: Option<i64> = sqlx::query_scalar(&sql)
            .bind(user_id.to_string())
            .bind(target.id().to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;
        Ok(found.is_some())
    }

    async fn average_for(&self, target: ParentRef) -> DomainResult<Option<f64>> {
        let sql = format!("SELECT AVG(rating) FROM ratings WHERE {} = ?", target_column(target)?);
        sqlx::query_scalar::<_, Option<f64>>(&sql)
            .bind(target.id().to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))
    }

    async fn update_score(&self, id: Uuid, rating: i64) -> DomainResult<Rating> {
        let result = query("UPDATE ratings SET rating = ? WHERE id = ?")
            .bind(rating)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("Rating".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
