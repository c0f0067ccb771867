use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::foundation::types::{Foundation, FoundationRow, NewFoundation, UpdateFoundation};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

#[async_trait]
pub trait FoundationRepository: Send + Sync + FindById<Foundation> + HardDeletable {
    /// A second profile for the same account is a `Conflict`
    async fn create(&self, new: &NewFoundation) -> DomainResult<Foundation>;

    async fn find_all(&self) -> DomainResult<Vec<Foundation>>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Option<Foundation>>;

    async fn update(&self, id: Uuid, update: &UpdateFoundation) -> DomainResult<Foundation>;
}

pub struct SqliteFoundationRepository {
    pool: SqlitePool,
}

impl SqliteFoundationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FindById<Foundation> for SqliteFoundationRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Foundation> {
        query_as::<_, FoundationRow>("SELECT * FROM foundations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("Foundation".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteFoundationRepository {
    fn entity_name(&self) -> &'static str {
        "foundations"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "Foundation", id).await
    }
}

#[async_trait]
impl FoundationRepository for SqliteFoundationRepository {
    async fn create(&self, new: &NewFoundation) -> DomainResult<Foundation> {
        let id = Uuid::new_v4();
        query(
            "INSERT INTO foundations (id, user_id, legal_name, address, phone, website, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(new.user_id.to_string())
        .bind(new.legal_name.trim())
        .bind(new.address.trim())
        .bind(new.phone.trim())
        .bind(&new.website)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::Conflict(_) => DomainError::Conflict("This account already has a foundation".to_string()),
            other => DomainError::Database(other),
        })?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Foundation>> {
        query_as::<_, FoundationRow>("SELECT * FROM foundations ORDER BY legal_name ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(FoundationRow::into_entity)
            .collect()
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Option<Foundation>> {
        query_as::<_, FoundationRow>("SELECT * FROM foundations WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .map(FoundationRow::into_entity)
            .transpose()
    }

    async fn update(&self, id: Uuid, update: &UpdateFoundation) -> DomainResult<Foundation> {
        let result = query(
            "UPDATE foundations SET
                legal_name = COALESCE(?, legal_name),
                address = COALESCE(?, address),
                phone = COALESCE(?, phone),
                website = COALESCE(?, website)
             WHERE id = ?"
        )
        .bind(update.legal_name.as_deref().map(str::trim))
        .bind(update.address.as_deref().map(str::trim))
        .bind(update.phone.as_deref().map(str::trim))
        .bind(&update.website)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("Foundation".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
