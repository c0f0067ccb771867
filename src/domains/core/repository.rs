use crate::errors::{DbError, DomainError, DomainResult};
use async_trait::async_trait;
use sqlx::{query, SqlitePool};
use uuid::Uuid;

/// Trait for finding entities by ID
#[async_trait]
pub trait FindById<T> {
    /// Find an entity by ID, `EntityNotFound` when absent
    async fn find_by_id(&self, id: Uuid) -> DomainResult<T>;
}

/// Trait for entities removed with a hard delete.
///
/// Dependent rows are handled by the schema's `ON DELETE` clauses.
#[async_trait]
pub trait HardDeletable {
    /// The name of the entity table in the database
    fn entity_name(&self) -> &'static str;

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()>;
}

/// Shared `DELETE ... WHERE id = ?` used by every SQLite repository.
pub(crate) async fn hard_delete_by_id(
    pool: &SqlitePool,
    table: &'static str,
    entity: &'static str,
    id: Uuid,
) -> DomainResult<()> {
    let result = query(&format!("DELETE FROM {} WHERE id = ?", table))
        .bind(id.to_string())
        .execute(pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

    if result.rows_affected() == 0 {
        Err(DomainError::EntityNotFound(entity.to_string(), id))
    } else {
        Ok(())
    }
}

/// Shared existence check for foreign-key pre-checks.
pub(crate) async fn exists_by_id(
    pool: &SqlitePool,
    table: &'static str,
    id: Uuid,
) -> DomainResult<bool> {
    let found: Option<i64> = sqlx::query_scalar(&format!("SELECT 1 FROM {} WHERE id = ?", table))
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;
    Ok(found.is_some())
}
