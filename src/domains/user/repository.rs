use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::user::types::{User, UserRow};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use crate::types::AccountType;
use uuid::Uuid;
use chrono::Utc;
use sqlx::{SqlitePool, query, query_as, query_scalar};
use async_trait::async_trait;

/// Fields written when creating an account; the password is already hashed.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: AccountType,
}

/// Partial update with an already hashed password
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub user_type: Option<AccountType>,
}

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync + FindById<User> + HardDeletable {
    /// Find a user by email, `None` when no account uses it
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn find_all(&self) -> DomainResult<Vec<User>>;

    async fn create(&self, record: UserRecord) -> DomainResult<User>;

    async fn update(&self, id: Uuid, changes: UserChanges) -> DomainResult<User>;

    async fn update_last_login(&self, id: Uuid) -> DomainResult<()>;

    async fn is_email_unique(&self, email: &str, exclude_id: Option<Uuid>) -> DomainResult<bool>;
}

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FindById<User> for SqliteUserRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<User> {
        let row = query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("User".to_string(), id))?;

        row.into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteUserRepository {
    fn entity_name(&self) -> &'static str {
        "users"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "User", id).await
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .map(UserRow::into_entity)
            .transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let rows = query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        rows.into_iter().map(UserRow::into_entity).collect()
    }

    async fn create(&self, record: UserRecord) -> DomainResult<User> {
        if !self.is_email_unique(&record.email, None).await? {
            return Err(DomainError::Conflict(format!("Email {} is already registered", record.email)));
        }

        let id = Uuid::new_v4();
        query(
            "INSERT INTO users (id, name, email, password_hash, user_type, created_at)
             VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(record.user_type.as_str())
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> DomainResult<User> {
        let current = self.find_by_id(id).await?;

        if let Some(email) = &changes.email {
            if email != &current.email && !self.is_email_unique(email, Some(id)).await? {
                return Err(DomainError::Conflict(format!("Email {} is already registered", email)));
            }
        }

        query(
            "UPDATE users SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                password_hash = COALESCE(?, password_hash),
                user_type = COALESCE(?, user_type)
             WHERE id = ?"
        )
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.user_type.map(|t| t.as_str()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn update_last_login(&self, id: Uuid) -> DomainResult<()> {
        query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(format_datetime(&Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;
        Ok(())
    }

    async fn is_email_unique(&self, email: &str, exclude_id: Option<Uuid>) -> DomainResult<bool> {
        let count: i64 = query_scalar("SELECT COUNT(*) FROM users WHERE email = ? AND id != ?")
            .bind(email)
            .bind(exclude_id.map(|id| id.to_string()).unwrap_or_default())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        Ok(count == 0)
    }
}
