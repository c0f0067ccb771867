use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::certificate::types::{Certificate, CertificateRow, NewCertificate, UpdateCertificate};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

#[async_trait]
pub trait CertificateRepository: Send + Sync + FindById<Certificate> + HardDeletable {
    async fn create(&self, new: &NewCertificate) -> DomainResult<Certificate>;

    /// Most recently issued first
    async fn find_all(&self) -> DomainResult<Vec<Certificate>>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Certificate>>;

    async fn update(&self, id: Uuid, update: &UpdateCertificate) -> DomainResult<Certificate>;
}

pub struct SqliteCertificateRepository {
    pool: SqlitePool,
}

impl SqliteCertificateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FindById<Certificate> for SqliteCertificateRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Certificate> {
        query_as::<_, CertificateRow>("SELECT * FROM certificates WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("Certificate".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteCertificateRepository {
    fn entity_name(&self) -> &'static str {
        "certificates"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "Certificate", id).await
    }
}

#[async_trait]
impl CertificateRepository for SqliteCertificateRepository {
    async fn create(&self, new: &NewCertificate) -> DomainResult<Certificate> {
        let id = Uuid::new_v4();
        query("INSERT INTO certificates (id, user_id, description, issue_date) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(new.user_id.to_string())
            .bind(new.description.trim())
            .bind(format_datetime(&Utc::now()))
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Certificate>> {
        query_as::<_, CertificateRow>("SELECT * FROM certificates ORDER BY issue_date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(CertificateRow::into_entity)
            .collect()
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Certificate>> {
        query_as::<_, CertificateRow>("SELECT * FROM certificates WHERE user_id = ? ORDER BY issue_date DESC")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(CertificateRow::into_entity)
            .collect()
    }

    async fn update(&self, id: Uuid, update: &UpdateCertificate) -> DomainResult<Certificate> {
        let result = query("UPDATE certificates SET description = COALESCE(?, description) WHERE id = ?")
            .bind(update.description.as_deref().map(str::trim))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("Certificate".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
