use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::donation::types::{Donation, DonationRow};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

/// Donations, newest first in every listing
#[async_trait]
pub trait DonationRepository: Send + Sync + FindById<Donation> + HardDeletable {
    async fn create(&self, user_id: Uuid, foundation_id: Uuid, amount: Decimal) -> DomainResult<Donation>;

    async fn find_all(&self) -> DomainResult<Vec<Donation>>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Donation>>;

    async fn find_by_foundation(&self, foundation_id: Uuid) -> DomainResult<Vec<Donation>>;

    async fn find_by_user_and_foundation(&self, user_id: Uuid, foundation_id: Uuid) -> DomainResult<Vec<Donation>>;

    async fn update_amount(&self, id: Uuid, amount: Decimal) -> DomainResult<Donation>;
}

pub struct SqliteDonationRepository {
    pool: SqlitePool,
}

impl SqliteDonationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, binds: &[Uuid]) -> DomainResult<Vec<Donation>> {
        let mut q = query_as::<_, DonationRow>(sql);
        for id in binds {
            q = q.bind(id.to_string());
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(DonationRow::into_entity)
            .collect()
    }
}

#[async_trait]
impl FindById<Donation> for SqliteDonationRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Donation> {
        query_as::<_, DonationRow>("SELECT * FROM donations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("Donation".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteDonationRepository {
    fn entity_name(&self) -> &'static str {
        "donations"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "Donation", id).await
    }
}

#[async_trait]
impl DonationRepository for SqliteDonationRepository {
    async fn create(&self, user_id: Uuid, foundation_id: Uuid, amount: Decimal) -> DomainResult<Donation> {
        let id = Uuid::new_v4();
        query(
            "INSERT INTO donations (id, user_id, foundation_id, amount, donation_date)
             VALUES (?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(foundation_id.to_string())
        .bind(amount.normalize().to_string())
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<Donation>> {
        self.fetch("SELECT * FROM donations ORDER BY donation_date DESC", &[]).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Donation>> {
        self.fetch(
            "SELECT * FROM donations WHERE user_id = ? ORDER BY donation_date DESC",
            &[user_id],
        )
        .await
    }

    async fn find_by_foundation(&self, foundation_id: Uuid) -> DomainResult<Vec<Donation>> {
        self.fetch(
            "SELECT * FROM donations WHERE foundation_id = ? ORDER BY donation_date DESC",
            &[foundation_id],
        )
        .await
    }

    async fn find_by_user_and_foundation(&self, user_id: Uuid, foundation_id: Uuid) -> DomainResult<Vec<Donation>> {
        self.fetch(
            "SELECT * FROM donations WHERE user_id = ? AND foundation_id = ? ORDER BY donation_date DESC",
            &[user_id, foundation_id],
        )
        .await
    }

    async fn update_amount(&self, id: Uuid, amount: Decimal) -> DomainResult<Donation> {
        let result = query("UPDATE donations SET amount = ? WHERE id = ?")
            .bind(amount.normalize().to_string())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("Donation".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
