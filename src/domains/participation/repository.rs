use crate::errors::{DbError, DomainError, DomainResult};
use crate::domains::participation::types::{ParticipationRecord, ParticipationRequest, ParticipationRequestRow};
use crate::domains::core::parse::format_datetime;
use crate::domains::core::repository::{hard_delete_by_id, FindById, HardDeletable};
use crate::types::RequestStatus;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};
use uuid::Uuid;

#[async_trait]
pub trait ParticipationRepository: Send + Sync + FindById<ParticipationRequest> + HardDeletable {
    /// A second request for the same (account, social action) is a `Conflict`
    async fn create(&self, record: &ParticipationRecord) -> DomainResult<ParticipationRequest>;

    async fn find_all(&self) -> DomainResult<Vec<ParticipationRequest>>;

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<ParticipationRequest>>;

    async fn find_by_social_action(&self, social_action_id: Uuid) -> DomainResult<Vec<ParticipationRequest>>;

    /// Grouped by status, newest first within a status
    async fn find_applications(
        &self,
        social_action_id: Uuid,
        status: Option<RequestStatus>,
    ) -> DomainResult<Vec<ParticipationRequest>>;

    /// Oldest first, so they get reviewed in arrival order
    async fn find_pending(&self, social_action_id: Uuid) -> DomainResult<Vec<ParticipationRequest>>;

    async fn find_for_user_and_action(
        &self,
        user_id: Uuid,
        social_action_id: Uuid,
    ) -> DomainResult<Option<ParticipationRequest>>;

    async fn update_status(&self, id: Uuid, status: RequestStatus) -> DomainResult<ParticipationRequest>;
}

pub struct SqliteParticipationRepository {
    pool: SqlitePool,
}

impl SqliteParticipationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, binds: Vec<String>) -> DomainResult<Vec<ParticipationRequest>> {
        let mut q = query_as::<_, ParticipationRequestRow>(sql);
        for value in binds {
            q = q.bind(value);
        }
        q.fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .into_iter()
            .map(ParticipationRequestRow::into_entity)
            .collect()
    }
}

#[async_trait]
impl FindById<ParticipationRequest> for SqliteParticipationRepository {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<ParticipationRequest> {
        query_as::<_, ParticipationRequestRow>("SELECT * FROM participation_requests WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?
            .ok_or_else(|| DomainError::EntityNotFound("ParticipationRequest".to_string(), id))?
            .into_entity()
    }
}

#[async_trait]
impl HardDeletable for SqliteParticipationRepository {
    fn entity_name(&self) -> &'static str {
        "participation_requests"
    }

    async fn hard_delete(&self, id: Uuid) -> DomainResult<()> {
        hard_delete_by_id(&self.pool, self.entity_name(), "ParticipationRequest", id).await
    }
}

#[async_trait]
impl ParticipationRepository for SqliteParticipationRepository {
    async fn create(&self, record: &ParticipationRecord) -> DomainResult<ParticipationRequest> {
        let id = Uuid::new_v4();
        query(
            "INSERT INTO participation_requests (id, user_id, social_action_id, status, message, request_date)
             VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(id.to_string())
        .bind(record.user_id.to_string())
        .bind(record.social_action_id.to_string())
        .bind(record.status.as_str())
        .bind(&record.message)
        .bind(format_datetime(&Utc::now()))
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::Conflict(_) => DomainError::Conflict(
                "A participation request for this social action already exists".to_string(),
            ),
            other => DomainError::Database(other),
        })?;

        self.find_by_id(id).await
    }

    async fn find_all(&self) -> DomainResult<Vec<ParticipationRequest>> {
        self.fetch("SELECT * FROM participation_requests ORDER BY request_date DESC", Vec::new()).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<ParticipationRequest>> {
        self.fetch(
            "SELECT * FROM participation_requests WHERE user_id = ? ORDER BY request_date DESC",
            vec![user_id.to_string()],
        )
        .await
    }

    async fn find_by_social_action(&self, social_action_id: Uuid) -> DomainResult<Vec<ParticipationRequest>> {
        self.fetch(
            "SELECT * FROM participation_requests WHERE social_action_id = ? ORDER BY request_date DESC",
            vec![social_action_id.to_string()],
        )
        .await
    }

    async fn find_applications(
        &self,
        social_action_id: Uuid,
        status: Option<RequestStatus>,
    ) -> DomainResult<Vec<ParticipationRequest>> {
        match status {
            Some(status) => {
                self.fetch(
                    "SELECT * FROM participation_requests WHERE social_action_id = ? AND status = ?
                     ORDER BY status ASC, request_date DESC",
                    vec![social_action_id.to_string(), status.as_str().to_string()],
                )
                .await
            }
            None => {
                self.fetch(
                    "SELECT * FROM participation_requests WHERE social_action_id = ?
                     ORDER BY status ASC, request_date DESC",
                    vec![social_action_id.to_string()],
                )
                .await
            }
        }
    }

    async fn find_pending(&self, social_action_id: Uuid) -> DomainResult<Vec<ParticipationRequest>> {
        self.fetch(
            "SELECT * FROM participation_requests WHERE social_action_id = ? AND status = 'pending'
             ORDER BY request_date ASC",
            vec![social_action_id.to_string()],
        )
        .await
    }

    async fn find_for_user_and_action(
        &self,
        user_id: Uuid,
        social_action_id: Uuid,
    ) -> DomainResult<Option<ParticipationRequest>> {
        query_as::<_, ParticipationRequestRow>(
            "SELECT * FROM participation_requests WHERE user_id = ? AND social_action_id = ?"
        )
        .bind(user_id.to_string())
        .bind(social_action_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Database(DbError::from(e)))?
        .map(ParticipationRequestRow::into_entity)
        .transpose()
    }

    async fn update_status(&self, id: Uuid, status: RequestStatus) -> DomainResult<ParticipationRequest> {
        let result = query("UPDATE participation_requests SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(DbError::from(e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::EntityNotFound("ParticipationRequest".to_string(), id));
        }
        self.find_by_id(id).await
    }
}
