use crate::auth::AuthContext;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::foundation::repository::FoundationRepository;
use crate::domains::foundation::types::{Foundation, NewFoundation, UpdateFoundation};
use crate::domains::permission::{AccessControlEvaluator, Action, ResourceKind};
use crate::domains::user::repository::UserRepository;
use crate::errors::{DomainError, ServiceResult, ValidationError};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Foundation profiles. Reads are public.
#[async_trait]
pub trait FoundationService: Send + Sync {
    async fn create_foundation(&self, new: NewFoundation, auth: &AuthContext) -> ServiceResult<Foundation>;

    async fn list_foundations(&self) -> ServiceResult<Vec<Foundation>>;

    async fn get_foundation(&self, id: Uuid) -> ServiceResult<Foundation>;

    async fn get_foundation_by_user(&self, user_id: Uuid) -> ServiceResult<Foundation>;

    async fn update_foundation(&self, id: Uuid, update: UpdateFoundation, auth: &AuthContext) -> ServiceResult<Foundation>;

    async fn delete_foundation(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct FoundationServiceImpl {
    repo: Arc<dyn FoundationRepository>,
    users: Arc<dyn UserRepository>,
    evaluator: Arc<AccessControlEvaluator>,
}

impl FoundationServiceImpl {
    pub fn new(
        repo: Arc<dyn FoundationRepository>,
        users: Arc<dyn UserRepository>,
        evaluator: Arc<AccessControlEvaluator>,
    ) -> Self {
        Self { repo, users, evaluator }
    }
}

#[async_trait]
impl FoundationService for FoundationServiceImpl {
    async fn create_foundation(&self, new: NewFoundation, auth: &AuthContext) -> ServiceResult<Foundation> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::Foundation, &[new.user_id])?;
        new.validate()?;

        let owner = self.users.find_by_id(new.user_id).await?;
        if !owner.is_foundation() {
            return Err(ValidationError::invalid_value(
                "user_id",
                "only accounts of type 'foundation' can own a foundation",
            )
            .into());
        }
        if self.repo.find_by_user(new.user_id).await?.is_some() {
            return Err(DomainError::Conflict("This account already has a foundation".to_string()).into());
        }

        let foundation = self.repo.create(&new).await?;
        log::info!("Foundation {} created for account {}", foundation.id, foundation.user_id);
        Ok(foundation)
    }

    async fn list_foundations(&self) -> ServiceResult<Vec<Foundation>> {
        Ok(self.repo.find_all().await?)
    }

    async fn get_foundation(&self, id: Uuid) -> ServiceResult<Foundation> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn get_foundation_by_user(&self, user_id: Uuid) -> ServiceResult<Foundation> {
        self.repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| DomainError::EntityNotFound("Foundation".to_string(), user_id).into())
    }

    async fn update_foundation(&self, id: Uuid, update: UpdateFoundation, auth: &AuthContext) -> ServiceResult<Foundation> {
        let foundation = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Foundation, &[foundation.user_id])?;
        update.validate()?;

        Ok(self.repo.update(id, &update).await?)
    }

    async fn delete_foundation(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        let foundation = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Foundation, &[foundation.user_id])?;

        self.repo.hard_delete(id).await?;
        log::info!("Foundation {} deleted by {}", id, auth.user_id);
        Ok(())
    }
}
