use crate::errors::ServiceResult;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::permission::{AccessControlEvaluator, Action, ResourceKind};
use crate::domains::user::types::{NewUser, UpdateUser, UserResponse};
use crate::domains::user::repository::{UserChanges, UserRepository};
use crate::auth::{AuthContext, AuthService};
use crate::types::AccountType;
use crate::validation::Validate;
use async_trait::async_trait;
use uuid::Uuid;
use std::sync::Arc;

/// Account management
#[async_trait]
pub trait UserService: Send + Sync {
    /// Registration; no caller required
    async fn create_user(&self, new_user: NewUser) -> ServiceResult<UserResponse>;

    async fn list_users(&self, auth: &AuthContext) -> ServiceResult<Vec<UserResponse>>;

    async fn get_user(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<UserResponse>;

    async fn update_user(&self, id: Uuid, update: UpdateUser, auth: &AuthContext) -> ServiceResult<UserResponse>;

    async fn delete_user(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct UserServiceImpl {
    user_repo: Arc<dyn UserRepository>,
    auth_service: Arc<AuthService>,
    evaluator: Arc<AccessControlEvaluator>,
}

impl UserServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        auth_service: Arc<AuthService>,
        evaluator: Arc<AccessControlEvaluator>,
    ) -> Self {
        Self { user_repo, auth_service, evaluator }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn create_user(&self, new_user: NewUser) -> ServiceResult<UserResponse> {
        let user = self.auth_service.register(new_user).await?;
        Ok(user.into())
    }

    async fn list_users(&self, auth: &AuthContext) -> ServiceResult<Vec<UserResponse>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Account, &[])?;

        let users = self.user_repo.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    async fn get_user(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<UserResponse> {
        self.evaluator.authorize(auth, Action::ReadOne, ResourceKind::Account, &[id])?;

        Ok(self.user_repo.find_by_id(id).await?.into())
    }

    async fn update_user(&self, id: Uuid, update: UpdateUser, auth: &AuthContext) -> ServiceResult<UserResponse> {
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Account, &[id])?;
        update.validate()?;

        let password_hash = match &update.password {
            Some(password) => Some(self.auth_service.hash_password(password)?),
            None => None,
        };

        let changes = UserChanges {
            name: update.name.map(|n| n.trim().to_string()),
            email: update.email,
            password_hash,
            user_type: update.user_type.as_deref().and_then(AccountType::from_str),
        };

        let user = self.user_repo.update(id, changes).await?;
        log::info!("Account {} updated by {}", id, auth.user_id);
        Ok(user.into())
    }

    async fn delete_user(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Account, &[id])?;

        self.user_repo.hard_delete(id).await?;
        log::info!("Account {} deleted by {}", id, auth.user_id);
        Ok(())
    }
}
