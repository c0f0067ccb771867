use crate::auth::AuthContext;
use crate::domains::core::repository::FindById;
use crate::domains::favorite::repository::FavoriteRepository;
use crate::domains::favorite::types::{Favorite, NewFavorite};
use crate::domains::permission::{AccessControlEvaluator, Action, ResourceKind};
use crate::domains::user::repository::UserRepository;
use crate::errors::{DomainError, ServiceResult};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait FavoriteService: Send + Sync {
    async fn list_favorites(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Favorite>>;

    async fn add_favorite(&self, user_id: Uuid, new: NewFavorite, auth: &AuthContext) -> ServiceResult<Favorite>;

    async fn remove_favorite(&self, user_id: Uuid, item_id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct FavoriteServiceImpl {
    repo: Arc<dyn FavoriteRepository>,
    users: Arc<dyn UserRepository>,
    evaluator: Arc<AccessControlEvaluator>,
}

impl FavoriteServiceImpl {
    pub fn new(
        repo: Arc<dyn FavoriteRepository>,
        users: Arc<dyn UserRepository>,
        evaluator: Arc<AccessControlEvaluator>,
    ) -> Self {
        Self { repo, users, evaluator }
    }
}

#[async_trait]
impl FavoriteService for FavoriteServiceImpl {
    async fn list_favorites(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Favorite>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Favorite, &[user_id])?;
        self.users.find_by_id(user_id).await?;

        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn add_favorite(&self, user_id: Uuid, new: NewFavorite, auth: &AuthContext) -> ServiceResult<Favorite> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::Favorite, &[user_id])?;
        new.validate()?;
        let item_type = new.favorite_type()?;

        self.users.find_by_id(user_id).await?;
        if !self.repo.item_exists(new.item_id, item_type).await? {
            let entity = match item_type {
                crate::types::FavoriteType::Foundation => "Foundation",
                crate::types::FavoriteType::Opportunity => "SocialAction",
            };
            return Err(DomainError::EntityNotFound(entity.to_string(), new.item_id).into());
        }
        if self.repo.exists(user_id, new.item_id, item_type).await? {
            return Err(DomainError::Conflict("This item is already in favorites".to_string()).into());
        }

        Ok(self.repo.create(user_id, new.item_id, item_type).await?)
    }

    async fn remove_favorite(&self, user_id: Uuid, item_id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Favorite, &[user_id])?;

        if self.repo.delete_item(user_id, item_id).await? == 0 {
            return Err(DomainError::EntityNotFound("Favorite".to_string(), item_id).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::favorite::types::NewFavorite;
    use crate::errors::ServiceError;
    use crate::test_support::Harness;
    use crate::types::AccountType;

    #[tokio::test]
    async fn add_list_remove() {
        let h = Harness::new().await;
        let (_, foundation) = h.foundation("org@example.org").await;
        let user = h.account("fan@example.org", AccountType::User).await;
        let svc = &h.app.favorites;

        let new = || NewFavorite { item_id: foundation.id, item_type: "foundation".to_string() };
        svc.add_favorite(user.user_id, new(), &user).await.unwrap();

        let dup = svc.add_favorite(user.user_id, new(), &user).await.unwrap_err();
        assert!(matches!(dup, ServiceError::Domain(ref e) if e.is_conflict()));
        assert_eq!(svc.list_favorites(user.user_id, &user).await.unwrap().len(), 1);

        svc.remove_favorite(user.user_id, foundation.id, &user).await.unwrap();
        let again = svc.remove_favorite(user.user_id, foundation.id, &user).await.unwrap_err();
        assert!(matches!(again, ServiceError::Domain(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn favorites_are_private() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let user = h.account("fan@example.org", AccountType::User).await;

        let new = NewFavorite { item_id: foundation.id, item_type: "foundation".to_string() };
        assert!(matches!(
            h.app.favorites.add_favorite(user.user_id, new, &org).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        assert!(matches!(
            h.app.favorites.list_favorites(user.user_id, &org).await,
            Err(ServiceError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn unknown_items_and_types_are_rejected() {
        let h = Harness::new().await;
        let user = h.account("fan@example.org", AccountType::User).await;

        let missing = NewFavorite { item_id: uuid::Uuid::new_v4(), item_type: "opportunity".to_string() };
        let err = h.app.favorites.add_favorite(user.user_id, missing, &user).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(ref e) if e.is_not_found()));

        let bad_type = NewFavorite { item_id: uuid::Uuid::new_v4(), item_type: "donation".to_string() };
        let err = h.app.favorites.add_favorite(user.user_id, bad_type, &user).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(crate::errors::DomainError::Validation(_))));
    }
}
