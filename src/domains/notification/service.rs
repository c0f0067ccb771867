use crate::auth::AuthContext;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::notification::repository::NotificationRepository;
use crate::domains::notification::types::{NewNotification, Notification, UpdateNotification};
use crate::domains::permission::{AccessControlEvaluator, Action, ResourceKind};
use crate::domains::user::repository::UserRepository;
use crate::errors::ServiceResult;
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn create_notification(&self, new: NewNotification, auth: &AuthContext) -> ServiceResult<Notification>;

    /// Every notification on the platform
    async fn list_notifications(&self, auth: &AuthContext) -> ServiceResult<Vec<Notification>>;

    /// The caller's own inbox
    async fn list_my_notifications(&self, unread_only: bool, auth: &AuthContext) -> ServiceResult<Vec<Notification>>;

    async fn mark_all_my_notifications_read(&self, auth: &AuthContext) -> ServiceResult<u64>;

    async fn list_user_notifications(&self, user_id: Uuid, unread_only: bool, auth: &AuthContext) -> ServiceResult<Vec<Notification>>;

    async fn mark_all_user_notifications_read(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<u64>;

    async fn get_notification(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Notification>;

    async fn mark_notification_read(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Notification>;

    async fn update_notification(&self, id: Uuid, update: UpdateNotification, auth: &AuthContext) -> ServiceResult<Notification>;

    async fn delete_notification(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct NotificationServiceImpl {
    repo: Arc<dyn NotificationRepository>,
    users: Arc<dyn UserRepository>,
    evaluator: Arc<AccessControlEvaluator>,
}

impl NotificationServiceImpl {
    pub fn new(
        repo: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserRepository>,
        evaluator: Arc<AccessControlEvaluator>,
    ) -> Self {
        Self { repo, users, evaluator }
    }
}

#[async_trait]
impl NotificationService for NotificationServiceImpl {
    async fn create_notification(&self, new: NewNotification, auth: &AuthContext) -> ServiceResult<Notification> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::Notification, &[new.user_id])?;
        new.validate()?;
        self.users.find_by_id(new.user_id).await?;

        Ok(self.repo.create(&new).await?)
    }

    async fn list_notifications(&self, auth: &AuthContext) -> ServiceResult<Vec<Notification>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Notification, &[])?;
        Ok(self.repo.find_all().await?)
    }

    async fn list_my_notifications(&self, unread_only: bool, auth: &AuthContext) -> ServiceResult<Vec<Notification>> {
        Ok(self.repo.find_by_user(auth.user_id, unread_only).await?)
    }

    async fn mark_all_my_notifications_read(&self, auth: &AuthContext) -> ServiceResult<u64> {
        Ok(self.repo.mark_all_read(auth.user_id).await?)
    }

    async fn list_user_notifications(&self, user_id: Uuid, unread_only: bool, auth: &AuthContext) -> ServiceResult<Vec<Notification>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Notification, &[user_id])?;
        Ok(self.repo.find_by_user(user_id, unread_only).await?)
    }

    async fn mark_all_user_notifications_read(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<u64> {
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Notification, &[user_id])?;
        Ok(self.repo.mark_all_read(user_id).await?)
    }

    async fn get_notification(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Notification> {
        let notification = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::ReadOne, ResourceKind::Notification, &[notification.user_id])?;
        Ok(notification)
    }

    async fn mark_notification_read(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Notification> {
        let notification = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Notification, &[notification.user_id])?;

        let update = UpdateNotification { read: Some(true), ..Default::default() };
        Ok(self.repo.update(id, &update).await?)
    }

    /// Editing a notification's content is not something its recipient does.
    async fn update_notification(&self, id: Uuid, update: UpdateNotification, auth: &AuthContext) -> ServiceResult<Notification> {
        self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Notification, &[])?;
        update.validate()?;

        Ok(self.repo.update(id, &update).await?)
    }

    async fn delete_notification(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        let notification = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Notification, &[notification.user_id])?;

        self.repo.hard_delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::notification::types::{NewNotification, UpdateNotification};
    use crate::errors::ServiceError;
    use crate::test_support::Harness;
    use crate::types::AccountType;

    #[tokio::test]
    async fn inbox_lifecycle() {
        let h = Harness::new().await;
        let user = h.account("reader@example.org", AccountType::User).await;
        let foundation = h.account("org@example.org", AccountType::Foundation).await;
        let svc = &h.app.notifications;

        svc.create_notification(NewNotification { user_id: user.user_id, message: "one".into() }, &foundation)
            .await
            .unwrap();
        let second = svc
            .create_notification(NewNotification { user_id: user.user_id, message: "two".into() }, &foundation)
            .await
            .unwrap();

        assert_eq!(svc.list_my_notifications(true, &user).await.unwrap().len(), 2);
        let read = svc.mark_notification_read(second.id, &user).await.unwrap();
        assert!(read.read);
        assert_eq!(svc.list_my_notifications(true, &user).await.unwrap().len(), 1);

        assert_eq!(svc.mark_all_my_notifications_read(&user).await.unwrap(), 1);
        assert!(svc.list_my_notifications(true, &user).await.unwrap().is_empty());
        assert_eq!(svc.list_my_notifications(false, &user).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn users_cannot_notify_or_read_others() {
        let h = Harness::new().await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let svc = &h.app.notifications;

        let err = svc
            .create_notification(NewNotification { user_id: bob.user_id, message: "hi".into() }, &alice)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        // to themselves is fine
        let own = svc
            .create_notification(NewNotification { user_id: alice.user_id, message: "note".into() }, &alice)
            .await
            .unwrap();
        assert!(matches!(svc.get_notification(own.id, &bob).await, Err(ServiceError::PermissionDenied(_))));
        assert!(matches!(svc.list_user_notifications(alice.user_id, false, &bob).await, Err(ServiceError::PermissionDenied(_))));
        assert!(matches!(svc.list_notifications(&alice).await, Err(ServiceError::PermissionDenied(_))));

        // editing content is reserved to foundations and write admins, even for the recipient
        let edit = UpdateNotification { message: Some("changed".into()), read: None };
        assert!(matches!(svc.update_notification(own.id, edit, &alice).await, Err(ServiceError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn notifying_a_missing_account_is_not_found() {
        let h = Harness::new().await;
        let foundation = h.account("org@example.org", AccountType::Foundation).await;
        let err = h
            .app
            .notifications
            .create_notification(NewNotification { user_id: uuid::Uuid::new_v4(), message: "hi".into() }, &foundation)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(ref e) if e.is_not_found()));
    }
}
