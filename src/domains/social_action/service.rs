use crate::auth::AuthContext;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::foundation::repository::FoundationRepository;
use crate::domains::notification::NotificationDispatcher;
use crate::domains::participation::repository::ParticipationRepository;
use crate::domains::participation::service::announce_new_request;
use crate::domains::participation::types::{ParticipationRecord, ParticipationRequest};
use crate::domains::permission::{
    AccessControlEvaluator, Action, OwnershipResolver, ParentRef, ResourceKind,
};
use crate::domains::social_action::repository::SocialActionRepository;
use crate::domains::social_action::types::{
    ApplyToSocialAction, NewSocialAction, SocialAction, UpdateSocialAction,
};
use crate::domains::user::repository::UserRepository;
use crate::errors::{DomainError, ServiceError, ServiceResult};
use crate::types::{AccountType, RequestStatus};
use crate::validation::Validate;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Social actions (also exposed as "opportunities"). Reads are public.
#[async_trait]
pub trait SocialActionService: Send + Sync {
    async fn create_social_action(&self, new: NewSocialAction, auth: &AuthContext) -> ServiceResult<SocialAction>;

    async fn list_social_actions(&self) -> ServiceResult<Vec<SocialAction>>;

    async fn list_upcoming(&self) -> ServiceResult<Vec<SocialAction>>;

    async fn list_active(&self) -> ServiceResult<Vec<SocialAction>>;

    async fn list_by_foundation(&self, foundation_id: Uuid) -> ServiceResult<Vec<SocialAction>>;

    async fn get_social_action(&self, id: Uuid) -> ServiceResult<SocialAction>;

    async fn update_social_action(&self, id: Uuid, update: UpdateSocialAction, auth: &AuthContext) -> ServiceResult<SocialAction>;

    async fn delete_social_action(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;

    /// The caller applies to take part; the request starts out pending.
    async fn apply(&self, id: Uuid, application: ApplyToSocialAction, auth: &AuthContext) -> ServiceResult<ParticipationRequest>;
}

pub struct SocialActionServiceImpl {
    repo: Arc<dyn SocialActionRepository>,
    foundations: Arc<dyn FoundationRepository>,
    participation: Arc<dyn ParticipationRepository>,
    users: Arc<dyn UserRepository>,
    resolver: Arc<dyn OwnershipResolver>,
    evaluator: Arc<AccessControlEvaluator>,
    notifier: NotificationDispatcher,
}

impl SocialActionServiceImpl {
    pub fn new(
        repo: Arc<dyn SocialActionRepository>,
        foundations: Arc<dyn FoundationRepository>,
        participation: Arc<dyn ParticipationRepository>,
        users: Arc<dyn UserRepository>,
        resolver: Arc<dyn OwnershipResolver>,
        evaluator: Arc<AccessControlEvaluator>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self { repo, foundations, participation, users, resolver, evaluator, notifier }
    }
}

#[async_trait]
impl SocialActionService for SocialActionServiceImpl {
    async fn create_social_action(&self, new: NewSocialAction, auth: &AuthContext) -> ServiceResult<SocialAction> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::SocialAction, &[])?;
        new.validate()?;

        self.foundations.find_by_id(new.foundation_id).await?;
        self.evaluator
            .authorize_parent(auth, Action::Create, self.resolver.as_ref(), ParentRef::Foundation(new.foundation_id))
            .await?;

        let action = self.repo.create(&new).await?;
        log::info!("Social action {} published by foundation {}", action.id, action.foundation_id);
        Ok(action)
    }

    async fn list_social_actions(&self) -> ServiceResult<Vec<SocialAction>> {
        Ok(self.repo.find_all().await?)
    }

    async fn list_upcoming(&self) -> ServiceResult<Vec<SocialAction>> {
        Ok(self.repo.find_upcoming(Utc::now()).await?)
    }

    async fn list_active(&self) -> ServiceResult<Vec<SocialAction>> {
        Ok(self.repo.find_active(Utc::now()).await?)
    }

    async fn list_by_foundation(&self, foundation_id: Uuid) -> ServiceResult<Vec<SocialAction>> {
        self.foundations.find_by_id(foundation_id).await?;
        Ok(self.repo.find_by_foundation(foundation_id).await?)
    }

    async fn get_social_action(&self, id: Uuid) -> ServiceResult<SocialAction> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn update_social_action(&self, id: Uuid, update: UpdateSocialAction, auth: &AuthContext) -> ServiceResult<SocialAction> {
        let current = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::SocialAction, &[])?;
        self.evaluator
            .authorize_parent(auth, Action::Update, self.resolver.as_ref(), ParentRef::SocialAction(id))
            .await?;
        update.validate_against(&current)?;

        Ok(self.repo.update(id, &update).await?)
    }

    async fn delete_social_action(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::SocialAction, &[])?;
        self.evaluator
            .authorize_parent(auth, Action::Delete, self.resolver.as_ref(), ParentRef::SocialAction(id))
            .await?;

        self.repo.hard_delete(id).await?;
        log::info!("Social action {} deleted by {}", id, auth.user_id);
        Ok(())
    }

    async fn apply(&self, id: Uuid, application: ApplyToSocialAction, auth: &AuthContext) -> ServiceResult<ParticipationRequest> {
        if !(self.evaluator.is_full_admin(auth) || auth.role == AccountType::User) {
            return Err(ServiceError::PermissionDenied(
                "Only regular users can apply to social actions".to_string(),
            ));
        }
        application.validate()?;

        let action = self.repo.find_by_id(id).await?;
        if self.participation.find_for_user_and_action(auth.user_id, id).await?.is_some() {
            return Err(DomainError::Conflict("You have already applied to this social action".to_string()).into());
        }

        let request = self
            .participation
            .create(&ParticipationRecord {
                user_id: auth.user_id,
                social_action_id: id,
                status: RequestStatus::Pending,
                message: application.message,
            })
            .await?;

        let applicant = self.users.find_by_id(auth.user_id).await?;
        announce_new_request(&self.notifier, self.resolver.as_ref(), &action, &applicant.name).await;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::social_action::types::{ApplyToSocialAction, NewSocialAction, UpdateSocialAction};
    use crate::errors::{DomainError, ServiceError};
    use crate::test_support::Harness;
    use crate::types::{AccountType, RequestStatus};
    use chrono::{Duration, Utc};

    fn schedule(foundation_id: uuid::Uuid, starts_in: Duration, lasts: Duration) -> NewSocialAction {
        let start = Utc::now() + starts_in;
        NewSocialAction {
            foundation_id,
            description: "Community garden".to_string(),
            start_date: start,
            end_date: start + lasts,
        }
    }

    #[tokio::test]
    async fn only_the_owning_foundation_publishes() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let (rival, _) = h.foundation("rival@example.org").await;
        let user = h.account("u@example.org", AccountType::User).await;
        let svc = &h.app.social_actions;

        let new = || schedule(foundation.id, Duration::days(1), Duration::days(2));
        assert!(matches!(svc.create_social_action(new(), &user).await, Err(ServiceError::PermissionDenied(_))));
        // admitted on role, stopped by ownership of the foundation
        assert!(matches!(svc.create_social_action(new(), &rival).await, Err(ServiceError::PermissionDenied(_))));
        assert!(svc.list_by_foundation(foundation.id).await.unwrap().is_empty());

        let action = svc.create_social_action(new(), &org).await.unwrap();
        assert_eq!(action.foundation_id, foundation.id);

        let writer = h.account("admin@escritor.com", AccountType::User).await;
        svc.create_social_action(new(), &writer).await.unwrap();
        assert_eq!(svc.list_by_foundation(foundation.id).await.unwrap().len(), 2);

        let missing = schedule(uuid::Uuid::new_v4(), Duration::days(1), Duration::days(1));
        let err = svc.create_social_action(missing, &writer).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn rival_foundations_cannot_edit_or_delete() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let (rival, _) = h.foundation("rival@example.org").await;
        let svc = &h.app.social_actions;

        let action = svc
            .create_social_action(schedule(foundation.id, Duration::days(1), Duration::days(1)), &org)
            .await
            .unwrap();

        let rename = || UpdateSocialAction { description: Some("Renamed".to_string()), ..Default::default() };
        assert!(matches!(
            svc.update_social_action(action.id, rename(), &rival).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        assert_eq!(svc.update_social_action(action.id, rename(), &org).await.unwrap().description, "Renamed");

        let backwards = UpdateSocialAction { end_date: Some(action.start_date - Duration::hours(1)), ..Default::default() };
        let err = svc.update_social_action(action.id, backwards, &org).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));

        assert!(matches!(svc.delete_social_action(action.id, &rival).await, Err(ServiceError::PermissionDenied(_))));
        let deleter = h.account("admin@eliminador.com", AccountType::User).await;
        svc.delete_social_action(action.id, &deleter).await.unwrap();
    }

    #[tokio::test]
    async fn upcoming_and_active_listings() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let svc = &h.app.social_actions;

        let later = svc
            .create_social_action(schedule(foundation.id, Duration::days(10), Duration::days(1)), &org)
            .await
            .unwrap();
        let soon = svc
            .create_social_action(schedule(foundation.id, Duration::days(2), Duration::days(1)), &org)
            .await
            .unwrap();
        let running = svc
            .create_social_action(schedule(foundation.id, -Duration::days(1), Duration::days(3)), &org)
            .await
            .unwrap();
        svc.create_social_action(schedule(foundation.id, -Duration::days(9), Duration::days(1)), &org)
            .await
            .unwrap();

        let upcoming: Vec<_> = svc.list_upcoming().await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(upcoming, vec![soon.id, later.id]);

        let active: Vec<_> = svc.list_active().await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(active, vec![running.id]);

        let all = svc.list_social_actions().await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].id, later.id);
        assert_eq!(svc.list_by_foundation(foundation.id).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn users_apply_once_and_the_foundation_hears_about_it() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let user = h.account("volunteer@example.org", AccountType::User).await;
        let svc = &h.app.social_actions;

        let action = svc
            .create_social_action(schedule(foundation.id, Duration::days(1), Duration::days(1)), &org)
            .await
            .unwrap();

        let application = || ApplyToSocialAction { message: Some("I can help on weekends".to_string()) };
        let request = svc.apply(action.id, application(), &user).await.unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.user_id, user.user_id);

        let dup = svc.apply(action.id, application(), &user).await.unwrap_err();
        assert!(matches!(dup, ServiceError::Domain(ref e) if e.is_conflict()));

        // foundations do not apply
        assert!(matches!(svc.apply(action.id, application(), &org).await, Err(ServiceError::PermissionDenied(_))));

        let inbox = h.app.notifications.list_my_notifications(false, &org).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(inbox[0].message.contains("Community garden"));
    }
}
