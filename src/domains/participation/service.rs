use crate::auth::AuthContext;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::notification::NotificationDispatcher;
use crate::domains::participation::repository::ParticipationRepository;
use crate::domains::participation::types::{
    NewParticipationRequest, ParticipationRecord, ParticipationRequest, UpdateParticipationRequest,
};
use crate::domains::permission::{
    AccessControlEvaluator, Action, Grant, OwnershipResolver, ParentRef, ResourceKind,
};
use crate::domains::social_action::repository::SocialActionRepository;
use crate::domains::social_action::types::SocialAction;
use crate::domains::user::repository::UserRepository;
use crate::errors::{DomainError, ServiceResult};
use crate::types::RequestStatus;
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Tells the foundation behind `action` that someone asked to join it.
pub(crate) async fn announce_new_request(
    notifier: &NotificationDispatcher,
    resolver: &dyn OwnershipResolver,
    action: &SocialAction,
    applicant_name: &str,
) {
    let owners = match resolver.owning_accounts(ParentRef::SocialAction(action.id)).await {
        Ok(owners) => owners,
        Err(e) => {
            log::warn!("No owner to notify for social action {}: {}", action.id, e);
            return;
        }
    };
    for owner in owners {
        notifier
            .dispatch(
                owner,
                format!("New participation request for \"{}\" from {}", action.description, applicant_name),
            )
            .await;
    }
}

#[async_trait]
pub trait ParticipationService: Send + Sync {
    async fn create_request(&self, new: NewParticipationRequest, auth: &AuthContext) -> ServiceResult<ParticipationRequest>;

    async fn list_requests(&self, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>>;

    async fn list_user_requests(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>>;

    async fn list_social_action_requests(&self, social_action_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>>;

    /// Applications to an opportunity, for the foundation that published it
    async fn list_applications(
        &self,
        social_action_id: Uuid,
        status: Option<RequestStatus>,
        auth: &AuthContext,
    ) -> ServiceResult<Vec<ParticipationRequest>>;

    async fn list_pending(&self, social_action_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>>;

    async fn get_request(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ParticipationRequest>;

    /// Accept or reject; the applicant is notified when the status actually changes.
    async fn update_status(&self, id: Uuid, update: UpdateParticipationRequest, auth: &AuthContext) -> ServiceResult<ParticipationRequest>;

    async fn delete_request(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct ParticipationServiceImpl {
    repo: Arc<dyn ParticipationRepository>,
    social_actions: Arc<dyn SocialActionRepository>,
    users: Arc<dyn UserRepository>,
    resolver: Arc<dyn OwnershipResolver>,
    evaluator: Arc<AccessControlEvaluator>,
    notifier: NotificationDispatcher,
}

impl ParticipationServiceImpl {
    pub fn new(
        repo: Arc<dyn ParticipationRepository>,
        social_actions: Arc<dyn SocialActionRepository>,
        users: Arc<dyn UserRepository>,
        resolver: Arc<dyn OwnershipResolver>,
        evaluator: Arc<AccessControlEvaluator>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self { repo, social_actions, users, resolver, evaluator, notifier }
    }

    async fn authorize_action_owner(&self, social_action_id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        self.social_actions.find_by_id(social_action_id).await?;
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::ParticipationRequest, &[])?;
        self.evaluator
            .authorize_parent(auth, Action::ReadAll, self.resolver.as_ref(), ParentRef::SocialAction(social_action_id))
            .await
    }
}

#[async_trait]
impl ParticipationService for ParticipationServiceImpl {
    async fn create_request(&self, new: NewParticipationRequest, auth: &AuthContext) -> ServiceResult<ParticipationRequest> {
        let decision = self.evaluator.authorize(auth, Action::Create, ResourceKind::ParticipationRequest, &[new.user_id])?;
        new.validate()?;

        let applicant = self.users.find_by_id(new.user_id).await?;
        let action = self.social_actions.find_by_id(new.social_action_id).await?;
        if self.repo.find_for_user_and_action(new.user_id, new.social_action_id).await?.is_some() {
            return Err(DomainError::Conflict(
                "A participation request for this social action already exists".to_string(),
            )
            .into());
        }

        let status = match new.requested_status()? {
            Some(status) if decision.via_admin() => status,
            _ => RequestStatus::Pending,
        };
        let request = self
            .repo
            .create(&ParticipationRecord {
                user_id: new.user_id,
                social_action_id: new.social_action_id,
                status,
                message: new.message,
            })
            .await?;

        announce_new_request(&self.notifier, self.resolver.as_ref(), &action, &applicant.name).await;
        Ok(request)
    }

    async fn list_requests(&self, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::ParticipationRequest, &[])?;
        Ok(self.repo.find_all().await?)
    }

    async fn list_user_requests(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::ParticipationRequest, &[user_id])?;
        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn list_social_action_requests(&self, social_action_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::ParticipationRequest, &[])?;
        self.social_actions.find_by_id(social_action_id).await?;
        Ok(self.repo.find_by_social_action(social_action_id).await?)
    }

    async fn list_applications(
        &self,
        social_action_id: Uuid,
        status: Option<RequestStatus>,
        auth: &AuthContext,
    ) -> ServiceResult<Vec<ParticipationRequest>> {
        self.authorize_action_owner(social_action_id, auth).await?;
        Ok(self.repo.find_applications(social_action_id, status).await?)
    }

    async fn list_pending(&self, social_action_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<ParticipationRequest>> {
        self.authorize_action_owner(social_action_id, auth).await?;
        Ok(self.repo.find_pending(social_action_id).await?)
    }

    async fn get_request(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<ParticipationRequest> {
        let request = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::ReadOne, ResourceKind::ParticipationRequest, &[request.user_id])?;
        Ok(request)
    }

    async fn update_status(&self, id: Uuid, update: UpdateParticipationRequest, auth: &AuthContext) -> ServiceResult<ParticipationRequest> {
        let request = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::ParticipationRequest, &[])?;
        self.evaluator
            .authorize_parent(auth, Action::Update, self.resolver.as_ref(), ParentRef::SocialAction(request.social_action_id))
            .await?;
        update.validate()?;

        let status = update.new_status()?;
        if status == request.status {
            return Ok(request);
        }

        let updated = self.repo.update_status(id, status).await?;
        log::info!("Participation request {} moved {} -> {}", id, request.status, status);

        let verdict = match status {
            RequestStatus::Accepted => Some("accepted"),
            RequestStatus::Rejected => Some("rejected"),
            RequestStatus::Pending => None,
        };
        if let Some(verdict) = verdict {
            let description = match self.social_actions.find_by_id(updated.social_action_id).await {
                Ok(action) => action.description,
                Err(_) => "a social action".to_string(),
            };
            self.notifier
                .dispatch(
                    updated.user_id,
                    format!("Your participation request for \"{}\" has been {}.", description, verdict),
                )
                .await;
        }
        Ok(updated)
    }

    async fn delete_request(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        let request = self.repo.find_by_id(id).await?;
        let decision = self.evaluator.authorize(auth, Action::Delete, ResourceKind::ParticipationRequest, &[request.user_id])?;

        if decision.grant == Grant::FoundationRole && request.user_id != auth.user_id {
            self.evaluator
                .authorize_parent(auth, Action::Delete, self.resolver.as_ref(), ParentRef::SocialAction(request.social_action_id))
                .await?;
        }

        self.repo.hard_delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::notification::dispatcher::tests::FailingSink;
    use crate::domains::participation::types::{NewParticipationRequest, UpdateParticipationRequest};
    use crate::errors::ServiceError;
    use crate::test_support::Harness;
    use crate::types::{AccountType, RequestStatus};
    use std::sync::Arc;

    fn request_for(user_id: uuid::Uuid, social_action_id: uuid::Uuid) -> NewParticipationRequest {
        NewParticipationRequest { user_id, social_action_id, status: None, message: None }
    }

    #[tokio::test]
    async fn duplicate_requests_conflict() {
        let h = Harness::new().await;
        let (org, _, action) = h.social_action("org@example.org").await;
        let user = h.account("volunteer@example.org", AccountType::User).await;
        let svc = &h.app.participation;

        let first = svc.create_request(request_for(user.user_id, action.id), &user).await.unwrap();
        let dup = svc.create_request(request_for(user.user_id, action.id), &user).await.unwrap_err();
        assert!(matches!(dup, ServiceError::Domain(ref e) if e.is_conflict()));

        let unchanged = svc.get_request(first.id, &user).await.unwrap();
        assert_eq!(unchanged, first);

        let inbox = h.app.notifications.list_my_notifications(false, &org).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert!(inbox[0].message.starts_with("New participation request for"));
    }

    #[tokio::test]
    async fn self_requests_ignore_a_requested_status() {
        let h = Harness::new().await;
        let (_, _, action) = h.social_action("org@example.org").await;
        let user = h.account("volunteer@example.org", AccountType::User).await;

        let mut new = request_for(user.user_id, action.id);
        new.status = Some("accepted".to_string());
        let request = h.app.participation.create_request(new, &user).await.unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn status_change_notifies_exactly_once() {
        let h = Harness::new().await;
        let (org, _, action) = h.social_action("org@example.org").await;
        let user = h.account("volunteer@example.org", AccountType::User).await;
        let svc = &h.app.participation;

        let request = svc.create_request(request_for(user.user_id, action.id), &user).await.unwrap();
        let accept = || UpdateParticipationRequest { status: "accepted".to_string() };

        let accepted = svc.update_status(request.id, accept(), &org).await.unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);
        assert_eq!(h.notification_count(user.user_id).await, 1);

        // no change, no notification
        svc.update_status(request.id, accept(), &org).await.unwrap();
        assert_eq!(h.notification_count(user.user_id).await, 1);

        let reject = UpdateParticipationRequest { status: "rejected".to_string() };
        svc.update_status(request.id, reject, &org).await.unwrap();
        let inbox = h.app.notifications.list_my_notifications(false, &user).await.unwrap();
        assert_eq!(inbox.len(), 2);
        assert!(inbox.iter().any(|n| n.message.ends_with("has been rejected.")));
    }

    #[tokio::test]
    async fn status_change_survives_a_broken_inbox() {
        let h = Harness::with_sink(Arc::new(FailingSink)).await;
        let (org, _, action) = h.social_action("org@example.org").await;
        let user = h.account("volunteer@example.org", AccountType::User).await;
        let svc = &h.app.participation;

        let request = svc.create_request(request_for(user.user_id, action.id), &user).await.unwrap();
        let accept = UpdateParticipationRequest { status: "accepted".to_string() };
        let accepted = svc.update_status(request.id, accept, &org).await.unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);

        let stored = svc.get_request(request.id, &user).await.unwrap();
        assert_eq!(stored.status, RequestStatus::Accepted);
        assert_eq!(h.notification_count(user.user_id).await, 0);
    }

    #[tokio::test]
    async fn only_the_owning_foundation_decides() {
        let h = Harness::new().await;
        let (_, _, action) = h.social_action("org@example.org").await;
        let (rival, _) = h.foundation("rival@example.org").await;
        let user = h.account("volunteer@example.org", AccountType::User).await;
        let svc = &h.app.participation;

        let request = svc.create_request(request_for(user.user_id, action.id), &user).await.unwrap();
        let accept = || UpdateParticipationRequest { status: "accepted".to_string() };

        assert!(matches!(svc.update_status(request.id, accept(), &rival).await, Err(ServiceError::PermissionDenied(_))));
        assert!(matches!(svc.update_status(request.id, accept(), &user).await, Err(ServiceError::PermissionDenied(_))));
        assert!(matches!(
            svc.list_applications(action.id, None, &rival).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        assert!(matches!(svc.delete_request(request.id, &rival).await, Err(ServiceError::PermissionDenied(_))));

        let writer = h.account("admin@escritor.com", AccountType::User).await;
        svc.update_status(request.id, accept(), &writer).await.unwrap();
        assert_eq!(h.notification_count(user.user_id).await, 1);
    }

    #[tokio::test]
    async fn applications_filter_and_pending_queue() {
        let h = Harness::new().await;
        let (org, _, action) = h.social_action("org@example.org").await;
        let svc = &h.app.participation;

        let mut ids = Vec::new();
        for email in ["a@example.org", "b@example.org", "c@example.org"] {
            let user = h.account(email, AccountType::User).await;
            ids.push(svc.create_request(request_for(user.user_id, action.id), &user).await.unwrap().id);
        }
        let accept = UpdateParticipationRequest { status: "accepted".to_string() };
        svc.update_status(ids[1], accept, &org).await.unwrap();

        assert_eq!(svc.list_applications(action.id, None, &org).await.unwrap().len(), 3);
        let accepted = svc.list_applications(action.id, Some(RequestStatus::Accepted), &org).await.unwrap();
        assert_eq!(accepted.len(), 1);
        assert_eq!(accepted[0].id, ids[1]);

        let pending: Vec<_> = svc.list_pending(action.id, &org).await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(pending, vec![ids[0], ids[2]]);
    }

    #[tokio::test]
    async fn applicants_see_their_own_requests() {
        let h = Harness::new().await;
        let (org, _, action) = h.social_action("org@example.org").await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let svc = &h.app.participation;

        let request = svc.create_request(request_for(alice.user_id, action.id), &alice).await.unwrap();

        assert!(matches!(svc.get_request(request.id, &bob).await, Err(ServiceError::PermissionDenied(_))));
        assert!(matches!(svc.list_requests(&alice).await, Err(ServiceError::PermissionDenied(_))));
        assert_eq!(svc.list_user_requests(alice.user_id, &alice).await.unwrap().len(), 1);
        assert_eq!(svc.list_requests(&org).await.unwrap().len(), 1);

        svc.delete_request(request.id, &alice).await.unwrap();
        assert!(svc.list_user_requests(alice.user_id, &alice).await.unwrap().is_empty());
    }
}
