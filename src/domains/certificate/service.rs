use crate::auth::AuthContext;
use crate::domains::certificate::repository::CertificateRepository;
use crate::domains::certificate::types::{
    Certificate, CertificateDownload, NewCertificate, ParticipationCertificateRequest, UpdateCertificate,
};
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::notification::NotificationDispatcher;
use crate::domains::participation::repository::ParticipationRepository;
use crate::domains::permission::{
    AccessControlEvaluator, AccessScope, Action, OwnershipResolver, ParentRef, ResourceKind,
};
use crate::domains::social_action::repository::SocialActionRepository;
use crate::domains::user::repository::UserRepository;
use crate::errors::{ServiceError, ServiceResult};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait CertificateService: Send + Sync {
    /// Issues a certificate and notifies its holder
    async fn create_certificate(&self, new: NewCertificate, auth: &AuthContext) -> ServiceResult<Certificate>;

    /// Certificate for an accepted participant of a social action, issued by
    /// the participant, the publishing foundation or a write admin
    async fn generate_participation_certificate(
        &self,
        request: ParticipationCertificateRequest,
        auth: &AuthContext,
    ) -> ServiceResult<Certificate>;

    async fn list_certificates(&self, auth: &AuthContext) -> ServiceResult<Vec<Certificate>>;

    async fn list_user_certificates(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Certificate>>;

    async fn get_certificate(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Certificate>;

    async fn download_certificate(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<CertificateDownload>;

    async fn update_certificate(&self, id: Uuid, update: UpdateCertificate, auth: &AuthContext) -> ServiceResult<Certificate>;

    async fn delete_certificate(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct CertificateServiceImpl {
    repo: Arc<dyn CertificateRepository>,
    users: Arc<dyn UserRepository>,
    social_actions: Arc<dyn SocialActionRepository>,
    participation: Arc<dyn ParticipationRepository>,
    resolver: Arc<dyn OwnershipResolver>,
    evaluator: Arc<AccessControlEvaluator>,
    notifier: NotificationDispatcher,
}

impl CertificateServiceImpl {
    pub fn new(
        repo: Arc<dyn CertificateRepository>,
        users: Arc<dyn UserRepository>,
        social_actions: Arc<dyn SocialActionRepository>,
        participation: Arc<dyn ParticipationRepository>,
        resolver: Arc<dyn OwnershipResolver>,
        evaluator: Arc<AccessControlEvaluator>,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self { repo, users, social_actions, participation, resolver, evaluator, notifier }
    }

    async fn issue(&self, new: &NewCertificate) -> ServiceResult<Certificate> {
        let certificate = self.repo.create(new).await?;
        log::info!("Certificate {} issued to {}", certificate.id, certificate.user_id);

        self.notifier
            .dispatch(
                certificate.user_id,
                format!("You have received a new certificate: {}", certificate.description),
            )
            .await;
        Ok(certificate)
    }
}

#[async_trait]
impl CertificateService for CertificateServiceImpl {
    async fn create_certificate(&self, new: NewCertificate, auth: &AuthContext) -> ServiceResult<Certificate> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::Certificate, &[new.user_id])?;
        new.validate()?;
        self.users.find_by_id(new.user_id).await?;

        self.issue(&new).await
    }

    async fn generate_participation_certificate(
        &self,
        request: ParticipationCertificateRequest,
        auth: &AuthContext,
    ) -> ServiceResult<Certificate> {
        let decision = self.evaluator.evaluate(auth, Action::Create, ResourceKind::Certificate, &[request.user_id]);
        if !decision.allowed {
            self.resolver
                .ensure_owned_by(ParentRef::SocialAction(request.social_action_id), auth.user_id)
                .await?;
        }

        self.users.find_by_id(request.user_id).await?;
        let action = self.social_actions.find_by_id(request.social_action_id).await?;
        let participated = self
            .participation
            .find_for_user_and_action(request.user_id, request.social_action_id)
            .await?
            .map(|r| r.is_accepted())
            .unwrap_or(false);
        if !participated {
            return Err(ServiceError::PermissionDenied(
                "User has not participated in this social action".to_string(),
            ));
        }

        let new = NewCertificate {
            user_id: request.user_id,
            description: format!("Certificate of participation in social action: {}", action.description),
        };
        self.issue(&new).await
    }

    async fn list_certificates(&self, auth: &AuthContext) -> ServiceResult<Vec<Certificate>> {
        let decision = self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Certificate, &[auth.user_id])?;

        let certificates = match decision.scope {
            AccessScope::All => self.repo.find_all().await?,
            AccessScope::Own => self.repo.find_by_user(auth.user_id).await?,
        };
        Ok(certificates)
    }

    async fn list_user_certificates(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Certificate>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Certificate, &[user_id])?;
        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn get_certificate(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Certificate> {
        let certificate = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::ReadOne, ResourceKind::Certificate, &[certificate.user_id])?;
        Ok(certificate)
    }

    async fn download_certificate(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<CertificateDownload> {
        Ok(self.get_certificate(id, auth).await?.into())
    }

    async fn update_certificate(&self, id: Uuid, update: UpdateCertificate, auth: &AuthContext) -> ServiceResult<Certificate> {
        self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Certificate, &[])?;
        update.validate()?;

        Ok(self.repo.update(id, &update).await?)
    }

    async fn delete_certificate(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Certificate, &[])?;

        self.repo.hard_delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::certificate::types::{NewCertificate, ParticipationCertificateRequest, UpdateCertificate};
    use crate::domains::notification::dispatcher::tests::FailingSink;
    use crate::domains::participation::types::{NewParticipationRequest, UpdateParticipationRequest};
    use crate::errors::ServiceError;
    use crate::test_support::Harness;
    use crate::types::AccountType;
    use std::sync::Arc;

    fn certificate_for(user_id: uuid::Uuid) -> NewCertificate {
        NewCertificate { user_id, description: "Volunteer of the month".to_string() }
    }

    #[tokio::test]
    async fn issuing_notifies_the_holder() {
        let h = Harness::new().await;
        let user = h.account("u@example.org", AccountType::User).await;
        let writer = h.account("admin@escritor.com", AccountType::User).await;

        let certificate = h.app.certificates.create_certificate(certificate_for(user.user_id), &writer).await.unwrap();
        assert_eq!(certificate.user_id, user.user_id);

        let inbox = h.app.notifications.list_my_notifications(false, &user).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].message, "You have received a new certificate: Volunteer of the month");
    }

    #[tokio::test]
    async fn cross_account_issuance_needs_write_admin() {
        let h = Harness::new().await;
        let user = h.account("u@example.org", AccountType::User).await;
        let (org, _) = h.foundation("org@example.org").await;

        assert!(matches!(
            h.app.certificates.create_certificate(certificate_for(user.user_id), &org).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        h.app.certificates.create_certificate(certificate_for(user.user_id), &user).await.unwrap();
    }

    #[tokio::test]
    async fn holders_read_and_foundations_manage() {
        let h = Harness::new().await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let (org, _) = h.foundation("org@example.org").await;
        let svc = &h.app.certificates;

        let certificate = svc.create_certificate(certificate_for(alice.user_id), &alice).await.unwrap();

        assert!(matches!(svc.get_certificate(certificate.id, &bob).await, Err(ServiceError::PermissionDenied(_))));
        let download = svc.download_certificate(certificate.id, &alice).await.unwrap();
        assert!(download.download_url.ends_with("/pdf"));
        svc.get_certificate(certificate.id, &org).await.unwrap();

        assert_eq!(svc.list_certificates(&bob).await.unwrap().len(), 0);
        assert_eq!(svc.list_certificates(&org).await.unwrap().len(), 1);

        // holders cannot rewrite their own certificates
        let edit = || UpdateCertificate { description: Some("Hero".to_string()) };
        assert!(matches!(svc.update_certificate(certificate.id, edit(), &alice).await, Err(ServiceError::PermissionDenied(_))));
        assert_eq!(svc.update_certificate(certificate.id, edit(), &org).await.unwrap().description, "Hero");

        assert!(matches!(svc.delete_certificate(certificate.id, &alice).await, Err(ServiceError::PermissionDenied(_))));
        svc.delete_certificate(certificate.id, &org).await.unwrap();
    }

    #[tokio::test]
    async fn participation_certificates_for_accepted_volunteers() {
        let h = Harness::new().await;
        let (org, _, action) = h.social_action("org@example.org").await;
        let (rival, _) = h.foundation("rival@example.org").await;
        let volunteer = h.account("volunteer@example.org", AccountType::User).await;
        let svc = &h.app.certificates;

        let ask = || ParticipationCertificateRequest { user_id: volunteer.user_id, social_action_id: action.id };
        assert!(matches!(svc.generate_participation_certificate(ask(), &org).await, Err(ServiceError::PermissionDenied(_))));

        let request = h
            .app
            .participation
            .create_request(
                NewParticipationRequest { user_id: volunteer.user_id, social_action_id: action.id, status: None, message: None },
                &volunteer,
            )
            .await
            .unwrap();
        h.app
            .participation
            .update_status(request.id, UpdateParticipationRequest { status: "accepted".to_string() }, &org)
            .await
            .unwrap();

        assert!(matches!(svc.generate_participation_certificate(ask(), &rival).await, Err(ServiceError::PermissionDenied(_))));
        let certificate = svc.generate_participation_certificate(ask(), &org).await.unwrap();
        assert!(certificate.description.starts_with("Certificate of participation in social action: "));
        assert_eq!(certificate.user_id, volunteer.user_id);
    }

    #[tokio::test]
    async fn issuance_survives_a_broken_inbox() {
        let h = Harness::with_sink(Arc::new(FailingSink)).await;
        let user = h.account("u@example.org", AccountType::User).await;

        let certificate = h.app.certificates.create_certificate(certificate_for(user.user_id), &user).await.unwrap();

        let stored = h.app.certificates.get_certificate(certificate.id, &user).await.unwrap();
        assert_eq!(stored.description, "Volunteer of the month");
        assert_eq!(h.notification_count(user.user_id).await, 0);
    }
}
