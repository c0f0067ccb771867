use crate::auth::AuthContext;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::donation::repository::DonationRepository;
use crate::domains::donation::types::{Donation, NewDonation, UpdateDonation};
use crate::domains::foundation::repository::FoundationRepository;
use crate::domains::permission::{
    AccessControlEvaluator, AccessScope, Action, OwnershipResolver, ParentRef, ResourceKind,
};
use crate::domains::user::repository::UserRepository;
use crate::errors::{ServiceError, ServiceResult};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait DonationService: Send + Sync {
    async fn create_donation(&self, new: NewDonation, auth: &AuthContext) -> ServiceResult<Donation>;

    /// Everything for admins and foundations, the caller's own donations otherwise
    async fn list_donations(&self, auth: &AuthContext) -> ServiceResult<Vec<Donation>>;

    async fn list_user_donations(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Donation>>;

    /// The foundation's owner sees every donation it received; a donor sees
    /// only their own donations to it.
    async fn list_foundation_donations(&self, foundation_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Donation>>;

    async fn get_donation(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Donation>;

    async fn update_donation(&self, id: Uuid, update: UpdateDonation, auth: &AuthContext) -> ServiceResult<Donation>;

    async fn delete_donation(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct DonationServiceImpl {
    repo: Arc<dyn DonationRepository>,
    users: Arc<dyn UserRepository>,
    foundations: Arc<dyn FoundationRepository>,
    resolver: Arc<dyn OwnershipResolver>,
    evaluator: Arc<AccessControlEvaluator>,
}

impl DonationServiceImpl {
    pub fn new(
        repo: Arc<dyn DonationRepository>,
        users: Arc<dyn UserRepository>,
        foundations: Arc<dyn FoundationRepository>,
        resolver: Arc<dyn OwnershipResolver>,
        evaluator: Arc<AccessControlEvaluator>,
    ) -> Self {
        Self { repo, users, foundations, resolver, evaluator }
    }
}

#[async_trait]
impl DonationService for DonationServiceImpl {
    async fn create_donation(&self, new: NewDonation, auth: &AuthContext) -> ServiceResult<Donation> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::Donation, &[new.user_id])?;
        new.validate()?;

        self.users.find_by_id(new.user_id).await?;
        self.foundations.find_by_id(new.foundation_id).await?;

        let donation = self.repo.create(new.user_id, new.foundation_id, new.amount).await?;
        log::info!(
            "Donation {} of {} from {} to foundation {}",
            donation.id, donation.amount, donation.user_id, donation.foundation_id
        );
        Ok(donation)
    }

    async fn list_donations(&self, auth: &AuthContext) -> ServiceResult<Vec<Donation>> {
        let decision = self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Donation, &[auth.user_id])?;

        let donations = match decision.scope {
            AccessScope::All => self.repo.find_all().await?,
            AccessScope::Own => self.repo.find_by_user(auth.user_id).await?,
        };
        Ok(donations)
    }

    async fn list_user_donations(&self, user_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Donation>> {
        self.evaluator.authorize(auth, Action::ReadAll, ResourceKind::Donation, &[user_id])?;
        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn list_foundation_donations(&self, foundation_id: Uuid, auth: &AuthContext) -> ServiceResult<Vec<Donation>> {
        let foundation = self.foundations.find_by_id(foundation_id).await?;

        let decision = self.evaluator.evaluate(auth, Action::ReadAll, ResourceKind::Foundation, &[foundation.user_id]);
        if decision.allowed {
            return Ok(self.repo.find_by_foundation(foundation_id).await?);
        }

        let mine = self.repo.find_by_user_and_foundation(auth.user_id, foundation_id).await?;
        if mine.is_empty() {
            return Err(ServiceError::PermissionDenied(
                "You can only view donations to foundations where you have donated".to_string(),
            ));
        }
        Ok(mine)
    }

    async fn get_donation(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<Donation> {
        let donation = self.repo.find_by_id(id).await?;
        let linked = self.resolver.owning_accounts(ParentRef::Donation(id)).await?;
        self.evaluator.authorize(auth, Action::ReadOne, ResourceKind::Donation, &linked)?;
        Ok(donation)
    }

    async fn update_donation(&self, id: Uuid, update: UpdateDonation, auth: &AuthContext) -> ServiceResult<Donation> {
        let donation = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Donation, &[donation.user_id])?;
        update.validate()?;

        match update.amount {
            Some(amount) => Ok(self.repo.update_amount(id, amount).await?),
            None => Ok(donation),
        }
    }

    async fn delete_donation(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        let donation = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Donation, &[donation.user_id])?;

        self.repo.hard_delete(id).await?;
        log::info!("Donation {} deleted by {}", id, auth.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::donation::types::{NewDonation, UpdateDonation};
    use crate::errors::{DomainError, ServiceError};
    use crate::test_support::Harness;
    use crate::types::AccountType;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn donors_donate_as_themselves() {
        let h = Harness::new().await;
        let (_, foundation) = h.foundation("org@example.org").await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let svc = &h.app.donations;

        let new = |user_id| NewDonation { user_id, foundation_id: foundation.id, amount: dec!(25.50) };
        let donation = svc.create_donation(new(alice.user_id), &alice).await.unwrap();
        assert_eq!(donation.amount, dec!(25.5));

        assert!(matches!(
            svc.create_donation(new(alice.user_id), &bob).await,
            Err(ServiceError::PermissionDenied(_))
        ));

        let writer = h.account("admin@escritor.com", AccountType::User).await;
        svc.create_donation(new(bob.user_id), &writer).await.unwrap();
    }

    #[tokio::test]
    async fn invalid_amounts_and_missing_foundations() {
        let h = Harness::new().await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let (_, foundation) = h.foundation("org@example.org").await;

        let zero = NewDonation { user_id: alice.user_id, foundation_id: foundation.id, amount: dec!(0) };
        let err = h.app.donations.create_donation(zero, &alice).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));

        let orphan = NewDonation { user_id: alice.user_id, foundation_id: uuid::Uuid::new_v4(), amount: dec!(5) };
        let err = h.app.donations.create_donation(orphan, &alice).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn listing_is_scoped_by_role() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let svc = &h.app.donations;

        for donor in [&alice, &bob] {
            let new = NewDonation { user_id: donor.user_id, foundation_id: foundation.id, amount: dec!(10) };
            svc.create_donation(new, donor).await.unwrap();
        }

        let mine = svc.list_donations(&alice).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].user_id, alice.user_id);
        assert_eq!(svc.list_donations(&org).await.unwrap().len(), 2);

        let reader = h.account("admin@lector.com", AccountType::User).await;
        assert_eq!(svc.list_donations(&reader).await.unwrap().len(), 2);

        assert!(matches!(
            svc.list_user_donations(bob.user_id, &alice).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        assert_eq!(svc.list_user_donations(bob.user_id, &org).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn foundation_donations_for_owner_and_donors() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let (rival, _) = h.foundation("rival@example.org").await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let svc = &h.app.donations;

        for donor in [&alice, &bob] {
            let new = NewDonation { user_id: donor.user_id, foundation_id: foundation.id, amount: dec!(3) };
            svc.create_donation(new, donor).await.unwrap();
        }

        assert_eq!(svc.list_foundation_donations(foundation.id, &org).await.unwrap().len(), 2);
        let alices = svc.list_foundation_donations(foundation.id, &alice).await.unwrap();
        assert_eq!(alices.len(), 1);
        assert!(matches!(
            svc.list_foundation_donations(foundation.id, &rival).await,
            Err(ServiceError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn single_donation_visible_to_donor_and_recipient() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let (rival, _) = h.foundation("rival@example.org").await;
        let alice = h.account("alice@example.org", AccountType::User).await;
        let bob = h.account("bob@example.org", AccountType::User).await;
        let svc = &h.app.donations;

        let new = NewDonation { user_id: alice.user_id, foundation_id: foundation.id, amount: dec!(7.25) };
        let donation = svc.create_donation(new, &alice).await.unwrap();

        svc.get_donation(donation.id, &alice).await.unwrap();
        svc.get_donation(donation.id, &org).await.unwrap();
        assert!(matches!(svc.get_donation(donation.id, &bob).await, Err(ServiceError::PermissionDenied(_))));
        assert!(matches!(svc.get_donation(donation.id, &rival).await, Err(ServiceError::PermissionDenied(_))));

        // the recipient cannot rewrite the amount
        let raise = || UpdateDonation { amount: Some(dec!(100)) };
        assert!(matches!(svc.update_donation(donation.id, raise(), &org).await, Err(ServiceError::PermissionDenied(_))));
        let updated = svc.update_donation(donation.id, raise(), &alice).await.unwrap();
        assert_eq!(updated.amount, dec!(100));
        assert_eq!(updated.foundation_id, foundation.id);

        svc.delete_donation(donation.id, &alice).await.unwrap();
        let gone = svc.get_donation(donation.id, &alice).await.unwrap_err();
        assert!(matches!(gone, ServiceError::Domain(ref e) if e.is_not_found()));
    }
}
