use crate::auth::AuthContext;
use crate::domains::core::repository::{FindById, HardDeletable};
use crate::domains::participation::repository::ParticipationRepository;
use crate::domains::permission::{AccessControlEvaluator, Action, OwnershipResolver, ParentRef, ResourceKind};
use crate::domains::rating::repository::RatingRepository;
use crate::domains::rating::types::{NewRating, Rating, UpdateRating};
use crate::domains::user::repository::UserRepository;
use crate::errors::{DomainError, ServiceError, ServiceResult};
use crate::validation::Validate;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Ratings of donations and social actions. Reads are public.
#[async_trait]
pub trait RatingService: Send + Sync {
    async fn create_rating(&self, new: NewRating, auth: &AuthContext) -> ServiceResult<Rating>;

    async fn list_ratings(&self) -> ServiceResult<Vec<Rating>>;

    async fn list_user_ratings(&self, user_id: Uuid) -> ServiceResult<Vec<Rating>>;

    async fn list_target_ratings(&self, target: ParentRef) -> ServiceResult<Vec<Rating>>;

    /// 0 when the target has not been rated yet
    async fn average_rating(&self, target: ParentRef) -> ServiceResult<f64>;

    async fn get_rating(&self, id: Uuid) -> ServiceResult<Rating>;

    async fn update_rating(&self, id: Uuid, update: UpdateRating, auth: &AuthContext) -> ServiceResult<Rating>;

    async fn delete_rating(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()>;
}

pub struct RatingServiceImpl {
    repo: Arc<dyn RatingRepository>,
    users: Arc<dyn UserRepository>,
    participation: Arc<dyn ParticipationRepository>,
    resolver: Arc<dyn OwnershipResolver>,
    evaluator: Arc<AccessControlEvaluator>,
}

impl RatingServiceImpl {
    pub fn new(
        repo: Arc<dyn RatingRepository>,
        users: Arc<dyn UserRepository>,
        participation: Arc<dyn ParticipationRepository>,
        resolver: Arc<dyn OwnershipResolver>,
        evaluator: Arc<AccessControlEvaluator>,
    ) -> Self {
        Self { repo, users, participation, resolver, evaluator }
    }
}

#[async_trait]
impl RatingService for RatingServiceImpl {
    async fn create_rating(&self, new: NewRating, auth: &AuthContext) -> ServiceResult<Rating> {
        self.evaluator.authorize(auth, Action::Create, ResourceKind::Rating, &[new.user_id])?;
        new.validate()?;
        let target = new.target()?;

        self.users.find_by_id(new.user_id).await?;
        let linked = self.resolver.owning_accounts(target).await?;

        if self.repo.exists_for(new.user_id, target).await? {
            return Err(DomainError::Conflict(format!(
                "User already rated this {}",
                target.entity_name().to_lowercase()
            ))
            .into());
        }

        // The rater has to be part of what they rate, whoever files the rating.
        match target {
            ParentRef::Donation(_) if !linked.contains(&new.user_id) => {
                return Err(ServiceError::PermissionDenied(
                    "You can only rate donations you are part of".to_string(),
                ));
            }
            ParentRef::SocialAction(action_id) => {
                let accepted = self
                    .participation
                    .find_for_user_and_action(new.user_id, action_id)
                    .await?
                    .map(|r| r.is_accepted())
                    .unwrap_or(false);
                if !accepted {
                    return Err(ServiceError::PermissionDenied(
                        "You can only rate social actions you have participated in".to_string(),
                    ));
                }
            }
            _ => {}
        }

        Ok(self.repo.create(new.user_id, target, new.rating).await?)
    }

    async fn list_ratings(&self) -> ServiceResult<Vec<Rating>> {
        Ok(self.repo.find_all().await?)
    }

    async fn list_user_ratings(&self, user_id: Uuid) -> ServiceResult<Vec<Rating>> {
        Ok(self.repo.find_by_user(user_id).await?)
    }

    async fn list_target_ratings(&self, target: ParentRef) -> ServiceResult<Vec<Rating>> {
        Ok(self.repo.find_by_target(target).await?)
    }

    async fn average_rating(&self, target: ParentRef) -> ServiceResult<f64> {
        self.resolver.owning_accounts(target).await?;
        Ok(self.repo.average_for(target).await?.unwrap_or(0.0))
    }

    async fn get_rating(&self, id: Uuid) -> ServiceResult<Rating> {
        Ok(self.repo.find_by_id(id).await?)
    }

    async fn update_rating(&self, id: Uuid, update: UpdateRating, auth: &AuthContext) -> ServiceResult<Rating> {
        let rating = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Update, ResourceKind::Rating, &[rating.user_id])?;
        update.validate()?;

        match update.rating {
            Some(score) => Ok(self.repo.update_score(id, score).await?),
            None => Ok(rating),
        }
    }

    async fn delete_rating(&self, id: Uuid, auth: &AuthContext) -> ServiceResult<()> {
        let rating = self.repo.find_by_id(id).await?;
        self.evaluator.authorize(auth, Action::Delete, ResourceKind::Rating, &[rating.user_id])?;

        self.repo.hard_delete(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::participation::types::{NewParticipationRequest, UpdateParticipationRequest};
    use crate::domains::permission::ParentRef;
    use crate::domains::rating::types::{NewRating, UpdateRating};
    use crate::errors::ServiceError;
    use crate::test_support::Harness;
    use crate::types::AccountType;
    use uuid::Uuid;

    fn rate_action(user_id: Uuid, action_id: Uuid, rating: i64) -> NewRating {
        NewRating { user_id, donation_id: None, social_action_id: Some(action_id), rating }
    }

    fn rate_donation(user_id: Uuid, donation_id: Uuid, rating: i64) -> NewRating {
        NewRating { user_id, donation_id: Some(donation_id), social_action_id: None, rating }
    }

    #[tokio::test]
    async fn rating_an_action_requires_acceptance() {
        let h = Harness::new().await;
        let (org, _, action) = h.social_action("org@example.org").await;
        let user = h.account("volunteer@example.org", AccountType::User).await;
        let svc = &h.app.ratings;

        // no request at all
        assert!(matches!(
            svc.create_rating(rate_action(user.user_id, action.id, 4), &user).await,
            Err(ServiceError::PermissionDenied(_))
        ));

        let request = h
            .app
            .participation
            .create_request(
                NewParticipationRequest { user_id: user.user_id, social_action_id: action.id, status: None, message: None },
                &user,
            )
            .await
            .unwrap();

        // still pending
        assert!(matches!(
            svc.create_rating(rate_action(user.user_id, action.id, 4), &user).await,
            Err(ServiceError::PermissionDenied(_))
        ));

        h.app
            .participation
            .update_status(request.id, UpdateParticipationRequest { status: "accepted".to_string() }, &org)
            .await
            .unwrap();
        let rating = svc.create_rating(rate_action(user.user_id, action.id, 4), &user).await.unwrap();
        assert_eq!(rating.social_action_id, Some(action.id));

        let dup = svc.create_rating(rate_action(user.user_id, action.id, 2), &user).await.unwrap_err();
        assert!(matches!(dup, ServiceError::Domain(ref e) if e.is_conflict()));
    }

    #[tokio::test]
    async fn donations_are_rated_by_the_people_involved() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let donor = h.account("donor@example.org", AccountType::User).await;
        let stranger = h.account("stranger@example.org", AccountType::User).await;
        let donation = h.donation(&donor, foundation.id).await;
        let svc = &h.app.ratings;

        svc.create_rating(rate_donation(donor.user_id, donation.id, 5), &donor).await.unwrap();
        svc.create_rating(rate_donation(org.user_id, donation.id, 4), &org).await.unwrap();
        assert!(matches!(
            svc.create_rating(rate_donation(stranger.user_id, donation.id, 1), &stranger).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        // rating on someone else's behalf
        assert!(matches!(
            svc.create_rating(rate_donation(donor.user_id, donation.id, 1), &stranger).await,
            Err(ServiceError::PermissionDenied(_))
        ));

        let average = svc.average_rating(ParentRef::Donation(donation.id)).await.unwrap();
        assert!((average - 4.5).abs() < f64::EPSILON);
        assert_eq!(svc.list_target_ratings(ParentRef::Donation(donation.id)).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn averages_default_to_zero_but_need_a_target() {
        let h = Harness::new().await;
        let (_, _, action) = h.social_action("org@example.org").await;

        assert_eq!(h.app.ratings.average_rating(ParentRef::SocialAction(action.id)).await.unwrap(), 0.0);
        let missing = h.app.ratings.average_rating(ParentRef::Donation(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(missing, ServiceError::Domain(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn only_the_rater_changes_a_rating() {
        let h = Harness::new().await;
        let (org, foundation) = h.foundation("org@example.org").await;
        let donor = h.account("donor@example.org", AccountType::User).await;
        let donation = h.donation(&donor, foundation.id).await;
        let svc = &h.app.ratings;

        let rating = svc.create_rating(rate_donation(donor.user_id, donation.id, 3), &donor).await.unwrap();

        assert!(matches!(
            svc.update_rating(rating.id, UpdateRating { rating: Some(1) }, &org).await,
            Err(ServiceError::PermissionDenied(_))
        ));
        let updated = svc.update_rating(rating.id, UpdateRating { rating: Some(5) }, &donor).await.unwrap();
        assert_eq!(updated.rating, 5);

        assert!(matches!(svc.delete_rating(rating.id, &org).await, Err(ServiceError::PermissionDenied(_))));
        svc.delete_rating(rating.id, &donor).await.unwrap();
        assert!(svc.list_user_ratings(donor.user_id).await.unwrap().is_empty());
    }
}
