//! Wiring of repositories and services.
//!
//! Everything is built once from a pool and an [`AppConfig`] and shared behind
//! `Arc`s; there is no global state.

use crate::auth::{AuthService, JwtKeys};
use crate::config::AppConfig;
use crate::domains::certificate::repository::SqliteCertificateRepository;
use crate::domains::certificate::service::{CertificateService, CertificateServiceImpl};
use crate::domains::comment::repository::SqliteCommentRepository;
use crate::domains::comment::service::{CommentService, CommentServiceImpl};
use crate::domains::donation::repository::SqliteDonationRepository;
use crate::domains::donation::service::{DonationService, DonationServiceImpl};
use crate::domains::favorite::repository::SqliteFavoriteRepository;
use crate::domains::favorite::service::{FavoriteService, FavoriteServiceImpl};
use crate::domains::foundation::repository::{FoundationRepository, SqliteFoundationRepository};
use crate::domains::foundation::service::{FoundationService, FoundationServiceImpl};
use crate::domains::notification::dispatcher::{InboxNotificationSink, NotificationDispatcher, NotificationSink};
use crate::domains::notification::repository::{NotificationRepository, SqliteNotificationRepository};
use crate::domains::notification::service::{NotificationService, NotificationServiceImpl};
use crate::domains::participation::repository::{ParticipationRepository, SqliteParticipationRepository};
use crate::domains::participation::service::{ParticipationService, ParticipationServiceImpl};
use crate::domains::permission::{AccessControlEvaluator, OwnershipResolver, SqliteOwnershipResolver};
use crate::domains::rating::repository::SqliteRatingRepository;
use crate::domains::rating::service::{RatingService, RatingServiceImpl};
use crate::domains::social_action::repository::{SocialActionRepository, SqliteSocialActionRepository};
use crate::domains::social_action::service::{SocialActionService, SocialActionServiceImpl};
use crate::domains::suggestion::repository::SqliteSuggestionRepository;
use crate::domains::suggestion::service::{SuggestionService, SuggestionServiceImpl};
use crate::domains::user::repository::{SqliteUserRepository, UserRepository};
use crate::domains::user::service::{UserService, UserServiceImpl};
use crate::errors::ServiceResult;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppServices {
    pub evaluator: Arc<AccessControlEvaluator>,
    pub auth: Arc<AuthService>,
    pub users: Arc<dyn UserService>,
    pub favorites: Arc<dyn FavoriteService>,
    pub foundations: Arc<dyn FoundationService>,
    pub donations: Arc<dyn DonationService>,
    pub social_actions: Arc<dyn SocialActionService>,
    pub participation: Arc<dyn ParticipationService>,
    pub comments: Arc<dyn CommentService>,
    pub ratings: Arc<dyn RatingService>,
    pub certificates: Arc<dyn CertificateService>,
    pub notifications: Arc<dyn NotificationService>,
    pub suggestions: Arc<dyn SuggestionService>,
}

impl AppServices {
    /// Services whose notifications land in the account inbox
    pub fn new(pool: SqlitePool, config: &AppConfig) -> ServiceResult<Self> {
        let notifications: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(pool.clone()));
        let sink = Arc::new(InboxNotificationSink::new(notifications));
        Self::with_sink(pool, config, sink)
    }

    pub fn with_sink(
        pool: SqlitePool,
        config: &AppConfig,
        sink: Arc<dyn NotificationSink>,
    ) -> ServiceResult<Self> {
        let evaluator = Arc::new(AccessControlEvaluator::new(config.admin_capabilities.clone()));
        let resolver: Arc<dyn OwnershipResolver> = Arc::new(SqliteOwnershipResolver::new(pool.clone()));
        let notifier = NotificationDispatcher::new(sink);

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
        let foundation_repo: Arc<dyn FoundationRepository> = Arc::new(SqliteFoundationRepository::new(pool.clone()));
        let social_action_repo: Arc<dyn SocialActionRepository> =
            Arc::new(SqliteSocialActionRepository::new(pool.clone()));
        let participation_repo: Arc<dyn ParticipationRepository> =
            Arc::new(SqliteParticipationRepository::new(pool.clone()));
        let notification_repo: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(pool.clone()));

        let keys = JwtKeys::new(&config.jwt_secret, config.jwt_expires_in_secs)?;
        let auth = Arc::new(AuthService::new(user_repo.clone(), keys));

        Ok(Self {
            users: Arc::new(UserServiceImpl::new(user_repo.clone(), auth.clone(), evaluator.clone())),
            favorites: Arc::new(FavoriteServiceImpl::new(
                Arc::new(SqliteFavoriteRepository::new(pool.clone())),
                user_repo.clone(),
                evaluator.clone(),
            )),
            foundations: Arc::new(FoundationServiceImpl::new(
                foundation_repo.clone(),
                user_repo.clone(),
                evaluator.clone(),
            )),
            donations: Arc::new(DonationServiceImpl::new(
                Arc::new(SqliteDonationRepository::new(pool.clone())),
                user_repo.clone(),
                foundation_repo.clone(),
                resolver.clone(),
                evaluator.clone(),
            )),
            social_actions: Arc::new(SocialActionServiceImpl::new(
                social_action_repo.clone(),
                foundation_repo,
                participation_repo.clone(),
                user_repo.clone(),
                resolver.clone(),
                evaluator.clone(),
                notifier.clone(),
            )),
            participation: Arc::new(ParticipationServiceImpl::new(
                participation_repo.clone(),
                social_action_repo.clone(),
                user_repo.clone(),
                resolver.clone(),
                evaluator.clone(),
                notifier.clone(),
            )),
            comments: Arc::new(CommentServiceImpl::new(
                Arc::new(SqliteCommentRepository::new(pool.clone())),
                user_repo.clone(),
                participation_repo.clone(),
                resolver.clone(),
                evaluator.clone(),
            )),
            ratings: Arc::new(RatingServiceImpl::new(
                Arc::new(SqliteRatingRepository::new(pool.clone())),
                user_repo.clone(),
                participation_repo.clone(),
                resolver.clone(),
                evaluator.clone(),
            )),
            certificates: Arc::new(CertificateServiceImpl::new(
                Arc::new(SqliteCertificateRepository::new(pool.clone())),
                user_repo.clone(),
                social_action_repo,
                participation_repo,
                resolver,
                evaluator.clone(),
                notifier.clone(),
            )),
            notifications: Arc::new(NotificationServiceImpl::new(
                notification_repo,
                user_repo.clone(),
                evaluator.clone(),
            )),
            suggestions: Arc::new(SuggestionServiceImpl::new(
                Arc::new(SqliteSuggestionRepository::new(pool)),
                user_repo,
                evaluator.clone(),
                notifier,
            )),
            auth,
            evaluator,
        })
    }
}
