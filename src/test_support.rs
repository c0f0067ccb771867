//! Shared fixtures for service tests: a migrated in-memory database and the
//! full service graph on top of it.

use crate::app::AppServices;
use crate::auth::AuthContext;
use crate::config::AppConfig;
use crate::db_migration::test_pool;
use crate::domains::donation::types::{Donation, NewDonation};
use crate::domains::foundation::types::{Foundation, NewFoundation};
use crate::domains::notification::dispatcher::NotificationSink;
use crate::domains::social_action::types::{NewSocialAction, SocialAction};
use crate::domains::user::types::NewUser;
use crate::types::AccountType;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

pub struct Harness {
    pub pool: SqlitePool,
    pub app: AppServices,
}

impl Harness {
    pub async fn new() -> Self {
        let pool = test_pool().await;
        let app = AppServices::new(pool.clone(), &AppConfig::for_tests()).expect("services wire up");
        Self { pool, app }
    }

    /// Same graph, but notifications go to `sink` instead of the inbox
    pub async fn with_sink(sink: Arc<dyn NotificationSink>) -> Self {
        let pool = test_pool().await;
        let app = AppServices::with_sink(pool.clone(), &AppConfig::for_tests(), sink).expect("services wire up");
        Self { pool, app }
    }

    /// Registers an account and returns it as a caller
    pub async fn account(&self, email: &str, account_type: AccountType) -> AuthContext {
        let user = self
            .app
            .auth
            .register(NewUser {
                name: email.split('@').next().unwrap_or(email).to_string(),
                email: email.to_string(),
                password: "correct-horse-battery".to_string(),
                user_type: Some(account_type.as_str().to_string()),
            })
            .await
            .expect("account registers");
        AuthContext::new(user.id, user.email, user.user_type)
    }

    /// A foundation account together with its foundation profile
    pub async fn foundation(&self, email: &str) -> (AuthContext, Foundation) {
        let owner = self.account(email, AccountType::Foundation).await;
        let foundation = self
            .app
            .foundations
            .create_foundation(
                NewFoundation {
                    user_id: owner.user_id,
                    legal_name: format!("{} Trust", email),
                    address: "1 Main Street".to_string(),
                    phone: "+1 555 0100".to_string(),
                    website: None,
                },
                &owner,
            )
            .await
            .expect("foundation is created");
        (owner, foundation)
    }

    /// A foundation with one upcoming social action
    pub async fn social_action(&self, email: &str) -> (AuthContext, Foundation, SocialAction) {
        let (owner, foundation) = self.foundation(email).await;
        let start_date = Utc::now() + Duration::days(7);
        let action = self
            .app
            .social_actions
            .create_social_action(
                NewSocialAction {
                    foundation_id: foundation.id,
                    description: "Community garden".to_string(),
                    start_date,
                    end_date: start_date + Duration::hours(6),
                },
                &owner,
            )
            .await
            .expect("social action is published");
        (owner, foundation, action)
    }

    pub async fn donation(&self, donor: &AuthContext, foundation_id: Uuid) -> Donation {
        self.app
            .donations
            .create_donation(
                NewDonation { user_id: donor.user_id, foundation_id, amount: Decimal::new(2500, 2) },
                donor,
            )
            .await
            .expect("donation is recorded")
    }

    pub async fn notification_count(&self, user_id: Uuid) -> usize {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .expect("notifications are countable");
        count as usize
    }
}
