use crate::errors::{ServiceError, ServiceResult, DomainError};
use crate::auth::{AuthContext, jwt};
use crate::auth::jwt::JwtKeys;
use crate::domains::core::repository::FindById;
use crate::domains::user::repository::{UserRecord, UserRepository};
use crate::domains::user::types::{Credentials, NewUser, User, UserResponse};
use crate::validation::Validate;
use argon2::{Argon2, PasswordHash, PasswordVerifier, PasswordHasher, password_hash::SaltString};
// Use the older rand version for compatibility with argon2
use rand_core::OsRng as ArgonOsRng;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Turns credentials into tokens and tokens into callers
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    /// Create an account. Open to anonymous callers.
    pub async fn register(&self, new_user: NewUser) -> ServiceResult<User> {
        new_user.validate()?;

        let record = UserRecord {
            user_type: new_user.account_type(),
            password_hash: self.hash_password(&new_user.password)?,
            name: new_user.name.trim().to_string(),
            email: new_user.email,
        };

        let user = self.users.create(record).await?;
        log::info!("Registered {} account {}", user.user_type, user.id);
        Ok(user)
    }

    /// Authenticate with email and password
    pub async fn login(&self, credentials: Credentials) -> ServiceResult<LoginResult> {
        credentials.validate()?;

        let user = match self.users.find_by_email(&credentials.email).await? {
            Some(user) => user,
            None => {
                log::info!("Failed login for unknown email");
                return Err(ServiceError::Authentication("Invalid email or password".to_string()));
            }
        };

        if self.verify_password(&credentials.password, &user.password_hash).is_err() {
            log::info!("Failed login for account {}", user.id);
            return Err(ServiceError::Authentication("Invalid email or password".to_string()));
        }

        self.users.update_last_login(user.id).await?;

        let (access_token, expires_at) = jwt::generate_token(&self.keys, &user.id, &user.email, user.user_type)?;

        log::info!("Account {} logged in", user.id);
        Ok(LoginResult {
            access_token,
            expires_at,
            user: user.into(),
        })
    }

    /// Resolve a bearer token to the caller it was issued for.
    ///
    /// Email and role come from the stored account, so a role change or a
    /// deleted account takes effect without waiting for the token to expire.
    pub async fn verify_token(&self, token: &str) -> ServiceResult<AuthContext> {
        let claims = jwt::verify_token(&self.keys, token)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Authentication("Invalid user ID in token".to_string()))?;

        let user = match self.users.find_by_id(user_id).await {
            Ok(user) => user,
            Err(DomainError::EntityNotFound(..)) => {
                return Err(ServiceError::Authentication("Account no longer exists".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(AuthContext::new(user.id, user.email, user.user_type))
    }

    /// Generate a hash for a new password
    pub fn hash_password(&self, password: &str) -> ServiceResult<String> {
        let mut rng = ArgonOsRng;
        let salt = SaltString::generate(&mut rng);

        let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Domain(DomainError::Internal(format!("Failed to hash password: {}", e))))?
            .to_string();

        Ok(password_hash)
    }

    fn verify_password(&self, password: &str, hash: &str) -> Result<(), ServiceError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| ServiceError::Domain(DomainError::Internal("Invalid password hash format".to_string())))?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| ServiceError::Authentication("Invalid password".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db_migration::test_pool;
    use crate::domains::user::repository::SqliteUserRepository;
    use crate::types::AccountType;

    async fn service() -> AuthService {
        let pool = test_pool().await;
        AuthService::new(
            Arc::new(SqliteUserRepository::new(pool)),
            JwtKeys::new("test-secret", 3600).unwrap(),
        )
    }

    fn registration(email: &str) -> NewUser {
        NewUser {
            name: "Marta".to_string(),
            email: email.to_string(),
            password: "hunter22".to_string(),
            user_type: Some("foundation".to_string()),
        }
    }

    #[tokio::test]
    async fn register_login_and_resolve_caller() {
        let auth = service().await;
        let user = auth.register(registration("marta@example.org")).await.unwrap();
        assert_ne!(user.password_hash, "hunter22");

        let login = auth
            .login(Credentials { email: "marta@example.org".to_string(), password: "hunter22".to_string() })
            .await
            .unwrap();
        assert_eq!(login.user.id, user.id);

        let caller = auth.verify_token(&login.access_token).await.unwrap();
        assert_eq!(caller.user_id, user.id);
        assert_eq!(caller.email, "marta@example.org");
        assert_eq!(caller.role, AccountType::Foundation);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let auth = service().await;
        auth.register(registration("dup@example.org")).await.unwrap();
        let err = auth.register(registration("dup@example.org")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(ref e) if e.is_conflict()));
    }

    #[tokio::test]
    async fn wrong_password_is_an_authentication_error() {
        let auth = service().await;
        auth.register(registration("who@example.org")).await.unwrap();
        let err = auth
            .login(Credentials { email: "who@example.org".to_string(), password: "nope-nope".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Authentication(_)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let auth = service().await;
        assert!(matches!(auth.verify_token("abc.def.ghi").await, Err(ServiceError::Authentication(_))));
    }
}
