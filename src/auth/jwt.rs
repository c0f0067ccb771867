use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use crate::errors::{ServiceError, ServiceResult, DomainError};
use crate::types::AccountType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub user_type: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Signing material and token lifetime, built once from configuration.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, expires_in_secs: i64) -> ServiceResult<Self> {
        if secret.is_empty() {
            return Err(ServiceError::Configuration("JWT secret must not be empty".to_string()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expires_in: Duration::seconds(expires_in_secs),
        })
    }

    pub fn expires_in(&self) -> Duration {
        self.expires_in
    }
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("expires_in", &self.expires_in)
            .finish_non_exhaustive()
    }
}

/// Generate an access token for an account
pub fn generate_token(
    keys: &JwtKeys,
    user_id: &Uuid,
    email: &str,
    user_type: AccountType,
) -> ServiceResult<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expiry = now + keys.expires_in;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        user_type: user_type.as_str().to_string(),
        iat: now.timestamp(),
        exp: expiry.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(|e| ServiceError::Domain(DomainError::Internal(format!("JWT encoding error: {}", e))))?;

    Ok((token, expiry))
}

/// Verify signature and expiry of a token
pub fn verify_token(keys: &JwtKeys, token: &str) -> ServiceResult<Claims> {
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &keys.decoding,
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ServiceError::SessionExpired,
        _ => ServiceError::Authentication(format!("Invalid token: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies() {
        let keys = JwtKeys::new("secret", 60).unwrap();
        let id = Uuid::new_v4();
        let (token, expiry) = generate_token(&keys, &id, "a@b.org", AccountType::Foundation).unwrap();
        assert!(expiry > Utc::now());

        let claims = verify_token(&keys, &token).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.email, "a@b.org");
        assert_eq!(claims.user_type, "foundation");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let keys = JwtKeys::new("secret", 60).unwrap();
        let other = JwtKeys::new("another", 60).unwrap();
        let (token, _) = generate_token(&keys, &Uuid::new_v4(), "a@b.org", AccountType::User).unwrap();
        assert!(matches!(verify_token(&other, &token), Err(ServiceError::Authentication(_))));
    }

    #[test]
    fn expired_token_reports_session_expired() {
        // beyond the default 60s leeway
        let keys = JwtKeys::new("secret", -600).unwrap();
        let (token, _) = generate_token(&keys, &Uuid::new_v4(), "a@b.org", AccountType::User).unwrap();
        assert!(matches!(verify_token(&keys, &token), Err(ServiceError::SessionExpired)));
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        assert!(matches!(JwtKeys::new("", 60), Err(ServiceError::Configuration(_))));
    }
}
