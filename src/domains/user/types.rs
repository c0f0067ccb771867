use crate::errors::{DomainError, DomainResult};
use crate::validation::{Validate, ValidationBuilder};
use crate::types::AccountType;
use crate::domains::core::parse::{parse_datetime, parse_optional_datetime, parse_uuid};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use sqlx::FromRow;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Core User entity - an account on the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: AccountType,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_foundation(&self) -> bool {
        self.user_type == AccountType::Foundation
    }
}

/// NewUser DTO - used for registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String, // Plain text password (will be hashed)
    #[serde(default)]
    pub user_type: Option<String>,
}

impl NewUser {
    pub fn account_type(&self) -> AccountType {
        self.user_type
            .as_deref()
            .and_then(AccountType::from_str)
            .unwrap_or_default()
    }
}

impl Validate for NewUser {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("name", Some(self.name.clone()))
            .required()
            .not_blank()
            .max_length(100)
            .validate()?;

        ValidationBuilder::new("email", Some(self.email.clone()))
            .required()
            .email()
            .validate()?;

        ValidationBuilder::new("password", Some(self.password.clone()))
            .required()
            .min_length(MIN_PASSWORD_LENGTH)
            .validate()?;

        if let Some(user_type) = &self.user_type {
            ValidationBuilder::new("user_type", Some(user_type.clone()))
                .one_of(AccountType::all_variants(), Some("must be 'user' or 'foundation'"))
                .validate()?;
        }

        Ok(())
    }
}

/// UpdateUser DTO - used when updating an existing account
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>, // Plain text password (will be hashed)
    pub user_type: Option<String>,
}

impl Validate for UpdateUser {
    fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            ValidationBuilder::new("name", Some(name.clone()))
                .not_blank()
                .max_length(100)
                .validate()?;
        }

        if let Some(email) = &self.email {
            ValidationBuilder::new("email", Some(email.clone()))
                .email()
                .validate()?;
        }

        if let Some(password) = &self.password {
            ValidationBuilder::new("password", Some(password.clone()))
                .min_length(MIN_PASSWORD_LENGTH)
                .validate()?;
        }

        if let Some(user_type) = &self.user_type {
            ValidationBuilder::new("user_type", Some(user_type.clone()))
                .one_of(AccountType::all_variants(), Some("must be 'user' or 'foundation'"))
                .validate()?;
        }

        Ok(())
    }
}

impl UpdateUser {
    pub fn is_empty_update(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.user_type.is_none()
    }
}

/// Credentials DTO - used for login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for Credentials {
    fn validate(&self) -> DomainResult<()> {
        ValidationBuilder::new("email", Some(self.email.clone()))
            .required()
            .email()
            .validate()?;

        ValidationBuilder::new("password", Some(self.password.clone()))
            .required()
            .validate()?;

        Ok(())
    }
}

/// UserRow - SQLite row representation for mapping from database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: String,
    pub last_login: Option<String>,
    pub created_at: String,
}

impl UserRow {
    pub fn into_entity(self) -> DomainResult<User> {
        Ok(User {
            id: parse_uuid(&self.id)?,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            user_type: AccountType::from_str(&self.user_type)
                .ok_or_else(|| DomainError::Internal(format!("Invalid user type: {}", self.user_type)))?,
            last_login: parse_optional_datetime(&self.last_login)?,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

/// UserResponse DTO - used for API responses (excludes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub user_type: AccountType,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            user_type: user.user_type,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(password: &str, user_type: Option<&str>) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            email: "ana@example.org".to_string(),
            password: password.to_string(),
            user_type: user_type.map(str::to_string),
        }
    }

    #[test]
    fn registration_defaults_to_user_role() {
        let dto = new_user("secret1", None);
        assert!(dto.validate().is_ok());
        assert_eq!(dto.account_type(), AccountType::User);
        assert_eq!(new_user("secret1", Some("foundation")).account_type(), AccountType::Foundation);
    }

    #[test]
    fn registration_rejects_bad_input() {
        assert!(new_user("12345", None).validate().is_err());
        assert!(new_user("secret1", Some("admin")).validate().is_err());
        let mut dto = new_user("secret1", None);
        dto.email = "not-an-email".to_string();
        assert!(dto.validate().is_err());
    }
}
