use uuid::Uuid;
use crate::types::AccountType;
use crate::errors::ServiceError;

/// Represents the authenticated caller of the current operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The ID of the authenticated account
    pub user_id: Uuid,

    /// Email the account signed in with; administrative capability is looked up by it
    pub email: String,

    /// Declared role of the account
    pub role: AccountType,
}

impl AuthContext {
    pub fn new(user_id: Uuid, email: String, role: AccountType) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    pub fn is_foundation(&self) -> bool {
        self.role == AccountType::Foundation
    }

    pub fn is_self(&self, account_id: &Uuid) -> bool {
        &self.user_id == account_id
    }

    /// Require the declared `foundation` role
    pub fn authorize_foundation(&self) -> Result<(), ServiceError> {
        if self.is_foundation() {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(
                "This action requires a foundation account".to_string()
            ))
        }
    }
}
