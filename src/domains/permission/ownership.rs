use crate::errors::{DbError, DomainError, DomainResult, ServiceError, ServiceResult};
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};
use uuid::Uuid;

/// A parent resource whose owning account gates an operation on its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Owned by the foundation's account.
    Foundation(Uuid),
    /// Owned by the account of the foundation that published it.
    SocialAction(Uuid),
    /// Linked to both the donor and the receiving foundation's account.
    Donation(Uuid),
}

impl ParentRef {
    pub fn entity_name(&self) -> &'static str {
        match self {
            ParentRef::Foundation(_) => "Foundation",
            ParentRef::SocialAction(_) => "SocialAction",
            ParentRef::Donation(_) => "Donation",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ParentRef::Foundation(id) | ParentRef::SocialAction(id) | ParentRef::Donation(id) => *id,
        }
    }
}

/// Looks up the accounts that own a parent resource.
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    /// Accounts linked to `parent`. Fails with `EntityNotFound` when the parent
    /// (or the foundation it hangs off) does not exist.
    async fn owning_accounts(&self, parent: ParentRef) -> DomainResult<Vec<Uuid>>;

    async fn is_owned_by(&self, parent: ParentRef, account_id: Uuid) -> DomainResult<bool> {
        Ok(self.owning_accounts(parent).await?.contains(&account_id))
    }

    /// `PermissionDenied` unless `account_id` is among the owners.
    async fn ensure_owned_by(&self, parent: ParentRef, account_id: Uuid) -> ServiceResult<()> {
        if self.is_owned_by(parent, account_id).await? {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "You do not own this {}",
                parent.entity_name().to_lowercase()
            )))
        }
    }
}

pub struct SqliteOwnershipResolver {
    pool: SqlitePool,
}

impl SqliteOwnershipResolver {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn parse_account(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| DomainError::InvalidUuid(raw.to_string()))
}

#[async_trait]
impl OwnershipResolver for SqliteOwnershipResolver {
    async fn owning_accounts(&self, parent: ParentRef) -> DomainResult<Vec<Uuid>> {
        let not_found = || DomainError::EntityNotFound(parent.entity_name().to_string(), parent.id());

        match parent {
            ParentRef::Foundation(id) => {
                let (owner,) = query_as::<_, (String,)>("SELECT user_id FROM foundations WHERE id = ?")
                    .bind(id.to_string())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| DomainError::Database(DbError::from(e)))?
                    .ok_or_else(not_found)?;
                Ok(vec![parse_account(&owner)?])
            }
            ParentRef::SocialAction(id) => {
                let (owner,) = query_as::<_, (String,)>(
                    "SELECT f.user_id FROM social_actions sa
                     JOIN foundations f ON f.id = sa.foundation_id
                     WHERE sa.id = ?",
                )
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Database(DbError::from(e)))?
                .ok_or_else(not_found)?;
                Ok(vec![parse_account(&owner)?])
            }
            ParentRef::Donation(id) => {
                let (donor, foundation_owner) = query_as::<_, (String, String)>(
                    "SELECT d.user_id, f.user_id FROM donations d
                     JOIN foundations f ON f.id = d.foundation_id
                     WHERE d.id = ?",
                )
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::Database(DbError::from(e)))?
                .ok_or_else(not_found)?;
                Ok(vec![parse_account(&donor)?, parse_account(&foundation_owner)?])
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Fixed parent → owners map for evaluator tests.
    pub struct StaticResolver {
        owners: HashMap<ParentRef, Vec<Uuid>>,
    }

    impl StaticResolver {
        pub fn single(parent: ParentRef, owner: Uuid) -> Self {
            let mut owners = HashMap::new();
            owners.insert(parent, vec![owner]);
            Self { owners }
        }
    }

    #[async_trait]
    impl OwnershipResolver for StaticResolver {
        async fn owning_accounts(&self, parent: ParentRef) -> DomainResult<Vec<Uuid>> {
            self.owners
                .get(&parent)
                .cloned()
                .ok_or_else(|| DomainError::EntityNotFound(parent.entity_name().to_string(), parent.id()))
        }
    }
}
