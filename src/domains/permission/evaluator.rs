use crate::auth::AuthContext;
use crate::domains::permission::capability::{AdminCapabilityTable, Capability, CapabilitySet};
use crate::domains::permission::ownership::{OwnershipResolver, ParentRef};
use crate::errors::{ServiceError, ServiceResult};
use crate::types::AccountType;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Operation requested on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    Create,
    ReadOne,
    ReadAll,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::ReadOne => "read",
            Action::ReadAll => "list",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// The administrative capability that covers this action.
    pub fn required_capability(&self) -> Capability {
        match self {
            Action::Create | Action::Update => Capability::Write,
            Action::ReadOne | Action::ReadAll => Capability::Read,
            Action::Delete => Capability::Delete,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    Account,
    Foundation,
    Donation,
    SocialAction,
    ParticipationRequest,
    Comment,
    Rating,
    Certificate,
    Notification,
    Suggestion,
    Favorite,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Account => "account",
            ResourceKind::Foundation => "foundation",
            ResourceKind::Donation => "donation",
            ResourceKind::SocialAction => "social action",
            ResourceKind::ParticipationRequest => "participation request",
            ResourceKind::Comment => "comment",
            ResourceKind::Rating => "rating",
            ResourceKind::Certificate => "certificate",
            ResourceKind::Notification => "notification",
            ResourceKind::Suggestion => "suggestion",
            ResourceKind::Favorite => "favorite",
        }
    }

    /// Whether any account with declared role `foundation` may perform
    /// `action` on every row of this kind.
    ///
    /// Creation is foundation-wide only where a foundation acts on behalf of
    /// someone else by nature (publishing actions, notifying accounts).
    /// Everything else a caller creates, they create as themselves.
    pub fn foundation_wide(&self, action: Action) -> bool {
        use Action::*;
        match self {
            ResourceKind::Account
            | ResourceKind::Foundation
            | ResourceKind::Rating
            | ResourceKind::Favorite => false,
            ResourceKind::Donation => matches!(action, ReadAll),
            ResourceKind::Comment => matches!(action, ReadOne | ReadAll | Delete),
            ResourceKind::ParticipationRequest
            | ResourceKind::Certificate
            | ResourceKind::Suggestion => matches!(action, ReadOne | ReadAll | Update | Delete),
            ResourceKind::Notification => true,
            // Always paired with a check against the owning foundation.
            ResourceKind::SocialAction => matches!(action, Create | Update | Delete),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Row visibility granted to a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessScope {
    All,
    Own,
}

/// What admitted the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grant {
    Admin,
    FoundationRole,
    Owner,
    Denied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub scope: AccessScope,
    pub grant: Grant,
}

impl AccessDecision {
    fn granted(grant: Grant) -> Self {
        let scope = match grant {
            Grant::Owner => AccessScope::Own,
            _ => AccessScope::All,
        };
        Self { allowed: true, scope, grant }
    }

    fn denied() -> Self {
        Self { allowed: false, scope: AccessScope::Own, grant: Grant::Denied }
    }

    pub fn via_admin(&self) -> bool {
        self.grant == Grant::Admin
    }
}

/// Single source of truth for "may this caller do this to that resource".
///
/// Resolution order is fixed:
/// 1. administrative capability from the email table,
/// 2. ownership (`owner_refs` contains the caller) or foundation-wide role visibility,
/// 3. deny.
///
/// `owner_refs` lists the accounts a target is legitimately linked to. For
/// `ReadAll`, it names the accounts whose rows are requested: `[caller]` for
/// "my rows", `[x]` for "rows of x", and empty for a global listing.
#[derive(Debug, Clone)]
pub struct AccessControlEvaluator {
    admins: AdminCapabilityTable,
}

impl AccessControlEvaluator {
    pub fn new(admins: AdminCapabilityTable) -> Self {
        Self { admins }
    }

    pub fn capabilities(&self, caller: &AuthContext) -> CapabilitySet {
        self.admins.capabilities_for(&caller.email)
    }

    pub fn has_capability(&self, caller: &AuthContext, capability: Capability) -> bool {
        self.capabilities(caller).contains(capability)
    }

    pub fn is_full_admin(&self, caller: &AuthContext) -> bool {
        self.capabilities(caller).is_full()
    }

    pub fn evaluate(
        &self,
        caller: &AuthContext,
        action: Action,
        kind: ResourceKind,
        owner_refs: &[Uuid],
    ) -> AccessDecision {
        let decision = if self.has_capability(caller, action.required_capability()) {
            AccessDecision::granted(Grant::Admin)
        } else if caller.role == AccountType::Foundation && kind.foundation_wide(action) {
            AccessDecision::granted(Grant::FoundationRole)
        } else if owner_refs.contains(&caller.user_id) {
            AccessDecision::granted(Grant::Owner)
        } else {
            AccessDecision::denied()
        };

        log::debug!(
            "access {} {} by {} ({}): {:?}",
            action, kind, caller.user_id, caller.role, decision.grant
        );
        decision
    }

    /// Like [`evaluate`](Self::evaluate), but a denial becomes `PermissionDenied`.
    pub fn authorize(
        &self,
        caller: &AuthContext,
        action: Action,
        kind: ResourceKind,
        owner_refs: &[Uuid],
    ) -> ServiceResult<AccessDecision> {
        let decision = self.evaluate(caller, action, kind, owner_refs);
        if decision.allowed {
            Ok(decision)
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "You are not allowed to {} this {}",
                action, kind
            )))
        }
    }

    /// Second, resource-specific layer: unless an administrative capability
    /// covers `action`, the caller must own `parent`. Runs even when the
    /// generic step admitted the caller on declared role alone.
    pub async fn authorize_parent(
        &self,
        caller: &AuthContext,
        action: Action,
        resolver: &dyn OwnershipResolver,
        parent: ParentRef,
    ) -> ServiceResult<()> {
        if self.has_capability(caller, action.required_capability()) {
            return Ok(());
        }
        resolver.ensure_owned_by(parent, caller.user_id).await
    }

    /// Toggling a suggestion's `processed` flag: administrative write or the
    /// foundation role. The author gets no special treatment.
    pub fn authorize_suggestion_processing(&self, caller: &AuthContext) -> ServiceResult<()> {
        if self.has_capability(caller, Capability::Write) || caller.role == AccountType::Foundation {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(
                "Only foundations can process suggestions".to_string(),
            ))
        }
    }
}

impl Default for AccessControlEvaluator {
    fn default() -> Self {
        Self::new(AdminCapabilityTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::permission::ownership::tests::StaticResolver;
    use crate::errors::DomainError;

    const ALL_KINDS: [ResourceKind; 11] = [
        ResourceKind::Account,
        ResourceKind::Foundation,
        ResourceKind::Donation,
        ResourceKind::SocialAction,
        ResourceKind::ParticipationRequest,
        ResourceKind::Comment,
        ResourceKind::Rating,
        ResourceKind::Certificate,
        ResourceKind::Notification,
        ResourceKind::Suggestion,
        ResourceKind::Favorite,
    ];
    const ALL_ACTIONS: [Action; 5] = [Action::Create, Action::ReadOne, Action::ReadAll, Action::Update, Action::Delete];

    fn caller(email: &str, role: AccountType) -> AuthContext {
        AuthContext::new(Uuid::new_v4(), email.to_string(), role)
    }

    #[test]
    fn full_admin_is_granted_everything() {
        let evaluator = AccessControlEvaluator::default();
        for role in [AccountType::User, AccountType::Foundation] {
            let admin = caller("admin@admin.com", role);
            for kind in ALL_KINDS {
                for action in ALL_ACTIONS {
                    let decision = evaluator.evaluate(&admin, action, kind, &[Uuid::new_v4()]);
                    assert!(decision.allowed, "{:?} {:?}", action, kind);
                    assert_eq!(decision.scope, AccessScope::All);
                    assert!(decision.via_admin());
                }
            }
        }
    }

    #[test]
    fn foundation_role_reads_all_on_foundation_wide_kinds() {
        let evaluator = AccessControlEvaluator::default();
        let foundation = caller("org@example.org", AccountType::Foundation);
        let user = caller("person@example.org", AccountType::User);

        for kind in ALL_KINDS.into_iter().filter(|k| k.foundation_wide(Action::ReadAll)) {
            let decision = evaluator.evaluate(&foundation, Action::ReadAll, kind, &[]);
            assert!(decision.allowed);
            assert_eq!(decision.scope, AccessScope::All);

            // a plain user asking for their own rows is narrowed to them
            let own = evaluator.evaluate(&user, Action::ReadAll, kind, &[user.user_id]);
            assert!(own.allowed);
            assert_eq!(own.scope, AccessScope::Own);

            // and never sees anybody else's
            let other = evaluator.evaluate(&user, Action::ReadAll, kind, &[Uuid::new_v4()]);
            assert!(!other.allowed);
        }
    }

    #[test]
    fn account_profiles_have_no_foundation_wide_visibility() {
        let evaluator = AccessControlEvaluator::default();
        let foundation = caller("org@example.org", AccountType::Foundation);
        let other_account = Uuid::new_v4();
        for action in ALL_ACTIONS {
            assert!(!evaluator.evaluate(&foundation, action, ResourceKind::Account, &[other_account]).allowed);
        }
    }

    #[test]
    fn reader_admin_lists_everything_but_cannot_delete() {
        let evaluator = AccessControlEvaluator::default();
        let reader = caller("admin@lector.com", AccountType::User);

        let list = evaluator.evaluate(&reader, Action::ReadAll, ResourceKind::Donation, &[]);
        assert!(list.allowed);
        assert_eq!(list.scope, AccessScope::All);

        let delete = evaluator.authorize(&reader, Action::Delete, ResourceKind::Donation, &[Uuid::new_v4()]);
        assert!(matches!(delete, Err(ServiceError::PermissionDenied(_))));
    }

    #[test]
    fn partial_admins_fall_back_to_ownership() {
        let evaluator = AccessControlEvaluator::default();
        let writer = caller("admin@escritor.com", AccountType::User);
        let deleter = caller("admin@eliminador.com", AccountType::User);
        let target = Uuid::new_v4();

        assert!(evaluator.evaluate(&writer, Action::Update, ResourceKind::Comment, &[target]).via_admin());
        assert!(!evaluator.evaluate(&writer, Action::Delete, ResourceKind::Comment, &[target]).allowed);
        assert!(evaluator.evaluate(&deleter, Action::Delete, ResourceKind::Comment, &[target]).via_admin());
        assert!(!evaluator.evaluate(&deleter, Action::Update, ResourceKind::Comment, &[target]).allowed);
        // their own rows still work through ownership
        let own = evaluator.evaluate(&deleter, Action::Update, ResourceKind::Comment, &[deleter.user_id]);
        assert_eq!(own.grant, Grant::Owner);
    }

    #[test]
    fn creation_as_self_is_allowed_for_any_role() {
        let evaluator = AccessControlEvaluator::default();
        for kind in [ResourceKind::Certificate, ResourceKind::Comment, ResourceKind::Rating] {
            for role in [AccountType::User, AccountType::Foundation] {
                let me = caller("someone@example.org", role);
                assert!(evaluator.evaluate(&me, Action::Create, kind, &[me.user_id]).allowed);
                // on behalf of another account only with write capability
                assert!(!evaluator.evaluate(&me, Action::Create, kind, &[Uuid::new_v4()]).allowed);
            }
            let writer = caller("admin@escritor.com", AccountType::User);
            assert!(evaluator.evaluate(&writer, Action::Create, kind, &[Uuid::new_v4()]).allowed);
        }
    }

    #[test]
    fn suggestion_processing_excludes_plain_authors() {
        let evaluator = AccessControlEvaluator::default();
        assert!(evaluator.authorize_suggestion_processing(&caller("x@example.org", AccountType::User)).is_err());
        assert!(evaluator.authorize_suggestion_processing(&caller("x@example.org", AccountType::Foundation)).is_ok());
        assert!(evaluator.authorize_suggestion_processing(&caller("admin@escritor.com", AccountType::User)).is_ok());
        assert!(evaluator.authorize_suggestion_processing(&caller("admin@lector.com", AccountType::User)).is_err());
    }

    #[test]
    fn custom_table_drives_decisions() {
        let table = AdminCapabilityTable::empty().with_admin("ops@example.org", CapabilitySet::READ_ONLY);
        let evaluator = AccessControlEvaluator::new(table);
        let default_admin = caller("admin@admin.com", AccountType::User);
        assert!(!evaluator.evaluate(&default_admin, Action::ReadAll, ResourceKind::Account, &[]).allowed);
        let ops = caller("ops@example.org", AccountType::User);
        assert!(evaluator.evaluate(&ops, Action::ReadAll, ResourceKind::Account, &[]).allowed);
    }

    #[tokio::test]
    async fn parent_check_runs_after_role_grant() {
        let evaluator = AccessControlEvaluator::default();
        let owner = caller("owner@example.org", AccountType::Foundation);
        let stranger = caller("other@example.org", AccountType::Foundation);
        let foundation_id = Uuid::new_v4();
        let resolver = StaticResolver::single(ParentRef::Foundation(foundation_id), owner.user_id);

        // the generic step admits both foundations
        assert!(evaluator.evaluate(&stranger, Action::Create, ResourceKind::SocialAction, &[]).allowed);

        assert!(evaluator
            .authorize_parent(&owner, Action::Create, &resolver, ParentRef::Foundation(foundation_id))
            .await
            .is_ok());
        assert!(matches!(
            evaluator
                .authorize_parent(&stranger, Action::Create, &resolver, ParentRef::Foundation(foundation_id))
                .await,
            Err(ServiceError::PermissionDenied(_))
        ));

        // unknown parents are reported as missing, not forbidden
        assert!(matches!(
            evaluator
                .authorize_parent(&owner, Action::Update, &resolver, ParentRef::Foundation(Uuid::new_v4()))
                .await,
            Err(ServiceError::Domain(DomainError::EntityNotFound(..)))
        ));

        // write-capable admins skip it
        let writer = caller("admin@escritor.com", AccountType::User);
        assert!(evaluator
            .authorize_parent(&writer, Action::Update, &resolver, ParentRef::Foundation(foundation_id))
            .await
            .is_ok());
    }
}
