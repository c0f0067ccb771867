pub mod capability;
pub mod evaluator;
pub mod ownership;

pub use capability::{AdminCapabilityTable, Capability, CapabilitySet};
pub use evaluator::{AccessControlEvaluator, AccessDecision, AccessScope, Action, Grant, ResourceKind};
pub use ownership::{OwnershipResolver, ParentRef, SqliteOwnershipResolver};
