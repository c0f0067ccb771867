use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_FULL_ADMIN_EMAIL: &str = "admin@admin.com";
pub const DEFAULT_READER_ADMIN_EMAIL: &str = "admin@lector.com";
pub const DEFAULT_WRITER_ADMIN_EMAIL: &str = "admin@escritor.com";
pub const DEFAULT_DELETER_ADMIN_EMAIL: &str = "admin@eliminador.com";

/// Administrative capability granted by identity rather than ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Read,
    Write,
    Delete,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Read => "read",
            Capability::Write => "write",
            Capability::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub read: bool,
    pub write: bool,
    pub delete: bool,
}

impl CapabilitySet {
    pub const NONE: CapabilitySet = CapabilitySet { read: false, write: false, delete: false };
    pub const FULL: CapabilitySet = CapabilitySet { read: true, write: true, delete: true };
    pub const READ_ONLY: CapabilitySet = CapabilitySet { read: true, write: false, delete: false };
    pub const READ_WRITE: CapabilitySet = CapabilitySet { read: true, write: true, delete: false };
    pub const READ_DELETE: CapabilitySet = CapabilitySet { read: true, write: false, delete: true };

    pub fn contains(&self, capability: Capability) -> bool {
        match capability {
            Capability::Read => self.read,
            Capability::Write => self.write,
            Capability::Delete => self.delete,
        }
    }

    pub fn is_full(&self) -> bool {
        *self == Self::FULL
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Exact-email lookup of administrative capability.
///
/// Built once from configuration and shared read-only by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCapabilityTable {
    entries: HashMap<String, CapabilitySet>,
}

impl AdminCapabilityTable {
    pub fn empty() -> Self {
        Self { entries: HashMap::new() }
    }

    /// The four-tier layout: full, reader, writer and deleter administrators.
    pub fn standard(full: &str, reader: &str, writer: &str, deleter: &str) -> Self {
        Self::empty()
            .with_admin(full, CapabilitySet::FULL)
            .with_admin(reader, CapabilitySet::READ_ONLY)
            .with_admin(writer, CapabilitySet::READ_WRITE)
            .with_admin(deleter, CapabilitySet::READ_DELETE)
    }

    pub fn with_admin(mut self, email: &str, capabilities: CapabilitySet) -> Self {
        self.entries.insert(email.to_string(), capabilities);
        self
    }

    /// Capabilities held by `email`; empty for every non-administrative address.
    pub fn capabilities_for(&self, email: &str) -> CapabilitySet {
        self.entries.get(email).copied().unwrap_or(CapabilitySet::NONE)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AdminCapabilityTable {
    fn default() -> Self {
        Self::standard(
            DEFAULT_FULL_ADMIN_EMAIL,
            DEFAULT_READER_ADMIN_EMAIL,
            DEFAULT_WRITER_ADMIN_EMAIL,
            DEFAULT_DELETER_ADMIN_EMAIL,
        )
    }
}
