//! Access control lists attached to resources.

use serde::{Deserialize, Serialize};

/// Right shown on the owner's row.
pub const OWNER_RIGHT: &str = "ALL";

/// A principal and the kind of principal it is (`USER`, `ROLE`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub principal: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A right granted to a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRule {
    pub principal: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub right: String,
}

/// The `acl` field of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acl {
    pub owner: Principal,
    #[serde(default)]
    pub rules: Vec<AclRule>,
}

/// One displayed row: who, what kind, which right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclRow {
    pub principal: String,
    pub kind: String,
    pub right: String,
}

impl Acl {
    /// Owner row first, then one row per rule.
    #[must_use]
    pub fn rows(&self) -> Vec<AclRow> {
        let owner = AclRow {
            principal: self.owner.principal.clone(),
            kind: self.owner.kind.clone(),
            right: OWNER_RIGHT.to_string(),
        };
        std::iter::once(owner)
            .chain(self.rules.iter().map(|rule| AclRow {
                principal: rule.principal.clone(),
                kind: rule.kind.clone(),
                right: rule.right.clone(),
            }))
            .collect()
    }
}
