//! Operation descriptors — the state transitions a document advertises.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An advertised `{rel, href}` link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    pub rel: String,
    pub href: String,
}

/// What pressing an operation's button does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationKind {
    Edit,
    Add,
    Delete,
    /// Any other `rel`, named by its last `/` segment.
    Action(String),
}

impl OperationDescriptor {
    #[must_use]
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
        }
    }

    /// Button label: the last `/` segment of `rel`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.rel.rsplit('/').next().unwrap_or(&self.rel)
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self.rel.as_str() {
            "edit" => OperationKind::Edit,
            "add" => OperationKind::Add,
            "delete" => OperationKind::Delete,
            _ => OperationKind::Action(self.name().to_string()),
        }
    }
}

/// Read the `operations` array, skipping entries without a string `rel` and `href`.
///
/// Anything other than an array yields no operations.
#[must_use]
pub fn parse_operations(value: Option<&Value>) -> Vec<OperationDescriptor> {
    let Some(Value::Array(entries)) = value else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let rel = entry.get("rel")?.as_str()?;
            let href = entry.get("href")?.as_str()?;
            if rel.is_empty() || href.is_empty() {
                return None;
            }
            Some(OperationDescriptor::new(rel, href))
        })
        .collect()
}
