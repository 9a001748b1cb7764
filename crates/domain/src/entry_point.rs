//! Cloud Entry Point links.

use serde_json::Value;

use crate::document::Partition;

/// One content entry of the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryLink {
    /// A `{"href": …}` reference to a top-level resource.
    Resource { key: String, href: String },
    /// Anything else, shown as text.
    Value { key: String, text: String },
}

impl EntryLink {
    /// Display text of the entry.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Resource { href, .. } => href.clone(),
            Self::Value { key, text } => format!("KEY: {key}, VALUE: {text}"),
        }
    }

    /// Reference to follow, if the entry links anywhere.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Resource { href, .. } => Some(href),
            Self::Value { .. } => None,
        }
    }
}

/// Entry point content as links, sorted by key.
#[must_use]
pub fn entry_links(partition: &Partition) -> Vec<EntryLink> {
    partition
        .sorted_content()
        .into_iter()
        .map(|(key, value)| match value.get("href").and_then(Value::as_str) {
            Some(href) => EntryLink::Resource {
                key: key.clone(),
                href: href.to_string(),
            },
            None => EntryLink::Value {
                key: key.clone(),
                text: display_value(value),
            },
        })
        .collect()
}

/// Strings as-is, everything else as compact JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
