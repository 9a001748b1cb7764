//! Typed collection schema.
//!
//! A collection's members live under a field named after the resource
//! type: `MachineCollection` keeps them in `machines`,
//! `MachineImageCollection` in `machineImages`, `AddressCollection` in
//! `addresses`.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::document::COLLECTION_SUFFIX;
use crate::error::MalformedDocumentError;

/// Name of the field holding the members of a collection type.
///
/// Returns `None` when `type_name` is not a collection type.
#[must_use]
pub fn items_field_name(type_name: &str) -> Option<String> {
    let member = type_name.strip_suffix(COLLECTION_SUFFIX)?;
    let mut chars = member.chars();
    let first = chars.next()?;
    let mut field: String = first.to_lowercase().collect();
    field.push_str(chars.as_str());
    pluralize(&mut field);
    Some(field)
}

/// English plural of a camel-cased member name.
fn pluralize(word: &mut String) {
    const SIBILANTS: [&str; 5] = ["s", "x", "z", "ch", "sh"];
    if SIBILANTS.iter().any(|end| word.ends_with(end)) {
        word.push_str("es");
        return;
    }
    let mut tail = word.chars().rev();
    match (tail.next(), tail.next()) {
        (Some('y'), Some(before)) if !matches!(before, 'a' | 'e' | 'i' | 'o' | 'u') => {
            word.pop();
            word.push_str("ies");
        }
        _ => word.push('s'),
    }
}

/// `true` for 36 lower-case hex digits and dashes.
fn is_uuid_like(tag: &str) -> bool {
    tag.len() == 36
        && tag
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b) || b == b'-')
}

/// One member reference inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CollectionEntry {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CollectionEntry {
    /// Short display tag: the last `id` segment, cut to 8 characters when
    /// it looks like a lower-case UUID.
    #[must_use]
    pub fn tag(&self) -> &str {
        let last = self.id.rsplit('/').next().unwrap_or(&self.id);
        if is_uuid_like(last) {
            &last[..8]
        } else {
            last
        }
    }
}

/// A collection's content: its count and its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub count: i64,
    pub items_field: String,
    pub entries: Vec<CollectionEntry>,
}

impl Collection {
    /// Read the collection out of a document's content half.
    ///
    /// A missing `count` falls back to the number of members. When the
    /// field named after the type is absent, the first array-valued field
    /// holds the members. Having no members field at all is only accepted
    /// when the collection is empty.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDocumentError`] if `type_name` is not a collection
    /// type, `count` is not an integer, the members field is missing from a
    /// non-empty collection, or an entry has no string `id`.
    pub fn from_content(
        type_name: &str,
        content: &Map<String, Value>,
    ) -> Result<Self, MalformedDocumentError> {
        let items_field =
            items_field_name(type_name).ok_or_else(|| MalformedDocumentError::InvalidField {
                field: "resourceURI".to_string(),
                reason: format!("`{type_name}` is not a collection type"),
            })?;

        let count = match content.get("count") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_i64().ok_or_else(|| {
                MalformedDocumentError::InvalidField {
                    field: "count".to_string(),
                    reason: "expected an integer".to_string(),
                }
            })?),
        };

        let items_field = if content.contains_key(&items_field) {
            items_field
        } else {
            content
                .iter()
                .find(|(_, value)| value.is_array())
                .map_or(items_field, |(key, _)| key.clone())
        };

        let entries: Vec<CollectionEntry> = match content.get(&items_field) {
            Some(value) => serde_json::from_value(value.clone()).map_err(|err| {
                MalformedDocumentError::InvalidField {
                    field: items_field.clone(),
                    reason: err.to_string(),
                }
            })?,
            None if count.unwrap_or(0) <= 0 => Vec::new(),
            None => {
                return Err(MalformedDocumentError::InvalidField {
                    field: items_field,
                    reason: "missing from a non-empty collection".to_string(),
                });
            }
        };

        let count = count.unwrap_or_else(|| i64::try_from(entries.len()).unwrap_or(i64::MAX));
        Ok(Self {
            count,
            items_field,
            entries,
        })
    }

    /// `true` when the collection renders its empty-state message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count <= 0
    }
}
