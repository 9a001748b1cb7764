//! Resource documents — classification and the metadata/content split.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CimiError, MalformedDocumentError};

/// Top-level keys common to every CIMI resource.
pub const METADATA_KEYS: [&str; 10] = [
    "id",
    "created",
    "updated",
    "resourceURI",
    "name",
    "description",
    "operations",
    "acl",
    "properties",
    "baseURI",
];

/// Trailing `resourceURI` segment of the Cloud Entry Point.
pub const ENTRY_POINT_TYPE: &str = "CloudEntryPoint";

/// Suffix of every collection's `resourceURI` segment.
pub const COLLECTION_SUFFIX: &str = "Collection";

/// `true` when `key` is one of the [`METADATA_KEYS`].
#[must_use]
pub fn is_metadata_key(key: &str) -> bool {
    METADATA_KEYS.contains(&key)
}

/// How a document is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    EntryPoint,
    Collection,
    Item,
}

impl ResourceKind {
    /// Classify a resource type name (the last `resourceURI` segment).
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Self {
        if type_name == ENTRY_POINT_TYPE {
            Self::EntryPoint
        } else if type_name.ends_with(COLLECTION_SUFFIX) {
            Self::Collection
        } else {
            Self::Item
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EntryPoint => "entry point",
            Self::Collection => "collection",
            Self::Item => "item",
        };
        f.write_str(name)
    }
}

/// A fetched JSON object, keys in the order the server sent them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceDocument(Map<String, Value>);

impl ResourceDocument {
    /// Parse a document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CimiError::InvalidJson`] if `text` does not parse, or
    /// [`MalformedDocumentError::NotAnObject`] if it is not an object.
    pub fn from_json_str(text: &str) -> Result<Self, CimiError> {
        let value: Value = serde_json::from_str(text).map_err(CimiError::InvalidJson)?;
        Ok(Self::try_from(value)?)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `resourceURI` field.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDocumentError`] when the field is absent or not a string.
    pub fn resource_uri(&self) -> Result<&str, MalformedDocumentError> {
        match self.0.get("resourceURI") {
            Some(Value::String(uri)) => Ok(uri),
            Some(_) => Err(MalformedDocumentError::InvalidField {
                field: "resourceURI".to_string(),
                reason: "expected a string".to_string(),
            }),
            None => Err(MalformedDocumentError::MissingField("resourceURI")),
        }
    }

    /// Resource type name: the trailing segment of `resourceURI`.
    ///
    /// # Errors
    ///
    /// See [`ResourceDocument::resource_uri`].
    pub fn type_name(&self) -> Result<&str, MalformedDocumentError> {
        let uri = self.resource_uri()?;
        Ok(uri.rsplit('/').next().unwrap_or(uri))
    }

    /// Pretty-printed JSON with a two-space indent.
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        // Serializing a map of `Value`s cannot fail.
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for ResourceDocument {
    type Error = MalformedDocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(MalformedDocumentError::NotAnObject),
        }
    }
}

impl From<ResourceDocument> for Value {
    fn from(document: ResourceDocument) -> Self {
        document.into_value()
    }
}

/// Decide how `document` is rendered from its `resourceURI` alone.
///
/// # Errors
///
/// Returns [`MalformedDocumentError`] when `resourceURI` is missing or not a string.
pub fn classify(document: &ResourceDocument) -> Result<ResourceKind, MalformedDocumentError> {
    document.type_name().map(ResourceKind::from_type_name)
}

/// Metadata and content halves of a document.
///
/// Both halves keep the document's key order, and [`Partition::join`]
/// restores the original interleaving.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    metadata: Map<String, Value>,
    content: Map<String, Value>,
    order: Vec<String>,
}

impl Partition {
    #[must_use]
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    #[must_use]
    pub fn content(&self) -> &Map<String, Value> {
        &self.content
    }

    /// Content entries sorted by key, the display order of every renderer.
    #[must_use]
    pub fn sorted_content(&self) -> Vec<(&String, &Value)> {
        let mut entries: Vec<_> = self.content.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Reassemble the original document.
    #[must_use]
    pub fn join(mut self) -> ResourceDocument {
        let mut fields = Map::new();
        for key in self.order {
            let value = if is_metadata_key(&key) {
                self.metadata.remove(&key)
            } else {
                self.content.remove(&key)
            };
            if let Some(value) = value {
                fields.insert(key, value);
            }
        }
        ResourceDocument(fields)
    }
}

/// Split top-level keys by membership in [`METADATA_KEYS`].
#[must_use]
pub fn partition_metadata(document: &ResourceDocument) -> Partition {
    let mut metadata = Map::new();
    let mut content = Map::new();
    let mut order = Vec::with_capacity(document.0.len());
    for (key, value) in &document.0 {
        order.push(key.clone());
        if is_metadata_key(key) {
            metadata.insert(key.clone(), value.clone());
        } else {
            content.insert(key.clone(), value.clone());
        }
    }
    Partition {
        metadata,
        content,
        order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ResourceDocument {
        ResourceDocument::try_from(value).unwrap()
    }

    #[test]
    fn should_classify_entry_point() {
        let d = doc(json!({"resourceURI": "http://x/CloudEntryPoint"}));
        assert_eq!(classify(&d).unwrap(), ResourceKind::EntryPoint);
    }

    #[test]
    fn should_classify_collection_by_suffix() {
        let d = doc(json!({"resourceURI": "http://x/MachineCollection", "count": 0}));
        assert_eq!(classify(&d).unwrap(), ResourceKind::Collection);
    }

    #[test]
    fn should_classify_anything_else_as_item() {
        for uri in [
            "http://x/Machine",
            "http://x/CloudEntryPointX",
            "http://x/CollectionOfThings",
            "Volume",
        ] {
            let d = doc(json!({ "resourceURI": uri }));
            assert_eq!(classify(&d).unwrap(), ResourceKind::Item, "{uri}");
        }
    }

    #[test]
    fn should_ignore_count_when_classifying() {
        let d = doc(json!({"resourceURI": "http://x/Machine", "count": 3}));
        assert_eq!(classify(&d).unwrap(), ResourceKind::Item);
    }

    #[test]
    fn should_report_missing_resource_uri() {
        let d = doc(json!({"id": "Machine/1"}));
        assert_eq!(
            classify(&d),
            Err(MalformedDocumentError::MissingField("resourceURI"))
        );
    }

    #[test]
    fn should_report_non_string_resource_uri() {
        let d = doc(json!({"resourceURI": 7}));
        assert!(matches!(
            classify(&d),
            Err(MalformedDocumentError::InvalidField { .. })
        ));
    }

    #[test]
    fn should_reject_non_object_json() {
        let result = ResourceDocument::from_json_str("[1, 2]");
        assert!(matches!(
            result,
            Err(CimiError::Malformed(MalformedDocumentError::NotAnObject))
        ));
    }

    #[test]
    fn should_partition_into_disjoint_total_halves() {
        let d = doc(json!({
            "id": "Machine/1",
            "cpu": 4,
            "resourceURI": "http://x/Machine",
            "memory": 1024,
            "acl": {},
            "baseURI": "http://x/"
        }));
        let partition = partition_metadata(&d);

        for key in d.fields().keys() {
            let in_meta = partition.metadata().contains_key(key);
            let in_content = partition.content().contains_key(key);
            assert!(in_meta ^ in_content, "{key} must be in exactly one half");
        }
        assert_eq!(
            partition.metadata().len() + partition.content().len(),
            d.fields().len()
        );
        let content_keys: Vec<_> = partition.content().keys().collect();
        assert_eq!(content_keys, vec!["cpu", "memory"]);
    }

    #[test]
    fn should_restore_original_order_when_joined() {
        let text = r#"{"zeta":1,"id":"a","alpha":2,"name":"n","resourceURI":"http://x/Thing"}"#;
        let d = ResourceDocument::from_json_str(text).unwrap();
        let joined = partition_metadata(&d).join();
        assert_eq!(joined, d);
        assert_eq!(serde_json::to_string(&joined).unwrap(), text);
    }

    #[test]
    fn should_sort_content_for_display() {
        let d = doc(json!({"b": 1, "a": 2, "resourceURI": "http://x/Thing"}));
        let partition = partition_metadata(&d);
        let keys: Vec<_> = partition
            .sorted_content()
            .into_iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn should_pretty_print_with_two_space_indent() {
        let d = doc(json!({"resourceURI": "x"}));
        assert_eq!(d.to_pretty_json(), "{\n  \"resourceURI\": \"x\"\n}");
    }
}
