//! Typed view over the metadata half of a document.

use serde_json::{Map, Value};

use crate::acl::Acl;
use crate::document::Partition;
use crate::error::MalformedDocumentError;
use crate::operation::{OperationDescriptor, parse_operations};

/// Common CIMI attributes, read from a document's metadata keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub id: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub resource_uri: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub operations: Vec<OperationDescriptor>,
    pub acl: Option<Acl>,
    pub properties: Map<String, Value>,
    pub base_uri: Option<String>,
}

impl Metadata {
    /// Read the typed metadata out of a partition.
    ///
    /// String attributes of the wrong type are ignored. A present but
    /// unreadable `acl` is reported since the ACL panel cannot be rendered.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDocumentError::InvalidField`] for a malformed `acl`.
    pub fn from_partition(partition: &Partition) -> Result<Self, MalformedDocumentError> {
        let fields = partition.metadata();
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);

        let acl = match fields.get("acl") {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value.clone()).map_err(|err| {
                MalformedDocumentError::InvalidField {
                    field: "acl".to_string(),
                    reason: err.to_string(),
                }
            })?),
        };

        let properties = match fields.get("properties") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        Ok(Self {
            id: text("id"),
            created: text("created"),
            updated: text("updated"),
            resource_uri: text("resourceURI"),
            name: text("name"),
            description: text("description"),
            operations: parse_operations(fields.get("operations")),
            acl,
            properties,
            base_uri: text("baseURI"),
        })
    }

    /// Operation with the given `rel`, if advertised.
    #[must_use]
    pub fn operation(&self, rel: &str) -> Option<&OperationDescriptor> {
        self.operations.iter().find(|op| op.rel == rel)
    }
}
