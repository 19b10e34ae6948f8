//! Intermediate service model
//!
//! Three levels, all built fresh per extraction run:
//! `ServiceModel` (one per pin) → `OperationModel` → `ParamModel`.
//! Field names are what templates see.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One logical Seneca service, grouping every operation that shares a pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceModel {
    /// Grouping key, e.g. `role:api`
    pub pin: String,

    /// Display name, e.g. `ApiRole`
    pub name: String,

    /// Directory name, e.g. `api-role`
    pub dirname: String,

    /// Contact name from the document info block
    pub author: Option<String>,

    /// License name from the document info block
    pub license: Option<String>,

    /// API version from the document info block
    pub version: Option<String>,

    /// API description from the document info block
    pub description: Option<String>,

    /// Year stamped at extraction time
    pub year: i32,

    /// Operations in document encounter order
    pub operations: Vec<OperationModel>,
}

/// A single HTTP operation routed to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationModel {
    pub path: String,
    pub method: String,

    /// `<ServiceName>.<last pattern value>`, e.g. `ApiRole.list`
    pub function_name: String,

    pub description: String,

    /// Full dispatch pattern, never truncated
    pub pattern: String,

    pub params: Vec<ParamModel>,

    /// Responses are not modelled yet; always `None`
    pub responses: Option<Value>,
}

/// Where a parameter came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Key of the dispatch pattern itself
    Pattern,
    /// Entry of the operation's parameter list
    Declared,
    /// Property of an object-typed declared parameter
    Property,
}

/// A flattened parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamModel {
    /// Dotted for object properties, e.g. `pet.name`
    pub name: String,

    pub description: String,
    pub required: bool,
    pub readonly: bool,
    pub write_only: bool,
    pub nullable: bool,
    pub external_docs: Option<ExternalDocs>,
    pub example: Option<Value>,

    /// Validation regex, only carried for object properties
    pub pattern: Option<String>,

    /// Generation-level type name, e.g. `number[]`
    #[serde(rename = "type")]
    pub param_type: String,

    pub kind: ParamKind,
}

/// External documentation reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
}

impl ServiceModel {
    /// Total number of flattened params across every operation
    pub fn param_count(&self) -> usize {
        self.operations.iter().map(|op| op.params.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_serializes_type_and_kind() {
        let param = ParamModel {
            name: "pet.age".to_string(),
            description: String::new(),
            required: false,
            readonly: false,
            write_only: false,
            nullable: false,
            external_docs: None,
            example: None,
            pattern: None,
            param_type: "number".to_string(),
            kind: ParamKind::Property,
        };

        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["type"], "number");
        assert_eq!(value["kind"], "property");
        assert!(value.get("param_type").is_none());
    }
}
