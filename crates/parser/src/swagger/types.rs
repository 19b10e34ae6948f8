//! Swagger 2.0 type definitions
//!
//! Simplified representation covering what service extraction reads.
//! Every map is an `IndexMap` so document order survives deserialization.

use indexmap::IndexMap;
use seneca_scaffold_common::ExternalDocs;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods recognised as operations inside a path item
pub const HTTP_METHODS: &[&str] = &["get", "put", "post", "delete", "options", "head", "patch"];

/// Swagger document root
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwaggerDocument {
    /// Swagger version (e.g., "2.0")
    #[serde(default)]
    pub swagger: Option<String>,

    /// API metadata
    #[serde(default)]
    pub info: Info,

    /// API paths in document order
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    /// Reusable parameters (`#/parameters/...`)
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,

    /// Reusable schemas (`#/definitions/...`)
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
}

/// API information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub contact: Option<Contact>,

    #[serde(default)]
    pub license: Option<License>,
}

/// Contact information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

/// License information
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// Operations of one path, keyed by lowercase HTTP method in document order
///
/// Non-method keys (`parameters`, `$ref`, `x-*`) are ignored.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PathItem {
    pub operations: IndexMap<String, Operation>,
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: IndexMap<String, Value> = IndexMap::deserialize(deserializer)?;
        let mut operations = IndexMap::new();

        for (key, value) in raw {
            let method = key.to_ascii_lowercase();
            if !HTTP_METHODS.contains(&method.as_str()) {
                continue;
            }
            let operation: Operation = serde_json::from_value(value)
                .map_err(|e| de::Error::custom(format!("invalid {} operation: {}", key, e)))?;
            operations.insert(method, operation);
        }

        Ok(PathItem { operations })
    }
}

/// HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(rename = "externalDocs", default)]
    pub external_docs: Option<ExternalDocs>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Kept raw; responses are not modelled
    #[serde(default)]
    pub responses: IndexMap<String, Value>,

    /// Explicit dispatch pattern, e.g. `role:api,cmd:list`
    #[serde(rename = "x-seneca-pattern", default)]
    pub seneca_pattern: Option<String>,

    /// Controller name used by swagger-node routers
    #[serde(rename = "x-swagger-router-controller", default)]
    pub router_controller: Option<String>,
}

/// Parameter definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    /// Local reference, e.g. `#/parameters/limitParam`
    #[serde(rename = "$ref", default)]
    pub ref_path: Option<String>,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(rename = "readOnly", alias = "readonly", default)]
    pub readonly: bool,

    #[serde(rename = "writeOnly", default)]
    pub write_only: bool,

    #[serde(alias = "x-nullable", default)]
    pub nullable: bool,

    #[serde(rename = "externalDocs", default)]
    pub external_docs: Option<ExternalDocs>,

    #[serde(default)]
    pub example: Option<Value>,

    #[serde(rename = "type", default)]
    pub param_type: Option<String>,

    #[serde(default)]
    pub items: Option<Items>,

    /// Body parameters carry a schema instead of a type
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// Array item descriptor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
}

/// Schema definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Local reference, e.g. `#/definitions/Pet`
    #[serde(rename = "$ref", default)]
    pub ref_path: Option<String>,

    #[serde(rename = "type", default)]
    pub schema_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    /// Properties (for object type) in declaration order
    #[serde(default)]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names
    #[serde(default)]
    pub required: Vec<String>,

    #[serde(default)]
    pub items: Option<Items>,

    #[serde(rename = "readOnly", alias = "readonly", default)]
    pub readonly: bool,

    #[serde(rename = "writeOnly", default)]
    pub write_only: bool,

    #[serde(alias = "x-nullable", default)]
    pub nullable: bool,

    #[serde(rename = "externalDocs", default)]
    pub external_docs: Option<ExternalDocs>,

    #[serde(default)]
    pub example: Option<Value>,

    /// Validation regex
    #[serde(default)]
    pub pattern: Option<String>,
}

/// Anything carrying the description trio used to build model descriptions
pub trait Documented {
    fn external_docs(&self) -> Option<&ExternalDocs>;
    fn description(&self) -> Option<&str>;
    fn summary(&self) -> Option<&str>;

    /// External docs win, then description, then summary, else empty
    fn describe(&self) -> String {
        if let Some(docs) = self.external_docs() {
            return format!(
                "{} ({})",
                docs.description.as_deref().unwrap_or_default(),
                docs.url
            );
        }

        self.description()
            .filter(|d| !d.is_empty())
            .or_else(|| self.summary())
            .unwrap_or_default()
            .to_string()
    }
}

macro_rules! impl_documented {
    ($($ty:ty),*) => {
        $(
            impl Documented for $ty {
                fn external_docs(&self) -> Option<&ExternalDocs> {
                    self.external_docs.as_ref()
                }

                fn description(&self) -> Option<&str> {
                    self.description.as_deref()
                }

                fn summary(&self) -> Option<&str> {
                    self.summary.as_deref()
                }
            }
        )*
    };
}

impl_documented!(Operation, Parameter, Schema);

impl SwaggerDocument {
    /// Iterate every operation as `(path, method, operation)` in document order
    pub fn operations(&self) -> impl Iterator<Item = (&str, &str, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (path.as_str(), method.as_str(), op))
        })
    }

    /// Get a reusable parameter by reference path
    /// e.g., "#/parameters/limitParam" -> returns limitParam
    pub fn resolve_parameter_ref(&self, ref_path: &str) -> Option<&Parameter> {
        let name = ref_path.strip_prefix("#/parameters/")?;
        self.parameters.get(name)
    }

    /// Get a schema by reference path
    /// e.g., "#/definitions/Pet" -> returns Pet schema
    pub fn resolve_schema_ref(&self, ref_path: &str) -> Option<&Schema> {
        let name = ref_path.strip_prefix("#/definitions/")?;
        self.definitions.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_item_keeps_method_order_and_skips_extras() {
        let item: PathItem = serde_json::from_value(json!({
            "parameters": [],
            "post": { "operationId": "addPet" },
            "x-extra": true,
            "GET": { "operationId": "findPets" }
        }))
        .unwrap();

        let methods: Vec<&String> = item.operations.keys().collect();
        assert_eq!(methods, vec!["post", "get"]);
    }

    #[test]
    fn test_describe_priority() {
        let mut param = Parameter {
            summary: Some("short".to_string()),
            ..Default::default()
        };
        assert_eq!(param.describe(), "short");

        param.description = Some("long".to_string());
        assert_eq!(param.describe(), "long");

        param.external_docs = Some(ExternalDocs {
            description: Some("Find more info here".to_string()),
            url: "https://swagger.io".to_string(),
        });
        assert_eq!(param.describe(), "Find more info here (https://swagger.io)");
    }

    #[test]
    fn test_describe_defaults_to_empty() {
        assert_eq!(Operation::default().describe(), "");
    }
}
