//! Extraction pipeline
//!
//! Folds every operation of a document, in document order, into a
//! pin → `ServiceModel` mapping. The first error aborts the whole run.

use crate::pattern::identify_pin;
use crate::service::{build_operation, new_service};
use crate::swagger::{Operation, SwaggerDocument};
use chrono::Datelike;
use indexmap::map::Entry;
use indexmap::IndexMap;
use seneca_scaffold_common::{GeneratorError, Result, ServiceModel};
use tracing::{debug, info};

/// Services keyed by pin, in first-seen order
pub type ServiceMap = IndexMap<String, ServiceModel>;

/// Builds service models from a document
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    year: i32,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    /// Extractor stamping the current local year
    pub fn new() -> Self {
        Self::with_year(chrono::Local::now().year())
    }

    /// Extractor stamping a fixed year
    pub fn with_year(year: i32) -> Self {
        Self { year }
    }

    /// Extract every service of a document
    pub fn extract(&self, document: &SwaggerDocument) -> Result<ServiceMap> {
        let services = document
            .operations()
            .try_fold(ServiceMap::new(), |services, (path, method, operation)| {
                self.add_operation(services, document, path, method, operation)
            })?;

        info!(
            services = services.len(),
            operations = services.values().map(|s| s.operations.len()).sum::<usize>(),
            "extracted services"
        );
        Ok(services)
    }

    /// Thread one operation into the mapping, creating its service on first sight
    pub fn add_operation(
        &self,
        mut services: ServiceMap,
        document: &SwaggerDocument,
        path: &str,
        method: &str,
        operation: &Operation,
    ) -> Result<ServiceMap> {
        let pin = identify_pin(operation).ok_or_else(|| GeneratorError::MalformedOperation {
            path: path.to_string(),
            method: method.to_string(),
        })?;

        let service = match services.entry(pin) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!(pin = %entry.key(), "new service");
                let service = new_service(document, entry.key(), self.year)?;
                entry.insert(service)
            }
        };

        let model = build_operation(&service.name, path, method, operation)?;
        debug!(pin = %service.pin, path, method, function = %model.function_name, "added operation");
        service.operations.push(model);

        Ok(services)
    }
}

/// Extract every service of a document, stamping the current year
pub fn extract(document: &SwaggerDocument) -> Result<ServiceMap> {
    Extractor::new().extract(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: serde_json::Value) -> SwaggerDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_operations_sharing_a_pin_merge() {
        let doc = document(json!({
            "swagger": "2.0",
            "info": { "version": "1.0.0" },
            "paths": {
                "/pets": {
                    "get": { "x-seneca-pattern": "role:api,cmd:list" },
                    "post": { "x-seneca-pattern": "role:api,cmd:add" }
                }
            }
        }));

        let services = Extractor::with_year(2024).extract(&doc).unwrap();
        assert_eq!(services.len(), 1);

        let service = &services["role:api"];
        assert_eq!(service.name, "ApiRole");
        let functions: Vec<&str> = service
            .operations
            .iter()
            .map(|o| o.function_name.as_str())
            .collect();
        assert_eq!(functions, vec!["ApiRole.list", "ApiRole.add"]);
        assert_eq!(service.operations[0].method, "get");
        assert_eq!(service.operations[1].method, "post");
    }

    #[test]
    fn test_services_in_first_seen_order() {
        let doc = document(json!({
            "paths": {
                "/b": { "get": { "operationId": "zeta" } },
                "/a": {
                    "get": { "x-swagger-router-controller": "pets" },
                    "put": { "operationId": "alpha" }
                }
            }
        }));

        let services = Extractor::with_year(2024).extract(&doc).unwrap();
        let pins: Vec<&String> = services.keys().collect();
        assert_eq!(
            pins,
            vec!["operation:zeta", "controller:pets", "operation:alpha"]
        );
    }

    #[test]
    fn test_undefined_pin_aborts_extraction() {
        let doc = document(json!({
            "paths": {
                "/ok": { "get": { "operationId": "fine" } },
                "/bad": { "delete": { "summary": "no hints" } }
            }
        }));

        let err = Extractor::with_year(2024).extract(&doc).unwrap_err();
        match err {
            GeneratorError::MalformedOperation { path, method } => {
                assert_eq!(path, "/bad");
                assert_eq!(method, "delete");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_pin_aborts_extraction() {
        let doc = document(json!({
            "paths": { "/x": { "get": { "x-seneca-pattern": "role" } } }
        }));

        let err = Extractor::with_year(2024).extract(&doc).unwrap_err();
        assert!(matches!(err, GeneratorError::MalformedPin(pin) if pin == "role"));
    }

    #[test]
    fn test_metadata_taken_once() {
        let doc = document(json!({
            "info": { "description": "Pets" },
            "paths": {
                "/a": { "get": { "operationId": "one" }, "post": { "operationId": "one" } }
            }
        }));

        let services = Extractor::with_year(2031).extract(&doc).unwrap();
        let service = &services["operation:one"];
        assert_eq!(service.operations.len(), 2);
        assert_eq!(service.description.as_deref(), Some("Pets"));
        assert_eq!(service.author, None);
        assert_eq!(service.year, 2031);
    }
}
