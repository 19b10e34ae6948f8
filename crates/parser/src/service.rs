//! Service model building
//!
//! Creates a `ServiceModel` the first time a pin is seen and appends an
//! `OperationModel` for every operation sharing that pin.

use crate::params::extract_params;
use crate::pattern::{identify_pattern, pattern_function_name};
use crate::swagger::{Documented, Operation, SwaggerDocument};
use seneca_scaffold_common::{GeneratorError, OperationModel, Result, ServiceModel};

/// Split a pin into its `(category, subject)` segments
///
/// Exactly one colon with text on both sides is accepted. Segments end up
/// in file and directory names, so path separators, `..` and NUL are
/// rejected too.
pub fn pin_segments(pin: &str) -> Result<(&str, &str)> {
    match pin.split_once(':') {
        Some((category, subject))
            if is_name_segment(category) && is_name_segment(subject) && !subject.contains(':') =>
        {
            Ok((category, subject))
        }
        _ => Err(GeneratorError::MalformedPin(pin.to_string())),
    }
}

fn is_name_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains(['/', '\\', '\0']) && !segment.contains("..")
}

/// Display name: `role:api` → `ApiRole`
pub fn build_name(pin: &str) -> Result<String> {
    let (category, subject) = pin_segments(pin)?;
    Ok(format!("{}{}", capitalize(subject), capitalize(category)))
}

/// Directory name: `role:api` → `api-role`
pub fn build_dirname(pin: &str) -> Result<String> {
    let (category, subject) = pin_segments(pin)?;
    Ok(format!(
        "{}-{}",
        subject.to_lowercase(),
        category.to_lowercase()
    ))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Start a service for a newly seen pin
///
/// Metadata comes from the document info block; missing fields stay `None`.
pub fn new_service(document: &SwaggerDocument, pin: &str, year: i32) -> Result<ServiceModel> {
    let info = &document.info;

    Ok(ServiceModel {
        pin: pin.to_string(),
        name: build_name(pin)?,
        dirname: build_dirname(pin)?,
        author: info.contact.as_ref().and_then(|c| c.name.clone()),
        license: info.license.as_ref().and_then(|l| l.name.clone()),
        version: info.version.clone(),
        description: info.description.clone(),
        year,
        operations: Vec::new(),
    })
}

/// Build the operation model for an operation owned by `service_name`
pub fn build_operation(
    service_name: &str,
    path: &str,
    method: &str,
    operation: &Operation,
) -> Result<OperationModel> {
    let pattern = identify_pattern(operation);

    Ok(OperationModel {
        path: path.to_string(),
        method: method.to_string(),
        function_name: format!("{}.{}", service_name, pattern_function_name(&pattern)),
        description: operation.describe(),
        params: extract_params(operation)?,
        pattern,
        responses: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swagger::{Contact, Info, License};

    #[test]
    fn test_build_names() {
        assert_eq!(build_name("role:api").unwrap(), "ApiRole");
        assert_eq!(build_name("controller:petStore").unwrap(), "PetStoreController");
        assert_eq!(build_dirname("role:API").unwrap(), "api-role");
        assert_eq!(
            build_dirname("operation:findPets").unwrap(),
            "findpets-operation"
        );
    }

    #[test]
    fn test_malformed_pins() {
        for pin in ["plain", "a:b:c", ":api", "role:", ""] {
            assert!(
                matches!(build_name(pin), Err(GeneratorError::MalformedPin(_))),
                "expected {:?} to be rejected",
                pin
            );
            assert!(build_dirname(pin).is_err());
        }
    }

    #[test]
    fn test_pin_segments_cannot_form_paths() {
        for pin in [
            "role:../../escaped",
            "role:/etc",
            "role:a\\b",
            "../x:api",
            "role:a\0b",
            "role:..",
        ] {
            assert!(
                matches!(pin_segments(pin), Err(GeneratorError::MalformedPin(_))),
                "expected {:?} to be rejected",
                pin
            );
        }
        assert_eq!(pin_segments("role:v1.api").unwrap(), ("role", "v1.api"));
    }

    #[test]
    fn test_new_service_copies_metadata() {
        let document = SwaggerDocument {
            info: Info {
                version: Some("1.0.0".to_string()),
                description: Some("Pet store".to_string()),
                contact: Some(Contact {
                    name: Some("Swagger API Team".to_string()),
                    ..Default::default()
                }),
                license: Some(License {
                    name: Some("MIT".to_string()),
                    url: None,
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let service = new_service(&document, "role:api", 2024).unwrap();
        assert_eq!(service.name, "ApiRole");
        assert_eq!(service.dirname, "api-role");
        assert_eq!(service.author.as_deref(), Some("Swagger API Team"));
        assert_eq!(service.license.as_deref(), Some("MIT"));
        assert_eq!(service.version.as_deref(), Some("1.0.0"));
        assert_eq!(service.year, 2024);
        assert!(service.operations.is_empty());
    }

    #[test]
    fn test_missing_metadata_is_none() {
        let service = new_service(&SwaggerDocument::default(), "role:api", 2024).unwrap();
        assert_eq!(service.author, None);
        assert_eq!(service.license, None);
        assert_eq!(service.version, None);
        assert_eq!(service.description, None);
    }

    #[test]
    fn test_build_operation() {
        let operation = Operation {
            seneca_pattern: Some("role:api,cmd:list".to_string()),
            summary: Some("List pets".to_string()),
            ..Default::default()
        };

        let model = build_operation("ApiRole", "/pets", "get", &operation).unwrap();
        assert_eq!(model.function_name, "ApiRole.list");
        assert_eq!(model.pattern, "role:api,cmd:list");
        assert_eq!(model.description, "List pets");
        assert_eq!(model.params.len(), 2);
        assert_eq!(model.responses, None);
    }
}
