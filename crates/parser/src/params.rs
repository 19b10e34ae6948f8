//! Parameter flattening
//!
//! Produces the flat, template-friendly parameter list of an operation:
//! dispatch pattern keys first, then declared parameters in document
//! order, with object-typed parameters followed by one dotted entry per
//! schema property.

use crate::pattern::{identify_pattern, literal_type_name, parse_pattern};
use crate::swagger::{Documented, Operation, Parameter, Schema};
use crate::type_mapper::TypeMapper;
use seneca_scaffold_common::{ParamKind, ParamModel, Result};

const PATTERN_PARAM_DESCRIPTION: &str = "Seneca pattern parameter";

/// Flatten every parameter of an operation
pub fn extract_params(operation: &Operation) -> Result<Vec<ParamModel>> {
    let pattern = identify_pattern(operation);
    let mut params: Vec<ParamModel> = parse_pattern(&pattern)?
        .into_iter()
        .map(|(name, value)| ParamModel {
            name,
            description: PATTERN_PARAM_DESCRIPTION.to_string(),
            required: true,
            readonly: false,
            write_only: false,
            nullable: false,
            external_docs: None,
            param_type: literal_type_name(&value).to_string(),
            example: Some(value),
            pattern: None,
            kind: ParamKind::Pattern,
        })
        .collect();

    for param in &operation.parameters {
        match param.schema.as_ref() {
            Some(schema) if schema.schema_type.as_deref() == Some("object") => {
                params.extend(expand_object(param, schema));
            }
            _ => {
                let param_type =
                    TypeMapper::map_type(param.param_type.as_deref(), param.items.as_ref());
                params.push(declared(param, param_type));
            }
        }
    }

    Ok(params)
}

/// The parameter itself followed by one entry per schema property
fn expand_object(param: &Parameter, schema: &Schema) -> Vec<ParamModel> {
    let mut expanded = vec![declared(param, "object".to_string())];

    for (prop_name, prop) in schema.properties.iter().flatten() {
        expanded.push(ParamModel {
            name: format!("{}.{}", param.name, prop_name),
            description: prop.describe(),
            required: schema.required.iter().any(|r| r == prop_name),
            readonly: prop.readonly,
            write_only: prop.write_only,
            nullable: prop.nullable,
            external_docs: prop.external_docs.clone(),
            example: prop.example.clone(),
            pattern: prop.pattern.clone(),
            param_type: TypeMapper::map_type(prop.schema_type.as_deref(), prop.items.as_ref()),
            kind: ParamKind::Property,
        });
    }

    expanded
}

fn declared(param: &Parameter, param_type: String) -> ParamModel {
    ParamModel {
        name: param.name.clone(),
        description: param.describe(),
        required: param.required,
        readonly: param.readonly,
        write_only: param.write_only,
        nullable: param.nullable,
        external_docs: param.external_docs.clone(),
        example: param.example.clone(),
        pattern: None,
        param_type,
        kind: ParamKind::Declared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn operation(value: serde_json::Value) -> Operation {
        serde_json::from_value(value).unwrap()
    }

    fn names(params: &[ParamModel]) -> Vec<&str> {
        params.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_pattern_params_precede_declared() {
        let op = operation(json!({
            "x-seneca-pattern": "role:api,cmd:list",
            "parameters": [
                { "name": "limit", "in": "query", "type": "integer" },
                { "name": "tags", "in": "query", "type": "array", "items": { "type": "string" } }
            ]
        }));

        let params = extract_params(&op).unwrap();
        assert_eq!(names(&params), vec!["role", "cmd", "limit", "tags"]);

        assert_eq!(params[0].kind, ParamKind::Pattern);
        assert!(params[0].required);
        assert_eq!(params[0].param_type, "string");
        assert_eq!(params[0].example, Some(json!("api")));
        assert_eq!(params[0].description, "Seneca pattern parameter");

        assert_eq!(params[2].kind, ParamKind::Declared);
        assert!(!params[2].required);
        assert_eq!(params[2].param_type, "number");
        assert_eq!(params[3].param_type, "string[]");
    }

    #[test]
    fn test_pattern_param_numeric_literal() {
        let op = operation(json!({ "x-seneca-pattern": "role:api,v:2" }));
        let params = extract_params(&op).unwrap();
        assert_eq!(params[1].param_type, "number");
        assert_eq!(params[1].example, Some(json!(2)));
    }

    #[test]
    fn test_derived_pattern_params() {
        let op = operation(json!({
            "operationId": "findPets",
            "x-swagger-router-controller": "pets"
        }));

        let params = extract_params(&op).unwrap();
        assert_eq!(names(&params), vec!["controller", "operation"]);
        assert_eq!(params[1].example, Some(json!("findPets")));
    }

    #[test]
    fn test_object_param_flattening_order() {
        let op = operation(json!({
            "operationId": "addPet",
            "parameters": [
                {
                    "name": "pet",
                    "in": "body",
                    "required": true,
                    "description": "Pet to add",
                    "schema": {
                        "type": "object",
                        "required": ["name"],
                        "properties": {
                            "name": { "type": "string", "pattern": "^[a-z]+$", "example": "rex" },
                            "age": { "type": "integer", "description": "Age in years" }
                        }
                    }
                },
                { "name": "dryRun", "in": "query", "type": "boolean" }
            ]
        }));

        let params = extract_params(&op).unwrap();
        assert_eq!(
            names(&params),
            vec!["operation", "pet", "pet.name", "pet.age", "dryRun"]
        );

        let pet = &params[1];
        assert_eq!(pet.param_type, "object");
        assert_eq!(pet.kind, ParamKind::Declared);
        assert!(pet.required);
        assert_eq!(pet.description, "Pet to add");

        let name = &params[2];
        assert_eq!(name.kind, ParamKind::Property);
        assert!(name.required);
        assert_eq!(name.pattern.as_deref(), Some("^[a-z]+$"));
        assert_eq!(name.example, Some(json!("rex")));

        let age = &params[3];
        assert!(!age.required);
        assert_eq!(age.param_type, "number");
        assert_eq!(age.description, "Age in years");

        assert_eq!(params[4].param_type, "boolean");
    }

    #[test]
    fn test_object_without_properties_yields_parent_only() {
        let op = operation(json!({
            "operationId": "addPet",
            "parameters": [
                { "name": "pet", "in": "body", "schema": { "type": "object" } }
            ]
        }));

        let params = extract_params(&op).unwrap();
        assert_eq!(names(&params), vec!["operation", "pet"]);
        assert_eq!(params[1].param_type, "object");
    }

    #[test]
    fn test_non_object_body_schema_uses_declared_type() {
        let op = operation(json!({
            "operationId": "upload",
            "parameters": [
                { "name": "blob", "in": "body", "schema": { "type": "string" } }
            ]
        }));

        let params = extract_params(&op).unwrap();
        assert_eq!(params[1].param_type, "string");
        assert_eq!(params[1].kind, ParamKind::Declared);
    }

    #[test]
    fn test_bad_pattern_propagates() {
        let op = operation(json!({ "x-seneca-pattern": "role:api,cmd" }));
        assert!(extract_params(&op).is_err());
    }
}
