//! Swagger parsing and service extraction
//!
//! This crate turns a Swagger document into the intermediate service
//! model (`ServiceMap`: pin → `ServiceModel`) consumed by the generator.
//!
//! ## Extraction Strategy
//!
//! Every operation is assigned a pin, first match wins:
//! - `x-seneca-pattern` → text before the first comma (`role:api,cmd:list` → `role:api`)
//! - `x-swagger-router-controller` → `controller:<name>`
//! - `operationId` → `operation:<id>`
//!
//! Operations sharing a pin are grouped into one service. Each operation's
//! parameters are flattened: dispatch pattern keys, then declared
//! parameters, with object schemas expanded into dotted sub-fields.

mod extract;
mod params;
mod pattern;
mod service;
pub mod swagger;
mod type_mapper;

pub use extract::{extract, Extractor, ServiceMap};
pub use params::extract_params;
pub use pattern::{
    identify_pattern, identify_pin, literal_type_name, parse_pattern, pattern_function_name,
    PinSource,
};
pub use service::{build_dirname, build_name, build_operation, new_service, pin_segments};
pub use swagger::SwaggerParser;
pub use type_mapper::TypeMapper;

use seneca_scaffold_common::Result;
use std::path::Path;

/// Load a Swagger file and extract its services
///
/// # Arguments
/// * `path` - Swagger document (JSON or YAML)
///
/// # Returns
/// * `ServiceMap` - services keyed by pin, in first-seen order
pub fn parse_swagger_file<P: AsRef<Path>>(path: P) -> Result<ServiceMap> {
    SwaggerParser::from_file(path)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_missing_file() {
        let result = parse_swagger_file("does/not/exist.yaml");
        assert!(result.is_err());
    }
}
