//! Swagger document loader

use super::types::SwaggerDocument;
use crate::extract::{Extractor, ServiceMap};
use seneca_scaffold_common::{GeneratorError, Result};
use std::fs;
use std::path::Path;

/// Swagger document parser
///
/// Reads a Swagger 2.0 document from JSON or YAML, resolves local
/// parameter and definition references, and hands the document to the
/// extraction pipeline.
pub struct SwaggerParser {
    /// Loaded document
    document: SwaggerDocument,

    /// Year stamped onto every extracted service
    year: Option<i32>,
}

impl SwaggerParser {
    /// Load a document from a file path
    ///
    /// `.json` files are parsed as JSON, `.yaml`/`.yml` as YAML; anything
    /// else is tried as JSON first and then as YAML.
    ///
    /// # Example
    /// ```rust,ignore
    /// let parser = SwaggerParser::from_file("petstore.yaml")?;
    /// let services = parser.parse()?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Parse(format!(
                "Failed to read Swagger file {}: {}",
                path.display(),
                e
            ))
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content).or_else(|_| Self::from_yaml(&content)),
        }
    }

    /// Parse a document from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let document: SwaggerDocument = serde_json::from_str(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse Swagger JSON: {}", e)))?;

        Self::from_document(document)
    }

    /// Parse a document from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // Going through serde_json stringifies non-string keys such as `200:`
        let raw: serde_yaml::Value = serde_yaml::from_str(yaml)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse Swagger YAML: {}", e)))?;
        let json = serde_json::to_value(raw)
            .map_err(|e| GeneratorError::Parse(format!("Failed to convert Swagger YAML: {}", e)))?;
        let document: SwaggerDocument = serde_json::from_value(json)
            .map_err(|e| GeneratorError::Parse(format!("Failed to parse Swagger YAML: {}", e)))?;

        Self::from_document(document)
    }

    /// Wrap an already deserialized document, resolving local references
    pub fn from_document(document: SwaggerDocument) -> Result<Self> {
        Ok(Self {
            document: resolve_references(document)?,
            year: None,
        })
    }

    /// Pin the year stamped onto extracted services
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Extract the pin → service mapping
    pub fn parse(&self) -> Result<ServiceMap> {
        let extractor = match self.year {
            Some(year) => Extractor::with_year(year),
            None => Extractor::new(),
        };
        extractor.extract(&self.document)
    }

    /// Get reference to the underlying document
    pub fn document(&self) -> &SwaggerDocument {
        &self.document
    }
}

/// Replace `#/parameters/...` parameters and `#/definitions/...` parameter
/// schemas with their targets. One level only.
fn resolve_references(mut document: SwaggerDocument) -> Result<SwaggerDocument> {
    let mut paths = std::mem::take(&mut document.paths);

    for (path, item) in paths.iter_mut() {
        for (method, operation) in item.operations.iter_mut() {
            for param in operation.parameters.iter_mut() {
                if let Some(ref_path) = param.ref_path.clone() {
                    *param = document
                        .resolve_parameter_ref(&ref_path)
                        .cloned()
                        .ok_or_else(|| {
                            GeneratorError::Parse(format!(
                                "Unresolved parameter reference {} in {} {}",
                                ref_path, method, path
                            ))
                        })?;
                }

                if let Some(schema) = param.schema.as_mut() {
                    if let Some(ref_path) = schema.ref_path.clone() {
                        *schema = document
                            .resolve_schema_ref(&ref_path)
                            .cloned()
                            .ok_or_else(|| {
                                GeneratorError::Parse(format!(
                                    "Unresolved schema reference {} in {} {}",
                                    ref_path, method, path
                                ))
                            })?;
                    }
                }
            }
        }
    }

    document.paths = paths;
    Ok(document)
}
