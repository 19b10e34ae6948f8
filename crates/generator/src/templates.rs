//! Template loading and management

use seneca_scaffold_common::{GeneratorError, Result};
use std::collections::HashMap;
use std::error::Error as _;
use std::fs;
use std::io;
use std::path::PathBuf;
use tera::{Tera, Value};
use tracing::warn;

/// Default Seneca plugin templates compiled into the binary
const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    ("README.md.tera", include_str!("../templates/README.md.tera")),
    ("index.js.tera", include_str!("../templates/index.js.tera")),
    ("package.json.tera", include_str!("../templates/package.json.tera")),
];

/// A flat set of template files
#[cfg_attr(test, mockall::automock)]
pub trait TemplateSource {
    /// Template file names, sorted
    fn list(&self) -> Result<Vec<String>>;

    /// Raw content of one template
    fn read(&self, name: &str) -> Result<String>;
}

/// Templates read from a directory (non-recursive)
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TemplateSource for DirectorySource {
    fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| GeneratorError::io(&self.dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GeneratorError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => warn!(?name, "skipping template with non UTF-8 name"),
            }
        }

        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|e| GeneratorError::io(path, e))
    }
}

/// The built-in default templates
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl TemplateSource for EmbeddedSource {
    fn list(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = DEFAULT_TEMPLATES
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<String> {
        DEFAULT_TEMPLATES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, content)| content.to_string())
            .ok_or_else(|| {
                GeneratorError::io(
                    name,
                    io::Error::new(io::ErrorKind::NotFound, "no such embedded template"),
                )
            })
    }
}

/// Compile a single template with the custom filters registered
pub fn load_template(name: &str, content: &str) -> tera::Result<Tera> {
    let mut tera = Tera::default();

    // Register custom filters
    tera.register_filter("capitalize", capitalize_filter);
    tera.register_filter("js_literal", js_literal_filter);

    tera.add_raw_template(name, content)?;
    Ok(tera)
}

/// Flatten a tera error and its causes into one line
pub fn describe_tera_error(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Filter to capitalize first letter
fn capitalize_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("capitalize filter expects a string"))?;

    let mut chars = s.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };

    Ok(Value::String(capitalized))
}

/// Filter to render any value as a JavaScript literal
fn js_literal_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    serde_json::to_string(value)
        .map(Value::String)
        .map_err(|e| tera::Error::msg(format!("js_literal filter failed: {}", e)))
}
