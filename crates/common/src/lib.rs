//! Common types and utilities for Seneca Scaffold
//!
//! This crate contains the intermediate service model produced by the
//! parser and consumed by the generator, along with the error type shared
//! by every stage of the pipeline.

mod model;

pub use model::{ExternalDocs, OperationModel, ParamKind, ParamModel, ServiceModel};

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting or rendering services
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Operation {method} {path} has no dispatch pattern, controller or operationId")]
    MalformedOperation { path: String, method: String },

    #[error("Pin '{0}' must be exactly two colon-separated segments")]
    MalformedPin(String),

    #[error("Invalid dispatch pattern '{pattern}': {reason}")]
    PatternParse { pattern: String, reason: String },

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template '{template}' failed for service {service}: {message}")]
    Template {
        template: String,
        service: String,
        message: String,
    },

    #[error("{} file(s) failed to render for service {service}:\n{}", failures.len(), FailureList(failures))]
    Render {
        service: String,
        failures: Vec<FileFailure>,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single template that could not be rendered or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// Template file name
    pub template: String,
    /// Error message
    pub message: String,
}

struct FailureList<'a>(&'a [FileFailure]);

impl fmt::Display for FailureList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {}: {}", failure.template, failure.message)?;
        }
        Ok(())
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error_lists_every_failure() {
        let err = GeneratorError::Render {
            service: "ApiRole".to_string(),
            failures: vec![
                FileFailure {
                    template: "index.js.tera".to_string(),
                    message: "boom".to_string(),
                },
                FileFailure {
                    template: "README.md.tera".to_string(),
                    message: "bang".to_string(),
                },
            ],
        };

        let message = err.to_string();
        assert!(message.starts_with("2 file(s) failed to render for service ApiRole"));
        assert!(message.contains("index.js.tera: boom"));
        assert!(message.contains("README.md.tera: bang"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = GeneratorError::io(
            "/tmp/out/index.js",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out/index.js"));
    }
}
