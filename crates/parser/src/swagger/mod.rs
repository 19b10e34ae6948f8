//! Swagger 2.0 document parser
//!
//! Loads Swagger documents (JSON or YAML) into typed structures that keep
//! document order, ready for service extraction.
//!
//! ## Vendor extensions
//! - `x-seneca-pattern`: explicit dispatch pattern (`role:api,cmd:list`)
//! - `x-swagger-router-controller`: controller name (`controller:<name>`)
//!
//! ## Usage
//! ```rust,ignore
//! use seneca_scaffold_parser::swagger::SwaggerParser;
//!
//! let parser = SwaggerParser::from_file("petstore.yaml")?;
//! let services = parser.parse()?;
//! ```

mod parser;
mod types;

pub use parser::SwaggerParser;
pub use types::*;
