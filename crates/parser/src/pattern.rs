//! Dispatch patterns and pins
//!
//! A dispatch pattern addresses the Seneca handler behind an operation,
//! e.g. `role:api,cmd:list`. The pin is the grouping key derived from it:
//! everything before the first comma of an explicit pattern, or
//! `controller:<name>` / `operation:<id>` when no explicit pattern exists.

use crate::swagger::Operation;
use indexmap::IndexMap;
use seneca_scaffold_common::{GeneratorError, Result};
use serde_json::{Number, Value};
use std::iter::Peekable;
use std::str::Chars;

/// Where an operation's pin comes from, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSource<'a> {
    /// `x-seneca-pattern`
    Explicit(&'a str),
    /// `x-swagger-router-controller`
    Controller(&'a str),
    /// `operationId`
    OperationId(&'a str),
    /// None of the above are present
    Unresolved,
}

impl<'a> PinSource<'a> {
    /// Classify an operation. Empty strings count as absent.
    pub fn of(operation: &'a Operation) -> Self {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if let Some(pattern) = present(&operation.seneca_pattern) {
            PinSource::Explicit(pattern)
        } else if let Some(controller) = present(&operation.router_controller) {
            PinSource::Controller(controller)
        } else if let Some(id) = present(&operation.operation_id) {
            PinSource::OperationId(id)
        } else {
            PinSource::Unresolved
        }
    }

    /// The pin this source yields, `None` when unresolved
    pub fn pin(&self) -> Option<String> {
        match self {
            PinSource::Explicit(pattern) => Some(match pattern.find(',') {
                Some(idx) => pattern[..idx].to_string(),
                None => pattern.to_string(),
            }),
            PinSource::Controller(name) => Some(format!("controller:{}", name)),
            PinSource::OperationId(id) => Some(format!("operation:{}", id)),
            PinSource::Unresolved => None,
        }
    }
}

/// Derive the grouping pin of an operation
pub fn identify_pin(operation: &Operation) -> Option<String> {
    PinSource::of(operation).pin()
}

/// Build the full dispatch pattern of an operation
///
/// An explicit pattern is returned verbatim. Otherwise the controller and
/// operation segments are joined with a comma; empty when neither exists.
pub fn identify_pattern(operation: &Operation) -> String {
    if let PinSource::Explicit(pattern) = PinSource::of(operation) {
        return pattern.to_string();
    }

    let controller = operation
        .router_controller
        .as_deref()
        .filter(|c| !c.is_empty())
        .map(|c| format!("controller:{}", c));
    let operation_id = operation
        .operation_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .map(|id| format!("operation:{}", id));

    controller
        .into_iter()
        .chain(operation_id)
        .collect::<Vec<_>>()
        .join(",")
}

/// Text after the last `:` of a pattern, used as the handler function name
pub fn pattern_function_name(pattern: &str) -> &str {
    pattern.rsplit(':').next().unwrap_or(pattern)
}

/// Type name of a pattern literal as templates see it
pub fn literal_type_name(value: &Value) -> &'static str {
    match value {
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::String(_) => "string",
        Value::Null | Value::Array(_) | Value::Object(_) => "object",
    }
}

/// Parse a dispatch pattern into its key/value pairs
///
/// Accepts relaxed object-literal syntax: `key:value` or `key=value`
/// entries separated by commas, optional surrounding braces, optional
/// single or double quotes. Unquoted values become numbers, booleans or
/// null when they read as such. Duplicate keys keep their first position
/// and their last value.
///
/// # Examples
/// ```
/// use seneca_scaffold_parser::parse_pattern;
/// use serde_json::json;
///
/// let entries = parse_pattern("role:api,cmd:list,v=2").unwrap();
/// assert_eq!(entries["role"], json!("api"));
/// assert_eq!(entries["v"], json!(2));
/// ```
pub fn parse_pattern(pattern: &str) -> Result<IndexMap<String, Value>> {
    PatternParser::new(pattern).parse()
}

struct PatternParser<'a> {
    pattern: &'a str,
    chars: Peekable<Chars<'a>>,
    braced: bool,
}

impl<'a> PatternParser<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            pattern,
            chars: pattern.chars().peekable(),
            braced: false,
        }
    }

    fn parse(mut self) -> Result<IndexMap<String, Value>> {
        let mut entries = IndexMap::new();

        self.skip_whitespace();
        if self.chars.peek() == Some(&'{') {
            self.chars.next();
            self.braced = true;
        }

        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                None if self.braced => return Err(self.error("missing closing '}'")),
                None => break,
                Some('}') if self.braced => {
                    self.chars.next();
                    self.skip_whitespace();
                    if let Some(&c) = self.chars.peek() {
                        return Err(self.error(format!("unexpected '{}' after '}}'", c)));
                    }
                    break;
                }
                Some(',') => return Err(self.error("empty entry")),
                _ => {}
            }

            let key = self.key()?;
            self.skip_whitespace();
            match self.chars.next() {
                Some(':') | Some('=') => {}
                Some(c) => {
                    return Err(self.error(format!(
                        "expected ':' or '=' after '{}', found '{}'",
                        key, c
                    )))
                }
                None => return Err(self.error(format!("missing value for '{}'", key))),
            }

            self.skip_whitespace();
            let value = self.value(&key)?;
            entries.insert(key, value);

            self.skip_whitespace();
            match self.chars.peek() {
                Some(',') => {
                    self.chars.next();
                }
                Some('}') if self.braced => {}
                None => {}
                Some(&c) => return Err(self.error(format!("unexpected '{}'", c))),
            }
        }

        Ok(entries)
    }

    fn key(&mut self) -> Result<String> {
        if let Some(&quote) = self.chars.peek().filter(|c| **c == '"' || **c == '\'') {
            return self.quoted(quote);
        }

        let mut key = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || ":=,{}[]\"'".contains(c) {
                break;
            }
            key.push(c);
            self.chars.next();
        }

        if key.is_empty() {
            let found = self.chars.peek().copied();
            return Err(match found {
                Some(c) => self.error(format!("expected key, found '{}'", c)),
                None => self.error("expected key"),
            });
        }
        Ok(key)
    }

    fn value(&mut self, key: &str) -> Result<Value> {
        match self.chars.peek() {
            Some(&quote) if quote == '"' || quote == '\'' => {
                return self.quoted(quote).map(Value::String)
            }
            Some('{') | Some('[') => {
                return Err(self.error(format!("nested value for '{}' is not supported", key)))
            }
            _ => {}
        }

        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c == ',' || (c == '}' && self.braced) {
                break;
            }
            text.push(c);
            self.chars.next();
        }

        let text = text.trim_end();
        if text.is_empty() {
            return Err(self.error(format!("missing value for '{}'", key)));
        }
        if let Some(c) = text.chars().find(|c| ":={}[]".contains(*c)) {
            return Err(self.error(format!("unexpected '{}' in value '{}'", c, text)));
        }

        Ok(literal(text))
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        self.chars.next();
        let mut text = String::new();

        while let Some(c) = self.chars.next() {
            match c {
                '\\' => match self.chars.next() {
                    Some(escaped) => text.push(escaped),
                    None => break,
                },
                c if c == quote => return Ok(text),
                c => text.push(c),
            }
        }

        Err(self.error(format!("unterminated {} quote", quote)))
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn error(&self, reason: impl Into<String>) -> GeneratorError {
        GeneratorError::PatternParse {
            pattern: self.pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Type an unquoted literal
fn literal(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    let numeric = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '-');
    if numeric {
        if let Ok(n) = text.parse::<i64>() {
            return Value::Number(n.into());
        }
        if let Some(n) = text.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    }

    Value::String(text.to_string())
}
