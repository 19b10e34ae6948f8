//! Type mapping from Swagger types to generated type names
//!
//! Maps Swagger scalar and array types to the JavaScript-flavoured names
//! used in templates.

use crate::swagger::Items;

/// Maps Swagger type descriptors to type names
pub struct TypeMapper;

impl TypeMapper {
    /// Map a Swagger type (plus its `items` for arrays) to a type name
    ///
    /// # Examples
    /// ```
    /// use seneca_scaffold_parser::TypeMapper;
    /// use seneca_scaffold_parser::swagger::Items;
    ///
    /// assert_eq!(TypeMapper::map_type(Some("integer"), None), "number");
    /// assert_eq!(TypeMapper::map_type(Some("boolean"), None), "boolean");
    /// assert_eq!(TypeMapper::map_type(Some("date-time"), None), "string");
    ///
    /// let items = Items { item_type: Some("integer".to_string()) };
    /// assert_eq!(TypeMapper::map_type(Some("array"), Some(&items)), "number[]");
    /// ```
    pub fn map_type(spec_type: Option<&str>, items: Option<&Items>) -> String {
        match spec_type {
            Some("integer") | Some("number") => "number".to_string(),
            Some("boolean") => "boolean".to_string(),
            Some("array") => {
                // One level of item lookup; nested item descriptors are not followed
                let item_type = items.and_then(|i| i.item_type.as_deref());
                format!("{}[]", Self::map_type(item_type, None))
            }
            // Strings, unknown types and absent types all default to string
            _ => "string".to_string(),
        }
    }
}
