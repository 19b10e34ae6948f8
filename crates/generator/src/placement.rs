//! Output placement policy

use seneca_scaffold_common::ServiceModel;
use std::path::Path;

/// How and where rendered files are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Overwrite files that already exist
    pub override_existing: bool,

    /// One directory per service instead of a shared flat directory
    pub standalone: bool,

    /// Suffix stripped from template names to form output names
    pub template_suffix: String,

    /// Template renamed to `<service name>.<ext>` in merged mode
    pub entry_point: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            override_existing: false,
            standalone: true,
            template_suffix: ".tera".to_string(),
            entry_point: "index.js.tera".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn with_override(mut self, override_existing: bool) -> Self {
        self.override_existing = override_existing;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_template_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.template_suffix = suffix.into();
        self
    }

    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Output file name for a template, without the directory
    ///
    /// Merged mode renames only the entry point; every other template keeps
    /// its stripped name, so two services rendered into one directory will
    /// overwrite each other's shared files when overriding.
    pub fn output_name(&self, service: &ServiceModel, template: &str) -> String {
        let stripped = template
            .strip_suffix(self.template_suffix.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(template);

        if self.standalone || template != self.entry_point {
            return stripped.to_string();
        }

        match Path::new(stripped).extension().and_then(|ext| ext.to_str()) {
            Some(ext) => format!("{}.{}", service.name, ext),
            None => service.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(name: &str) -> ServiceModel {
        ServiceModel {
            pin: "role:api".to_string(),
            name: name.to_string(),
            dirname: "api-role".to_string(),
            author: None,
            license: None,
            version: None,
            description: None,
            year: 2024,
            operations: vec![],
        }
    }

    #[test]
    fn test_standalone_strips_suffix_only() {
        let options = RenderOptions::default();
        let api = service("ApiRole");
        assert_eq!(options.output_name(&api, "index.js.tera"), "index.js");
        assert_eq!(options.output_name(&api, "package.json.tera"), "package.json");
        assert_eq!(options.output_name(&api, "LICENSE"), "LICENSE");
    }

    #[test]
    fn test_merged_renames_entry_point() {
        let options = RenderOptions::default().with_standalone(false);
        let api = service("ApiRole");
        assert_eq!(options.output_name(&api, "index.js.tera"), "ApiRole.js");
        assert_eq!(options.output_name(&api, "README.md.tera"), "README.md");
    }

    #[test]
    fn test_custom_suffix_and_entry_point() {
        let options = RenderOptions::default()
            .with_standalone(false)
            .with_template_suffix(".tpl")
            .with_entry_point("main.ts.tpl");
        let api = service("ApiRole");
        assert_eq!(options.output_name(&api, "main.ts.tpl"), "ApiRole.ts");
        assert_eq!(options.output_name(&api, "index.js.tpl"), "index.js");
    }

    #[test]
    fn test_entry_point_without_extension() {
        let options = RenderOptions::default()
            .with_standalone(false)
            .with_entry_point("Makefile.tera");
        assert_eq!(options.output_name(&service("ApiRole"), "Makefile.tera"), "ApiRole");
    }
}
