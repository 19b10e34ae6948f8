//! Template rendering for Seneca services
//!
//! This crate renders each `ServiceModel` through a flat set of templates
//! and places the results on disk:
//! - standalone: `<target>/<service dirname>/<template minus suffix>`
//! - merged: `<target>/<template minus suffix>`, with the entry-point
//!   template renamed to `<service name>.<ext>`
//!
//! Existing files are left untouched unless overriding is enabled. The
//! existence check and the write are a single `create_new` open, so two
//! renders racing on one path cannot both write it.

mod placement;
mod templates;

pub use placement::RenderOptions;
pub use templates::{DirectorySource, EmbeddedSource, TemplateSource};

use seneca_scaffold_common::{FileFailure, GeneratorError, Result, ServiceModel};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of rendering one service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Files written by this run
    pub written: Vec<PathBuf>,
    /// Files left untouched because they already existed
    pub skipped: Vec<PathBuf>,
}

enum WriteOutcome {
    Written,
    Skipped,
}

/// Service generator
///
/// Renders services through a template source according to `RenderOptions`.
pub struct ServiceGenerator {
    options: RenderOptions,
}

impl ServiceGenerator {
    /// Create a new generator with the given placement options
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render every template for one service into `target_dir`
    ///
    /// A failure on one template does not stop the others; when any file
    /// fails the result is a `GeneratorError::Render` listing each failure.
    pub fn generate(
        &self,
        service: &ServiceModel,
        source: &dyn TemplateSource,
        target_dir: &Path,
    ) -> Result<RenderReport> {
        fs::create_dir_all(target_dir).map_err(|e| GeneratorError::io(target_dir, e))?;

        let output_dir = if self.options.standalone {
            let dir = contained(target_dir, &service.dirname)?;
            fs::create_dir_all(&dir).map_err(|e| GeneratorError::io(&dir, e))?;
            dir
        } else {
            target_dir.to_path_buf()
        };

        let mut context = tera::Context::from_serialize(service).map_err(|e| {
            GeneratorError::Template {
                template: "<context>".to_string(),
                service: service.name.clone(),
                message: templates::describe_tera_error(&e),
            }
        })?;
        context.insert(
            "main",
            &self.options.output_name(service, &self.options.entry_point),
        );

        let mut report = RenderReport::default();
        let mut failures = Vec::new();

        for name in source.list()? {
            let output_name = self.options.output_name(service, &name);
            let target = output_dir.join(&output_name);

            let result = contained(&output_dir, &output_name)
                .and_then(|_| self.render_template(source, &name, &context, service))
                .and_then(|content| write_file(&target, &content, self.options.override_existing));

            match result {
                Ok(WriteOutcome::Written) => {
                    debug!(service = %service.name, path = %target.display(), "wrote file");
                    report.written.push(target);
                }
                Ok(WriteOutcome::Skipped) => {
                    debug!(service = %service.name, path = %target.display(), "kept existing file");
                    report.skipped.push(target);
                }
                Err(e) => {
                    warn!(service = %service.name, template = %name, error = %e, "template failed");
                    failures.push(FileFailure {
                        template: name,
                        message: e.to_string(),
                    });
                }
            }
        }

        if !failures.is_empty() {
            return Err(GeneratorError::Render {
                service: service.name.clone(),
                failures,
            });
        }

        info!(
            service = %service.name,
            written = report.written.len(),
            skipped = report.skipped.len(),
            "rendered service"
        );
        Ok(report)
    }

    /// Render every service, continuing past services that fail
    ///
    /// Failures from all services are merged into one `Render` error with
    /// template names prefixed by the service name. A failure that stops a
    /// whole service, such as its directory not being creatable, is listed
    /// under `<service>`.
    pub fn generate_all<'a>(
        &self,
        services: impl IntoIterator<Item = &'a ServiceModel>,
        source: &dyn TemplateSource,
        target_dir: &Path,
    ) -> Result<Vec<RenderReport>> {
        let mut reports = Vec::new();
        let mut failed_services = Vec::new();
        let mut failures = Vec::new();

        for service in services {
            match self.generate(service, source, target_dir) {
                Ok(report) => reports.push(report),
                Err(GeneratorError::Render {
                    service: name,
                    failures: service_failures,
                }) => {
                    failures.extend(service_failures.into_iter().map(|f| FileFailure {
                        template: format!("{}/{}", name, f.template),
                        message: f.message,
                    }));
                    failed_services.push(name);
                }
                Err(e) => {
                    warn!(service = %service.name, error = %e, "service failed");
                    failures.push(FileFailure {
                        template: format!("{}/<service>", service.name),
                        message: e.to_string(),
                    });
                    failed_services.push(service.name.clone());
                }
            }
        }

        if failures.is_empty() {
            Ok(reports)
        } else {
            Err(GeneratorError::Render {
                service: failed_services.join(", "),
                failures,
            })
        }
    }

    fn render_template(
        &self,
        source: &dyn TemplateSource,
        name: &str,
        context: &tera::Context,
        service: &ServiceModel,
    ) -> Result<String> {
        let template_error = |e: tera::Error| GeneratorError::Template {
            template: name.to_string(),
            service: service.name.clone(),
            message: templates::describe_tera_error(&e),
        };

        let content = source.read(name)?;
        let tera = templates::load_template(name, &content).map_err(template_error)?;
        tera.render(name, context).map_err(template_error)
    }
}

/// Copy a template set verbatim into `target_dir` so it can be customised
///
/// Existing files are kept unless `override_existing` is set.
pub fn dump_templates(
    source: &dyn TemplateSource,
    target_dir: &Path,
    override_existing: bool,
) -> Result<RenderReport> {
    fs::create_dir_all(target_dir).map_err(|e| GeneratorError::io(target_dir, e))?;

    let mut report = RenderReport::default();
    let mut failures = Vec::new();

    for name in source.list()? {
        let target = target_dir.join(&name);
        let result = source
            .read(&name)
            .and_then(|content| write_file(&target, &content, override_existing));

        match result {
            Ok(WriteOutcome::Written) => report.written.push(target),
            Ok(WriteOutcome::Skipped) => report.skipped.push(target),
            Err(e) => failures.push(FileFailure {
                template: name,
                message: e.to_string(),
            }),
        }
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(GeneratorError::Render {
            service: "templates".to_string(),
            failures,
        })
    }
}

/// Render one service from a template directory (convenience function)
pub fn render_service(
    service: &ServiceModel,
    template_dir: &Path,
    target_dir: &Path,
    override_existing: bool,
    standalone: bool,
) -> Result<RenderReport> {
    let options = RenderOptions::default()
        .with_override(override_existing)
        .with_standalone(standalone);
    ServiceGenerator::new(options).generate(
        service,
        &DirectorySource::new(template_dir),
        target_dir,
    )
}

/// Join a document-derived name onto `base`, refusing anything but plain
/// file or directory names
fn contained(base: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let plain = relative.components().next().is_some()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if !plain {
        return Err(GeneratorError::io(
            base.join(name),
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "output path escapes the target directory",
            ),
        ));
    }
    Ok(base.join(relative))
}

/// Write unless the file exists; with `override_existing` always write
fn write_file(path: &Path, content: &str, override_existing: bool) -> Result<WriteOutcome> {
    if override_existing {
        fs::write(path, content).map_err(|e| GeneratorError::io(path, e))?;
        return Ok(WriteOutcome::Written);
    }

    let file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(WriteOutcome::Skipped),
        Err(e) => return Err(GeneratorError::io(path, e)),
    };
    fill_new_file(path, file, content)?;

    Ok(WriteOutcome::Written)
}

/// Write a freshly created file, removing it again if the write fails so a
/// later run does not keep a truncated file as existing output
fn fill_new_file<W: Write>(path: &Path, mut file: W, content: &str) -> Result<()> {
    if let Err(e) = file.write_all(content.as_bytes()).and_then(|_| file.flush()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %remove_err, "could not remove partial file");
        }
        return Err(GeneratorError::io(path, e));
    }
    Ok(())
}
