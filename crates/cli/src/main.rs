//! Seneca Scaffold CLI
//!
//! Command-line interface for generating Seneca services from Swagger documents.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use seneca_scaffold_common::ServiceModel;
use seneca_scaffold_generator::{
    dump_templates, DirectorySource, EmbeddedSource, RenderOptions, RenderReport,
    ServiceGenerator, TemplateSource,
};
use seneca_scaffold_parser::{ServiceMap, SwaggerParser};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seneca-scaffold")]
#[command(version, about = "Generate Seneca microservices from Swagger documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one Seneca module per pin found in a Swagger document
    #[command(after_help = "EXAMPLES:\n  \
        # One directory per service under ./micro-services\n  \
        seneca-scaffold generate --spec petstore.yaml\n\n  \
        # All services in one directory, using customised templates\n  \
        seneca-scaffold generate \\\n    \
        --spec petstore.yaml \\\n    \
        --template ./my-templates \\\n    \
        --target ./services \\\n    \
        --merged")]
    Generate {
        /// Path to the Swagger document (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Directory to create the services in
        #[arg(short, long, default_value = "micro-services")]
        target: PathBuf,

        /// Directory of custom templates (built-in templates if not specified)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Overwrite files that already exist
        #[arg(long = "override")]
        override_existing: bool,

        /// Write every service into the target directory instead of one directory per service
        #[arg(long)]
        merged: bool,
    },

    /// Write the built-in templates to a directory so they can be customised
    #[command(after_help = "EXAMPLES:\n  \
        seneca-scaffold dump-templates --target ./my-templates\n  \
        seneca-scaffold generate --spec petstore.yaml --template ./my-templates")]
    DumpTemplates {
        /// Directory to write the templates to
        #[arg(short, long, default_value = "seneca-scaffold-templates")]
        target: PathBuf,

        /// Overwrite templates that already exist
        #[arg(long = "override")]
        override_existing: bool,
    },

    /// Print the variables each service exposes to templates
    PrintVariables {
        /// Path to the Swagger document (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            spec,
            target,
            template,
            override_existing,
            merged,
        } => {
            let options = RenderOptions::default()
                .with_override(override_existing)
                .with_standalone(!merged);
            generate_command(&spec, &target, template.as_deref(), options, cli.verbose)?;
        }
        Commands::DumpTemplates {
            target,
            override_existing,
        } => {
            dump_templates_command(&target, override_existing)?;
        }
        Commands::PrintVariables { spec } => {
            print_variables_command(&spec)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_services(spec_path: &Path) -> Result<ServiceMap> {
    if !spec_path.is_file() {
        bail!("Swagger document not found: {}", spec_path.display());
    }

    let parser = SwaggerParser::from_file(spec_path)
        .with_context(|| format!("Failed to load {}", spec_path.display()))?;
    parser
        .parse()
        .with_context(|| format!("Failed to extract services from {}", spec_path.display()))
}

fn generate_command(
    spec_path: &Path,
    target: &Path,
    template_dir: Option<&Path>,
    options: RenderOptions,
    verbose: bool,
) -> Result<()> {
    println!(
        "{} Generating services from: {}",
        "→".cyan(),
        spec_path.display()
    );

    let services = load_services(spec_path)?;
    println!(
        "{} Found {} service(s)",
        "✓".green(),
        services.len().to_string().yellow()
    );

    if verbose {
        for service in services.values() {
            print_service_summary(service);
        }
    }

    let source: Box<dyn TemplateSource> = match template_dir {
        Some(dir) => {
            if !dir.is_dir() {
                bail!("Template directory not found: {}", dir.display());
            }
            println!("{} Using templates from {}", "→".cyan(), dir.display());
            Box::new(DirectorySource::new(dir))
        }
        None => Box::new(EmbeddedSource),
    };

    let layout = if options.standalone { "standalone" } else { "merged" };
    println!("{} Rendering {} layout...", "→".cyan(), layout);

    let generator = ServiceGenerator::new(options);
    let reports = generator
        .generate_all(services.values(), source.as_ref(), target)
        .context("Failed to generate services")?;

    print_report(&reports, verbose);

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("  Modules/projects generated in: {}", target.display());

    Ok(())
}

fn dump_templates_command(target: &Path, override_existing: bool) -> Result<()> {
    println!(
        "{} Writing default templates to: {}",
        "→".cyan(),
        target.display()
    );

    let report = dump_templates(&EmbeddedSource, target, override_existing)
        .context("Failed to write templates")?;

    for path in &report.written {
        println!("  {} {}", "+".green(), path.display());
    }
    for path in &report.skipped {
        println!("  {} {} (exists)", "=".yellow(), path.display());
    }

    println!("\n{}", "Next steps:".bold());
    println!("  1. Edit the templates in {}", target.display());
    println!(
        "  2. seneca-scaffold generate --spec <file> --template {}",
        target.display()
    );

    Ok(())
}

fn print_variables_command(spec_path: &Path) -> Result<()> {
    let services = load_services(spec_path)?;

    for (pin, service) in &services {
        println!("\n{} {}\n", "Pin:".bold(), pin.cyan());
        let json = serde_json::to_string_pretty(service)
            .with_context(|| format!("Failed to serialize service {}", service.name))?;
        println!("{}", json);
    }

    Ok(())
}

fn print_service_summary(service: &ServiceModel) {
    println!(
        "  • {} ({}) {} operation(s), {} param(s)",
        service.name.cyan(),
        service.pin,
        service.operations.len(),
        service.param_count()
    );
}

fn print_report(reports: &[RenderReport], verbose: bool) {
    let written: usize = reports.iter().map(|r| r.written.len()).sum();
    let skipped: usize = reports.iter().map(|r| r.skipped.len()).sum();

    println!(
        "{} Wrote {} file(s), kept {} existing file(s)",
        "✓".green(),
        written,
        skipped
    );

    if verbose {
        for report in reports {
            for path in &report.written {
                println!("  {} {}", "+".green(), path.display());
            }
            for path in &report.skipped {
                println!("  {} {} (exists)", "=".yellow(), path.display());
            }
        }
    }
}
