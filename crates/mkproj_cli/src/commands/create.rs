//! Create command - Create a new project from a workspace template.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use mkproj_templates::MaterializeOptions;
use tracing::{info, warn};

use super::{Cli, UsageError};

pub fn execute(cli: &Cli) -> Result<()> {
    let name = cli
        .name
        .as_deref()
        .ok_or_else(|| UsageError("a project name is required".into()))?;
    let template = cli
        .template
        .as_deref()
        .ok_or_else(|| UsageError("argument -t/--template is required".into()))?;

    let registry = cli.load_registry()?;
    let workspace = registry
        .workspace(template)
        .ok_or_else(|| UsageError(format!("{} is not a valid workspace template", template)))?;
    let config = match cli.config.as_deref() {
        Some(config) => Some(
            registry
                .config(config)
                .ok_or_else(|| UsageError(format!("{} is not a valid config", config)))?,
        ),
        None => None,
    };

    let base = std::path::absolute(&cli.path)
        .with_context(|| format!("Failed to resolve {:?}", cli.path))?;
    if base.exists() && !base.is_dir() {
        return Err(UsageError(format!("{} is not a directory", base.display())).into());
    }
    let destination = project_dir(&base, name, cli.always_nest);

    println!("Project name:   {}", name);
    println!("Using template: {}", workspace.info().dir_name());
    if let Some(config) = config {
        println!("Using config:   {}", config.info().dir_name());
    }
    println!();
    println!("Creating project in {}", destination.display());

    if !is_empty_dir(&destination)? && !cli.dry_run {
        warn!("{} is not empty, files may be overwritten", destination.display());
        if !cli.yes && !confirm("Do you want to continue?") {
            println!("Abort.");
            return Ok(());
        }
    }

    let options = MaterializeOptions::new()
        .verbose(cli.verbose)
        .dry_run(cli.dry_run);
    let mut stdout = io::stdout().lock();

    let report = workspace
        .create_workspace(&destination, cli.variant.as_deref(), name, &options, &mut stdout)
        .context("Failed to create project")?;
    info!("{} file(s) from {}", report.entries.len(), workspace.name());

    if let Some(config) = config {
        let report = config
            .copy_to_destination(&destination, !cli.no_dotfile, &options, &mut stdout)
            .context("Failed to copy config")?;
        info!("{} file(s) from config {}", report.entries.len(), config.name());
    }

    if !cli.dry_run {
        println!("Done.");
    }
    Ok(())
}

/// `<base>/<name>`, or `base` itself when it is already named after the
/// project and nesting is not forced.
fn project_dir(base: &Path, name: &str, always_nest: bool) -> PathBuf {
    if !always_nest && base.file_name().is_some_and(|n| n == name) {
        base.to_path_buf()
    } else {
        base.join(name)
    }
}

fn is_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Ask a yes/no question. Anything but an explicit yes, including a closed
/// or missing terminal, counts as no.
fn confirm(prompt: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}
