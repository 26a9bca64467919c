//! CLI argument definitions.
//!
//! `mkproj` has two modes: creating a project (`mkproj <name> -t <workspace>`)
//! and listing templates (`mkproj --list`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use mkproj_templates::{TemplateLoader, TemplateRegistry};
use tracing::debug;

pub mod create;
pub mod list;

/// Invalid combination or value of command-line arguments.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// mkproj - create projects from workspace and config templates
#[derive(Parser, Debug)]
#[command(name = "mkproj")]
#[command(version, about = "Create a new project from a template")]
#[command(long_about = r#"
Create a new project from a workspace template, optionally overlaid with a
config template.

TEMPLATES:
  <name>-workspace  → workspace template with variants and a meta.json
  config.<name>     → config directory copied to <project>/.<name>

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  4 - Template error
"#)]
#[command(group(ArgGroup::new("mode").args(["name", "list"]).required(true)))]
pub struct Cli {
    /// The name of the project
    pub name: Option<String>,

    /// List available templates and configs, or describe one of them
    #[arg(
        short,
        long,
        value_name = "NAME",
        num_args = 0..=1,
        default_missing_value = "all"
    )]
    pub list: Option<String>,

    /// Print templates as JSON (with --list)
    #[arg(long, requires = "list")]
    pub json: bool,

    /// The workspace template to create
    #[arg(short, long)]
    pub template: Option<String>,

    /// The workspace variant (defaults to the workspace's default variant)
    #[arg(long, requires = "template")]
    pub variant: Option<String>,

    /// The config to use
    #[arg(short, long)]
    pub config: Option<String>,

    /// The path to create the project in; created if it does not exist
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Create the project in a subfolder even if its name matches the path
    #[arg(long)]
    pub always_nest: bool,

    /// Copy the config to <project>/<config> instead of <project>/.<config>
    #[arg(long)]
    pub no_dotfile: bool,

    /// Print what would be copied without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Print every copied file and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not ask before writing into a non-empty directory
    #[arg(short, long)]
    pub yes: bool,

    /// Directory holding the templates
    #[arg(long, env = "MKPROJ_TEMPLATE_ROOT", default_value = ".")]
    pub template_root: PathBuf,

    /// JSON schema for workspace descriptors
    /// (defaults to <template-root>/schemas/template.json)
    #[arg(long, env = "MKPROJ_SCHEMA")]
    pub schema: Option<PathBuf>,
}

impl Cli {
    /// Discover every template below the template root.
    pub fn load_registry(&self) -> Result<TemplateRegistry> {
        debug!("Loading templates from {:?}", self.template_root);
        TemplateLoader::new(&self.template_root)
            .with_schema(self.schema.clone())
            .load_all()
            .context("Failed to load templates")
    }
}
