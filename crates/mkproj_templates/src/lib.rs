//! # mkproj_templates
//!
//! Template discovery, variant resolution and materialization for `mkproj`.
//!
//! A template root holds two kinds of templates:
//!
//! - **Workspaces** (`<name>-workspace/`): project skeletons described by a
//!   `meta.json` descriptor. Each offers named variants; a variant may inherit
//!   the files of another variant, overriding them by path or suppressing them
//!   with a delete marker file (`<file>.#delete`).
//! - **Configs** (`config.<name>/`): flat directories copied verbatim, usually
//!   as a dotfile directory.
//!
//! Materializing a workspace replaces the `#<workspace>#` placeholder with the
//! project name in file paths and, for files matching the workspace's project
//! file patterns, in file content.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mkproj_templates::{MaterializeOptions, TemplateLoader};
//! use std::path::Path;
//!
//! let registry = TemplateLoader::new("templates").load_all().unwrap();
//! let workspace = registry.workspace("cpp").unwrap();
//!
//! let report = workspace
//!     .create_workspace(
//!         Path::new("./widget"),
//!         None,
//!         "widget",
//!         &MaterializeOptions::new().verbose(true),
//!         &mut std::io::stdout(),
//!     )
//!     .unwrap();
//! println!("{} files", report.entries.len());
//! ```

pub mod config;
pub mod descriptor;
pub mod error;
pub mod listing;
pub mod loader;
pub mod renderer;
pub mod resolver;
pub mod template;
pub mod variant;
pub mod workspace;

pub use config::Config;
pub use descriptor::Descriptor;
pub use error::{TemplateError, TemplateResult};
pub use listing::{TemplateSummary, VariantSummary};
pub use loader::{TemplateLoader, TemplateRegistry, CONFIG_PATTERN, WORKSPACE_PATTERN};
pub use renderer::{CopyEntry, MaterializeOptions, MaterializeReport};
pub use resolver::{Resolution, MAX_INHERITANCE_DEPTH};
pub use template::{Template, TemplateInfo, TemplateKind};
pub use variant::{FileInfo, Variant};
pub use workspace::{Workspace, DEFAULT_DELETE_MARKER};
