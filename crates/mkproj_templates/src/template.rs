//! Template identity shared by workspaces and configs.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::workspace::Workspace;

/// Template category.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Workspace,
    Config,
}

impl TemplateKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            TemplateKind::Workspace => "Workspace",
            TemplateKind::Config => "Config",
        }
    }
}

/// Name, location and display strings of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateInfo {
    name: String,
    path: PathBuf,
    title: String,
    description: String,
}

impl TemplateInfo {
    /// Create template info; `title` falls back to the last path segment and
    /// `description` to an empty string.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        title: Option<String>,
        description: Option<String>,
    ) -> Self {
        let path = path.into();
        let title = title.filter(|t| !t.is_empty()).unwrap_or_else(|| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        });
        Self {
            name: name.into(),
            path,
            title,
            description: description.unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Name of the template directory itself.
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// A discovered template of either category.
#[derive(Debug, Clone)]
pub enum Template {
    Workspace(Workspace),
    Config(Config),
}

impl Template {
    pub fn kind(&self) -> TemplateKind {
        match self {
            Template::Workspace(_) => TemplateKind::Workspace,
            Template::Config(_) => TemplateKind::Config,
        }
    }

    pub fn info(&self) -> &TemplateInfo {
        match self {
            Template::Workspace(w) => w.info(),
            Template::Config(c) => c.info(),
        }
    }

    pub fn name(&self) -> &str {
        self.info().name()
    }

    pub fn path(&self) -> &Path {
        self.info().path()
    }

    pub fn as_workspace(&self) -> Option<&Workspace> {
        match self {
            Template::Workspace(w) => Some(w),
            Template::Config(_) => None,
        }
    }

    pub fn as_config(&self) -> Option<&Config> {
        match self {
            Template::Config(c) => Some(c),
            Template::Workspace(_) => None,
        }
    }
}

impl From<Workspace> for Template {
    fn from(workspace: Workspace) -> Self {
        Template::Workspace(workspace)
    }
}

impl From<Config> for Template {
    fn from(config: Config) -> Self {
        Template::Config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_defaults_to_dir_name() {
        let info = TemplateInfo::new("cpp", "/templates/cpp-workspace", None, None);
        assert_eq!(info.title(), "cpp-workspace");
        assert_eq!(info.description(), "");
    }

    #[test]
    fn test_explicit_title() {
        let info = TemplateInfo::new(
            "cpp",
            "/templates/cpp-workspace",
            Some("C++ project".to_string()),
            Some("CMake based".to_string()),
        );
        assert_eq!(info.title(), "C++ project");
        assert_eq!(info.description(), "CMake based");
    }
}
