//! Human-readable and serializable template summaries.

use std::path::PathBuf;

use serde::Serialize;

use crate::template::{Template, TemplateKind};
use crate::variant::Variant;

const BRIEF_DESCRIPTION_LEN: usize = 25;

/// Serializable overview of a template.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TemplateSummary {
    pub name: String,
    pub kind: TemplateKind,
    pub title: String,
    pub description: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_variant: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_file_patterns: Vec<String>,
}

/// Serializable overview of a workspace variant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VariantSummary {
    pub name: String,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alias: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
}

impl Template {
    pub fn summary(&self) -> TemplateSummary {
        let info = self.info();
        let workspace = self.as_workspace();
        TemplateSummary {
            name: info.name().to_string(),
            kind: self.kind(),
            title: info.title().to_string(),
            description: info.description().to_string(),
            path: info.path().to_path_buf(),
            default_variant: workspace.and_then(|w| w.default()).map(str::to_string),
            variants: workspace
                .map(|w| {
                    w.variants()
                        .iter()
                        .map(|v| VariantSummary {
                            name: v.name().to_string(),
                            path: v.relative_path().to_path_buf(),
                            alias: v.alias().to_vec(),
                            inherits: v.inherits().map(str::to_string),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            project_file_patterns: workspace
                .map(|w| w.project_file_patterns().to_vec())
                .unwrap_or_default(),
        }
    }

    /// One-line listing entry: name, short description (or directory name)
    /// and, for workspaces, the variant names.
    pub fn brief(&self) -> String {
        let info = self.info();
        let description = match truncate(info.description(), BRIEF_DESCRIPTION_LEN) {
            d if d.is_empty() => info.dir_name(),
            d => d,
        };

        let mut line = format!("{:<10} {:<15}", info.name(), description);
        if let Some(workspace) = self.as_workspace() {
            let names: Vec<_> = workspace.variants().iter().map(|v| v.name()).collect();
            line.push_str(&format!(" ({})", names.join(",")));
        }
        line.trim_end().to_string()
    }

    /// Multi-line description of a single template.
    pub fn detail(&self) -> String {
        let info = self.info();
        let root = info
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let description = if info.description().is_empty() {
            "<no description>"
        } else {
            info.description()
        };

        let mut lines = vec![
            format!("[{}]: {}", self.kind().display_name(), info.name()),
            String::new(),
            info.title().to_string(),
            description.to_string(),
            String::new(),
            "path:".to_string(),
            format!("  {}/{}", root, info.dir_name()),
        ];

        if let Some(workspace) = self.as_workspace() {
            let default = workspace.get_variant(None).ok().map(Variant::name);
            lines.push(String::new());
            lines.push("variants:".to_string());
            for variant in workspace.variants() {
                let marker = if default == Some(variant.name()) { " *" } else { "  " };
                let alias = if variant.alias().is_empty() {
                    String::new()
                } else {
                    format!(" (alias: {})", variant.alias().join(","))
                };
                let location = format!("{}/{}", info.dir_name(), variant.relative_path().display());
                lines.push(format!(
                    "{}{:<12} {:<15}{}",
                    marker,
                    variant.name(),
                    location,
                    alias
                ));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Cut `s` to `max_len` characters, appending `...` when shortened.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max_len).collect();
    cut.push_str("...");
    cut
}
