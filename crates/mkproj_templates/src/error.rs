//! Error types for templates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("{template}: invalid configuration: {message}")]
    InvalidConfiguration { template: String, message: String },

    #[error("{template}: no descriptor (meta.json, meta.yaml or meta.yml) in {}", path.display())]
    MissingDescriptor { template: String, path: PathBuf },

    #[error("Invalid descriptor {}: {message}", path.display())]
    InvalidDescriptor { path: PathBuf, message: String },

    #[error("{template}: descriptor does not match schema: {}", errors.join("; "))]
    SchemaViolation { template: String, errors: Vec<String> },

    #[error("{template}: variant with name '{variant}' does not exist")]
    VariantNotFound { template: String, variant: String },

    #[error("{0}: template has no default variant")]
    NoDefaultVariant(String),

    #[error("Discovery pattern '{0}' must contain exactly one capture group")]
    InvalidPattern(String),

    #[error("Failed to create workspace, '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl TemplateError {
    pub(crate) fn config(template: &str, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            template: template.to_string(),
            message: message.into(),
        }
    }

    /// Whether the error came from looking up a variant rather than from
    /// configuration or I/O.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            TemplateError::VariantNotFound { .. } | TemplateError::NoDefaultVariant(_)
        )
    }
}
