//! Workspace templates: project skeletons with named variants.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::descriptor::Descriptor;
use crate::error::{TemplateError, TemplateResult};
use crate::template::TemplateInfo;
use crate::variant::Variant;

/// Extension marking a file as a tombstone for an inherited file.
pub const DEFAULT_DELETE_MARKER: &str = ".#delete";

/// A project skeleton offering one or more variants.
#[derive(Debug, Clone)]
pub struct Workspace {
    info: TemplateInfo,
    default: Option<String>,
    variants: Vec<Variant>,
    project_file_patterns: Vec<String>,
    project_file_regexes: Vec<Regex>,
    delete_marker: String,
}

impl Workspace {
    /// Load a workspace from its directory, validating the descriptor against
    /// `schema` when one is given.
    pub fn load(name: &str, path: &Path, schema: Option<&Path>) -> TemplateResult<Self> {
        let descriptor_path =
            Descriptor::locate(path).ok_or_else(|| TemplateError::MissingDescriptor {
                template: name.to_string(),
                path: path.to_path_buf(),
            })?;

        let descriptor = Descriptor::load(&descriptor_path)?;
        descriptor.validate(name, schema)?;
        Self::from_descriptor(name, path, &descriptor)
    }

    /// Build a workspace from an already parsed descriptor.
    ///
    /// Variants whose directory is missing or empty are dropped with a
    /// warning. A `default` that does not name a remaining variant, or an
    /// invalid project file pattern, is a configuration error.
    pub fn from_descriptor(name: &str, path: &Path, descriptor: &Descriptor) -> TemplateResult<Self> {
        let info = TemplateInfo::new(
            name,
            path,
            descriptor.string("title"),
            descriptor.string("description"),
        );

        let mut variants: Vec<Variant> = Vec::new();
        if let Some(entries) = descriptor.object("variants") {
            for (variant_name, entry) in entries {
                let Some(entry) = entry.as_object() else {
                    warn!("ignoring {}:{} because its entry is not a mapping", name, variant_name);
                    continue;
                };

                let variant = Variant::from_descriptor(variant_name, path, entry);
                if !variant.is_usable() {
                    warn!(
                        "ignoring {}:{} because it's not a directory or contains no file",
                        name, variant_name
                    );
                    continue;
                }
                debug!("{}: found variant {} at {:?}", name, variant_name, variant.path());
                variants.push(variant);
            }
        }

        let project_file_patterns = descriptor
            .string_list("project_file_patterns")
            .unwrap_or_default();
        let project_file_regexes = project_file_patterns
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})", pattern)).map_err(|e| {
                    TemplateError::config(
                        name,
                        format!("invalid project file pattern '{}': {}", pattern, e),
                    )
                })
            })
            .collect::<TemplateResult<Vec<_>>>()?;

        let workspace = Self {
            info,
            default: descriptor.string("default").filter(|d| !d.is_empty()),
            variants,
            project_file_patterns,
            project_file_regexes,
            delete_marker: normalize_marker(descriptor.string("delete_marker")),
        };

        if let Some(default) = &workspace.default {
            if workspace.find_variant(default).is_none() {
                return Err(TemplateError::config(
                    name,
                    format!("invalid default variant '{}'", default),
                ));
            }
        }

        Ok(workspace)
    }

    pub fn info(&self) -> &TemplateInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        self.info.name()
    }

    pub fn path(&self) -> &Path {
        self.info.path()
    }

    /// Name of the variant used when none is requested.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn project_file_patterns(&self) -> &[String] {
        &self.project_file_patterns
    }

    pub fn delete_marker(&self) -> &str {
        &self.delete_marker
    }

    /// The in-file and in-path token replaced by the project name, `#<name>#`.
    pub fn placeholder(&self) -> String {
        format!("#{}#", self.name())
    }

    fn find_variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.matches(name))
    }

    /// Look a variant up by name or alias; `None` selects the default variant.
    pub fn get_variant(&self, name: Option<&str>) -> TemplateResult<&Variant> {
        let name = match name {
            Some(name) => name,
            None => self
                .default
                .as_deref()
                .ok_or_else(|| TemplateError::NoDefaultVariant(self.name().to_string()))?,
        };

        self.find_variant(name)
            .ok_or_else(|| TemplateError::VariantNotFound {
                template: self.name().to_string(),
                variant: name.to_string(),
            })
    }

    /// Whether a materialized file name gets placeholder substitution in its
    /// content.
    pub fn is_project_file(&self, file_name: &str) -> bool {
        self.project_file_regexes.iter().any(|re| re.is_match(file_name))
    }

    /// For a tombstone path such as `readme.md.#delete`, return the path it
    /// suppresses (`readme.md`). Returns `None` for ordinary files.
    pub fn tombstone_target(&self, path: &Path) -> Option<PathBuf> {
        let file_name = path.file_name()?.to_str()?;
        let stripped = file_name.strip_suffix(self.delete_marker.as_str())?;
        if stripped.is_empty() {
            return None;
        }
        Some(path.with_file_name(stripped))
    }
}

fn normalize_marker(marker: Option<String>) -> String {
    match marker {
        Some(marker) if marker.starts_with('.') && marker.len() > 1 => marker,
        Some(marker) if !marker.is_empty() && marker != "." => format!(".{}", marker),
        _ => DEFAULT_DELETE_MARKER.to_string(),
    }
}
