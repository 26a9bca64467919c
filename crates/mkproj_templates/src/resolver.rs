//! Variant resolution with single-parent inheritance.
//!
//! A variant's effective file set is its own files plus, recursively, the files
//! of the variant it inherits from. Each merge step only adds inherited paths
//! the current level has not already seen, where "seen" covers both the
//! level's own files and the paths it tombstones with the delete marker.

use std::collections::HashSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::TemplateResult;
use crate::variant::{FileInfo, Variant};
use crate::workspace::Workspace;

/// Maximum inheritance depth followed before the chain is truncated.
pub const MAX_INHERITANCE_DEPTH: usize = 5;

/// Resolved files of a variant, keyed by path relative to the variant
/// directory that supplied them.
#[derive(Debug, Clone)]
pub struct Resolution<'a> {
    /// The requested variant.
    pub variant: &'a Variant,
    /// Relative path to source file, own files first, then inherited ones.
    pub files: IndexMap<PathBuf, FileInfo>,
    /// Non-fatal problems hit while following the inheritance chain.
    pub warnings: Vec<String>,
}

impl<'a> Resolution<'a> {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: impl Into<PathBuf>) -> bool {
        self.files.contains_key(&path.into())
    }

    /// Relative paths in resolution order.
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.keys()
    }

    /// Length of the longest relative path, used to align copy plans.
    pub fn max_path_len(&self) -> usize {
        self.files
            .keys()
            .map(|p| p.display().to_string().chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl<'a> IntoIterator for Resolution<'a> {
    type Item = (PathBuf, FileInfo);
    type IntoIter = indexmap::map::IntoIter<PathBuf, FileInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

impl Workspace {
    /// Resolve the effective file set of a variant (by name or alias), or of
    /// the default variant when `variant` is `None`.
    pub fn resolve_files(&self, variant: Option<&str>) -> TemplateResult<Resolution<'_>> {
        let variant = self.get_variant(variant)?;
        Ok(self.resolve_variant(variant))
    }

    /// Resolve an already selected variant of this workspace.
    pub fn resolve_variant<'a>(&'a self, variant: &'a Variant) -> Resolution<'a> {
        let mut warnings = Vec::new();
        let mut chain = vec![variant.name().to_string()];
        let files = self.resolve_level(variant, 0, &mut chain, &mut warnings);

        debug!(
            "{}: resolved {} file(s) for variant {}",
            self.name(),
            files.len(),
            variant.name()
        );

        Resolution {
            variant,
            files,
            warnings,
        }
    }

    /// Resolved files as a sequence of source file references.
    pub fn get_files(&self, variant: Option<&str>) -> TemplateResult<impl Iterator<Item = FileInfo>> {
        Ok(self.resolve_files(variant)?.files.into_values())
    }

    fn resolve_level(
        &self,
        variant: &Variant,
        depth: usize,
        chain: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) -> IndexMap<PathBuf, FileInfo> {
        let mut files = IndexMap::new();
        let mut seen = HashSet::new();

        for file in variant.files() {
            match self.tombstone_target(file.path()) {
                Some(target) => {
                    debug!("{}: {} suppresses {:?}", self.name(), file.display_path(), target);
                    seen.insert(target);
                }
                None => {
                    seen.insert(file.path().to_path_buf());
                    files.insert(file.path().to_path_buf(), file);
                }
            }
        }

        let Some(parent_name) = variant.inherits() else {
            return files;
        };

        if depth + 1 > MAX_INHERITANCE_DEPTH {
            let message = format!(
                "{}:{}: inheritance deeper than {} levels, possible inheritance loop",
                self.name(),
                variant.name(),
                MAX_INHERITANCE_DEPTH
            );
            warn!("{}", message);
            warnings.push(message);
            return files;
        }

        let parent = match self.get_variant(Some(parent_name)) {
            Ok(parent) => parent,
            Err(e) => {
                let message = format!(
                    "{}:{}: cannot inherit from '{}' ({}), ignoring",
                    self.name(),
                    variant.name(),
                    parent_name,
                    e
                );
                warn!("{}", message);
                warnings.push(message);
                return files;
            }
        };

        if chain.iter().any(|name| name == parent.name()) {
            let message = format!(
                "{}:{}: possible inheritance loop through '{}' ({})",
                self.name(),
                variant.name(),
                parent.name(),
                chain.join(" -> ")
            );
            warn!("{}", message);
            warnings.push(message);
            return files;
        }

        chain.push(parent.name().to_string());
        let inherited = self.resolve_level(parent, depth + 1, chain, warnings);
        chain.pop();

        for (path, file) in inherited {
            if !seen.contains(&path) {
                files.insert(path, file);
            }
        }

        files
    }
}
