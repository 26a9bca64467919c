//! Workspace variants and source file references.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use walkdir::WalkDir;

use crate::descriptor::{get_string, get_string_list};

/// A file of a template, stored as a root directory plus a path relative to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    root: PathBuf,
    path: PathBuf,
}

impl FileInfo {
    pub fn new(root: impl Into<PathBuf>, path: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            path: path.into(),
        }
    }

    /// Directory the relative path is anchored at.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path relative to [`FileInfo::root`].
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of the source file.
    pub fn full_path(&self) -> PathBuf {
        self.root.join(&self.path)
    }

    /// Path prefixed with the root directory name, e.g. `default/src/main.c`.
    pub fn display_path(&self) -> String {
        match self.root.file_name() {
            Some(dir) => Path::new(dir).join(&self.path).display().to_string(),
            None => self.path.display().to_string(),
        }
    }
}

/// Enumerate every regular file below `root`, sorted by name, as [`FileInfo`]s
/// relative to `root`. Unreadable entries are skipped.
pub fn walk_files(root: &Path) -> impl Iterator<Item = FileInfo> + '_ {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(move |e| {
            e.path()
                .strip_prefix(root)
                .ok()
                .map(|rel| FileInfo::new(root, rel))
        })
}

/// A concrete file tree inside a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    alias: Vec<String>,
    relative: PathBuf,
    path: PathBuf,
    inherits: Option<String>,
}

impl Variant {
    /// Create a variant whose files live in `workspace_dir/relative`.
    pub fn new(name: impl Into<String>, workspace_dir: &Path, relative: impl Into<PathBuf>) -> Self {
        let relative = relative.into();
        Self {
            name: name.into(),
            alias: Vec::new(),
            path: workspace_dir.join(&relative),
            relative,
            inherits: None,
        }
    }

    /// Build a variant from its descriptor entry. `path` defaults to the
    /// variant name; mistyped keys are ignored.
    pub fn from_descriptor(name: &str, workspace_dir: &Path, data: &Map<String, Value>) -> Self {
        let relative = get_string(data, "path").unwrap_or_else(|| name.to_string());
        let mut variant = Self::new(name, workspace_dir, relative);
        if let Some(alias) = get_string_list(data, "alias") {
            variant = variant.with_alias(alias);
        }
        if let Some(inherits) = get_string(data, "inherits") {
            variant = variant.with_inherits(inherits);
        }
        variant
    }

    pub fn with_alias(mut self, alias: Vec<String>) -> Self {
        self.alias = alias;
        self.normalize_inherits();
        self
    }

    pub fn with_inherits(mut self, inherits: impl Into<String>) -> Self {
        self.inherits = Some(inherits.into());
        self.normalize_inherits();
        self
    }

    /// Inheriting from itself, by name or alias, means no inheritance.
    fn normalize_inherits(&mut self) {
        if let Some(parent) = &self.inherits {
            if parent.is_empty() || self.matches(parent) {
                self.inherits = None;
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> &[String] {
        &self.alias
    }

    /// Directory holding the variant's files.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory relative to the owning workspace.
    pub fn relative_path(&self) -> &Path {
        &self.relative
    }

    pub fn inherits(&self) -> Option<&str> {
        self.inherits.as_deref()
    }

    /// Whether `name` is this variant's name or one of its aliases.
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.alias.iter().any(|a| a == name)
    }

    /// Lazily enumerate the files physically present in the variant directory.
    pub fn files(&self) -> impl Iterator<Item = FileInfo> + '_ {
        walk_files(&self.path)
    }

    /// A variant is usable when its directory exists and holds at least one file.
    pub fn is_usable(&self) -> bool {
        self.path.is_dir() && self.files().next().is_some()
    }
}
