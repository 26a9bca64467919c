//! Config templates: flat directories of dotfiles.

use std::path::Path;

use crate::template::TemplateInfo;
use crate::variant::{walk_files, FileInfo};

/// A variant-less template whose whole tree is copied as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    info: TemplateInfo,
}

impl Config {
    pub fn new(name: &str, path: &Path) -> Self {
        Self {
            info: TemplateInfo::new(name, path, None, None),
        }
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

    /// Every file of the config tree, relative to the config directory.
    pub fn files(&self) -> impl Iterator<Item = FileInfo> + '_ {
        walk_files(self.info.path())
    }

    /// Name of the directory the config is copied into: `.<name>` for a
    /// dotfile directory, `<name>` otherwise.
    pub fn target_dir_name(&self, dotfile: bool) -> String {
        if dotfile {
            format!(".{}", self.name())
        } else {
            self.name().to_string()
        }
    }
}
