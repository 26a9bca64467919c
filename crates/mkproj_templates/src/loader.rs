//! Template discovery.
//!
//! Templates are immediate subdirectories of a template root whose names match
//! a naming pattern with one capture group; the captured text is the template
//! name. Workspaces follow `<name>-workspace`, configs follow `config.<name>`.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use regex::Regex;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::{TemplateError, TemplateResult};
use crate::template::{Template, TemplateKind};
use crate::workspace::Workspace;

/// Directory naming convention of workspace templates.
pub const WORKSPACE_PATTERN: &str = r"^(.+)-workspace$";

/// Directory naming convention of config templates.
pub const CONFIG_PATTERN: &str = r"^config\.(.+)$";

/// Default schema location, relative to the template root.
pub const DEFAULT_SCHEMA_PATH: &str = "schemas/template.json";

/// Template loader.
pub struct TemplateLoader {
    templates_path: PathBuf,
    schema: Option<PathBuf>,
}

impl TemplateLoader {
    /// Create a new template loader. The descriptor schema defaults to
    /// `schemas/template.json` below the template root when that file exists.
    pub fn new(templates_path: impl Into<PathBuf>) -> Self {
        let templates_path = templates_path.into();
        let default_schema = templates_path.join(DEFAULT_SCHEMA_PATH);
        Self {
            schema: default_schema.is_file().then_some(default_schema),
            templates_path,
        }
    }

    /// Validate workspace descriptors against this schema file.
    pub fn with_schema(mut self, schema: Option<PathBuf>) -> Self {
        if schema.is_some() {
            self.schema = schema;
        }
        self
    }

    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    pub fn schema(&self) -> Option<&Path> {
        self.schema.as_deref()
    }

    /// Discover every workspace and config below the template root. Workspaces
    /// that fail to load are skipped with a warning.
    pub fn load_all(&self) -> TemplateResult<TemplateRegistry> {
        let workspaces = self.discover_lenient(WORKSPACE_PATTERN, TemplateKind::Workspace)?;
        let configs = self.discover_lenient(CONFIG_PATTERN, TemplateKind::Config)?;

        info!(
            "Loaded {} workspace(s) and {} config(s) from {:?}",
            workspaces.len(),
            configs.len(),
            self.templates_path
        );

        Ok(TemplateRegistry {
            templates_path: self.templates_path.clone(),
            workspaces,
            configs,
        })
    }

    /// Discover templates of one kind. Any template that fails to load
    /// aborts discovery with its error.
    pub fn discover(
        &self,
        pattern: &str,
        kind: TemplateKind,
    ) -> TemplateResult<IndexMap<String, Template>> {
        let mut templates = IndexMap::new();
        for (name, path) in self.matching_dirs(pattern)? {
            let template = self.load_template(&name, &path, kind)?;
            insert_last_wins(&mut templates, name, template);
        }
        Ok(templates)
    }

    fn discover_lenient(
        &self,
        pattern: &str,
        kind: TemplateKind,
    ) -> TemplateResult<IndexMap<String, Template>> {
        let mut templates = IndexMap::new();
        for (name, path) in self.matching_dirs(pattern)? {
            match self.load_template(&name, &path, kind) {
                Ok(template) => insert_last_wins(&mut templates, name, template),
                Err(e) => warn!("Failed to load template from {:?}: {}", path, e),
            }
        }
        Ok(templates)
    }

    /// Load a single template from a directory.
    pub fn load_template(&self, name: &str, path: &Path, kind: TemplateKind) -> TemplateResult<Template> {
        debug!("Loading {} {} from {:?}", kind.display_name(), name, path);
        match kind {
            TemplateKind::Workspace => {
                Workspace::load(name, path, self.schema.as_deref()).map(Template::from)
            }
            TemplateKind::Config => Ok(Config::new(name, path).into()),
        }
    }

    /// Immediate subdirectories whose names match `pattern`, with the captured
    /// template name, in directory name order.
    fn matching_dirs(&self, pattern: &str) -> TemplateResult<Vec<(String, PathBuf)>> {
        let regex = Regex::new(pattern)?;
        if regex.captures_len() != 2 {
            return Err(TemplateError::InvalidPattern(pattern.to_string()));
        }

        if !self.templates_path.exists() {
            warn!("Templates directory does not exist: {:?}", self.templates_path);
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(&self.templates_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.path().is_dir() {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy();
            if let Some(name) = regex
                .captures(&dir_name)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string())
            {
                matches.push((name, entry.path().to_path_buf()));
            }
        }
        Ok(matches)
    }
}

fn insert_last_wins(templates: &mut IndexMap<String, Template>, name: String, template: Template) {
    if let Some(previous) = templates.insert(name, template) {
        debug!("{:?} replaced by a later directory with the same name", previous.path());
    }
}

/// Discovered templates, by category and name.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates_path: PathBuf,
    workspaces: IndexMap<String, Template>,
    configs: IndexMap<String, Template>,
}

impl TemplateRegistry {
    pub fn templates_path(&self) -> &Path {
        &self.templates_path
    }

    pub fn workspace(&self, name: &str) -> Option<&Workspace> {
        self.workspaces.get(name).and_then(Template::as_workspace)
    }

    pub fn config(&self, name: &str) -> Option<&Config> {
        self.configs.get(name).and_then(Template::as_config)
    }

    /// Find a template by name, workspaces first.
    pub fn get(&self, name: &str) -> Option<&Template> {
        self.workspaces.get(name).or_else(|| self.configs.get(name))
    }

    /// Every template carrying `name`, in either category.
    pub fn get_all(&self, name: &str) -> Vec<&Template> {
        self.workspaces
            .get(name)
            .into_iter()
            .chain(self.configs.get(name))
            .collect()
    }

    pub fn workspaces(&self) -> &IndexMap<String, Template> {
        &self.workspaces
    }

    pub fn configs(&self) -> &IndexMap<String, Template> {
        &self.configs
    }

    /// Categories with display headings, in listing order.
    pub fn categories(&self) -> [(&'static str, &IndexMap<String, Template>); 2] {
        [
            ("configs", &self.configs),
            ("workspace templates", &self.workspaces),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty() && self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_loader_empty_dir() {
        let temp = tempdir().unwrap();
        let loader = TemplateLoader::new(temp.path());
        let registry = loader.load_all().unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_loader_missing_dir() {
        let temp = tempdir().unwrap();
        let loader = TemplateLoader::new(temp.path().join("nope"));
        assert!(loader.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_discover_configs_by_pattern() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("config.vscode")).unwrap();
        fs::create_dir(temp.path().join("config.clangd")).unwrap();
        fs::create_dir(temp.path().join("configs")).unwrap();
        fs::write(temp.path().join("config.file"), "").unwrap();

        let loader = TemplateLoader::new(temp.path());
        let configs = loader.discover(CONFIG_PATTERN, TemplateKind::Config).unwrap();
        let names: Vec<_> = configs.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["clangd", "vscode"]);
    }

    #[test]
    fn test_pattern_needs_one_group() {
        let temp = tempdir().unwrap();
        let loader = TemplateLoader::new(temp.path());
        let err = loader.discover(r"^config\..+$", TemplateKind::Config).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPattern(_)));
    }

    #[test]
    fn test_duplicate_names_last_wins() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("a.cfg")).unwrap();
        fs::create_dir(temp.path().join("b.cfg")).unwrap();

        let loader = TemplateLoader::new(temp.path());
        let configs = loader.discover(r"^.\.(cfg)$", TemplateKind::Config).unwrap();
        assert_eq!(configs.len(), 1);
        assert!(configs["cfg"].path().ends_with("b.cfg"));
    }

    #[test]
    fn test_broken_workspace_is_skipped() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("broken-workspace")).unwrap();
        let good = temp.path().join("good-workspace");
        fs::create_dir_all(good.join("base")).unwrap();
        fs::write(good.join("base/a.txt"), "a").unwrap();
        fs::write(good.join("meta.json"), r#"{"variants": {"base": {}}}"#).unwrap();

        let loader = TemplateLoader::new(temp.path());
        let registry = loader.load_all().unwrap();
        assert!(registry.workspace("good").is_some());
        assert!(registry.workspace("broken").is_none());

        assert!(loader
            .discover(WORKSPACE_PATTERN, TemplateKind::Workspace)
            .is_err());
    }
}
