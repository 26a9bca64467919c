//! Workspace descriptor (`meta.json`) loading.
//!
//! The descriptor is read into a loose JSON value instead of a typed struct:
//! unknown keys are ignored and a known key whose value has the wrong type is
//! dropped without failing the template. Optional JSON-schema validation runs
//! before any key is read.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

/// Descriptor file names, in lookup order.
pub const DESCRIPTOR_FILES: &[&str] = &["meta.json", "meta.yaml", "meta.yml"];

/// Parsed workspace descriptor.
#[derive(Debug, Clone)]
pub struct Descriptor {
    path: PathBuf,
    data: Map<String, Value>,
}

impl Descriptor {
    /// Find the descriptor file in a workspace directory.
    pub fn locate(dir: &Path) -> Option<PathBuf> {
        DESCRIPTOR_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load and parse a descriptor file. JSON and YAML are both accepted and
    /// must contain a top-level mapping.
    pub fn load(path: &Path) -> TemplateResult<Self> {
        debug!("Loading descriptor from {:?}", path);
        let content = fs::read_to_string(path)?;

        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        let value: Value = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        match value {
            Value::Object(data) => Ok(Self {
                path: path.to_path_buf(),
                data,
            }),
            other => Err(TemplateError::InvalidDescriptor {
                path: path.to_path_buf(),
                message: format!("expected a mapping at top level, found {}", type_name(&other)),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate against a JSON schema file. Validation is skipped when no
    /// schema is given, when the schema cannot be loaded, or when the crate is
    /// built without the `schema` feature.
    pub fn validate(&self, template: &str, schema: Option<&Path>) -> TemplateResult<()> {
        match schema {
            Some(schema) => schema::validate(template, &self.data, schema),
            None => {
                debug!("{}: no schema supplied, skipping descriptor validation", template);
                Ok(())
            }
        }
    }

    pub fn string(&self, key: &str) -> Option<String> {
        get_string(&self.data, key)
    }

    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        get_string_list(&self.data, key)
    }

    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        match self.data.get(key)? {
            Value::Object(map) => Some(map),
            other => {
                debug!("Ignoring '{}': expected a mapping, found {}", key, type_name(other));
                None
            }
        }
    }
}

/// Read a string value. A value of any other type is ignored.
pub(crate) fn get_string(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            debug!("Ignoring '{}': expected a string, found {}", key, type_name(other));
            None
        }
    }
}

/// Read a list of strings. Non-list values are ignored, as are non-string
/// entries of a list.
pub(crate) fn get_string_list(map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match map.get(key)? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        other => {
            debug!("Ignoring '{}': expected a list, found {}", key, type_name(other));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(feature = "schema")]
mod schema {
    use std::fs;
    use std::path::Path;

    use jsonschema::JSONSchema;
    use serde_json::{Map, Value};
    use tracing::{debug, warn};

    use crate::error::{TemplateError, TemplateResult};

    pub(super) fn validate(
        template: &str,
        data: &Map<String, Value>,
        schema_path: &Path,
    ) -> TemplateResult<()> {
        let schema: Value = match fs::read_to_string(schema_path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
        {
            Ok(schema) => schema,
            Err(e) => {
                warn!(
                    "{}: cannot load schema {:?} ({}), skipping descriptor validation",
                    template, schema_path, e
                );
                return Ok(());
            }
        };

        let compiled = match JSONSchema::compile(&schema) {
            Ok(compiled) => compiled,
            Err(e) => {
                warn!(
                    "{}: invalid schema {:?} ({}), skipping descriptor validation",
                    template, schema_path, e
                );
                return Ok(());
            }
        };

        let instance = Value::Object(data.clone());
        if let Err(errors) = compiled.validate(&instance) {
            let errors: Vec<String> = errors.map(|e| e.to_string()).collect();
            return Err(TemplateError::SchemaViolation {
                template: template.to_string(),
                errors,
            });
        }

        debug!("{}: descriptor matches {:?}", template, schema_path);
        Ok(())
    }
}

#[cfg(not(feature = "schema"))]
mod schema {
    use std::path::Path;

    use serde_json::{Map, Value};
    use tracing::debug;

    use crate::error::TemplateResult;

    pub(super) fn validate(
        template: &str,
        _data: &Map<String, Value>,
        schema_path: &Path,
    ) -> TemplateResult<()> {
        debug!(
            "{}: built without schema support, ignoring {:?}",
            template, schema_path
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_json_descriptor() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("meta.json");
        fs::write(&path, r#"{"default": "base", "project_file_patterns": ["CMakeLists\\.txt"]}"#)
            .unwrap();

        let descriptor = Descriptor::load(&path).unwrap();
        assert_eq!(descriptor.string("default").as_deref(), Some("base"));
        assert_eq!(
            descriptor.string_list("project_file_patterns"),
            Some(vec!["CMakeLists\\.txt".to_string()])
        );
    }

    #[test]
    fn test_load_yaml_descriptor() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("meta.yaml");
        fs::write(
            &path,
            "default: base\nvariants:\n  base:\n    path: base\n    alias: [b]\n",
        )
        .unwrap();

        let descriptor = Descriptor::load(&path).unwrap();
        let variants = descriptor.object("variants").unwrap();
        assert!(variants.contains_key("base"));
    }

    #[test]
    fn test_type_mismatch_is_ignored() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("meta.json");
        fs::write(&path, r#"{"default": ["base"], "delete_marker": 3, "variants": []}"#).unwrap();

        let descriptor = Descriptor::load(&path).unwrap();
        assert_eq!(descriptor.string("default"), None);
        assert_eq!(descriptor.string("delete_marker"), None);
        assert!(descriptor.object("variants").is_none());
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("meta.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = Descriptor::load(&path).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidDescriptor { .. }));
    }

    #[test]
    fn test_locate_prefers_json() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("meta.yaml"), "{}").unwrap();
        fs::write(temp.path().join("meta.json"), "{}").unwrap();

        let found = Descriptor::locate(temp.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "meta.json");
    }

    #[test]
    fn test_missing_schema_file_fails_open() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("meta.json");
        fs::write(&path, r#"{"default": 1}"#).unwrap();

        let descriptor = Descriptor::load(&path).unwrap();
        let missing = temp.path().join("schemas").join("template.json");
        assert!(descriptor.validate("demo", Some(&missing)).is_ok());
        assert!(descriptor.validate("demo", None).is_ok());
    }

    #[cfg(feature = "schema")]
    #[test]
    fn test_schema_violation() {
        let temp = tempdir().unwrap();
        let schema = temp.path().join("template.json");
        fs::write(
            &schema,
            r#"{"type": "object", "properties": {"default": {"type": "string"}}}"#,
        )
        .unwrap();
        let path = temp.path().join("meta.json");
        fs::write(&path, r#"{"default": 1}"#).unwrap();

        let descriptor = Descriptor::load(&path).unwrap();
        let err = descriptor.validate("demo", Some(&schema)).unwrap_err();
        assert!(matches!(err, TemplateError::SchemaViolation { .. }));
    }
}
