//! Integration tests for template system.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mkproj_templates::{
    MaterializeOptions, TemplateError, TemplateKind, TemplateLoader, Workspace, WORKSPACE_PATTERN,
};
use tempfile::tempdir;

fn get_templates_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Builds `demo-workspace` with a `base` variant and an `ext` variant that
/// inherits it, adds a file and tombstones `readme.md`.
fn demo_root() -> tempfile::TempDir {
    let temp = tempdir().unwrap();
    let ws = temp.path().join("demo-workspace");
    write(
        &ws.join("meta.json"),
        r#"{
            "default": "base",
            "variants": {
                "base": {"path": "base"},
                "ext": {"path": "ext", "inherits": "base"}
            },
            "project_file_patterns": [".*\\.c"]
        }"#,
    );
    write(&ws.join("base/readme.md"), "# #demo#\n");
    write(&ws.join("base/src/#demo#_main.c"), "/* #demo# */\nint main(void) { return 0; }\n");
    write(&ws.join("ext/src/extra.c"), "void extra(void) {}\n");
    write(&ws.join("ext/readme.md.#delete"), "");
    temp
}

#[test]
fn test_load_sample_templates() {
    let loader = TemplateLoader::new(get_templates_path());
    assert!(loader.schema().is_some());

    let registry = loader.load_all().unwrap();
    let cpp = registry.workspace("cpp").expect("cpp workspace should load");
    assert_eq!(cpp.default(), Some("default"));
    assert_eq!(cpp.variants().len(), 3);
    assert_eq!(cpp.get_variant(Some("test")).unwrap().name(), "tests");

    let vscode = registry.get("vscode").unwrap();
    assert_eq!(vscode.kind(), TemplateKind::Config);
}

#[test]
fn test_sample_lib_variant_resolution() {
    let registry = TemplateLoader::new(get_templates_path()).load_all().unwrap();
    let cpp = registry.workspace("cpp").unwrap();

    let resolution = cpp.resolve_files(Some("lib")).unwrap();
    assert!(resolution.contains("source/#cpp#.cpp"));
    assert!(resolution.contains("include/header.hpp"));
    assert!(resolution.contains(".gitignore"));
    assert!(!resolution.contains("source/main.cpp"));
    assert!(resolution.files[Path::new("CMakeLists.txt")]
        .root()
        .ends_with("lib"));
}

#[test]
fn test_sample_lib_variant_materialization() {
    let registry = TemplateLoader::new(get_templates_path()).load_all().unwrap();
    let cpp = registry.workspace("cpp").unwrap();
    let dir = tempdir().unwrap();
    let dst = dir.path().join("widget");

    let report = cpp
        .create_workspace(&dst, Some("lib"), "widget", &MaterializeOptions::new(), &mut io::sink())
        .unwrap();

    assert!(report.warnings.is_empty());
    let source = fs::read_to_string(dst.join("source/widget.cpp")).unwrap();
    assert!(source.contains("namespace widget"));
    assert!(source.contains("#include \"widget.hpp\""));
    let cmake = fs::read_to_string(dst.join("CMakeLists.txt")).unwrap();
    assert!(cmake.contains("add_library(widget source/widget.cpp)"));
    assert!(!dst.join("source/main.cpp").exists());
    assert_eq!(fs::read_to_string(dst.join(".gitignore")).unwrap(), "build/\n.cache/\n");
}

#[test]
fn test_demo_end_to_end() {
    let root = demo_root();
    let registry = TemplateLoader::new(root.path()).load_all().unwrap();
    let demo = registry.workspace("demo").unwrap();

    let resolution = demo.resolve_files(Some("ext")).unwrap();
    let mut paths: Vec<_> = resolution.paths().map(|p| p.display().to_string()).collect();
    paths.sort();
    assert_eq!(paths, vec!["src/#demo#_main.c", "src/extra.c"]);

    let dst = root.path().join("out");
    fs::create_dir(&dst).unwrap();
    demo.create_workspace(&dst, Some("ext"), "widget", &MaterializeOptions::new(), &mut io::sink())
        .unwrap();

    assert!(dst.join("src/widget_main.c").is_file());
    assert!(dst.join("src/extra.c").is_file());
    assert!(!dst.join("readme.md").exists());
    assert_eq!(
        fs::read_to_string(dst.join("src/widget_main.c")).unwrap(),
        "/* widget */\nint main(void) { return 0; }\n"
    );
    assert_eq!(
        fs::read_to_string(dst.join("src/extra.c")).unwrap(),
        "void extra(void) {}\n"
    );
}

#[test]
fn test_dry_run_touches_nothing() {
    let root = demo_root();
    let registry = TemplateLoader::new(root.path()).load_all().unwrap();
    let demo = registry.workspace("demo").unwrap();
    let dst = root.path().join("out");

    let mut plan = Vec::new();
    let report = demo
        .create_workspace(&dst, None, "widget", &MaterializeOptions::new().dry_run(true), &mut plan)
        .unwrap();

    assert!(!dst.exists());
    assert_eq!(report.entries.len(), 2);
    let plan = String::from_utf8(plan).unwrap();
    assert!(plan.contains(&format!("-> {}", dst.join("src/widget_main.c").display())));
}

#[test]
fn test_schema_violation_skips_workspace() {
    let root = demo_root();
    write(
        &root.path().join("bad-workspace/meta.json"),
        r#"{"default": 5, "variants": {"base": {}}}"#,
    );
    write(&root.path().join("bad-workspace/base/a.txt"), "a");
    let schema = get_templates_path().join("schemas/template.json");

    let loader = TemplateLoader::new(root.path()).with_schema(Some(schema.clone()));
    let registry = loader.load_all().unwrap();
    assert!(registry.workspace("demo").is_some());

    #[cfg(feature = "schema")]
    {
        assert!(registry.workspace("bad").is_none());
        let err =
            Workspace::load("bad", &root.path().join("bad-workspace"), Some(&schema)).unwrap_err();
        assert!(matches!(err, TemplateError::SchemaViolation { .. }));
        assert!(loader.discover(WORKSPACE_PATTERN, TemplateKind::Workspace).is_err());
    }

    // Without a schema the mistyped default is simply ignored.
    let bad = Workspace::load("bad", &root.path().join("bad-workspace"), None).unwrap();
    assert_eq!(bad.default(), None);
}

#[test]
fn test_config_copy_to_destination() {
    let registry = TemplateLoader::new(get_templates_path()).load_all().unwrap();
    let vscode = registry.config("vscode").unwrap();
    let dir = tempdir().unwrap();

    let report = vscode
        .copy_to_destination(dir.path(), true, &MaterializeOptions::new(), &mut io::sink())
        .unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(
        fs::read(dir.path().join(".vscode/settings.json")).unwrap(),
        fs::read(get_templates_path().join("config.vscode/settings.json")).unwrap()
    );
}

#[test]
fn test_unknown_variant_is_lookup_error() {
    let root = demo_root();
    let registry = TemplateLoader::new(root.path()).load_all().unwrap();
    let demo = registry.workspace("demo").unwrap();

    let err = demo
        .create_workspace(root.path(), Some("nope"), "x", &MaterializeOptions::new(), &mut io::sink())
        .unwrap_err();
    assert!(err.is_lookup());
}
