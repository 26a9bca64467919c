//! Materialization of resolved templates into a destination directory.

use std::fs::{self, File, FileTimes};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{TemplateError, TemplateResult};
use crate::workspace::Workspace;

/// Options for materializing a template.
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions {
    /// Write every `source -> target` mapping to the output sink.
    pub verbose: bool,
    /// Only write the plan; touch nothing on disk. Implies `verbose`.
    pub dry_run: bool,
}

impl MaterializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn prints_plan(&self) -> bool {
        self.verbose || self.dry_run
    }
}

/// One planned or performed file copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyEntry {
    /// Source file.
    pub source: PathBuf,
    /// Path relative to the template directory it came from.
    pub relative: PathBuf,
    /// Destination file.
    pub target: PathBuf,
    /// Whether the placeholder was replaced inside the copied content.
    pub substituted: bool,
}

/// Outcome of a materialization.
#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    pub entries: Vec<CopyEntry>,
    /// Non-fatal problems: truncated inheritance, failed substitutions.
    pub warnings: Vec<String>,
    pub dry_run: bool,
}

impl Workspace {
    /// Copy the resolved files of `variant` (or the default variant) into
    /// `destination`, replacing the `#<workspace>#` placeholder with
    /// `project_name` in relative paths and in the content of project files.
    ///
    /// Existing files are overwritten. The plan is written to `out` when
    /// verbose or dry-run; a dry run performs no filesystem changes.
    pub fn create_workspace(
        &self,
        destination: &Path,
        variant: Option<&str>,
        project_name: &str,
        options: &MaterializeOptions,
        out: &mut dyn Write,
    ) -> TemplateResult<MaterializeReport> {
        if destination.exists() && !destination.is_dir() {
            return Err(TemplateError::NotADirectory(destination.to_path_buf()));
        }

        let resolution = self.resolve_files(variant)?;
        let placeholder = self.placeholder();
        let width = resolution.max_path_len();

        info!(
            "Creating {}:{} as '{}' in {:?}",
            self.name(),
            resolution.variant.name(),
            project_name,
            destination
        );

        let mut report = MaterializeReport {
            warnings: resolution.warnings.clone(),
            dry_run: options.dry_run,
            ..Default::default()
        };

        for (relative, file) in &resolution.files {
            let target = destination.join(substitute_path(relative, &placeholder, project_name));
            let source = file.full_path();

            if options.prints_plan() {
                write_plan_line(out, relative, width, &target)?;
            }

            let mut substituted = false;
            if !options.dry_run {
                let is_project_file = target
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| self.is_project_file(n));
                let content = if is_project_file {
                    match substituted_content(&source, &placeholder, project_name) {
                        Ok(content) => content,
                        Err(e) => {
                            let message = format!(
                                "failed to replace '{}' in {:?}: {}",
                                placeholder, target, e
                            );
                            warn!("{}", message);
                            report.warnings.push(message);
                            None
                        }
                    }
                } else {
                    None
                };

                substituted = content.is_some();
                match content {
                    Some(content) => write_file(&source, &target, &content)?,
                    None => copy_file(&source, &target)?,
                }
            }

            report.entries.push(CopyEntry {
                source,
                relative: relative.clone(),
                target,
                substituted,
            });
        }

        debug!("{} file(s) processed", report.entries.len());
        Ok(report)
    }
}

impl Config {
    /// Copy the whole config tree verbatim into `destination/.<name>`, or
    /// `destination/<name>` when `dotfile` is false.
    pub fn copy_to_destination(
        &self,
        destination: &Path,
        dotfile: bool,
        options: &MaterializeOptions,
        out: &mut dyn Write,
    ) -> TemplateResult<MaterializeReport> {
        let target_dir = destination.join(self.target_dir_name(dotfile));
        if target_dir.exists() && !target_dir.is_dir() {
            return Err(TemplateError::NotADirectory(target_dir));
        }

        info!("Copying config {} to {:?}", self.name(), target_dir);

        let files: Vec<_> = self.files().collect();
        let width = files
            .iter()
            .map(|f| f.path().display().to_string().chars().count())
            .max()
            .unwrap_or(0);

        let mut report = MaterializeReport {
            dry_run: options.dry_run,
            ..Default::default()
        };

        for file in files {
            let target = target_dir.join(file.path());
            let source = file.full_path();

            if options.prints_plan() {
                write_plan_line(out, file.path(), width, &target)?;
            }
            if !options.dry_run {
                copy_file(&source, &target)?;
            }

            report.entries.push(CopyEntry {
                source,
                relative: file.path().to_path_buf(),
                target,
                substituted: false,
            });
        }

        Ok(report)
    }
}

fn write_plan_line(out: &mut dyn Write, relative: &Path, width: usize, target: &Path) -> io::Result<()> {
    writeln!(
        out,
        "  {:<width$} -> {}",
        relative.display().to_string(),
        target.display(),
        width = width
    )
}

/// Replace the placeholder in a relative path.
pub fn substitute_path(relative: &Path, placeholder: &str, project_name: &str) -> PathBuf {
    match relative.to_str() {
        Some(s) if s.contains(placeholder) => PathBuf::from(s.replace(placeholder, project_name)),
        _ => relative.to_path_buf(),
    }
}

/// Source content with the placeholder replaced, or `None` when the
/// placeholder does not occur. Non UTF-8 content is an `InvalidData` error.
fn substituted_content(
    source: &Path,
    placeholder: &str,
    project_name: &str,
) -> io::Result<Option<String>> {
    let bytes = fs::read(source)?;
    let content =
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if !content.contains(placeholder) {
        return Ok(None);
    }
    Ok(Some(content.replace(placeholder, project_name)))
}

/// Copy content, permissions and timestamps of `source` to `target`.
fn copy_file(source: &Path, target: &Path) -> io::Result<()> {
    prepare_target(target)?;
    fs::copy(source, target)?;
    copy_metadata(source, target)
}

/// Write `content` to `target` with the permissions and timestamps of `source`.
fn write_file(source: &Path, target: &Path, content: &str) -> io::Result<()> {
    prepare_target(target)?;
    fs::write(target, content)?;
    copy_metadata(source, target)
}

/// Create parent directories and remove a read-only file left by an earlier
/// run so it can be replaced.
fn prepare_target(target: &Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::symlink_metadata(target) {
        Ok(metadata) if metadata.is_file() && metadata.permissions().readonly() => {
            debug!("Replacing read-only {:?}", target);
            fs::remove_file(target)
        }
        _ => Ok(()),
    }
}

/// Carry over access and modification times, then permissions.
fn copy_metadata(source: &Path, target: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    let file = File::options()
        .write(true)
        .open(target)
        .or_else(|_| File::open(target))?;
    file.set_times(times)?;
    drop(file);

    fs::set_permissions(target, metadata.permissions())
}
