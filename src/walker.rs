use crate::error::Result;
use crate::pattern::{ExclusionSet, InclusionSet};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A regular file discovered during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Forward-slash path relative to the walk root, e.g. `src/app.go`
    path: String,
    /// Location on disk (root joined with the relative path)
    source: PathBuf,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Fence tag for this file, see [`crate::combine::file_extension`]
    pub fn extension(&self) -> &str {
        crate::combine::file_extension(&self.path)
    }
}

/// Renders a relative path with `/` separators, dropping `.` components
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Renders `output` relative to `root` so it can be compared with walked paths.
///
/// Absolute outputs below the root are stripped of it, also when they only
/// agree after canonicalization (`.` against `$PWD/combined.txt`).
pub fn output_relative_to(root: &Path, output: &Path) -> String {
    if !output.is_absolute() {
        return to_slash_path(output);
    }
    if let Ok(relative) = output.strip_prefix(root) {
        return to_slash_path(relative);
    }

    let canonical = || -> Option<String> {
        let root = root.canonicalize().ok()?;
        let parent = output.parent()?.canonicalize().ok()?;
        let output = parent.join(output.file_name()?);
        output.strip_prefix(&root).ok().map(to_slash_path)
    };
    canonical().unwrap_or_else(|| to_slash_path(output))
}

/// Inclusion then exclusion, in that order
#[derive(Debug, Clone)]
pub struct FileFilter {
    inclusion: InclusionSet,
    exclusion: ExclusionSet,
}

impl FileFilter {
    pub fn new(inclusion: InclusionSet, exclusion: ExclusionSet) -> Self {
        Self {
            inclusion,
            exclusion,
        }
    }

    /// Whether the relative path survives both pattern lists
    pub fn accepts(&self, path: &str) -> bool {
        if self.inclusion.first_match(path).is_none() {
            log::trace!("Not included: {path}");
            return false;
        }
        if let Some(rule) = self.exclusion.first_match(path) {
            log::debug!("Excluded {path} (matched '{rule}')");
            return false;
        }
        true
    }
}

/// Walks `root` depth-first in lexical order and returns the accepted files.
///
/// Directories are descended into but never returned, and `output` (relative
/// to `root`, or absolute) is skipped so a previous combined document is never
/// re-read. Symlinks are not followed and not returned.
///
/// # Errors
///
/// Returns `GlueError::WalkDir` on the first traversal failure.
pub fn walk_files(root: &Path, output: &Path, filter: &FileFilter) -> Result<Vec<FileEntry>> {
    let output = output_relative_to(root, output);
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        if entry.path_is_symlink() {
            log::debug!("Skipping symlink {}", entry.path().display());
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let path = to_slash_path(relative);

        if path == output {
            log::debug!("Skipping output file {path}");
            continue;
        }

        if filter.accepts(&path) {
            log::debug!("Including {path}");
            files.push(FileEntry::new(path, entry.into_path()));
        }
    }

    Ok(files)
}
