use crate::error::{GlueError, Result};
use crate::parser::{Section, parse_sections};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolves a section path under `dest`
///
/// # Errors
///
/// Returns `GlueError::UnsafePath` for empty or absolute paths and for paths
/// containing `..`.
pub fn resolve_section_path(dest: &Path, path: &str) -> Result<PathBuf> {
    let relative = Path::new(path);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if path.is_empty() || escapes {
        return Err(GlueError::UnsafePath {
            path: path.to_string(),
        });
    }

    Ok(dest.join(relative))
}

/// Writes one section below `dest`, creating parent directories as needed
///
/// # Errors
///
/// - `GlueError::UnsafePath` if the section path leaves `dest`.
/// - `GlueError::CreateDir` / `GlueError::WriteFile` on IO failures.
pub fn write_section(dest: &Path, section: &Section) -> Result<PathBuf> {
    let target = resolve_section_path(dest, &section.path)?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| GlueError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target, &section.content).map_err(|source| GlueError::WriteFile {
        path: target.clone(),
        source,
    })?;

    log::debug!("Wrote {} ({} bytes)", target.display(), section.content.len());
    Ok(target)
}

/// Writes every section in order; later sections overwrite earlier ones
///
/// # Errors
///
/// Stops at the first failing section; files written before it stay on disk.
pub fn extract_sections(dest: &Path, sections: &[Section]) -> Result<usize> {
    for section in sections {
        write_section(dest, section)?;
    }
    Ok(sections.len())
}

/// Recreates the files of the combined document at `document` under `dest`
///
/// # Errors
///
/// - `GlueError::ReadFile` if the document cannot be read.
/// - Errors from `extract_sections`.
pub fn extract_document(document: &Path, dest: &Path) -> Result<usize> {
    let bytes = fs::read(document).map_err(|source| GlueError::ReadFile {
        path: document.to_path_buf(),
        source,
    })?;

    let sections = parse_sections(&bytes);
    log::info!(
        "Parsed {} sections from {}",
        sections.len(),
        document.display()
    );

    extract_sections(dest, &sections)
}
