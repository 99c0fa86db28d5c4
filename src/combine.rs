use crate::error::{GlueError, Result};
use crate::ignore_file::load_ignore_patterns;
use crate::pattern::{ExclusionSet, InclusionSet};
use crate::walker::{FileEntry, FileFilter, walk_files};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default name of the combined document
pub const DEFAULT_OUTPUT: &str = "combined.txt";

/// Prefix of the line naming the file of the following block
pub const MARKER_PREFIX: &str = "-- ";

/// Opening and closing line prefix of a content block
pub const FENCE: &str = "```";

/// Configuration for a combine pass
#[derive(Debug, Clone)]
pub struct CombineConfig {
    /// Document path, relative to the combine root
    pub output: PathBuf,
    /// Files must match one of these; empty means everything
    pub inclusion_patterns: Vec<String>,
    /// Extra exclusion patterns on top of the ignore file
    pub ignore_patterns: Vec<String>,
    /// Whether to read exclusions from the root's ignore file
    pub use_ignore_file: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            inclusion_patterns: Vec::new(),
            ignore_patterns: Vec::new(),
            use_ignore_file: true,
        }
    }
}

/// Returns the text after the last `.` of the file name, or `""`
pub fn file_extension(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rfind('.').map_or("", |idx| &name[idx + 1..])
}

/// Builds the inclusion/exclusion filter for `root`.
///
/// All patterns are compiled before anything is walked or written.
///
/// # Errors
///
/// - `GlueError::IgnoreFile` if the ignore file exists but cannot be read.
/// - `GlueError::Pattern` for the first invalid pattern.
pub fn build_filter(root: &Path, config: &CombineConfig) -> Result<FileFilter> {
    let inclusion = InclusionSet::new(&config.inclusion_patterns)?;

    let mut exclusion_patterns = if config.use_ignore_file {
        load_ignore_patterns(root)?
    } else {
        Vec::new()
    };
    exclusion_patterns.extend(config.ignore_patterns.iter().cloned());
    let exclusion = ExclusionSet::new(&exclusion_patterns)?;

    log::info!(
        "Filtering with {} inclusion and {} exclusion patterns",
        inclusion.patterns().count(),
        exclusion.len()
    );
    Ok(FileFilter::new(inclusion, exclusion))
}

/// Lists the files a combine pass over `root` would write, in document order
///
/// # Errors
///
/// Returns errors from `build_filter` or `walk_files`.
pub fn select_files(root: &Path, config: &CombineConfig) -> Result<Vec<FileEntry>> {
    let filter = build_filter(root, config)?;
    walk_files(root, &config.output, &filter)
}

/// Serializes `files` into `writer` as one marker line and one fenced block each.
///
/// File bytes are copied verbatim. Content lines starting with the fence or
/// the marker prefix are not escaped and will not survive extraction.
///
/// # Errors
///
/// - `GlueError::ReadFile` if a source file cannot be read.
/// - `GlueError::Io` if writing to `writer` fails.
pub fn write_document<W: Write>(files: &[FileEntry], writer: &mut W) -> Result<usize> {
    for file in files {
        let content = fs::read(file.source()).map_err(|source| GlueError::ReadFile {
            path: file.source().to_path_buf(),
            source,
        })?;

        writeln!(writer, "{MARKER_PREFIX}{}", file.path())?;
        writeln!(writer, "{FENCE}{}", file.extension())?;
        writer.write_all(&content)?;
        write!(writer, "\n{FENCE}\n\n")?;
    }
    writer.flush()?;
    Ok(files.len())
}

/// Combines every selected file under `root` into `root/config.output`
///
/// Returns the number of files written. A failure part-way leaves a partial
/// document behind.
///
/// # Errors
///
/// - `GlueError::Pattern` / `GlueError::IgnoreFile` before anything is written.
/// - `GlueError::WalkDir` if traversal fails.
/// - `GlueError::ReadFile` / `GlueError::WriteFile` on file IO failures.
pub fn combine_files(root: &Path, config: &CombineConfig) -> Result<usize> {
    let files = select_files(root, config)?;

    let output_path = root.join(&config.output);
    log::info!(
        "Writing {} files to {}",
        files.len(),
        output_path.display()
    );

    let out = File::create(&output_path).map_err(|source| GlueError::WriteFile {
        path: output_path.clone(),
        source,
    })?;
    let mut writer = BufWriter::new(out);

    write_document(&files, &mut writer).map_err(|err| match err {
        GlueError::Io(source) => GlueError::WriteFile {
            path: output_path.clone(),
            source,
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore_file::IGNORE_FILE_NAME;
    use tempfile::TempDir;

    fn create_tree(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        for (file, content) in files {
            let path = temp_dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
        }
        temp_dir
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("src/app.go"), "go");
        assert_eq!(file_extension("Makefile"), "");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("v1.2/README"), "");
        assert_eq!(file_extension("trailing."), "");
        assert_eq!(file_extension(".gitignore"), "gitignore");
    }

    #[test]
    fn test_config_default() {
        let config = CombineConfig::default();
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(config.inclusion_patterns.is_empty());
        assert!(config.ignore_patterns.is_empty());
        assert!(config.use_ignore_file);
    }

    #[test]
    fn test_write_document_format() {
        let temp_dir = create_tree(&[("src/app.go", "package main\n"), ("Makefile", "all:")]);
        let files = vec![
            FileEntry::new("src/app.go", temp_dir.path().join("src/app.go")),
            FileEntry::new("Makefile", temp_dir.path().join("Makefile")),
        ];

        let mut out = Vec::new();
        let count = write_document(&files, &mut out).unwrap();
        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "-- src/app.go\n```go\npackage main\n\n```\n\n-- Makefile\n```\nall:\n```\n\n"
        );
    }

    #[test]
    fn test_write_document_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let files = vec![FileEntry::new("gone.txt", temp_dir.path().join("gone.txt"))];

        let mut out = Vec::new();
        let result = write_document(&files, &mut out);
        assert!(matches!(result, Err(GlueError::ReadFile { .. })));
    }

    #[test]
    fn test_combine_applies_ignore_file() {
        let temp_dir = create_tree(&[
            (IGNORE_FILE_NAME, "# local\n*.log\n"),
            ("app.log", "noise"),
            ("main.rs", "fn main() {}"),
        ]);

        let count = combine_files(temp_dir.path(), &CombineConfig::default()).unwrap();
        assert_eq!(count, 2);

        let doc = fs::read_to_string(temp_dir.path().join(DEFAULT_OUTPUT)).unwrap();
        assert!(doc.contains("-- .gitignore\n```gitignore\n"));
        assert!(doc.contains("-- main.rs\n```rs\nfn main() {}\n```\n"));
        assert!(!doc.contains("app.log"));
    }

    #[test]
    fn test_combine_all_skips_ignore_file() {
        let temp_dir = create_tree(&[
            (IGNORE_FILE_NAME, "*.log\n"),
            ("app.log", "noise"),
            ("main.rs", "fn main() {}"),
        ]);

        let config = CombineConfig {
            use_ignore_file: false,
            ignore_patterns: vec![IGNORE_FILE_NAME.to_string()],
            ..CombineConfig::default()
        };
        let files = select_files(temp_dir.path(), &config).unwrap();
        let paths: Vec<_> = files.iter().map(FileEntry::path).collect();
        assert_eq!(paths, vec!["app.log", "main.rs"]);
    }

    #[test]
    fn test_invalid_pattern_writes_nothing() {
        let temp_dir = create_tree(&[("main.rs", "fn main() {}")]);
        let config = CombineConfig {
            inclusion_patterns: vec!["src/[".to_string()],
            ..CombineConfig::default()
        };

        let result = combine_files(temp_dir.path(), &config);
        assert!(matches!(result, Err(GlueError::Pattern { .. })));
        assert!(!temp_dir.path().join(DEFAULT_OUTPUT).exists());
    }

    #[test]
    fn test_second_run_excludes_previous_output() {
        let temp_dir = create_tree(&[("a.txt", "alpha")]);
        let config = CombineConfig::default();

        assert_eq!(combine_files(temp_dir.path(), &config).unwrap(), 1);
        let first = fs::read_to_string(temp_dir.path().join(DEFAULT_OUTPUT)).unwrap();

        assert_eq!(combine_files(temp_dir.path(), &config).unwrap(), 1);
        let second = fs::read_to_string(temp_dir.path().join(DEFAULT_OUTPUT)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unwritable_output() {
        let temp_dir = create_tree(&[("a.txt", "alpha")]);
        let config = CombineConfig {
            output: PathBuf::from("missing/dir/out.txt"),
            ..CombineConfig::default()
        };

        let result = combine_files(temp_dir.path(), &config);
        assert!(matches!(result, Err(GlueError::WriteFile { .. })));
    }
}
