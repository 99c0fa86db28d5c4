use crate::error::{GlueError, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Name of the ignore file read from the root of a combine pass
pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Extracts exclusion patterns from ignore-file text.
///
/// Lines are trimmed; blank lines and `#` comments are skipped.
pub fn parse_ignore_patterns(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Loads exclusion patterns from the ignore file in `dir`
///
/// A missing ignore file yields no patterns.
///
/// # Errors
///
/// Returns `GlueError::IgnoreFile` if the file exists but cannot be read.
pub fn load_ignore_patterns(dir: &Path) -> Result<Vec<String>> {
    let path = dir.join(IGNORE_FILE_NAME);
    match fs::read(&path) {
        Ok(bytes) => {
            let patterns = parse_ignore_patterns(&String::from_utf8_lossy(&bytes));
            log::debug!(
                "Loaded {} patterns from {}",
                patterns.len(),
                path.display()
            );
            Ok(patterns)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("No {} found in {}", IGNORE_FILE_NAME, dir.display());
            Ok(Vec::new())
        }
        Err(source) => Err(GlueError::IgnoreFile { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let text = "# build output\ntarget/\n\n   \n  *.log  \n#*.tmp\nnode_modules\n";
        assert_eq!(
            parse_ignore_patterns(text),
            vec!["target/", "*.log", "node_modules"]
        );
    }

    #[test]
    fn test_parse_keeps_file_order() {
        let text = "b\na\nc";
        assert_eq!(parse_ignore_patterns(text), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_parse_handles_crlf() {
        let text = "dist\r\n# comment\r\n*.bak\r\n";
        assert_eq!(parse_ignore_patterns(text), vec!["dist", "*.bak"]);
    }

    #[test]
    fn test_missing_ignore_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let patterns = load_ignore_patterns(temp_dir.path()).unwrap();
        assert!(patterns.is_empty());
    }

    #[test]
    fn test_load_ignore_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(IGNORE_FILE_NAME),
            "# deps\nvendor/\n*.secret\n",
        )
        .unwrap();

        let patterns = load_ignore_patterns(temp_dir.path()).unwrap();
        assert_eq!(patterns, vec!["vendor/", "*.secret"]);
    }

    #[test]
    fn test_unreadable_ignore_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        // a directory in place of the file fails with something other than NotFound
        fs::create_dir(temp_dir.path().join(IGNORE_FILE_NAME)).unwrap();

        let result = load_ignore_patterns(temp_dir.path());
        assert!(matches!(result, Err(GlueError::IgnoreFile { .. })));
    }
}
