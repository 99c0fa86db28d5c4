//! Glob matching for inclusion and exclusion patterns.
//!
//! Paths are always compared as forward-slash relative paths (`src/app.go`),
//! independent of the host separator. Inclusion patterns use plain doublestar
//! semantics: `*` stays within one segment and `**` spans zero or more
//! segments. Exclusion patterns share the same glob engine but are anchored
//! the way ignore files anchor them, see [`ExclusionRule`].

use crate::error::{GlueError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::HashSet;

/// Pattern used when the caller supplies no inclusion patterns
pub const CATCH_ALL_PATTERN: &str = "**/*";

fn compile(pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| GlueError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Drops repeated patterns while keeping the first occurrence in place
fn dedup_ordered<S: AsRef<str>>(patterns: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    patterns
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| seen.insert(*p))
        .collect()
}

/// Tests a single path against a single pattern
///
/// # Errors
///
/// Returns `GlueError::Pattern` if the pattern is not a valid glob.
pub fn matches(pattern: &str, path: &str) -> Result<bool> {
    Ok(Pattern::new(pattern)?.is_match(path))
}

/// A compiled inclusion glob
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    matcher: GlobMatcher,
}

impl Pattern {
    /// Compiles a doublestar-style glob
    ///
    /// # Errors
    ///
    /// Returns `GlueError::Pattern` if the pattern is not a valid glob.
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            source: pattern.to_string(),
            matcher: compile(pattern)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }
}

/// A compiled exclusion glob with ignore-file anchoring.
///
/// - a pattern without `/` is tested against every component of the path,
///   so `*.log` drops `logs/app.log` and `target` drops `target/debug/app`;
/// - a leading `/` or an inner `/` anchors the pattern at the root, and it is
///   tested against the full path and every ancestor directory;
/// - a trailing `/` restricts the pattern to directories, i.e. to ancestors
///   of the candidate file.
#[derive(Debug, Clone)]
pub struct ExclusionRule {
    source: String,
    matcher: GlobMatcher,
    anchored: bool,
    dir_only: bool,
}

impl ExclusionRule {
    /// Compiles one exclusion line
    ///
    /// # Errors
    ///
    /// Returns `GlueError::Pattern` if the glob part of the line is invalid.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut body = pattern;
        let dir_only = body.len() > 1 && body.ends_with('/');
        if dir_only {
            body = body.trim_end_matches('/');
        }
        let rooted = body.starts_with('/');
        if rooted {
            body = body.trim_start_matches('/');
        }
        let anchored = rooted || body.contains('/');

        let matcher = compile(body).map_err(|err| match err {
            GlueError::Pattern { source, .. } => GlueError::Pattern {
                pattern: pattern.to_string(),
                source,
            },
            other => other,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            matcher,
            anchored,
            dir_only,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        if self.anchored {
            // ancestors first: "a", "a/b", ...
            let mut ancestors = path.match_indices('/').map(|(idx, _)| &path[..idx]);
            if ancestors.any(|dir| self.matcher.is_match(dir)) {
                return true;
            }
            !self.dir_only && self.matcher.is_match(path)
        } else {
            let mut components = path.split('/').peekable();
            while let Some(component) = components.next() {
                let is_file = components.peek().is_none();
                if is_file && self.dir_only {
                    break;
                }
                if self.matcher.is_match(component) {
                    return true;
                }
            }
            false
        }
    }
}

/// Ordered inclusion patterns; an empty list means "everything"
#[derive(Debug, Clone)]
pub struct InclusionSet {
    patterns: Vec<Pattern>,
}

impl InclusionSet {
    /// # Errors
    ///
    /// Returns `GlueError::Pattern` for the first invalid pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = if patterns.is_empty() {
            vec![Pattern::new(CATCH_ALL_PATTERN)?]
        } else {
            dedup_ordered(patterns)
                .into_iter()
                .map(Pattern::new)
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Self { patterns })
    }

    /// Returns the first pattern matching `path`
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.is_match(path))
            .map(Pattern::as_str)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Pattern::as_str)
    }
}

/// Ordered exclusion rules; the first matching rule wins
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    rules: Vec<ExclusionRule>,
}

impl ExclusionSet {
    /// # Errors
    ///
    /// Returns `GlueError::Pattern` for the first invalid pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let rules = dedup_ordered(patterns)
            .into_iter()
            .map(ExclusionRule::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|r| r.is_match(path))
            .map(ExclusionRule::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
