use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for glue operations
#[derive(Error, Debug)]
pub enum GlueError {
    /// IO error not tied to a specific file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A glob pattern could not be compiled
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Ignore file exists but could not be read
    #[error("Failed to read ignore file {path}: {source}")]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source file or combined document could not be read
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output file could not be created or written
    #[error("Failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parent directories of an extracted file could not be created
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Section path would land outside the destination directory
    #[error("Refusing to write outside the destination directory: {path}")]
    UnsafePath { path: String },

    /// `WalkDir` error when traversing directories
    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GlueError>;
