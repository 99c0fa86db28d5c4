//! # glue
//!
//! Combines a directory tree of text files into a single flat document and
//! recreates the tree from that document again.
//!
//! ## Document format
//!
//! Every file becomes a marker line followed by a fenced block tagged with the
//! file extension:
//!
//! ````text
//! -- src/app.go
//! ```go
//! package main
//! ```
//!
//! ````
//!
//! Content is copied verbatim. A content line beginning with three backticks
//! or with `-- ` cannot be told apart from the framing, so such files do not
//! survive a round trip unchanged.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use std::path::Path;
//! use glue::{CombineConfig, combine_files, extract_document};
//!
//! let config = CombineConfig {
//!     inclusion_patterns: vec!["src/**/*.rs".to_string()],
//!     ..CombineConfig::default()
//! };
//! let written = combine_files(Path::new("."), &config)?;
//! println!("combined {written} files");
//!
//! let restored = extract_document(Path::new("combined.txt"), Path::new("restored"))?;
//! println!("restored {restored} files");
//! # Ok::<(), glue::GlueError>(())
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Combine everything not listed in .gitignore into combined.txt
//! glue
//!
//! # Only Go sources, skipping tests, into bundle.txt
//! glue -o bundle.txt -i '*_test.go' '**/*.go'
//!
//! # Recreate the files from bundle.txt
//! glue -r -o bundle.txt
//! ```

pub mod combine;
pub mod error;
pub mod extract;
pub mod ignore_file;
pub mod parser;
pub mod pattern;
pub mod walker;

// Re-export main types and functions for convenience
pub use combine::{CombineConfig, DEFAULT_OUTPUT, combine_files, file_extension, select_files};
pub use error::{GlueError, Result};
pub use extract::{extract_document, extract_sections};
pub use ignore_file::{IGNORE_FILE_NAME, load_ignore_patterns};
pub use parser::{ParserState, Section, parse_sections};
pub use pattern::{CATCH_ALL_PATTERN, matches};
pub use walker::FileEntry;
