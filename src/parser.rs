//! Line-oriented parser for combined documents.
//!
//! The document is a sequence of
//!
//! ````text
//! -- relative/path.ext
//! ```ext
//! raw content
//! ```
//! ````
//!
//! blocks. Parsing is a three-state machine ([`ParserState`]) fed one line at
//! a time; each transition is a pure function so it can be tested without a
//! whole document. Content is treated as opaque bytes.

use crate::combine::{FENCE, MARKER_PREFIX};

/// One file recovered from a combined document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Path as written on the marker line, whitespace-trimmed
    pub path: String,
    /// Block lines joined with `\n`
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParserState {
    /// Between sections; only marker lines matter
    #[default]
    Outside,
    /// Saw a marker, waiting for the opening fence
    AwaitingFence { path: String },
    /// Collecting content lines until the closing fence
    InBlock {
        path: String,
        content: Vec<u8>,
        lines: usize,
    },
}

/// Returns the trimmed path if `line` is a marker line
pub fn marker_path(line: &[u8]) -> Option<String> {
    line.strip_prefix(MARKER_PREFIX.as_bytes())
        .map(|rest| String::from_utf8_lossy(rest).trim().to_string())
}

pub fn is_fence(line: &[u8]) -> bool {
    line.starts_with(FENCE.as_bytes())
}

impl ParserState {
    /// Consumes one line, returning the next state and a section if one closed
    pub fn step(self, line: &[u8]) -> (ParserState, Option<Section>) {
        if let Some(path) = marker_path(line) {
            // a marker inside an open block force-closes it
            let closed = self.close();
            log::trace!("Marker for {path}");
            return (ParserState::AwaitingFence { path }, closed);
        }

        match self {
            ParserState::Outside => (ParserState::Outside, None),
            ParserState::AwaitingFence { path } => {
                if is_fence(line) {
                    log::trace!("Opening block for {path}");
                    (
                        ParserState::InBlock {
                            path,
                            content: Vec::new(),
                            lines: 0,
                        },
                        None,
                    )
                } else {
                    (ParserState::AwaitingFence { path }, None)
                }
            }
            state @ ParserState::InBlock { .. } if is_fence(line) => {
                (ParserState::Outside, state.close())
            }
            ParserState::InBlock {
                path,
                mut content,
                lines,
            } => {
                if lines > 0 {
                    content.push(b'\n');
                }
                content.extend_from_slice(line);
                (
                    ParserState::InBlock {
                        path,
                        content,
                        lines: lines + 1,
                    },
                    None,
                )
            }
        }
    }

    /// Handles end of input.
    ///
    /// An unterminated block is still emitted when at least one line was
    /// captured; a marker that never got its block is dropped.
    pub fn finish(self) -> Option<Section> {
        match self {
            ParserState::InBlock { lines: 0, .. } => None,
            state => state.close(),
        }
    }

    fn close(self) -> Option<Section> {
        match self {
            ParserState::InBlock { path, content, .. } => {
                log::trace!("Closing block for {path} ({} bytes)", content.len());
                Some(Section { path, content })
            }
            _ => None,
        }
    }
}

/// Splits a combined document into its sections, in document order
pub fn parse_sections(document: &[u8]) -> Vec<Section> {
    let mut state = ParserState::Outside;
    let mut sections = Vec::new();

    for line in document.split(|&b| b == b'\n') {
        let (next, closed) = state.step(line);
        state = next;
        sections.extend(closed);
    }
    sections.extend(state.finish());

    sections
}
