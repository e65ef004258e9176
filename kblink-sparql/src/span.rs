//! Line/column utilities for locating backend parse errors in compiled text.
//!
//! Backends report syntax errors either as byte/character positions or as
//! line/column pairs. A `LineIndex` over the compiled text converts between the
//! two so errors can be annotated with the offending line.

use serde::{Deserialize, Serialize};

/// Mapping from byte offsets to line/column positions.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offsets of line starts (including offset 0 for line 1)
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build a line index from source text.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in source.char_indices() {
            if c == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a line/column position.
    ///
    /// Lines and columns are 1-indexed.
    pub fn line_col(&self, offset: usize) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        LineCol {
            line: line as u32 + 1,
            col: (offset - line_start) as u32 + 1,
        }
    }

    /// Get the byte offset of a line start.
    pub fn line_start(&self, line: u32) -> Option<usize> {
        if line == 0 {
            return None;
        }
        self.line_starts.get(line as usize - 1).copied()
    }

    /// Get the byte offset of a line end (exclusive, including the newline).
    pub fn line_end(&self, line: u32, source: &str) -> usize {
        self.line_starts
            .get(line as usize)
            .copied()
            .unwrap_or(source.len())
    }

    /// The text of a line without its trailing newline, if the line exists.
    pub fn line_text<'a>(&self, line: u32, source: &'a str) -> Option<&'a str> {
        let start = self.line_start(line)?;
        let end = self.line_end(line, source).min(source.len());
        source
            .get(start..end)
            .map(|text| text.trim_end_matches(['\n', '\r']))
    }

    /// Number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// A line/column position in source text (1-indexed).
///
/// **Note**: Column numbers are byte-based, not character or grapheme-based.
/// Compiled query text is ASCII apart from user-supplied literals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineCol {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in bytes, not characters)
    pub col: u32,
}

impl LineCol {
    /// Create a new line/column position.
    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
