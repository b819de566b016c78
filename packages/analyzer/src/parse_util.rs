//! Parse Utilities
//!
//! Source spans, line/column locations and parse errors shared by the
//! expression front-end, the expression tree and the diagnostics.

use serde::{Deserialize, Serialize};
use crate::chars;

/// Byte range `[start, end)` into the analyzed source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: usize,
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        SourceSpan { start, end }
    }

    /// Zero-width span at `offset`
    pub fn empty(offset: usize) -> Self {
        SourceSpan { start: offset, end: offset }
    }

    /// Smallest span covering both `self` and `other`
    pub fn cover(&self, other: SourceSpan) -> SourceSpan {
        SourceSpan::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, other: SourceSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Source text covered by the span, or an empty string when the span is out of range
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceFile {
    pub content: String,
    pub url: String,
}

impl SourceFile {
    pub fn new(content: String, url: String) -> Self {
        SourceFile { content, url }
    }

    /// Zero-based line and column of a byte offset.
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to the end.
    pub fn location(&self, offset: usize) -> SourceLocation {
        let mut line = 0;
        let mut col = 0;
        for (index, ch) in self.content.char_indices() {
            if index >= offset {
                break;
            }
            if ch == chars::LF {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }
        SourceLocation::new(offset.min(self.content.len()), line, col)
    }

    pub fn range(&self, span: SourceSpan) -> (SourceLocation, SourceLocation) {
        (self.location(span.start), self.location(span.end))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceLocation {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl SourceLocation {
    pub fn new(offset: usize, line: usize, col: usize) -> Self {
        SourceLocation { offset, line, col }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseError {
    pub span: SourceSpan,
    pub msg: String,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(span: SourceSpan, msg: String) -> Self {
        ParseError {
            span,
            msg,
            level: ParseErrorLevel::Error,
        }
    }

    /// Message with the offending source fragment marked, e.g. `Expected ')' ("(a + [ERROR ->]")`
    pub fn contextual_message(&self, source: &str) -> String {
        let level_str = match self.level {
            ParseErrorLevel::Warning => "WARNING",
            ParseErrorLevel::Error => "ERROR",
        };
        let start = floor_char_boundary(source, self.span.start);
        let before_start = floor_char_boundary(source, start.saturating_sub(40));
        let after_end = floor_char_boundary(source, (start + 40).min(source.len()));
        format!(
            "{} (\"{}[{} ->]{}\")",
            self.msg,
            &source[before_start..start],
            level_str,
            &source[start..after_end]
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}..{}", self.msg, self.span.start, self.span.end)
    }
}

fn floor_char_boundary(source: &str, mut index: usize) -> usize {
    index = index.min(source.len());
    while index > 0 && !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}
