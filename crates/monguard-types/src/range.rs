use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single position in a source file.
///
/// `line` and `column` are 1-based (column counts characters, not bytes);
/// `byte` is the 0-based byte offset into the file.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
    pub byte: usize,
}

impl SourcePos {
    pub fn new(line: u32, column: u32, byte: usize) -> Self {
        Self { line, column, byte }
    }
}

/// A half-open span `[start, end)` inside one file.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct SourceRange {
    pub filename: String,
    pub start: SourcePos,
    pub end: SourcePos,
}

impl SourceRange {
    pub fn new(filename: impl Into<String>, start: SourcePos, end: SourcePos) -> Self {
        Self {
            filename: filename.into(),
            start,
            end,
        }
    }

    /// True when the range can be traced back to a file.
    pub fn is_traceable(&self) -> bool {
        !self.filename.is_empty()
    }

    /// True when `other` lies entirely within `self` (same file, byte-wise).
    pub fn contains(&self, other: &SourceRange) -> bool {
        self.filename == other.filename
            && self.start.byte <= other.start.byte
            && other.end.byte <= self.end.byte
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename, self.start.line, self.start.column
        )
    }
}
