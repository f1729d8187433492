use monguard_types::{SourcePos, SourceRange};
use std::ops::Range;

/// Byte offset -> line/column lookup for one file.
#[derive(Clone, Debug)]
pub struct SourceMap<'a> {
    filename: &'a str,
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(filename: &'a str, text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            filename,
            text,
            line_starts,
        }
    }

    /// 1-based line, 1-based character column.
    pub fn pos(&self, byte: usize) -> SourcePos {
        let byte = byte.min(self.text.len());
        let idx = self.line_starts.partition_point(|&start| start <= byte) - 1;
        let start = self.line_starts[idx];
        let column = self
            .text
            .get(start..byte)
            .map(|s| s.chars().count())
            .unwrap_or(byte - start);
        SourcePos::new(idx as u32 + 1, column as u32 + 1, byte)
    }

    pub fn range(&self, span: Range<usize>) -> SourceRange {
        SourceRange::new(self.filename, self.pos(span.start), self.pos(span.end))
    }

    /// Range of a whole line (1-based), without its line break.
    pub fn line_range(&self, line: usize) -> SourceRange {
        let start = self.line_starts.get(line.saturating_sub(1)).copied().unwrap_or(self.text.len());
        let end = self
            .line_starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        self.range(start..end.max(start))
    }
}
