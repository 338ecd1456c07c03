use serde::{Deserialize, Serialize};

/// Position of a source construct; lines and columns are 1-based.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub end_line: Option<u32>,
    pub end_column: Option<u32>,
    pub start_byte: usize,
    pub end_byte: usize,
}

impl SourceLocation {
    pub fn new(file: String, line: u32, column: u32, start_byte: usize, end_byte: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: None,
            end_column: None,
            start_byte,
            end_byte,
        }
    }

    /// Resolves a byte range of `source` into line/column positions.
    pub fn from_byte_range(file: impl Into<String>, source: &str, start: usize, end: usize) -> Self {
        let (line, column) = line_column(source, start);
        let (end_line, end_column) = line_column(source, end);

        Self {
            file: file.into(),
            line,
            column,
            end_line: Some(end_line),
            end_column: Some(end_column),
            start_byte: start,
            end_byte: end,
        }
    }

    /// Source text covered by this location, if the byte range is valid for `source`.
    pub fn extract_snippet<'a>(&self, source: &'a str) -> Option<&'a str> {
        if self.start_byte < self.end_byte {
            source.get(self.start_byte..self.end_byte)
        } else {
            None
        }
    }
}

fn line_column(source: &str, offset: usize) -> (u32, u32) {
    let before = &source.as_bytes()[..offset.min(source.len())];
    let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |p| p + 1);
    (line, (before.len() - line_start) as u32 + 1)
}
