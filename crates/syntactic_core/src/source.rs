//! Mapping byte offsets of a source text to lines and columns.

use crate::report::Position;

/// Cached line start offsets of a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMap<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
}

impl<'src> SourceMap<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            line_starts: Self::line_starts(source).collect(),
        }
    }

    // TODO: Needs to work correctly for \u2028, \u2029, and lone \r line endings
    pub fn line_starts(source: &str) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(0).chain(source.match_indices('\n').map(|(i, _)| i + 1))
    }

    /// The 0-based index of the line containing `byte_index`.
    pub fn line_index(&self, byte_index: usize) -> usize {
        match self.line_starts.binary_search(&byte_index) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        }
    }

    /// The 1-based line containing `byte_index`.
    pub fn line(&self, byte_index: usize) -> usize {
        self.line_index(byte_index) + 1
    }

    /// The position of `byte_index`, offsets past the end are clamped to the end of the source.
    pub fn position(&self, byte_index: usize) -> Position {
        let byte_index = byte_index.min(self.source.len());
        let line_index = self.line_index(byte_index);
        let line_start = self.line_starts[line_index];
        let column = self
            .source
            .get(line_start..byte_index)
            .map_or(byte_index - line_start, |text| text.chars().count());
        Position::new(line_index + 1, column)
    }
}
