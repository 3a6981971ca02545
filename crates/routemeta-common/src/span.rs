use std::ops::Range;

use serde::Serialize;

/// Byte-offset span into source text. Start is inclusive, end is exclusive.
///
/// Every position handed between the lexer, parser and diagnostics is a byte
/// offset into the original source string. Line/column pairs are computed on
/// demand through [`LineIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The span as a `usize` range, the form ariadne labels and string
    /// slicing expect.
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Start offsets of every line in a source file.
///
/// Built once per file; converts byte offsets into 1-based (line, column)
/// pairs with a binary search.
#[derive(Debug)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        Self { line_starts }
    }

    /// 1-based (line, column) of a byte offset. Columns count bytes.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line = line_idx as u32 + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_len_and_empty() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(Span::new(3, 3).is_empty());
    }

    #[test]
    fn span_cover_takes_outer_bounds() {
        let covered = Span::new(5, 10).cover(Span::new(8, 15));
        assert_eq!(covered, Span::new(5, 15));
        assert_eq!(covered.to_range(), 5..15);
    }

    #[test]
    fn line_index_across_lines() {
        let idx = LineIndex::new("const a = 1;\nexport default a;\n");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(12), (1, 13));
        assert_eq!(idx.line_col(13), (2, 1));
        assert_eq!(idx.line_col(28), (2, 16));
        assert_eq!(idx.line_count(), 3);
    }

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("route");
        assert_eq!(idx.line_col(4), (1, 5));
        assert_eq!(idx.line_count(), 1);
    }
}
