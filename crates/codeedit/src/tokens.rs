//! Classified token spans produced by syntax highlighters.
//!
//! The kernel defines only the output shape; classification itself lives in
//! highlighter crates layered on top (see `codeedit-highlight-regex`). Hosts
//! map each [`StyleId`] to concrete presentation (color, font weight) however
//! they like.

/// Opaque handle naming a presentation style. `0` conventionally means
/// "unstyled"; highlighters document the ids they emit.
pub type StyleId = u32;

/// One classified run within a single line, in line-local character offsets.
///
/// Spans are half-open and never cross a line boundary; a highlighter reports
/// each line's tokens sorted by `start` and non-overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    /// Inclusive start column (characters from the line start).
    pub start: usize,
    /// Exclusive end column.
    pub end: usize,
    /// Style assigned to the run.
    pub style: StyleId,
}

impl TokenSpan {
    /// Create a token span.
    pub fn new(start: usize, end: usize, style: StyleId) -> Self {
        Self { start, end, style }
    }

    /// Length of the run in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the run is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_span_len() {
        let span = TokenSpan::new(4, 9, 2);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert!(TokenSpan::new(3, 3, 0).is_empty());
    }
}
