//! Host text-buffer capability interface.
//!
//! The engine never owns document text. Every component reads (and, for the bracket
//! engine and structural editor, mutates) the document through the [`TextBuffer`]
//! trait, so the engine composes with any host buffer (a GUI widget's storage, a
//! piece table, a rope) without depending on a concrete type.
//!
//! All offsets are **character offsets** (not bytes), all line indexes are zero-based,
//! and line terminators are a single `\n`. Mutations report what happened as a
//! [`LineChange`], which the host forwards to line-keyed caches (the incremental
//! classifier) so they can invalidate precisely.
//!
//! [`RopeBuffer`] is the reference implementation backed by [`ropey::Rope`], used by
//! the tests and available to headless hosts.

use ropey::Rope;

/// A half-open `[start, end)` character-offset range in the document.
///
/// Spans name both annotated regions (diagnostics) and selections (structural
/// edits). `start == end` describes a zero-width span: a caret position or a
/// point marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Span {
    /// Create a span; validity (`start <= end`) is checked where it matters
    /// (diagnostic insertion validates, structural edits normalize).
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is zero-width.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Line-granularity description of one buffer mutation.
///
/// The edit replaced `removed` consecutive lines starting at `start_line` with
/// `added` lines. Both counts are at least 1: an edit that stays within one line
/// reports `{ line, 1, 1 }`. A deletion that joins two lines reports both as
/// removed and the joined result as one added line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineChange {
    /// First affected line index.
    pub start_line: usize,
    /// Number of lines the affected region spanned before the edit.
    pub removed: usize,
    /// Number of lines the region spans after the edit.
    pub added: usize,
}

impl LineChange {
    /// Net change in document line count.
    pub fn line_delta(&self) -> isize {
        self.added as isize - self.removed as isize
    }
}

/// Read/write access to a host-owned line-oriented document.
///
/// Out-of-range reads are total: index arguments are clamped or answered with
/// `None`, never panics. The single mutation primitive is [`replace`]; `insert`
/// and `remove` are provided shorthands.
///
/// [`replace`]: TextBuffer::replace
pub trait TextBuffer {
    /// Total number of lines. An empty document has one (empty) line.
    fn line_count(&self) -> usize;

    /// Total number of characters, terminators included.
    fn char_count(&self) -> usize;

    /// Text of the given line without its terminator, or `None` past the end.
    fn line_text(&self, line: usize) -> Option<String>;

    /// Character at the given offset, or `None` at/past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Line index containing the given offset (clamped to the last line).
    fn line_of_offset(&self, offset: usize) -> usize;

    /// Offset of the first character of the given line (clamped to document end).
    fn offset_of_line(&self, line: usize) -> usize;

    /// Copy of the text in `[start, end)`, bounds clamped.
    fn slice(&self, start: usize, end: usize) -> String;

    /// Replace `[start, end)` with `text` and report the affected line range.
    fn replace(&mut self, start: usize, end: usize, text: &str) -> LineChange;

    /// Insert `text` at `offset`.
    fn insert(&mut self, offset: usize, text: &str) -> LineChange {
        self.replace(offset, offset, text)
    }

    /// Remove `[start, end)`.
    fn remove(&mut self, start: usize, end: usize) -> LineChange {
        self.replace(start, end, "")
    }

    /// Offset just past the last character of the given line, terminator excluded.
    fn end_of_line(&self, line: usize) -> usize {
        if line + 1 < self.line_count() {
            // The terminator is exactly one character wide.
            self.offset_of_line(line + 1).saturating_sub(1)
        } else {
            self.char_count()
        }
    }

    /// Copy of the whole document.
    fn text(&self) -> String {
        self.slice(0, self.char_count())
    }
}

/// Reference [`TextBuffer`] backed by a rope.
///
/// Rope storage keeps line lookup and mid-document edits at O(log N), which is
/// what the structural editor leans on for large documents.
#[derive(Debug, Clone, Default)]
pub struct RopeBuffer {
    rope: Rope,
}

impl RopeBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }
}

impl TextBuffer for RopeBuffer {
    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.rope.len_lines() {
            return None;
        }

        let mut text = self.rope.line(line).to_string();

        // Rope's line() includes the terminator; strip it (and a CR, for
        // documents read from CRLF sources).
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }

        Some(text)
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }

    fn line_of_offset(&self, offset: usize) -> usize {
        let offset = offset.min(self.rope.len_chars());
        self.rope.char_to_line(offset)
    }

    fn offset_of_line(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);
        self.rope.slice(start..end).to_string()
    }

    fn replace(&mut self, start: usize, end: usize, text: &str) -> LineChange {
        let end = end.min(self.rope.len_chars());
        let start = start.min(end);

        let start_line = self.rope.char_to_line(start);
        // The line containing `end` counts as affected even when `end` sits at
        // its first column: the edit moves that line's content.
        let removed = self.rope.char_to_line(end) - start_line + 1;
        let added = text.matches('\n').count() + 1;

        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }

        LineChange {
            start_line,
            removed,
            added,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer() {
        let buf = RopeBuffer::new();
        assert_eq!(buf.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(buf.char_count(), 0);
        assert_eq!(buf.line_text(0), Some(String::new()));
        assert_eq!(buf.line_text(1), None);
        assert_eq!(buf.char_at(0), None);
    }

    #[test]
    fn test_line_reads() {
        let buf = RopeBuffer::from_text("alpha\nbeta\ngamma");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_text(0), Some("alpha".to_string()));
        assert_eq!(buf.line_text(2), Some("gamma".to_string()));
        assert_eq!(buf.line_text(3), None);
        assert_eq!(buf.char_at(6), Some('b'));
    }

    #[test]
    fn test_offset_line_conversions() {
        let buf = RopeBuffer::from_text("ab\ncd\nef");
        assert_eq!(buf.offset_of_line(0), 0);
        assert_eq!(buf.offset_of_line(1), 3);
        assert_eq!(buf.offset_of_line(2), 6);
        assert_eq!(buf.offset_of_line(9), 8); // past the end clamps

        assert_eq!(buf.line_of_offset(0), 0);
        assert_eq!(buf.line_of_offset(2), 0); // the terminator belongs to line 0
        assert_eq!(buf.line_of_offset(3), 1);
        assert_eq!(buf.line_of_offset(100), 2);

        assert_eq!(buf.end_of_line(0), 2);
        assert_eq!(buf.end_of_line(2), 8);
    }

    #[test]
    fn test_replace_within_one_line() {
        let mut buf = RopeBuffer::from_text("hello world");
        let change = buf.replace(0, 5, "goodbye");
        assert_eq!(buf.text(), "goodbye world");
        assert_eq!(
            change,
            LineChange {
                start_line: 0,
                removed: 1,
                added: 1,
            }
        );
        assert_eq!(change.line_delta(), 0);
    }

    #[test]
    fn test_insert_adds_lines() {
        let mut buf = RopeBuffer::from_text("ab\ncd");
        let change = buf.insert(3, "x\ny\n");
        assert_eq!(buf.text(), "ab\nx\ny\ncd");
        assert_eq!(
            change,
            LineChange {
                start_line: 1,
                removed: 1,
                added: 3,
            }
        );
        assert_eq!(change.line_delta(), 2);
    }

    #[test]
    fn test_remove_joins_lines() {
        let mut buf = RopeBuffer::from_text("ab\ncd\nef");
        // Remove line 1 including its terminator: lines 1 and 2 are affected.
        let change = buf.remove(3, 6);
        assert_eq!(buf.text(), "ab\nef");
        assert_eq!(
            change,
            LineChange {
                start_line: 1,
                removed: 2,
                added: 1,
            }
        );
    }

    #[test]
    fn test_slice_clamps() {
        let buf = RopeBuffer::from_text("abc");
        assert_eq!(buf.slice(1, 999), "bc");
        assert_eq!(buf.slice(5, 9), "");
    }

    #[test]
    fn test_cjk_offsets_are_char_based() {
        let buf = RopeBuffer::from_text("你好\n世界");
        assert_eq!(buf.char_count(), 5);
        assert_eq!(buf.offset_of_line(1), 3);
        assert_eq!(buf.char_at(3), Some('世'));

        let mut buf = buf;
        buf.replace(3, 5, "ok");
        assert_eq!(buf.text(), "你好\nok");
    }
}
