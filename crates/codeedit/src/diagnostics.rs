//! Diagnostic records and the queryable span index.
//!
//! Diagnostics (lint findings, compile errors, spell hints, …) are immutable
//! records over half-open character spans. The index owns them in an append-only
//! arena and mirrors each span as a closed interval in an [`IntervalTree`], so
//! hover lookups, overlap queries and per-line gutter aggregation stay
//! O(log n + k) as the set grows.
//!
//! The set is batch-owned: hosts update diagnostics by [`clear`]ing and re-adding
//! the full set (typically on every analysis pass), never by editing in place.
//!
//! [`clear`]: DiagnosticIndex::clear

use std::collections::BTreeMap;
use std::ops::Range;

use crate::document::{Span, TextBuffer};
use crate::intervals::{ClosedInterval, IntervalTree};

/// Importance of a diagnostic.
///
/// Later variants are more severe. The ordering is load-bearing: per-line gutter
/// aggregation takes the maximum severity among diagnostics touching a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Editorial hint.
    Hint,
    /// Informational note.
    Information,
    /// Warning.
    Warning,
    /// Error.
    Error,
}

/// Identifier of a diagnostic: its insertion index, stable until [`clear`].
///
/// [`clear`]: DiagnosticIndex::clear
pub type DiagnosticId = usize;

/// One diagnostic record. Immutable once inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Importance level.
    pub severity: Severity,
    /// Annotated character range.
    pub span: Span,
    /// Human-readable description.
    pub message: String,
    /// Tool-specific code (e.g. `E0308`, `unused-variable`).
    pub code: Option<String>,
}

/// Rejected diagnostic span: `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSpanError {
    /// Offending start offset.
    pub start: usize,
    /// Offending end offset.
    pub end: usize,
}

impl std::fmt::Display for InvalidSpanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid diagnostic span: start {} is greater than end {}",
            self.start, self.end
        )
    }
}

impl std::error::Error for InvalidSpanError {}

/// Arena of diagnostics plus the interval tree indexing their spans.
#[derive(Debug, Default)]
pub struct DiagnosticIndex {
    diagnostics: Vec<Diagnostic>,
    tree: IntervalTree,
}

impl DiagnosticIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
            tree: IntervalTree::new(),
        }
    }

    /// Insert a diagnostic, returning its id.
    ///
    /// Fails with [`InvalidSpanError`] when `span.start > span.end`; the index
    /// is left unchanged in that case.
    pub fn add(
        &mut self,
        severity: Severity,
        span: Span,
        message: impl Into<String>,
        code: Option<String>,
    ) -> Result<DiagnosticId, InvalidSpanError> {
        if span.start > span.end {
            return Err(InvalidSpanError {
                start: span.start,
                end: span.end,
            });
        }

        let id = self.diagnostics.len();
        self.tree.insert(closed_from_span(span, id));
        self.diagnostics.push(Diagnostic {
            severity,
            span,
            message: message.into(),
            code,
        });
        Ok(id)
    }

    /// Drop every diagnostic and its index entry.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
        self.tree.clear();
    }

    /// Number of stored diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Look up a diagnostic by id.
    pub fn get(&self, id: DiagnosticId) -> Option<&Diagnostic> {
        self.diagnostics.get(id)
    }

    /// All diagnostics in insertion order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Ids of diagnostics overlapping `span` under closed-closed semantics:
    /// sharing a single boundary offset counts. Results are in ascending id
    /// order.
    pub fn query_overlap(&self, span: Span) -> Vec<DiagnosticId> {
        let query = closed_from_span(span, 0);
        let mut ids: Vec<DiagnosticId> = self
            .tree
            .query_overlap(query.low, query.high)
            .iter()
            .map(|i| i.index)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of diagnostics overlapping `span` under exclusive-border semantics:
    /// a diagnostic merely touching `span.start` or `span.end` is not
    /// reported. Use this when the query abuts a boundary that must not
    /// double-highlight. Results are in ascending id order.
    pub fn query_overlap_exclusive(&self, span: Span) -> Vec<DiagnosticId> {
        let mut ids: Vec<DiagnosticId> = self
            .tree
            .query_overlap_exclusive(span.start, span.end)
            .iter()
            .map(|i| i.index)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Ids of diagnostics covering `offset` (closed borders), the hover
    /// query. Results are in ascending id order.
    pub fn query_point(&self, offset: usize) -> Vec<DiagnosticId> {
        let mut ids: Vec<DiagnosticId> = self
            .tree
            .query_point(offset)
            .iter()
            .map(|i| i.index)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Maximum severity per line for the gutter, restricted to `lines`.
    ///
    /// Only lines touched by at least one diagnostic appear in the map; ties
    /// resolve to the more severe value regardless of insertion order.
    pub fn per_line_severity(
        &self,
        buffer: &impl TextBuffer,
        lines: Range<usize>,
    ) -> BTreeMap<usize, Severity> {
        let mut map = BTreeMap::new();
        if lines.is_empty() {
            return map;
        }

        let region_start = buffer.offset_of_line(lines.start);
        let region_end = if lines.end >= buffer.line_count() {
            buffer.char_count()
        } else {
            buffer.offset_of_line(lines.end)
        };
        if region_start > region_end {
            return map;
        }

        // Closed query over the region, degenerate at the document tail so
        // zero-width markers at the very end still report.
        let query_high = region_end.max(region_start.saturating_add(1)) - 1;
        for interval in self.tree.query_overlap(region_start, query_high) {
            let Some(diagnostic) = self.diagnostics.get(interval.index) else {
                continue;
            };

            let first = buffer.line_of_offset(interval.low).max(lines.start);
            let last = buffer.line_of_offset(interval.high).min(lines.end - 1);
            for line in first..=last {
                map.entry(line)
                    .and_modify(|current: &mut Severity| {
                        *current = (*current).max(diagnostic.severity);
                    })
                    .or_insert(diagnostic.severity);
            }
        }

        map
    }
}

/// Derive the closed tree interval for a half-open span: `[start, end - 1]`
/// for widths of at least one, the degenerate point `[start, start]` for
/// zero-width markers.
fn closed_from_span(span: Span, index: usize) -> ClosedInterval {
    let high = if span.end > span.start {
        span.end - 1
    } else {
        span.start
    };
    ClosedInterval::new(span.start, high, index)
}
