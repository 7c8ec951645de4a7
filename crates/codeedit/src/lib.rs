#![warn(missing_docs)]
//! Codeedit - Headless Source-Code Editing Engine
//!
//! # Overview
//!
//! `codeedit` is the kernel of a headless code editing engine: diagnostic overlays,
//! bracket-pair handling and structural multi-line editing over a host-provided text
//! buffer. It does no rendering and owns no cursors; the host keeps selection state
//! and feeds the engine character offsets, adopting the outcomes it returns.
//!
//! # Core Features
//!
//! - **Diagnostic Index**: arena of diagnostics + interval tree, O(log n + k)
//!   overlap/hover queries and per-line max-severity gutter aggregation
//! - **Bracket Engine**: auto-complete, type-over skip, auto-remove and match
//!   highlighting for a configurable delimiter-pair table
//! - **Structural Editor**: indent/unindent, duplicate, swap, delete-lines and
//!   comment toggling across arbitrary selections, one buffer mutation per command
//! - **Buffer Abstraction**: the [`TextBuffer`] capability trait with a rope-backed
//!   reference implementation, so the engine composes with any host storage
//!
//! # Architecture Layers
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Host (rendering, input dispatch, cursors)    │
//! ├───────────────────────────────────────────────┤
//! │  Structural Editor   │   Bracket Engine       │  ← command surface
//! ├───────────────────────────────────────────────┤
//! │  Diagnostic Index    │   highlighter crates   │  ← overlay producers
//! ├───────────────────────────────────────────────┤
//! │  TextBuffer trait (RopeBuffer built in)       │  ← document access
//! └───────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Diagnostic overlays
//!
//! ```rust
//! use codeedit::{DiagnosticIndex, RopeBuffer, Severity, Span, TextBuffer};
//!
//! let buffer = RopeBuffer::from_text("let x = unused;");
//! let mut diagnostics = DiagnosticIndex::new();
//! diagnostics
//!     .add(Severity::Warning, Span::new(8, 14), "unused value", None)
//!     .unwrap();
//!
//! // Hover lookup and gutter aggregation.
//! assert_eq!(diagnostics.query_point(10), vec![0]);
//! let gutter = diagnostics.per_line_severity(&buffer, 0..buffer.line_count());
//! assert_eq!(gutter.get(&0), Some(&Severity::Warning));
//! ```
//!
//! ## Structural editing
//!
//! ```rust
//! use codeedit::{CommentConfig, IndentUnit, RopeBuffer, Span, StructuralEditor, TextBuffer};
//!
//! let mut buffer = RopeBuffer::from_text("fn main() {}");
//! let editor = StructuralEditor::new(IndentUnit::Spaces(4), CommentConfig::line("//")).unwrap();
//!
//! let outcome = editor.toggle_line_comment(&mut buffer, Span::new(0, 0));
//! assert_eq!(buffer.text(), "// fn main() {}");
//! assert_eq!(outcome.selection, Span::new(3, 3));
//! ```
//!
//! # Module Description
//!
//! - [`document`] - the [`TextBuffer`] capability trait and [`RopeBuffer`]
//! - [`intervals`] - closed-interval tree with prefix-max pruning
//! - [`diagnostics`] - diagnostic arena, span index and gutter aggregation
//! - [`tokens`] - classified token spans shared with highlighter crates
//! - [`brackets`] - paired-delimiter interception and matching
//! - [`edits`] - selection-aware structural line transforms
//!
//! # Companion Crates
//!
//! - `codeedit-lang` provides the language configuration structs (comment markers,
//!   indent unit, bracket pairs) consumed and re-exported here
//! - `codeedit-highlight-regex` provides the incremental regex classifier that
//!   turns buffer changes into per-line [`tokens::TokenSpan`] sequences
//! - `codeedit-langdef` loads both from declarative YAML language definitions

pub mod brackets;
pub mod diagnostics;
pub mod document;
pub mod edits;
pub mod intervals;
pub mod tokens;

pub use brackets::{BracketEngine, BracketMatch, BracketOutcome};
pub use diagnostics::{Diagnostic, DiagnosticId, DiagnosticIndex, InvalidSpanError, Severity};
pub use document::{LineChange, RopeBuffer, Span, TextBuffer};
pub use edits::{EditOutcome, StructuralEdit, StructuralEditor, UnindentPolicy};
pub use intervals::{ClosedInterval, IntervalTree};
pub use tokens::{StyleId, TokenSpan};

pub use codeedit_lang::{
    BlockMarkers, BracketPair, CommentConfig, IndentUnit, LanguageConfig, default_pairs,
};
