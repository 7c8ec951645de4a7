#![warn(missing_docs)]
//! `codeedit-lang` - data-driven language configuration for the `codeedit` engine.
//!
//! This crate intentionally stays lightweight and does **not** depend on the engine
//! kernel or any regex/lexing machinery. It provides the small structs hosts use to
//! describe a language's editing behavior: comment markers, the indent unit, and the
//! bracket-pair table.
//!
//! All types derive `serde::Serialize`/`Deserialize` behind the optional `serde`
//! feature for hosts that persist editor configuration.

/// Comment marker configuration for a language.
///
/// The engine kernel uses this to implement line- and block-comment toggling in a
/// UI-agnostic way. Either marker kind may be absent; the corresponding toggle
/// degrades to a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentConfig {
    /// Line comment marker (e.g. `//`, `#`).
    pub line: Option<String>,
    /// Block comment marker pair (e.g. `/*` and `*/`).
    pub block: Option<BlockMarkers>,
}

/// A block comment start/end marker pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockMarkers {
    /// Region opener (e.g. `/*`).
    pub start: String,
    /// Region closer (e.g. `*/`).
    pub end: String,
}

impl CommentConfig {
    /// Create a config that supports only line comments.
    pub fn line(marker: impl Into<String>) -> Self {
        Self {
            line: Some(marker.into()),
            block: None,
        }
    }

    /// Create a config that supports only block comments.
    pub fn block(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            line: None,
            block: Some(BlockMarkers {
                start: start.into(),
                end: end.into(),
            }),
        }
    }

    /// Create a config that supports both line and block comments.
    pub fn line_and_block(
        line: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            line: Some(line.into()),
            block: Some(BlockMarkers {
                start: block_start.into(),
                end: block_end.into(),
            }),
        }
    }

    /// Returns `true` if a non-empty line comment marker is configured.
    pub fn has_line(&self) -> bool {
        self.line.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if both block comment markers are configured and non-empty.
    pub fn has_block(&self) -> bool {
        self.block
            .as_ref()
            .is_some_and(|b| !b.start.is_empty() && !b.end.is_empty())
    }
}

/// The unit of indentation prepended/removed by indent and unindent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndentUnit {
    /// A literal tab character.
    Tab,
    /// The given number of spaces.
    Spaces(usize),
}

impl IndentUnit {
    /// The literal text of one indent unit.
    pub fn text(&self) -> String {
        match self {
            Self::Tab => "\t".to_string(),
            Self::Spaces(width) => " ".repeat(*width),
        }
    }

    /// The unit's width in characters.
    pub fn width(&self) -> usize {
        match self {
            Self::Tab => 1,
            Self::Spaces(width) => *width,
        }
    }
}

impl Default for IndentUnit {
    fn default() -> Self {
        Self::Spaces(4)
    }
}

/// A paired-delimiter configuration entry.
///
/// Pairs are consulted by the bracket engine in table order; the first applicable
/// pair wins. All behavior flags default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BracketPair {
    /// Opening delimiter.
    pub left: char,
    /// Closing delimiter. Equal to `left` for symmetric pairs such as quotes.
    pub right: char,
    /// Typing `left` inserts the whole pair with the cursor between.
    pub auto_complete: bool,
    /// Backspace between an empty pair removes both delimiters.
    pub auto_remove: bool,
    /// Typing `right` before an existing `right` skips over it, and Tab placed
    /// just before `right` jumps past it.
    pub tab_jump_out: bool,
}

impl BracketPair {
    /// Create a pair with all behavior flags enabled.
    pub fn new(left: char, right: char) -> Self {
        Self {
            left,
            right,
            auto_complete: true,
            auto_remove: true,
            tab_jump_out: true,
        }
    }

    /// Set whether typing the left delimiter inserts the whole pair.
    pub fn with_auto_complete(mut self, enabled: bool) -> Self {
        self.auto_complete = enabled;
        self
    }

    /// Set whether backspace inside an empty pair removes both delimiters.
    pub fn with_auto_remove(mut self, enabled: bool) -> Self {
        self.auto_remove = enabled;
        self
    }

    /// Set whether type-over skip and Tab jump-out apply to the right delimiter.
    pub fn with_tab_jump_out(mut self, enabled: bool) -> Self {
        self.tab_jump_out = enabled;
        self
    }
}

/// The standard pair table: `()`, `{}`, `[]`, `""`, `''`, all flags enabled.
pub fn default_pairs() -> Vec<BracketPair> {
    vec![
        BracketPair::new('(', ')'),
        BracketPair::new('{', '}'),
        BracketPair::new('[', ']'),
        BracketPair::new('"', '"'),
        BracketPair::new('\'', '\''),
    ]
}

/// Aggregate per-language editing configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageConfig {
    /// Human-readable language name (e.g. `"Python"`).
    pub name: String,
    /// Comment markers.
    pub comments: CommentConfig,
    /// Indent unit.
    pub indent: IndentUnit,
    /// Bracket-pair table, in priority order.
    pub pairs: Vec<BracketPair>,
}

impl LanguageConfig {
    /// Create a config with the given name, default indent (four spaces),
    /// the standard pair table, and no comment markers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comments: CommentConfig::default(),
            indent: IndentUnit::default(),
            pairs: default_pairs(),
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::new("Plain Text")
    }
}
