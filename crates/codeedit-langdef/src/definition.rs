use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
/// Raw YAML language definition, prior to compilation.
///
/// The field layout mirrors the on-disk format:
///
/// ```yaml
/// name: C
/// line_comment: "//"
/// block_comment: ["/*", "*/"]
/// indent: { unit: spaces, width: 4 }
/// brackets:
///   - { left: "(", right: ")" }
/// rules:
///   - { pattern: '\b(?:if|else|return)\b', style: keyword }
/// block_rules:
///   - { start: '/\*', end: '\*/', style: comment }
/// ```
pub struct LanguageDefinition {
    #[serde(default)]
    /// Human-readable language name. Required; checked during compilation.
    pub name: String,

    #[serde(default)]
    /// Line comment marker (e.g. `//`).
    pub line_comment: Option<String>,

    #[serde(default)]
    /// Block comment start/end markers, as a two-element sequence.
    pub block_comment: Option<(String, String)>,

    #[serde(default)]
    /// Indent settings; four spaces when absent.
    pub indent: Option<RawIndent>,

    #[serde(default)]
    /// Bracket-pair table; the standard five pairs when absent.
    pub brackets: Option<Vec<RawBracket>>,

    #[serde(default)]
    /// Ordered single-line classification rules.
    pub rules: Vec<RawRule>,

    #[serde(default)]
    /// Multi-line block rules (block comments, triple-quoted strings).
    pub block_rules: Vec<RawBlockRule>,
}

#[derive(Debug, Clone, Deserialize)]
/// The `indent:` mapping of a definition.
pub struct RawIndent {
    /// `tab` or `spaces`.
    pub unit: RawIndentUnit,

    #[serde(default = "default_indent_width")]
    /// Spaces per level (defaults to 4). Ignored for `tab`.
    pub width: usize,
}

fn default_indent_width() -> usize {
    4
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
/// The `unit:` value in an `indent:` mapping.
pub enum RawIndentUnit {
    /// One literal tab character per level.
    Tab,
    /// `width` spaces per level.
    Spaces,
}

#[derive(Debug, Clone, Deserialize)]
/// A single entry in the `brackets:` list.
pub struct RawBracket {
    /// Opening delimiter (exactly one character).
    pub left: String,

    /// Closing delimiter (exactly one character).
    pub right: String,

    #[serde(default = "default_true")]
    /// Typing `left` inserts the whole pair (defaults to `true`).
    pub auto_complete: bool,

    #[serde(default = "default_true")]
    /// Backspace inside an empty pair removes both delimiters (defaults to `true`).
    pub auto_remove: bool,

    #[serde(default = "default_true")]
    /// Type-over skip and Tab jump-out for the closing delimiter (defaults to `true`).
    pub tab_jump_out: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
/// A single entry in the `rules:` list.
pub struct RawRule {
    /// Regex applied independently to each line.
    pub pattern: String,

    /// Style name from the fixed table (`keyword`, `string`, ...).
    pub style: String,

    #[serde(default)]
    /// Optional capture group to style instead of the whole match.
    pub group: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
/// A single entry in the `block_rules:` list.
pub struct RawBlockRule {
    /// Regex that opens the region.
    pub start: String,

    /// Regex that closes the region, searched after the start match.
    pub end: String,

    /// Style name applied across the whole region.
    pub style: String,
}
