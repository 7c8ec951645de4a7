//! `codeedit-highlight-regex` - Incremental regex-based syntax classification for `codeedit`.
//!
//! Ordered single-line rules plus multi-line block rules (comments, triple-quoted
//! strings) are applied per line; the block state carried across line boundaries is
//! cached per line, so after an edit only the lines whose *incoming* state actually
//! changed are re-lexed. Re-classification cost is O(lines affected), not O(document).
//!
//! Not a parser: for real language analysis, feed diagnostics from an external tool
//! into the kernel's `DiagnosticIndex` instead.

use codeedit::document::{LineChange, TextBuffer};
use regex::Regex;

pub use codeedit::tokens::{StyleId, TokenSpan};

/// Carried classifier state at a line boundary: the active block rule's index
/// in the table, or `None` outside any block region.
pub type BlockState = Option<usize>;

/// A single-line classification rule, applied independently to each line.
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    style: StyleId,
    capture_group: Option<usize>,
}

impl Rule {
    pub fn new(pattern: &str, style: StyleId) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            style,
            capture_group: None,
        })
    }

    /// Style only a capture group of each match.
    ///
    /// Example (function name):
    /// - pattern: `\b([A-Za-z_][A-Za-z0-9_]*)\s*\(`
    /// - capture_group: `1` (the identifier)
    pub fn with_capture_group(mut self, group: usize) -> Self {
        self.capture_group = Some(group);
        self
    }

    pub fn style(&self) -> StyleId {
        self.style
    }
}

/// A rule for a region that may span multiple lines (block comments,
/// triple-quoted strings). The end pattern is searched starting *after* the
/// start match, so a rule whose two patterns are identical does not close on
/// its own opener.
#[derive(Debug, Clone)]
pub struct BlockRule {
    start: Regex,
    end: Regex,
    style: StyleId,
}

impl BlockRule {
    pub fn new(start: &str, end: &str, style: StyleId) -> Result<Self, regex::Error> {
        Ok(Self {
            start: Regex::new(start)?,
            end: Regex::new(end)?,
            style,
        })
    }

    pub fn style(&self) -> StyleId {
        self.style
    }
}

/// An ordered rule table: single-line rules plus block rules.
///
/// Single-line rules paint in declaration order, so a later rule takes
/// priority where matches overlap; block regions paint over everything in
/// their extent. When several block rules could start at the same position,
/// the earliest-declared one wins.
#[derive(Debug, Clone, Default)]
pub struct HighlightRules {
    rules: Vec<Rule>,
    block_rules: Vec<BlockRule>,
}

impl HighlightRules {
    pub fn new(rules: Vec<Rule>, block_rules: Vec<BlockRule>) -> Self {
        Self { rules, block_rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn block_rules(&self) -> &[BlockRule] {
        &self.block_rules
    }

    /// A lexical grammar for C-family languages (C, C++, Java-ish surface).
    pub fn c_family() -> Result<Self, regex::Error> {
        Ok(Self::new(
            vec![
                Rule::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(", STYLE_FUNCTION)?
                    .with_capture_group(1),
                Rule::new(
                    r"\b(?:if|else|for|while|do|switch|case|default|break|continue|return|goto|typedef|struct|union|enum|const|static|extern|inline|sizeof|new|delete|class|public|private|protected|virtual|override|template|typename|namespace|using|try|catch|throw)\b",
                    STYLE_KEYWORD,
                )?,
                Rule::new(
                    r"\b(?:void|bool|char|short|int|long|float|double|signed|unsigned|auto|size_t|ssize_t|wchar_t|int8_t|int16_t|int32_t|int64_t|uint8_t|uint16_t|uint32_t|uint64_t)\b",
                    STYLE_TYPE,
                )?,
                Rule::new(
                    r"\b(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)[uUlLfF]*\b",
                    STYLE_NUMBER,
                )?,
                Rule::new(r#""(?:\\.|[^"\\])*""#, STYLE_STRING)?,
                Rule::new(r"'(?:\\.|[^'\\])'", STYLE_STRING)?,
                Rule::new(r"^\s*#\s*\w+.*", STYLE_PREPROCESSOR)?,
                Rule::new(r"//.*", STYLE_COMMENT)?,
            ],
            vec![BlockRule::new(r"/\*", r"\*/", STYLE_COMMENT)?],
        ))
    }

    /// A lexical grammar for Python.
    pub fn python() -> Result<Self, regex::Error> {
        Ok(Self::new(
            vec![
                Rule::new(r"\b([A-Za-z_][A-Za-z0-9_]*)\s*\(", STYLE_FUNCTION)?
                    .with_capture_group(1),
                Rule::new(
                    r"\b(?:def|class|return|if|elif|else|for|while|break|continue|pass|import|from|as|with|try|except|finally|raise|lambda|global|nonlocal|yield|assert|del|in|is|not|and|or|None|True|False)\b",
                    STYLE_KEYWORD,
                )?,
                Rule::new(
                    r"\b(?:print|len|range|str|int|float|bool|list|dict|set|tuple|type|isinstance|super|open|enumerate|zip|map|filter|sorted|repr|hash|abs|min|max|sum)\b",
                    STYLE_TYPE,
                )?,
                Rule::new(
                    r"\b(?:0[xXoObB][0-9a-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?[jJ]?)\b",
                    STYLE_NUMBER,
                )?,
                Rule::new(r#""(?:\\.|[^"\\])*""#, STYLE_STRING)?,
                Rule::new(r"'(?:\\.|[^'\\])*'", STYLE_STRING)?,
                Rule::new(r"@[A-Za-z_][A-Za-z0-9_.]*", STYLE_DECORATOR)?,
                Rule::new(r"#.*", STYLE_COMMENT)?,
            ],
            vec![
                BlockRule::new("'''", "'''", STYLE_STRING)?,
                BlockRule::new(r#"""""#, r#"""""#, STYLE_STRING)?,
            ],
        ))
    }
}

/// Default `StyleId` constants for the built-in grammars.
///
/// These are only identifiers. The UI/theme layer is expected to map them to
/// actual colors.
pub const STYLE_KEYWORD: StyleId = 1;
/// Primitive type names (C family) or builtins (Python).
pub const STYLE_TYPE: StyleId = 2;
/// String and character literals.
pub const STYLE_STRING: StyleId = 3;
/// Numeric literals.
pub const STYLE_NUMBER: StyleId = 4;
/// Line and block comments.
pub const STYLE_COMMENT: StyleId = 5;
/// Function names at call/definition sites.
pub const STYLE_FUNCTION: StyleId = 6;
/// Preprocessor directives.
pub const STYLE_PREPROCESSOR: StyleId = 7;
/// Python decorators.
pub const STYLE_DECORATOR: StyleId = 8;

#[derive(Debug, Clone)]
struct CachedLine {
    start_state: BlockState,
    tokens: Vec<TokenSpan>,
    end_state: BlockState,
}

/// Per-line classification with carried block state and minimal re-lexing.
///
/// The host is expected to forward every buffer mutation via
/// [`apply_change`]; token access is lazy, so lines are first lexed when a
/// renderer asks for them. Cached entries always form a contiguous prefix of
/// the document followed by never-lexed lines.
///
/// [`apply_change`]: IncrementalHighlighter::apply_change
#[derive(Debug, Clone)]
pub struct IncrementalHighlighter {
    rules: HighlightRules,
    cache: Vec<Option<CachedLine>>,
    lines_lexed: usize,
}

impl IncrementalHighlighter {
    pub fn new(rules: HighlightRules) -> Self {
        Self {
            rules,
            cache: Vec::new(),
            lines_lexed: 0,
        }
    }

    pub fn rules(&self) -> &HighlightRules {
        &self.rules
    }

    /// Cumulative count of per-line lex passes, for observing that edits
    /// re-classify only the affected lines.
    pub fn lines_lexed(&self) -> usize {
        self.lines_lexed
    }

    /// Drop the whole cache, e.g. after a document reload.
    pub fn reset(&mut self) {
        self.cache.clear();
    }

    /// Tokens of the given line, classifying it (and any unlexed predecessors
    /// the state chain needs) on first access. Out-of-range lines yield no
    /// tokens.
    pub fn line_tokens(&mut self, buffer: &impl TextBuffer, line: usize) -> &[TokenSpan] {
        if line >= buffer.line_count() {
            return &[];
        }
        self.cache.resize(buffer.line_count(), None);
        self.ensure_line(buffer, line);
        self.cache[line]
            .as_ref()
            .map(|entry| entry.tokens.as_slice())
            .unwrap_or(&[])
    }

    /// Block state in effect at the end of the given line.
    pub fn end_state(&mut self, buffer: &impl TextBuffer, line: usize) -> BlockState {
        if line >= buffer.line_count() {
            return None;
        }
        self.cache.resize(buffer.line_count(), None);
        self.ensure_line(buffer, line);
        self.cache[line].as_ref().and_then(|entry| entry.end_state)
    }

    /// Splice the cache for a buffer mutation and re-lex forward from it.
    ///
    /// Changed lines are re-lexed immediately; the cascade then continues only
    /// while the carried end state disagrees with the next line's cached
    /// incoming state. The first still-valid line stops it without being
    /// re-lexed, and so does the first never-lexed line; lines nobody asked
    /// for yet stay unlexed until [`line_tokens`] wants them.
    ///
    /// [`line_tokens`]: IncrementalHighlighter::line_tokens
    pub fn apply_change(&mut self, buffer: &impl TextBuffer, change: LineChange) {
        let line_count = buffer.line_count();
        let before = line_count.saturating_sub(change.added) + change.removed;
        self.cache.resize(before, None);

        let start = change.start_line.min(self.cache.len());
        let end = (change.start_line + change.removed).min(self.cache.len());
        self.cache.splice(start..end, vec![None; change.added]);
        debug_assert_eq!(self.cache.len(), line_count);

        // An edit beyond the lexed prefix has nothing to repair eagerly; the
        // lazy path recomputes from the nearest cached predecessor on demand.
        if start > 0 && self.cache[start - 1].is_none() {
            return;
        }

        let mut state = if start == 0 {
            None
        } else {
            self.cache[start - 1].as_ref().and_then(|entry| entry.end_state)
        };

        let total = self.cache.len().min(line_count);
        let mut line = start;
        let changed_end = (start + change.added).min(total);
        while line < changed_end {
            state = self.lex_line(buffer, line, state);
            line += 1;
        }
        while line < total {
            match self.cache[line].as_ref() {
                None => break,
                Some(entry) if entry.start_state == state => break,
                _ => {}
            }
            state = self.lex_line(buffer, line, state);
            line += 1;
        }
    }

    /// Fill the cache up to `line`, resuming from the nearest lexed
    /// predecessor.
    fn ensure_line(&mut self, buffer: &impl TextBuffer, line: usize) {
        if self.cache[line].is_some() {
            return;
        }
        let mut anchor = line;
        while anchor > 0 && self.cache[anchor - 1].is_none() {
            anchor -= 1;
        }
        let mut state = if anchor == 0 {
            None
        } else {
            self.cache[anchor - 1].as_ref().and_then(|entry| entry.end_state)
        };
        for current in anchor..=line {
            state = self.lex_line(buffer, current, state);
        }
    }

    fn lex_line(&mut self, buffer: &impl TextBuffer, line: usize, incoming: BlockState) -> BlockState {
        let text = buffer.line_text(line).unwrap_or_default();
        let (tokens, end_state) = classify_line(&self.rules, &text, incoming);
        self.lines_lexed += 1;
        self.cache[line] = Some(CachedLine {
            start_state: incoming,
            tokens,
            end_state,
        });
        end_state
    }
}

/// Classify one line: paint single-line rule matches in declaration order,
/// overlay block regions found by the left-to-right state walk, then coalesce
/// equal-styled character runs into tokens.
fn classify_line(rules: &HighlightRules, text: &str, incoming: BlockState) -> (Vec<TokenSpan>, BlockState) {
    let mut paint: Vec<StyleId> = vec![0; text.len()];

    for rule in rules.rules() {
        if let Some(group) = rule.capture_group {
            for caps in rule.regex.captures_iter(text) {
                let Some(found) = caps.get(group) else {
                    continue;
                };
                paint[found.range()].fill(rule.style);
            }
        } else {
            for found in rule.regex.find_iter(text) {
                paint[found.range()].fill(rule.style);
            }
        }
    }

    let (regions, end_state) = block_regions(rules.block_rules(), text, incoming);
    for (start, end, style) in regions {
        paint[start..end].fill(style);
    }

    let styles: Vec<StyleId> = text.char_indices().map(|(byte, _)| paint[byte]).collect();
    let mut tokens = Vec::new();
    let mut col = 0;
    while col < styles.len() {
        let style = styles[col];
        let start = col;
        while col < styles.len() && styles[col] == style {
            col += 1;
        }
        if style != 0 {
            tokens.push(TokenSpan::new(start, col, style));
        }
    }

    (tokens, end_state)
}

/// Walk the line left to right, opening at the leftmost start match (earliest
/// declared rule on ties) and closing at the active rule's end pattern, which
/// is searched only after the opener. Returns styled byte regions plus the
/// carried-out state.
fn block_regions(
    blocks: &[BlockRule],
    text: &str,
    incoming: BlockState,
) -> (Vec<(usize, usize, StyleId)>, BlockState) {
    let mut regions = Vec::new();
    let mut state = incoming;
    let mut region_start = 0;
    let mut pos = 0;

    loop {
        if let Some(id) = state {
            let block = &blocks[id];
            let Some(found) = block.end.find_at(text, pos) else {
                regions.push((region_start, text.len(), block.style));
                break;
            };
            regions.push((region_start, found.end(), block.style));
            state = None;
            // A zero-width end match must not stall the scan.
            pos = if found.end() > pos {
                found.end()
            } else {
                match next_char(text, pos) {
                    Some(next) => next,
                    None => break,
                }
            };
        } else {
            let mut best: Option<(usize, usize, usize)> = None;
            for (index, block) in blocks.iter().enumerate() {
                let Some(found) = block.start.find_at(text, pos) else {
                    continue;
                };
                if best.is_none_or(|(start, _, _)| found.start() < start) {
                    best = Some((found.start(), found.end(), index));
                }
            }
            let Some((start, after, index)) = best else {
                break;
            };
            region_start = start;
            state = Some(index);
            // A zero-width start match must not stall the scan either.
            pos = if after > start {
                after
            } else {
                match next_char(text, start) {
                    Some(next) => next,
                    None => break,
                }
            };
        }
    }

    (regions, state)
}

fn next_char(text: &str, pos: usize) -> Option<usize> {
    text[pos..].chars().next().map(|ch| pos + ch.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use codeedit::document::RopeBuffer;

    fn tokens_of(rules: &HighlightRules, text: &str, incoming: BlockState) -> Vec<TokenSpan> {
        classify_line(rules, text, incoming).0
    }

    #[test]
    fn test_later_rule_wins_on_overlap() {
        let rules = HighlightRules::new(
            vec![
                Rule::new("a+", 1).unwrap(),
                Rule::new("aa", 2).unwrap(),
            ],
            Vec::new(),
        );
        let tokens = tokens_of(&rules, "aaa", None);
        assert_eq!(tokens, vec![TokenSpan::new(0, 2, 2), TokenSpan::new(2, 3, 1)]);
    }

    #[test]
    fn test_capture_group_styles_only_group() {
        let rules = HighlightRules::c_family().unwrap();
        let tokens = tokens_of(&rules, "foo(x)", None);
        assert_eq!(tokens[0], TokenSpan::new(0, 3, STYLE_FUNCTION));
    }

    #[test]
    fn test_keyword_overrides_function_capture() {
        let rules = HighlightRules::c_family().unwrap();
        let tokens = tokens_of(&rules, "while (1)", None);
        assert_eq!(tokens[0], TokenSpan::new(0, 5, STYLE_KEYWORD));
    }

    #[test]
    fn test_comment_overrides_string_rule() {
        let rules = HighlightRules::c_family().unwrap();
        let tokens = tokens_of(&rules, "// has \"quote\"", None);
        assert_eq!(tokens, vec![TokenSpan::new(0, 14, STYLE_COMMENT)]);
    }

    #[test]
    fn test_preprocessor_line() {
        let rules = HighlightRules::c_family().unwrap();
        let tokens = tokens_of(&rules, "#include <stdio.h>", None);
        assert_eq!(tokens, vec![TokenSpan::new(0, 18, STYLE_PREPROCESSOR)]);
    }

    #[test]
    fn test_block_closed_within_line() {
        let rules = HighlightRules::c_family().unwrap();
        let (tokens, end_state) = classify_line(&rules, "int x; /* c */ int y;", None);
        assert_eq!(end_state, None);
        assert!(tokens.contains(&TokenSpan::new(7, 14, STYLE_COMMENT)));
        assert!(tokens.contains(&TokenSpan::new(0, 3, STYLE_TYPE)));
    }

    #[test]
    fn test_block_opens_and_carries_state() {
        let rules = HighlightRules::c_family().unwrap();
        let (tokens, end_state) = classify_line(&rules, "int x = 1; /* comment", None);
        assert_eq!(end_state, Some(0));
        assert!(tokens.contains(&TokenSpan::new(11, 21, STYLE_COMMENT)));
    }

    #[test]
    fn test_active_block_closes_and_code_resumes() {
        let rules = HighlightRules::c_family().unwrap();
        let (tokens, end_state) = classify_line(&rules, "still comment */ int z;", Some(0));
        assert_eq!(end_state, None);
        assert!(tokens.contains(&TokenSpan::new(0, 16, STYLE_COMMENT)));
        assert!(tokens.contains(&TokenSpan::new(17, 20, STYLE_TYPE)));
    }

    #[test]
    fn test_active_block_swallows_whole_line() {
        let rules = HighlightRules::c_family().unwrap();
        let (tokens, end_state) = classify_line(&rules, "int not_code = 1;", Some(0));
        assert_eq!(end_state, Some(0));
        assert_eq!(tokens, vec![TokenSpan::new(0, 17, STYLE_COMMENT)]);
    }

    #[test]
    fn test_end_before_start_does_not_close_unopened_block() {
        let rules = HighlightRules::c_family().unwrap();
        let (tokens, end_state) = classify_line(&rules, "*/ x /*", None);
        assert_eq!(end_state, Some(0));
        assert!(tokens.contains(&TokenSpan::new(5, 7, STYLE_COMMENT)));
        assert!(!tokens.iter().any(|t| t.start == 0 && t.style == STYLE_COMMENT));
    }

    #[test]
    fn test_two_block_regions_on_one_line() {
        let rules = HighlightRules::c_family().unwrap();
        let (tokens, end_state) = classify_line(&rules, "/*a*/ x /*b*/", None);
        assert_eq!(end_state, None);
        assert!(tokens.contains(&TokenSpan::new(0, 5, STYLE_COMMENT)));
        assert!(tokens.contains(&TokenSpan::new(8, 13, STYLE_COMMENT)));
    }

    #[test]
    fn test_triple_quote_does_not_close_on_its_opener() {
        let rules = HighlightRules::python().unwrap();
        let (_, end_state) = classify_line(&rules, "s = '''", None);
        assert_eq!(end_state, Some(0));

        let (_, end_state) = classify_line(&rules, "'''doc'''", None);
        assert_eq!(end_state, None);
    }

    #[test]
    fn test_cjk_text_token_columns_are_chars() {
        let rules = HighlightRules::c_family().unwrap();
        let tokens = tokens_of(&rules, "int 值 = 42;", None);
        assert!(tokens.contains(&TokenSpan::new(0, 3, STYLE_TYPE)));
        assert!(tokens.contains(&TokenSpan::new(8, 10, STYLE_NUMBER)));
    }

    #[test]
    fn test_lazy_lexing_fills_prefix_once() {
        let buffer = RopeBuffer::from_text("a\nb\nc\nd\ne");
        let mut highlighter = IncrementalHighlighter::new(HighlightRules::c_family().unwrap());

        highlighter.line_tokens(&buffer, 3);
        assert_eq!(highlighter.lines_lexed(), 4);

        // Cached lines are never lexed twice.
        highlighter.line_tokens(&buffer, 2);
        highlighter.line_tokens(&buffer, 3);
        assert_eq!(highlighter.lines_lexed(), 4);

        highlighter.line_tokens(&buffer, 4);
        assert_eq!(highlighter.lines_lexed(), 5);
    }

    #[test]
    fn test_edit_with_stable_state_stops_cascade() {
        let mut buffer = RopeBuffer::from_text("int a;\nint b;\nint c;");
        let mut highlighter = IncrementalHighlighter::new(HighlightRules::c_family().unwrap());
        for line in 0..3 {
            highlighter.line_tokens(&buffer, line);
        }
        assert_eq!(highlighter.lines_lexed(), 3);

        // Replace within line 0; the carried state stays "none", so lines 1-2
        // keep their cache.
        let change = buffer.replace(4, 5, "x");
        highlighter.apply_change(&buffer, change);
        assert_eq!(highlighter.lines_lexed(), 4);
        assert_eq!(highlighter.end_state(&buffer, 0), None);
    }

    #[test]
    fn test_edit_opening_block_cascades_to_end() {
        let mut buffer = RopeBuffer::from_text("int a;\nint b;\nint c;");
        let mut highlighter = IncrementalHighlighter::new(HighlightRules::c_family().unwrap());
        for line in 0..3 {
            highlighter.line_tokens(&buffer, line);
        }

        // Opening an unterminated block on line 0 invalidates every line below.
        let change = buffer.replace(0, 0, "/* ");
        highlighter.apply_change(&buffer, change);
        assert_eq!(highlighter.lines_lexed(), 6);
        assert_eq!(highlighter.end_state(&buffer, 2), Some(0));
        assert_eq!(
            highlighter.line_tokens(&buffer, 1),
            &[TokenSpan::new(0, 6, STYLE_COMMENT)]
        );
    }

    #[test]
    fn test_line_insertion_splices_cache() {
        let mut buffer = RopeBuffer::from_text("int a;\nint b;");
        let mut highlighter = IncrementalHighlighter::new(HighlightRules::c_family().unwrap());
        highlighter.line_tokens(&buffer, 1);
        assert_eq!(highlighter.lines_lexed(), 2);

        // Insert a fresh line between the two. The reported change covers the
        // insertion line plus the line pushed down, and nothing else.
        let change = buffer.replace(7, 7, "int m;\n");
        highlighter.apply_change(&buffer, change);
        assert_eq!(highlighter.lines_lexed(), 4);
        assert!(highlighter
            .line_tokens(&buffer, 1)
            .contains(&TokenSpan::new(0, 3, STYLE_TYPE)));
        assert_eq!(highlighter.lines_lexed(), 4);
    }

    #[test]
    fn test_edit_beyond_lexed_prefix_is_deferred() {
        let mut buffer = RopeBuffer::from_text("a\nb\nc\nd");
        let mut highlighter = IncrementalHighlighter::new(HighlightRules::c_family().unwrap());
        highlighter.line_tokens(&buffer, 0);
        assert_eq!(highlighter.lines_lexed(), 1);

        // Editing line 3 must not force eager lexing of lines 1-3.
        let change = buffer.replace(6, 7, "x");
        highlighter.apply_change(&buffer, change);
        assert_eq!(highlighter.lines_lexed(), 1);

        // Lazy access then fills the gap.
        highlighter.line_tokens(&buffer, 3);
        assert_eq!(highlighter.lines_lexed(), 4);
    }

    #[test]
    fn test_reset_drops_cache() {
        let buffer = RopeBuffer::from_text("int a;");
        let mut highlighter = IncrementalHighlighter::new(HighlightRules::c_family().unwrap());
        highlighter.line_tokens(&buffer, 0);
        highlighter.reset();
        highlighter.line_tokens(&buffer, 0);
        assert_eq!(highlighter.lines_lexed(), 2);
    }
}
