//! Paired-delimiter interception and match highlighting.
//!
//! The engine sits between host key handling and the buffer: the host offers
//! it each single-character insert or backspace *before* applying the default
//! mutation, and either adopts the engine's outcome or falls through. It also
//! answers the "highlight the bracket matching the cursor" query.
//!
//! Behavior is driven entirely by the configured [`BracketPair`] table;
//! pairs are consulted in configured order and the first applicable one wins.

use codeedit_lang::BracketPair;

use crate::document::{LineChange, TextBuffer};

/// Result of offering a keystroke to the bracket engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketOutcome {
    /// The engine consumed the keystroke.
    Handled {
        /// Cursor offset the host should adopt.
        cursor: usize,
        /// Buffer mutation the engine performed, if any, for forwarding to
        /// change consumers (e.g. an incremental highlighter).
        change: Option<LineChange>,
    },
    /// Not a bracket concern; the host applies its default behavior.
    Pass,
}

/// Offsets of a matched delimiter pair, for highlight rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketMatch {
    /// Offset of the opening delimiter.
    pub open: usize,
    /// Offset of the closing delimiter.
    pub close: usize,
}

/// State machine for auto-complete, type-over skip, auto-remove and
/// match highlighting of configured delimiter pairs.
#[derive(Debug, Clone)]
pub struct BracketEngine {
    pairs: Vec<BracketPair>,
}

impl BracketEngine {
    /// Create an engine over an ordered pair table.
    pub fn new(pairs: Vec<BracketPair>) -> Self {
        Self { pairs }
    }

    /// The configured pair table, in consultation order.
    pub fn pairs(&self) -> &[BracketPair] {
        &self.pairs
    }

    /// Offer a single-character insertion at `cursor`.
    ///
    /// Checks type-over skip before auto-complete, so a symmetric pair
    /// (quotes) typed immediately before its own closing character skips
    /// instead of nesting a fresh pair.
    pub fn before_insert_char(
        &self,
        buffer: &mut impl TextBuffer,
        cursor: usize,
        ch: char,
    ) -> BracketOutcome {
        for pair in &self.pairs {
            if ch == pair.right && pair.tab_jump_out && buffer.char_at(cursor) == Some(pair.right)
            {
                return BracketOutcome::Handled {
                    cursor: cursor + 1,
                    change: None,
                };
            }
        }

        for pair in &self.pairs {
            if ch == pair.left && pair.auto_complete {
                let mut completed = String::with_capacity(pair.left.len_utf8() * 2);
                completed.push(pair.left);
                completed.push(pair.right);
                let change = buffer.replace(cursor, cursor, &completed);
                return BracketOutcome::Handled {
                    cursor: cursor + 1,
                    change: Some(change),
                };
            }
        }

        BracketOutcome::Pass
    }

    /// Offer a backspace at `cursor`.
    ///
    /// When the cursor sits inside an empty pair (`left` immediately before,
    /// `right` immediately at) and the pair has auto-remove enabled, both
    /// delimiters are deleted as one unit.
    pub fn before_backspace(&self, buffer: &mut impl TextBuffer, cursor: usize) -> BracketOutcome {
        if cursor == 0 {
            return BracketOutcome::Pass;
        }
        let before = buffer.char_at(cursor - 1);
        let at = buffer.char_at(cursor);

        for pair in &self.pairs {
            if pair.auto_remove && before == Some(pair.left) && at == Some(pair.right) {
                let change = buffer.replace(cursor - 1, cursor + 1, "");
                return BracketOutcome::Handled {
                    cursor: cursor - 1,
                    change: Some(change),
                };
            }
        }

        BracketOutcome::Pass
    }

    /// Offer a Tab keypress: if the character at `cursor` is the closing
    /// delimiter of a pair with jump-out enabled, returns the offset just
    /// past it for the host to jump to instead of inserting indentation.
    pub fn tab_jump_out(&self, buffer: &impl TextBuffer, cursor: usize) -> Option<usize> {
        let at = buffer.char_at(cursor)?;
        self.pairs
            .iter()
            .any(|pair| pair.tab_jump_out && pair.right == at)
            .then(|| cursor + 1)
    }

    /// Locate the delimiter pair to highlight for the given cursor position.
    ///
    /// A left delimiter *under* the cursor scans forward for its partner; a
    /// right delimiter *immediately before* the cursor scans backward.
    /// Nesting depth is tracked per pair type only; other pair types are
    /// ignored. No structural match yields `None`, never an error.
    pub fn matching_pair(&self, buffer: &impl TextBuffer, cursor: usize) -> Option<BracketMatch> {
        if let Some(ch) = buffer.char_at(cursor) {
            if let Some(pair) = self.pairs.iter().find(|pair| pair.left == ch) {
                if let Some(close) = scan_forward(buffer, cursor, pair) {
                    return Some(BracketMatch {
                        open: cursor,
                        close,
                    });
                }
            }
        }

        if cursor > 0 {
            if let Some(ch) = buffer.char_at(cursor - 1) {
                if let Some(pair) = self.pairs.iter().find(|pair| pair.right == ch) {
                    if let Some(open) = scan_backward(buffer, cursor - 1, pair) {
                        return Some(BracketMatch {
                            open,
                            close: cursor - 1,
                        });
                    }
                }
            }
        }

        None
    }
}

impl Default for BracketEngine {
    fn default() -> Self {
        Self::new(codeedit_lang::default_pairs())
    }
}

/// Scan forward from the opening delimiter at `open` for its partner.
///
/// The closing symbol is tested before the opening one so symmetric pairs
/// (where `left == right`) match the next occurrence instead of nesting
/// forever.
fn scan_forward(buffer: &impl TextBuffer, open: usize, pair: &BracketPair) -> Option<usize> {
    let mut depth = 0usize;
    let mut offset = open + 1;
    let count = buffer.char_count();
    while offset < count {
        let ch = buffer.char_at(offset)?;
        if ch == pair.right {
            if depth == 0 {
                return Some(offset);
            }
            depth -= 1;
        } else if ch == pair.left {
            depth += 1;
        }
        offset += 1;
    }
    None
}

/// Scan backward from the closing delimiter at `close` for its partner.
fn scan_backward(buffer: &impl TextBuffer, close: usize, pair: &BracketPair) -> Option<usize> {
    let mut depth = 0usize;
    let mut offset = close;
    while offset > 0 {
        offset -= 1;
        let ch = buffer.char_at(offset)?;
        if ch == pair.left {
            if depth == 0 {
                return Some(offset);
            }
            depth -= 1;
        } else if ch == pair.right {
            depth += 1;
        }
    }
    None
}
