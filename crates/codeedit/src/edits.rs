//! Selection-aware structural line transforms.
//!
//! Every operation here works on the set of lines touched by a selection
//! span (a caret touches exactly its own line) and mutates the buffer with a
//! single [`replace`] call, so the host receives one [`LineChange`] per
//! command:
//! - indent / unindent (with a configurable atomicity policy)
//! - duplicate, swap up/down, delete lines
//! - line- and block-comment toggling
//! - newline insertion with auto-indent
//!
//! The per-line transforms are anchored by regexes precompiled from the
//! configured indent unit and comment marker, sharing two primitives: remove
//! a line-start pattern's capture group in each touched line, and insert text
//! at a line-start pattern's match end in each touched line.
//!
//! [`replace`]: TextBuffer::replace

use codeedit_lang::{CommentConfig, IndentUnit};
use regex::Regex;

use crate::document::{LineChange, Span, TextBuffer};

/// What unindent does when some touched lines do not start with the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnindentPolicy {
    /// Remove the unit from each line that has it; leave the rest alone.
    #[default]
    PerLine,
    /// Remove only when every touched line starts with the unit; otherwise
    /// the whole operation is a no-op.
    AllOrNothing,
}

/// A structural edit command, for hosts that route key bindings through a
/// command table. Dispatched by [`StructuralEditor::execute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralEdit {
    /// Prepend the indent unit to every touched line.
    Indent,
    /// Remove the indent unit from touched lines per the configured policy.
    Unindent,
    /// Copy the touched lines and insert the copy below.
    DuplicateLines,
    /// Exchange the touched lines with the line above.
    SwapLinesUp,
    /// Exchange the touched lines with the line below.
    SwapLinesDown,
    /// Remove the touched lines including their terminators.
    DeleteLines,
    /// Comment or uncomment the touched lines with the line marker.
    ToggleLineComment,
    /// Wrap or unwrap the selection with the block marker pair.
    ToggleBlockComment,
}

/// Result of a structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Selection the host should adopt after the edit.
    pub selection: Span,
    /// Buffer mutation performed, absent when the command was a no-op.
    pub change: Option<LineChange>,
}

impl EditOutcome {
    fn unchanged(selection: Span) -> Self {
        Self {
            selection,
            change: None,
        }
    }
}

/// Executes structural line transforms against a [`TextBuffer`].
///
/// Construction compiles the line-start patterns once; the per-operation cost
/// is then proportional to the touched line count only. Boundary conditions
/// (swap at document edge, unindent on flush lines, toggles without a
/// configured marker) degrade to no-ops, never errors.
#[derive(Debug, Clone)]
pub struct StructuralEditor {
    indent: IndentUnit,
    comments: CommentConfig,
    line_start_re: Regex,
    leading_ws_re: Regex,
    unindent_re: Regex,
    comment_strip_re: Option<Regex>,
    unindent_policy: UnindentPolicy,
    auto_indent: bool,
}

impl StructuralEditor {
    /// Create an editor for the given indent unit and comment markers.
    ///
    /// Marker text is regex-escaped before compilation, so any literal marker
    /// is valid configuration.
    pub fn new(indent: IndentUnit, comments: CommentConfig) -> Result<Self, regex::Error> {
        let line_start_re = Regex::new("^")?;
        let leading_ws_re = Regex::new(r"^\s*")?;
        let unindent_re = Regex::new(&format!("^({})", regex::escape(&indent.text())))?;
        let comment_strip_re = match comments.line.as_deref() {
            Some(marker) if !marker.is_empty() => {
                Some(Regex::new(&format!(r"^\s*({} ?)", regex::escape(marker)))?)
            }
            _ => None,
        };

        Ok(Self {
            indent,
            comments,
            line_start_re,
            leading_ws_re,
            unindent_re,
            comment_strip_re,
            unindent_policy: UnindentPolicy::default(),
            auto_indent: true,
        })
    }

    /// The configured indent unit.
    pub fn indent_unit(&self) -> IndentUnit {
        self.indent
    }

    /// The unindent atomicity policy.
    pub fn unindent_policy(&self) -> UnindentPolicy {
        self.unindent_policy
    }

    /// Set the unindent atomicity policy.
    pub fn set_unindent_policy(&mut self, policy: UnindentPolicy) {
        self.unindent_policy = policy;
    }

    /// Whether newline insertion replicates the current line's indentation.
    pub fn auto_indent(&self) -> bool {
        self.auto_indent
    }

    /// Enable or disable auto-indent on newline insertion (enabled by default).
    pub fn set_auto_indent(&mut self, enabled: bool) {
        self.auto_indent = enabled;
    }

    /// Dispatch a [`StructuralEdit`] command.
    pub fn execute(
        &self,
        buffer: &mut impl TextBuffer,
        selection: Span,
        edit: StructuralEdit,
    ) -> EditOutcome {
        match edit {
            StructuralEdit::Indent => self.indent(buffer, selection),
            StructuralEdit::Unindent => self.unindent(buffer, selection),
            StructuralEdit::DuplicateLines => self.duplicate_lines(buffer, selection),
            StructuralEdit::SwapLinesUp => self.swap_lines_up(buffer, selection),
            StructuralEdit::SwapLinesDown => self.swap_lines_down(buffer, selection),
            StructuralEdit::DeleteLines => self.delete_lines(buffer, selection),
            StructuralEdit::ToggleLineComment => self.toggle_line_comment(buffer, selection),
            StructuralEdit::ToggleBlockComment => self.toggle_block_comment(buffer, selection),
        }
    }

    /// Prepend one indent unit to every touched line, blank lines included.
    pub fn indent(&self, buffer: &mut impl TextBuffer, selection: Span) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let mut region = touched_region(buffer, selection);
        let unit = self.indent.text();
        let inserts = insert_in_each_line(
            &mut region.lines,
            &region.line_offsets,
            &self.line_start_re,
            &unit,
            false,
        );
        if inserts.is_empty() {
            return EditOutcome::unchanged(selection);
        }
        let change = buffer.replace(region.start, region.end, &region.lines.join("\n"));
        EditOutcome {
            selection: map_span_after_inserts(selection, &inserts),
            change: Some(change),
        }
    }

    /// Remove one indent unit from the start of touched lines.
    ///
    /// Under [`UnindentPolicy::PerLine`] each line is handled independently;
    /// under [`UnindentPolicy::AllOrNothing`] a single flush line vetoes the
    /// whole operation. Lines never go past column zero.
    pub fn unindent(&self, buffer: &mut impl TextBuffer, selection: Span) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let mut region = touched_region(buffer, selection);
        let force = self.unindent_policy == UnindentPolicy::PerLine;
        let Some(removes) = remove_in_each_line(
            &mut region.lines,
            &region.line_offsets,
            &self.unindent_re,
            force,
            false,
        ) else {
            return EditOutcome::unchanged(selection);
        };
        let change = buffer.replace(region.start, region.end, &region.lines.join("\n"));
        EditOutcome {
            selection: map_span_after_removes(selection, &removes),
            change: Some(change),
        }
    }

    /// Copy the touched lines and insert the copy immediately below; the
    /// selection moves into the copy at the same relative offset.
    pub fn duplicate_lines(&self, buffer: &mut impl TextBuffer, selection: Span) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let region = touched_region(buffer, selection);
        let block = region.lines.join("\n");
        let change = buffer.replace(region.start, region.end, &format!("{block}\n{block}"));
        let shift = (region.end - region.start) + 1;
        EditOutcome {
            selection: Span::new(selection.start + shift, selection.end + shift),
            change: Some(change),
        }
    }

    /// Exchange the touched lines with the single line above. No-op at the
    /// first line.
    pub fn swap_lines_up(&self, buffer: &mut impl TextBuffer, selection: Span) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let first = buffer.line_of_offset(selection.start);
        let last = buffer.line_of_offset(selection.end);
        if first == 0 {
            return EditOutcome::unchanged(selection);
        }

        let above_start = buffer.offset_of_line(first - 1);
        let block_start = buffer.offset_of_line(first);
        let block_end = buffer.end_of_line(last);
        let above = buffer.slice(above_start, block_start - 1);
        let block = buffer.slice(block_start, block_end);
        let change = buffer.replace(above_start, block_end, &format!("{block}\n{above}"));

        let shift = block_start - above_start;
        EditOutcome {
            selection: Span::new(selection.start - shift, selection.end - shift),
            change: Some(change),
        }
    }

    /// Exchange the touched lines with the single line below. No-op at the
    /// last line.
    pub fn swap_lines_down(&self, buffer: &mut impl TextBuffer, selection: Span) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let first = buffer.line_of_offset(selection.start);
        let last = buffer.line_of_offset(selection.end);
        if last + 1 >= buffer.line_count() {
            return EditOutcome::unchanged(selection);
        }

        let block_start = buffer.offset_of_line(first);
        let block_end = buffer.end_of_line(last);
        let below_start = buffer.offset_of_line(last + 1);
        let below_end = buffer.end_of_line(last + 1);
        let block = buffer.slice(block_start, block_end);
        let below = buffer.slice(below_start, below_end);
        let change = buffer.replace(block_start, below_end, &format!("{below}\n{block}"));

        let shift = (below_end - below_start) + 1;
        EditOutcome {
            selection: Span::new(selection.start + shift, selection.end + shift),
            change: Some(change),
        }
    }

    /// Remove the touched lines including their terminators. Deleting the
    /// final lines of the document consumes the preceding terminator instead,
    /// so no dangling empty line is left behind. The returned selection is a
    /// caret at the start of the line that moved up.
    pub fn delete_lines(&self, buffer: &mut impl TextBuffer, selection: Span) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let first = buffer.line_of_offset(selection.start);
        let last = buffer.line_of_offset(selection.end);
        let block_start = buffer.offset_of_line(first);

        let (delete_start, delete_end) = if last + 1 < buffer.line_count() {
            (block_start, buffer.offset_of_line(last + 1))
        } else if first > 0 {
            (block_start - 1, buffer.char_count())
        } else {
            (0, buffer.char_count())
        };
        if delete_start == delete_end {
            return EditOutcome::unchanged(Span::new(delete_start, delete_start));
        }

        let change = buffer.replace(delete_start, delete_end, "");
        let caret = block_start.min(buffer.char_count());
        EditOutcome {
            selection: Span::new(caret, caret),
            change: Some(change),
        }
    }

    /// Comment or uncomment the touched lines with the configured line marker.
    ///
    /// The direction is decided once over the whole selection: only when every
    /// touched non-blank line already starts (after leading whitespace) with
    /// the marker is the marker stripped; otherwise `marker + " "` is inserted
    /// after each non-blank line's leading whitespace. Blank lines are left
    /// untouched either way. No-op without a configured marker.
    pub fn toggle_line_comment(&self, buffer: &mut impl TextBuffer, selection: Span) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let (Some(strip_re), Some(marker)) =
            (self.comment_strip_re.as_ref(), self.comments.line.as_deref())
        else {
            return EditOutcome::unchanged(selection);
        };
        let mut region = touched_region(buffer, selection);

        if let Some(removes) = remove_in_each_line(
            &mut region.lines,
            &region.line_offsets,
            strip_re,
            false,
            true,
        ) {
            let change = buffer.replace(region.start, region.end, &region.lines.join("\n"));
            return EditOutcome {
                selection: map_span_after_removes(selection, &removes),
                change: Some(change),
            };
        }

        let inserts = insert_in_each_line(
            &mut region.lines,
            &region.line_offsets,
            &self.leading_ws_re,
            &format!("{marker} "),
            true,
        );
        if inserts.is_empty() {
            return EditOutcome::unchanged(selection);
        }
        let change = buffer.replace(region.start, region.end, &region.lines.join("\n"));
        EditOutcome {
            selection: map_span_after_inserts(selection, &inserts),
            change: Some(change),
        }
    }

    /// Wrap the selection with the block marker pair, or strip a pair found
    /// at the selection's inner edges (preferred) or immediately outside it.
    ///
    /// After wrapping, the returned selection covers the markers too, so
    /// toggling again strips. An empty selection wraps the caret in an empty
    /// pair. No-op without configured block markers.
    pub fn toggle_block_comment(
        &self,
        buffer: &mut impl TextBuffer,
        selection: Span,
    ) -> EditOutcome {
        let selection = normalized(buffer, selection);
        let Some(markers) = self.comments.block.as_ref() else {
            return EditOutcome::unchanged(selection);
        };
        if markers.start.is_empty() || markers.end.is_empty() {
            return EditOutcome::unchanged(selection);
        }
        let (a, b) = (selection.start, selection.end);
        let start_len = markers.start.chars().count();
        let end_len = markers.end.chars().count();

        // Pair sitting just inside the selection edges.
        if b - a >= start_len + end_len
            && buffer.slice(a, a + start_len) == markers.start
            && buffer.slice(b - end_len, b) == markers.end
        {
            let inner = buffer.slice(a + start_len, b - end_len);
            let change = buffer.replace(a, b, &inner);
            return EditOutcome {
                selection: Span::new(a, b - start_len - end_len),
                change: Some(change),
            };
        }

        // Pair immediately outside the selection.
        if a >= start_len
            && b + end_len <= buffer.char_count()
            && buffer.slice(a - start_len, a) == markers.start
            && buffer.slice(b, b + end_len) == markers.end
        {
            let inner = buffer.slice(a, b);
            let change = buffer.replace(a - start_len, b + end_len, &inner);
            return EditOutcome {
                selection: Span::new(a - start_len, b - start_len),
                change: Some(change),
            };
        }

        let wrapped = format!("{}{}{}", markers.start, buffer.slice(a, b), markers.end);
        let change = buffer.replace(a, b, &wrapped);
        EditOutcome {
            selection: Span::new(a, b + start_len + end_len),
            change: Some(change),
        }
    }

    /// Insert a line break at the cursor. With auto-indent enabled the new
    /// line replicates the leading whitespace of the text before the cursor;
    /// the returned caret lands after that indentation.
    pub fn insert_newline(&self, buffer: &mut impl TextBuffer, cursor: usize) -> EditOutcome {
        let cursor = cursor.min(buffer.char_count());
        let mut inserted = String::from("\n");
        if self.auto_indent {
            let line_start = buffer.offset_of_line(buffer.line_of_offset(cursor));
            let prefix = buffer.slice(line_start, cursor);
            inserted.extend(prefix.chars().take_while(|c| c.is_whitespace()));
        }
        let change = buffer.replace(cursor, cursor, &inserted);
        let caret = cursor + inserted.chars().count();
        EditOutcome {
            selection: Span::new(caret, caret),
            change: Some(change),
        }
    }
}

/// The full lines touched by a selection, as rebuild material: line texts
/// without terminators plus each line's original absolute start offset.
struct TouchedRegion {
    start: usize,
    end: usize,
    lines: Vec<String>,
    line_offsets: Vec<usize>,
}

fn touched_region(buffer: &impl TextBuffer, selection: Span) -> TouchedRegion {
    let first = buffer.line_of_offset(selection.start);
    let last = buffer.line_of_offset(selection.end);
    let mut lines = Vec::with_capacity(last - first + 1);
    let mut line_offsets = Vec::with_capacity(last - first + 1);
    for line in first..=last {
        line_offsets.push(buffer.offset_of_line(line));
        lines.push(buffer.line_text(line).unwrap_or_default());
    }
    TouchedRegion {
        start: buffer.offset_of_line(first),
        end: buffer.end_of_line(last),
        lines,
        line_offsets,
    }
}

/// Clamp to the document and put start before end.
fn normalized(buffer: &impl TextBuffer, selection: Span) -> Span {
    let count = buffer.char_count();
    let a = selection.start.min(count);
    let b = selection.end.min(count);
    if a <= b {
        Span::new(a, b)
    } else {
        Span::new(b, a)
    }
}

/// Insert `text` at the end of `pattern`'s match in each line, returning
/// `(original absolute offset, inserted width)` per affected line.
fn insert_in_each_line(
    lines: &mut [String],
    line_offsets: &[usize],
    pattern: &Regex,
    text: &str,
    skip_blank: bool,
) -> Vec<(usize, usize)> {
    if text.is_empty() {
        return Vec::new();
    }
    let width = text.chars().count();
    let mut edits = Vec::new();
    for (i, line) in lines.iter_mut().enumerate() {
        if skip_blank && line.trim().is_empty() {
            continue;
        }
        let (at_byte, column) = {
            let Some(found) = pattern.find(line) else {
                continue;
            };
            (found.end(), line[..found.end()].chars().count())
        };
        line.insert_str(at_byte, text);
        edits.push((line_offsets[i] + column, width));
    }
    edits
}

/// Remove `pattern`'s first capture group from each considered line,
/// returning `(original absolute offset, removed width)` per affected line.
///
/// When `force` is false nothing is removed unless every considered line
/// matches. `None` means the buffer content is unchanged.
fn remove_in_each_line(
    lines: &mut [String],
    line_offsets: &[usize],
    pattern: &Regex,
    force: bool,
    skip_blank: bool,
) -> Option<Vec<(usize, usize)>> {
    let considered: Vec<usize> = (0..lines.len())
        .filter(|&i| !(skip_blank && lines[i].trim().is_empty()))
        .collect();
    if !force
        && !considered.iter().all(|&i| {
            pattern
                .captures(&lines[i])
                .is_some_and(|captures| captures.get(1).is_some())
        })
    {
        return None;
    }

    let mut edits = Vec::new();
    for &i in &considered {
        let (start_byte, end_byte, column, width) = {
            let Some(group) = pattern.captures(&lines[i]).and_then(|c| c.get(1)) else {
                continue;
            };
            (
                group.start(),
                group.end(),
                lines[i][..group.start()].chars().count(),
                group.as_str().chars().count(),
            )
        };
        if width == 0 {
            continue;
        }
        lines[i].replace_range(start_byte..end_byte, "");
        edits.push((line_offsets[i] + column, width));
    }
    if edits.is_empty() { None } else { Some(edits) }
}

/// Map an original offset through a list of insertions at ascending original
/// offsets. An insertion at the offset itself pushes it right.
fn map_offset_after_inserts(offset: usize, inserts: &[(usize, usize)]) -> usize {
    let mut mapped = offset;
    for &(at, width) in inserts {
        if at <= offset {
            mapped += width;
        } else {
            break;
        }
    }
    mapped
}

/// Map an original offset through a list of removals at ascending original
/// offsets; offsets inside a removed range collapse to its start.
fn map_offset_after_removes(offset: usize, removes: &[(usize, usize)]) -> usize {
    let mut mapped = offset;
    for &(at, width) in removes {
        if at >= offset {
            break;
        }
        if at + width <= offset {
            mapped -= width;
        } else {
            mapped -= offset - at;
        }
    }
    mapped
}

fn map_span_after_inserts(span: Span, inserts: &[(usize, usize)]) -> Span {
    Span::new(
        map_offset_after_inserts(span.start, inserts),
        map_offset_after_inserts(span.end, inserts),
    )
}

fn map_span_after_removes(span: Span, removes: &[(usize, usize)]) -> Span {
    Span::new(
        map_offset_after_removes(span.start, removes),
        map_offset_after_removes(span.end, removes),
    )
}
