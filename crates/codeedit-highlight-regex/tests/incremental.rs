//! End-to-end classification flows over a live buffer: a host renders a
//! viewport, forwards edits, and watches how far each repaint reaches.

use codeedit::document::{RopeBuffer, TextBuffer};
use codeedit_highlight_regex::{
    HighlightRules, IncrementalHighlighter, STYLE_COMMENT, STYLE_KEYWORD, STYLE_STRING,
    STYLE_TYPE, TokenSpan,
};

fn c_highlighter() -> IncrementalHighlighter {
    let rules = HighlightRules::c_family().expect("built-in grammar must compile");
    IncrementalHighlighter::new(rules)
}

#[test]
fn test_block_comment_typing_flow() {
    let mut buffer = RopeBuffer::from_text("int a = 1;\nint b = 2;\nint c = 3;\nint d = 4;");
    let mut highlighter = c_highlighter();

    // Initial render of the whole document.
    for line in 0..4 {
        assert!(
            highlighter
                .line_tokens(&buffer, line)
                .contains(&TokenSpan::new(0, 3, STYLE_TYPE)),
            "line {line} should start with a type token"
        );
    }
    assert_eq!(highlighter.lines_lexed(), 4);
    assert_eq!(highlighter.end_state(&buffer, 3), None);

    // Typing an unterminated opener on line 1 repaints line 1 and everything
    // below it as comment.
    let change = buffer.replace(11, 11, "/* ");
    highlighter.apply_change(&buffer, change);
    assert_eq!(highlighter.lines_lexed(), 7);
    assert_eq!(highlighter.end_state(&buffer, 1), Some(0));
    assert_eq!(highlighter.end_state(&buffer, 3), Some(0));
    assert_eq!(
        highlighter.line_tokens(&buffer, 1),
        &[TokenSpan::new(0, 13, STYLE_COMMENT)]
    );
    assert_eq!(
        highlighter.line_tokens(&buffer, 2),
        &[TokenSpan::new(0, 10, STYLE_COMMENT)]
    );
    assert_eq!(highlighter.lines_lexed(), 7, "queries must hit the cache");

    // Typing the closer at the end of line 2 re-lexes lines 2 and 3; line 3's
    // incoming state flips back to "no block", so code styling returns.
    let change = buffer.replace(35, 35, " */");
    highlighter.apply_change(&buffer, change);
    assert_eq!(highlighter.lines_lexed(), 9);
    assert_eq!(highlighter.end_state(&buffer, 2), None);
    assert_eq!(
        highlighter.line_tokens(&buffer, 2),
        &[TokenSpan::new(0, 13, STYLE_COMMENT)]
    );
    assert!(
        highlighter
            .line_tokens(&buffer, 3)
            .contains(&TokenSpan::new(0, 3, STYLE_TYPE))
    );

    // An edit that leaves the carried state alone repaints one line only.
    let change = buffer.replace(8, 9, "9");
    highlighter.apply_change(&buffer, change);
    assert_eq!(highlighter.lines_lexed(), 10);
}

#[test]
fn test_repaint_stops_at_the_unrendered_tail() {
    let mut buffer = RopeBuffer::from_text("a();\nb();\nc();\nd();\ne();\nf();");
    let mut highlighter = c_highlighter();

    // Only the top of the document has been rendered.
    for line in 0..3 {
        highlighter.line_tokens(&buffer, line);
    }
    assert_eq!(highlighter.lines_lexed(), 3);

    // Opening a block at the top cascades through the rendered prefix, then
    // stops at the first line nobody has asked for yet.
    let change = buffer.replace(0, 0, "/* ");
    highlighter.apply_change(&buffer, change);
    assert_eq!(highlighter.lines_lexed(), 6);

    // Scrolling down lexes the gap with the carried comment state.
    assert_eq!(
        highlighter.line_tokens(&buffer, 5),
        &[TokenSpan::new(0, 4, STYLE_COMMENT)]
    );
    assert_eq!(highlighter.lines_lexed(), 9);
    assert_eq!(highlighter.end_state(&buffer, 5), Some(0));
}

#[test]
fn test_python_docstring_carries_string_state() {
    let buffer =
        RopeBuffer::from_text("def f():\n    '''doc\n    body\n    '''\n    return 1");
    let rules = HighlightRules::python().expect("built-in grammar must compile");
    let mut highlighter = IncrementalHighlighter::new(rules);

    assert!(
        highlighter
            .line_tokens(&buffer, 0)
            .contains(&TokenSpan::new(0, 3, STYLE_KEYWORD))
    );
    assert_eq!(
        highlighter.line_tokens(&buffer, 1),
        &[TokenSpan::new(4, 10, STYLE_STRING)]
    );
    assert_eq!(
        highlighter.line_tokens(&buffer, 2),
        &[TokenSpan::new(0, 8, STYLE_STRING)]
    );
    assert_eq!(
        highlighter.line_tokens(&buffer, 3),
        &[TokenSpan::new(0, 7, STYLE_STRING)]
    );
    assert_eq!(highlighter.end_state(&buffer, 3), None);
    assert!(
        highlighter
            .line_tokens(&buffer, 4)
            .contains(&TokenSpan::new(4, 10, STYLE_KEYWORD))
    );
}
