use codeedit::{
    CommentConfig, IndentUnit, RopeBuffer, Span, StructuralEdit, StructuralEditor, TextBuffer,
};
use codeedit_highlight_regex::{
    HighlightRules, IncrementalHighlighter, STYLE_COMMENT, STYLE_TYPE, TokenSpan,
};

fn main() {
    let editor = StructuralEditor::new(IndentUnit::Spaces(4), CommentConfig::line("//")).unwrap();
    let mut buffer = RopeBuffer::from_text("int a = 1;\nint b = 2;\nint c = 3;");
    let mut highlighter = IncrementalHighlighter::new(HighlightRules::c_family().unwrap());

    // Initial render.
    for line in 0..buffer.line_count() {
        highlighter.line_tokens(&buffer, line);
    }
    assert_eq!(highlighter.lines_lexed(), 3);

    // Comment line 1 out and forward the reported mutation; only the edited
    // line is re-lexed because the carried block state did not move.
    let outcome = editor.execute(&mut buffer, Span::new(11, 11), StructuralEdit::ToggleLineComment);
    highlighter.apply_change(&buffer, outcome.change.unwrap());

    assert_eq!(buffer.text(), "int a = 1;\n// int b = 2;\nint c = 3;");
    assert_eq!(highlighter.lines_lexed(), 4);
    assert_eq!(
        highlighter.line_tokens(&buffer, 1),
        &[TokenSpan::new(0, 13, STYLE_COMMENT)]
    );
    assert!(
        highlighter
            .line_tokens(&buffer, 2)
            .contains(&TokenSpan::new(0, 3, STYLE_TYPE))
    );
    assert_eq!(highlighter.lines_lexed(), 4);
}
