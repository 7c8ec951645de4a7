use codeedit::{
    CommentConfig, IndentUnit, RopeBuffer, Span, StructuralEdit, StructuralEditor, TextBuffer,
};

fn main() {
    let editor = StructuralEditor::new(
        IndentUnit::Spaces(4),
        CommentConfig::line_and_block("//", "/*", "*/"),
    )
    .unwrap();
    let mut buffer = RopeBuffer::from_text("fn main() {\n    println!(\"hi\");\n}\n");

    // Duplicate the statement line; the selection follows the copy.
    let outcome = editor.execute(&mut buffer, Span::new(16, 16), StructuralEdit::DuplicateLines);
    assert_eq!(
        buffer.text(),
        "fn main() {\n    println!(\"hi\");\n    println!(\"hi\");\n}\n"
    );

    // Comment the copy out.
    let outcome = editor.execute(&mut buffer, outcome.selection, StructuralEdit::ToggleLineComment);
    assert_eq!(
        buffer.text(),
        "fn main() {\n    println!(\"hi\");\n    // println!(\"hi\");\n}\n"
    );

    // Drop it again.
    editor.execute(&mut buffer, outcome.selection, StructuralEdit::DeleteLines);
    assert_eq!(buffer.text(), "fn main() {\n    println!(\"hi\");\n}\n");

    // Enter at the end of the call keeps the 4-space indent.
    let outcome = editor.insert_newline(&mut buffer, 31);
    assert_eq!(
        buffer.text(),
        "fn main() {\n    println!(\"hi\");\n    \n}\n"
    );
    assert_eq!(outcome.selection, Span::new(36, 36));
}
