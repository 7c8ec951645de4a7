//! Feed tool output into a [`DiagnosticIndex`] and drive hover plus gutter
//! queries from it, the way an LSP client would.

use codeedit::{DiagnosticIndex, RopeBuffer, Severity, Span, TextBuffer};

fn main() {
    let buffer = RopeBuffer::from_text("fn main() {\n    let x = undefined();\n}\n");
    let mut index = DiagnosticIndex::new();

    // One compiler run: an unresolved call and an unused binding, both on
    // line 1.
    let error = index
        .add(
            Severity::Error,
            Span::new(24, 33),
            "cannot find function `undefined`",
            Some("E0425".to_string()),
        )
        .unwrap();
    index
        .add(
            Severity::Warning,
            Span::new(20, 21),
            "unused variable `x`",
            Some("unused_variables".to_string()),
        )
        .unwrap();

    // Hover inside the call resolves to the error.
    assert_eq!(index.query_point(26), vec![error]);
    assert_eq!(
        index.get(error).map(|d| d.message.as_str()),
        Some("cannot find function `undefined`")
    );

    // The gutter shows one marker per line, worst severity first.
    let gutter = index.per_line_severity(&buffer, 0..buffer.line_count());
    assert_eq!(gutter.get(&1), Some(&Severity::Error));
    assert!(!gutter.contains_key(&0));

    // The next publish starts from a clean slate.
    index.clear();
    assert!(index.is_empty());
}
