use codeedit::{BracketEngine, BracketMatch, BracketOutcome, RopeBuffer, TextBuffer};

fn main() {
    let engine = BracketEngine::default();
    let mut buffer = RopeBuffer::new();
    let mut cursor = 0;

    // Type the visible characters of `print("hi")` one keystroke at a time.
    // The engine auto-completes each opener and types over each closer, so
    // no delimiter ends up doubled.
    for ch in "print(\"hi\")".chars() {
        cursor = match engine.before_insert_char(&mut buffer, cursor, ch) {
            BracketOutcome::Handled { cursor, .. } => cursor,
            BracketOutcome::Pass => {
                buffer.replace(cursor, cursor, &ch.to_string());
                cursor + 1
            }
        };
    }
    assert_eq!(buffer.text(), "print(\"hi\")");
    assert_eq!(cursor, 11);

    // An accidental opener plus backspace leaves no residue.
    let BracketOutcome::Handled { cursor, .. } = engine.before_insert_char(&mut buffer, cursor, '[')
    else {
        unreachable!()
    };
    assert_eq!(buffer.text(), "print(\"hi\")[]");
    engine.before_backspace(&mut buffer, cursor);
    assert_eq!(buffer.text(), "print(\"hi\")");

    // Highlight the pair around the argument list.
    assert_eq!(
        engine.matching_pair(&buffer, 5),
        Some(BracketMatch { open: 5, close: 10 })
    );
}
