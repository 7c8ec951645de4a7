use codeedit::{
    CommentConfig, DiagnosticIndex, IndentUnit, RopeBuffer, Severity, Span, StructuralEdit,
    StructuralEditor, TextBuffer,
};
use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} int value_{i} = accumulate(seed, {i}) + offset; /* filler */\n"
        ));
    }
    // Drop the final newline so no empty line trails the document.
    out.pop();
    out
}

fn bench_large_buffer_load(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("buffer_load/50k_lines", |b| {
        b.iter(|| {
            let buffer = RopeBuffer::from_text(black_box(&text));
            black_box(buffer.line_count());
        })
    });
}

fn bench_typing_in_middle(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("typing_middle/100_inserts", |b| {
        b.iter_batched(
            || RopeBuffer::from_text(&text),
            |mut buffer| {
                let mut offset = buffer.char_count() / 2;
                for _ in 0..100 {
                    buffer.replace(offset, offset, "x");
                    offset += 1;
                }
                black_box(buffer.char_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_toggle_comment_region(c: &mut Criterion) {
    let text = large_text(50_000);
    let editor = StructuralEditor::new(IndentUnit::Spaces(4), CommentConfig::line("//")).unwrap();

    // A 500-line selection in the middle of the file, ending inside the last
    // line's terminator.
    let buffer = RopeBuffer::from_text(&text);
    let selection = Span::new(
        buffer.offset_of_line(25_000),
        buffer.offset_of_line(25_500) - 1,
    );

    c.bench_function("toggle_comment/500_lines", |b| {
        b.iter_batched(
            || RopeBuffer::from_text(&text),
            |mut buffer| {
                let outcome =
                    editor.execute(&mut buffer, selection, StructuralEdit::ToggleLineComment);
                black_box(outcome);
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_diagnostic_queries(c: &mut Criterion) {
    let text = large_text(50_000);
    let buffer = RopeBuffer::from_text(&text);
    let mut index = DiagnosticIndex::new();

    let limit = buffer.char_count() - 80;
    for i in 0..10_000 {
        let start = (i * 4999) % limit;
        let severity = match i % 3 {
            0 => Severity::Hint,
            1 => Severity::Warning,
            _ => Severity::Error,
        };
        index
            .add(severity, Span::new(start, start + 1 + i % 60), "probe", None)
            .unwrap();
    }

    let mid = buffer.char_count() / 2;
    c.bench_function("diagnostic_hover/10k_spans", |b| {
        b.iter(|| black_box(index.query_point(black_box(mid))))
    });

    c.bench_function("diagnostic_gutter/60_lines", |b| {
        b.iter(|| black_box(index.per_line_severity(&buffer, 25_000..25_060)))
    });
}

criterion_group!(
    benches,
    bench_large_buffer_load,
    bench_typing_in_middle,
    bench_toggle_comment_region,
    bench_diagnostic_queries
);
criterion_main!(benches);
