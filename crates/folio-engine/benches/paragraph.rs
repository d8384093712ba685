use criterion::{Criterion, criterion_group, criterion_main};
use folio_engine::editing::{Paragraph, Section};
use folio_engine::models::ComponentId;
use folio_engine::{HtmlRenderer, Renderer};
mod common;

fn bench_paragraph_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("paragraph");
    group.sample_size(10);

    let text = common::generate_text(500);
    let len = folio_engine::editing::utf16_len(&text);
    let paragraph = Paragraph::with_id(ComponentId::from("p1"), &text)
        .with_formats(common::generate_formats(len, 24))
        .unwrap();

    group.bench_function("insert_and_undo", |b| {
        let mut section = Section::new("bench");
        section.insert(0, paragraph.clone()).unwrap();
        let id = ComponentId::from("p1");
        b.iter(|| {
            let ops = section
                .get_mut(&id)
                .unwrap()
                .insert_chars(std::hint::black_box(120), "word ")
                .unwrap();
            section.undo(&ops).unwrap();
        });
    });

    group.bench_function("render_html", |b| {
        b.iter(|| {
            let mut p = paragraph.clone();
            p.insert_chars(0, "x").unwrap();
            std::hint::black_box(HtmlRenderer.render(&p))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_paragraph_operations);
criterion_main!(benches);
