use criterion::{Criterion, criterion_group, criterion_main};
use flashmap::render::{LayoutOptions, SvgRenderOptions, layout_outline, render_mindmap_svg, wrap};
use flashmap::{OutlineParser, parse_outline};
use std::hint::black_box;

const LARGE_OUTLINE: &str = include_str!("../../../fixtures/outline/large.md");
const CJK_OUTLINE: &str = include_str!("../../../fixtures/outline/cjk_summary.md");

fn bench_pipeline(c: &mut Criterion) {
    let parser = OutlineParser::new();
    let layout_options = LayoutOptions::default();
    let svg_options = SvgRenderOptions::default();

    let mut group = c.benchmark_group("pipeline");

    group.bench_function("parse_large", |b| {
        b.iter(|| black_box(parser.parse(black_box(LARGE_OUTLINE), "Untitled")))
    });

    let outline = parse_outline(LARGE_OUTLINE, "Untitled");
    group.bench_function("layout_large", |b| {
        b.iter(|| {
            black_box(layout_outline(black_box(&outline), &layout_options).expect("layout"))
        })
    });

    let layout = layout_outline(&outline, &layout_options).expect("layout");
    group.bench_function("svg_large", |b| {
        b.iter(|| black_box(render_mindmap_svg(black_box(&layout), &svg_options).expect("svg")))
    });

    group.bench_function("end_to_end_cjk", |b| {
        b.iter(|| {
            let outline = parser.parse(black_box(CJK_OUTLINE), "Untitled");
            let layout = layout_outline(&outline, &layout_options).expect("layout");
            black_box(render_mindmap_svg(&layout, &svg_options).expect("svg"))
        })
    });

    group.finish();
}

fn bench_wrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("wrap");
    // Batched: a single wrap call is sub-microsecond.
    group.bench_function("mixed_script_x100", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for _ in 0..100usize {
                acc ^= wrap(
                    black_box("Rust 所有权 ownership 与借用 borrowing 规则 rules explained"),
                    10,
                )
                .len();
            }
            black_box(acc)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_pipeline, bench_wrap);
criterion_main!(benches);
