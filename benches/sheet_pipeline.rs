use criterion::{Criterion, black_box, criterion_group, criterion_main};
use omr_scorer::Scorer;
use omr_scorer::detector::BlockLocator;
use omr_scorer::tools::SheetBuilder;

fn sample_sheet() -> image::RgbImage {
    SheetBuilder::new()
        .fill_part1(1, 'A')
        .fill_part1(27, 'D')
        .fill_part2(3, 'b', true)
        .fill_part3(2, "3,14")
        .build()
}

fn bench_find_boxes(c: &mut Criterion) {
    let sheet = sample_sheet();
    c.bench_function("find_boxes_sheet", |b| {
        b.iter(|| BlockLocator::find_boxes(black_box(&sheet)))
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let sheet = sample_sheet();
    let scorer = Scorer::default();
    let mut group = c.benchmark_group("sheet");
    group.sample_size(10);
    group.bench_function("evaluate", |b| {
        b.iter(|| scorer.evaluate(black_box(sheet.clone())))
    });
    group.finish();
}

criterion_group!(benches, bench_find_boxes, bench_evaluate);
criterion_main!(benches);
