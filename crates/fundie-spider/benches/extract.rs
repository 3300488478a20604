use criterion::*;
use fundie_spider::extract::{Extract, LabelCell};
use fundie_spider::fetch::collect;
use fundie_spider::metrics::default_metrics;
use scraper::Html;

// read a saved page to a string
#[inline]
fn read_page() -> String {
    std::fs::read_to_string("./benches/files/key_statistics.html").expect("Unable to read file")
}

// parse the page
// ----------------------------------------------------------
fn benchmark_parse(c: &mut Criterion) {
    let page = read_page();

    c.bench_function("parse key statistics", |b| {
        b.iter(|| {
            let _html = Html::parse_document(black_box(&page));
        })
    });
}

// extract a single metric from a parsed page
// ----------------------------------------------------------
fn benchmark_extract_one(c: &mut Criterion) {
    let page = Html::parse_document(&read_page());
    let metrics = default_metrics();
    let extractor = LabelCell::new(&metrics).expect("valid metric patterns");
    let beta = metrics
        .iter()
        .find(|m| m.name == "Beta")
        .expect("Beta in the default metrics");

    c.bench_function("extract Beta", |b| {
        b.iter(|| {
            let _value = extractor.extract(black_box(&page), black_box(beta));
        })
    });
}

// parse + extract every metric, as done per ticker
// ----------------------------------------------------------
fn benchmark_collect(c: &mut Criterion) {
    let page = read_page();
    let metrics = default_metrics();
    let extractor = LabelCell::new(&metrics).expect("valid metric patterns");

    c.bench_function("collect all metrics", |b| {
        b.iter(|| {
            let _values = collect("AAA", black_box(&page), &metrics, &extractor);
        })
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_extract_one,
    benchmark_collect
);
criterion_main!(benches);
