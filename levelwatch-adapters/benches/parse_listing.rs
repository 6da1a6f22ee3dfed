//! Benchmarks for parsing the online list page.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use levelwatch_adapters::listing::parse_listing;

fn listing_page(rows: usize) -> String {
    let mut page = String::from("<html><body><table><tr><th>#</th><th>Name</th><th>Level</th></tr>");
    for i in 0..rows {
        page.push_str(&format!(
            "<tr><td>{}</td><td>Player {}</td><td>{}</td></tr>",
            i + 1,
            i,
            (i % 300) + 1
        ));
    }
    page.push_str("</table></body></html>");
    page
}

fn bench_parse_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_listing");

    for rows in [10, 100, 1000] {
        let page = listing_page(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &page, |b, page| {
            b.iter(|| parse_listing(black_box(page)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_listing);
criterion_main!(benches);
