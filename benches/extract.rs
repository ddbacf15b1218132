// benches/extract.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use shelfscan::specs::listing;

/// Roughly the shape of a best-seller page: heavy markup, each product linked
/// several times (image, title, reviews).
fn synthetic_page(products: usize) -> String {
    let mut doc = String::from("<html><body><div id=\"zg\">");
    for i in 0..products {
        let id = format!("B{i:09}");
        for _ in 0..3 {
            doc.push_str(&format!(
                r#"<div class="zg-item"><a class="a-link-normal" title="Product number {i}" href="/Some-Long-Product-Name/dp/{id}/ref=zg_bs_{i}?psc=1"><img alt="Product {i}" src="https://img.example/{id}.jpg"/><span>Product number {i}</span></a></div>"#
            ));
        }
        doc.push_str(&"<span class=\"filler\">&nbsp;</span>".repeat(20));
    }
    doc.push_str("</div></body></html>");
    doc
}

fn bench_extract(c: &mut Criterion) {
    let doc = synthetic_page(50);

    c.bench_function("extract_limit_10", |b| {
        b.iter(|| {
            let ids = listing::extract(black_box(&doc), 10);
            black_box(ids.len())
        })
    });

    c.bench_function("extract_limit_50", |b| {
        b.iter(|| {
            let ids = listing::extract(black_box(&doc), 50);
            black_box(ids.len())
        })
    });

    let ids = listing::extract(&doc, 10);
    c.bench_function("titles_for_10", |b| {
        b.iter(|| {
            let n = ids.iter().filter_map(|id| listing::title_for(black_box(&doc), id)).count();
            black_box(n)
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
