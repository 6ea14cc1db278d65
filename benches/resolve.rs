//! Path resolution and comparison throughput.
use criterion::{Criterion, criterion_group, criterion_main};
use http_assert::compare::{TypeTag, equal};
use http_assert::path::{PathExpression, resolve};
use http_assert::value::{JSONValue, Literal};
use std::hint::black_box;

fn document() -> JSONValue {
    let items: Vec<serde_json::Value> = (0..1_000)
        .map(|i| serde_json::json!({"id": i, "tags": ["a", "b"], "meta": {"score": 1.5}}))
        .collect();
    serde_json::json!({"data": {"items": items}}).into()
}

fn bench_resolve(c: &mut Criterion) {
    let doc = document();
    let parsed = PathExpression::from("data.items.999.meta.score");

    c.bench_function("resolve_str", |b| {
        b.iter(|| resolve(black_box("data.items.999.meta.score"), &doc));
    });
    c.bench_function("resolve_parsed", |b| {
        b.iter(|| parsed.resolve(black_box(&doc)));
    });
    c.bench_function("resolve_and_equal", |b| {
        let expected = Literal::Int(500);
        b.iter(|| {
            resolve("data.items.500.id", &doc)
                .ok()
                .flatten()
                .is_some_and(|v| equal(&expected, v, TypeTag::Int))
        });
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
