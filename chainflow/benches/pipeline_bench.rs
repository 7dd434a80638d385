//! Benchmarks for pipeline execution.

use chainflow::testing::{credit_pipeline, CreditRequest};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn pipeline_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let pipeline = credit_pipeline().expect("credit pipeline");

    let accepted = CreditRequest::new("XY", "10", 500);
    c.bench_function("credit_accepted", |b| {
        b.iter(|| runtime.block_on(pipeline.execute(black_box(&accepted))));
    });

    let rejected = CreditRequest::new("XY", "10", 100);
    c.bench_function("credit_rejected", |b| {
        b.iter(|| runtime.block_on(pipeline.execute(black_box(&rejected))));
    });

    let faulted = CreditRequest::new("XY", "11", 500);
    c.bench_function("credit_faulted", |b| {
        b.iter(|| runtime.block_on(pipeline.execute(black_box(&faulted))));
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
