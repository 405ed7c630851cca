use active_handles::{callback, enumerate, ProbeOptions, Runtime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn runtime_with_timers(count: u64) -> Runtime {
    let mut rt = Runtime::new();
    for i in 0..count {
        // four buckets, so most timers are only reachable by chain walking
        rt.set_timeout(callback!(pending = || {}), 10 + i % 4);
    }
    rt
}

fn bench_chained_timers(c: &mut Criterion) {
    let mut group = c.benchmark_group("chained_timers");

    for count in [10u64, 100, 1_000] {
        let rt = runtime_with_timers(count);
        group.bench_with_input(BenchmarkId::new("enumerate", count), &rt, |b, rt| {
            b.iter(|| enumerate(black_box(rt), &ProbeOptions::default()));
        });
    }

    group.finish();
}

fn bench_without_source(c: &mut Criterion) {
    let rt = runtime_with_timers(1_000);
    let opts = ProbeOptions::default()
        .with_source(false)
        .with_highlighted(false);

    c.bench_function("enumerate_no_source", |b| {
        b.iter(|| enumerate(black_box(&rt), &opts));
    });
}

criterion_group!(benches, bench_chained_timers, bench_without_source);
criterion_main!(benches);
