// Benchmarks for the stub status parser

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use stub_status::{StubStatus, parse};

const NGINX_BODY: &[u8] = b"Active connections: 291 \n\
server accepts handled requests\n \
16630948 16630948 31070465 \n\
Reading: 6 Writing: 179 Waiting: 106 \n";

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("nginx_body", |b| {
        b.iter(|| parse(black_box(NGINX_BODY)))
    });

    let canonical = StubStatus {
        active: u64::MAX,
        accepted: u64::MAX,
        handled: u64::MAX,
        requests: u64::MAX,
        reading: u64::MAX,
        writing: u64::MAX,
        waiting: u64::MAX,
    }
    .to_string();
    group.bench_function("max_values", |b| {
        b.iter(|| parse(black_box(canonical.as_bytes())))
    });

    group.bench_function("malformed", |b| {
        b.iter(|| parse(black_box(b"<html>502 Bad Gateway</html>".as_slice())))
    });

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
