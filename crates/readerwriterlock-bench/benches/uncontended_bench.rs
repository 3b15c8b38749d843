//! Uncontended acquire/release cost per policy.
//!
//! Measures a single thread cycling one handle, which isolates the
//! bookkeeping each core does on its fast path.

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use readerwriterlock_core::{AnyRwLock, Lock, Policy};

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.throughput(Throughput::Elements(1));

    for policy in Policy::ALL {
        let lock = AnyRwLock::new(policy);

        let mut read = lock.generate_read_lock();
        group.bench_function(BenchmarkId::new("read_cycle", policy), |b| {
            b.iter(|| {
                black_box(read.acquire(true, None));
                read.release().expect("read handle holds the lock");
            });
        });

        let mut write = lock.generate_write_lock();
        group.bench_function(BenchmarkId::new("write_cycle", policy), |b| {
            b.iter(|| {
                black_box(write.acquire(true, None));
                write.release().expect("write handle holds the lock");
            });
        });

        group.bench_function(BenchmarkId::new("try_read_cycle", policy), |b| {
            b.iter(|| {
                if read.acquire(false, None) {
                    read.release().expect("read handle holds the lock");
                }
            });
        });

        group.bench_function(BenchmarkId::new("scoped_write", policy), |b| {
            b.iter(|| write.with_lock(|| black_box(1_u64)).expect("scoped write"));
        });
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(200))
        .measurement_time(Duration::from_secs(2))
        .sample_size(100);
    targets = bench_uncontended
);
criterion_main!(benches);
