//! Contended throughput per policy.
//!
//! Several reader threads and one writer thread cycle handles on a shared
//! lock; the measured time is until every thread finishes its share. The
//! policies trade reader throughput against writer latency, so the spread
//! between them grows with the reader count.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use readerwriterlock_core::{AnyRwLock, Lock, Policy};

const READER_COUNTS: [usize; 3] = [1, 4, 8];

fn run_mix(policy: Policy, readers: usize, iters: u64) -> Duration {
    let lock = Arc::new(AnyRwLock::new(policy));
    let start_line = Arc::new(Barrier::new(readers + 2));
    let mut workers = Vec::with_capacity(readers + 1);

    for _ in 0..readers {
        let lock = Arc::clone(&lock);
        let start_line = Arc::clone(&start_line);
        workers.push(thread::spawn(move || {
            let mut read = lock.generate_read_lock();
            start_line.wait();
            for _ in 0..iters {
                read.with_lock(|| black_box(())).expect("reader scope");
            }
        }));
    }

    {
        let lock = Arc::clone(&lock);
        let start_line = Arc::clone(&start_line);
        workers.push(thread::spawn(move || {
            let mut write = lock.generate_write_lock();
            start_line.wait();
            for _ in 0..iters {
                write.with_lock(|| black_box(())).expect("writer scope");
            }
        }));
    }

    start_line.wait();
    let start = Instant::now();
    for worker in workers {
        worker.join().expect("bench worker panicked");
    }
    start.elapsed().max(Duration::from_nanos(1))
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    for readers in READER_COUNTS {
        group.throughput(Throughput::Elements((readers + 1) as u64));
        for policy in Policy::ALL {
            group.bench_with_input(
                BenchmarkId::new(policy.as_str(), readers),
                &readers,
                |b, &readers| b.iter_custom(|iters| run_mix(policy, readers, iters)),
            );
        }
    }

    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .warm_up_time(Duration::from_millis(200))
        .measurement_time(Duration::from_secs(3))
        .sample_size(20);
    targets = bench_contended
);
criterion_main!(benches);
