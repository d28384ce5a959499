//! Basic benchmarks for the `recycle_pool` crate, comparing pooled memory with fresh allocations.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use recycle_pool::{BytePool, ObjectPool, PoolRegistry, Record};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

const BUFFER_SIZE: usize = 1024;

#[derive(Clone, Copy)]
struct TestRecord {
    id: u64,
    values: [u32; 16],
}

// SAFETY: Integers only, all-zero valid.
unsafe impl Record for TestRecord {}

const TEST_RECORD: TestRecord = TestRecord {
    id: 42,
    values: [7; 16],
};

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("recycle_bytes");

    let allocs_op = allocs.operation("vec_alloc_zeroed");
    group.bench_function("vec_alloc_zeroed", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(vec![0_u8; BUFFER_SIZE]));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("byte_pool_round_trip");
    group.bench_function("byte_pool_round_trip", |b| {
        b.iter_custom(|iters| {
            let pool = BytePool::new(BUFFER_SIZE);
            pool.release(pool.acquire());

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let buffer = black_box(pool.acquire());
                pool.release(buffer);
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("byte_pool_round_trip_zeroed");
    group.bench_function("byte_pool_round_trip_zeroed", |b| {
        b.iter_custom(|iters| {
            let pool = BytePool::new(BUFFER_SIZE);
            pool.release(pool.acquire());

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let buffer = black_box(pool.acquire_zeroed());
                pool.release(buffer);
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("registry_round_trip");
    group.bench_function("registry_round_trip", |b| {
        b.iter_custom(|iters| {
            let registry = PoolRegistry::global();
            registry.release(registry.acquire_sized(700));

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let buffer = black_box(registry.acquire_sized(black_box(700)));
                registry.release(buffer);
            }

            start.elapsed()
        });
    });

    group.finish();

    let mut group = c.benchmark_group("recycle_records");

    let allocs_op = allocs.operation("box_alloc");
    group.bench_function("box_alloc", |b| {
        b.iter_custom(|iters| {
            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(Box::new(black_box(TEST_RECORD))));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("object_pool_release");
    group.bench_function("object_pool_release", |b| {
        b.iter_custom(|iters| {
            let pool = ObjectPool::<TestRecord>::new().unwrap();
            pool.release(pool.acquire(false));

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let mut record = pool.acquire_zeroed(false);
                record.id = black_box(1);
                pool.release(record);
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("object_pool_retained_drop");
    group.bench_function("object_pool_retained_drop", |b| {
        b.iter_custom(|iters| {
            let pool = ObjectPool::<TestRecord>::new().unwrap();
            pool.release(pool.acquire(false));

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                let mut record = pool.acquire_zeroed(true);
                record.id = black_box(1);
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("object_pool_copy");
    group.bench_function("object_pool_copy", |b| {
        b.iter_custom(|iters| {
            let pool = ObjectPool::<TestRecord>::new().unwrap();
            pool.release(pool.acquire(false));

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for _ in 0..iters {
                drop(black_box(pool.copy(&TEST_RECORD, true)));
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
