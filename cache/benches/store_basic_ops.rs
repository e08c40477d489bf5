use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use loadcache::{CacheError, StoreBuilder};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

const NUM_ITEMS: u64 = 10_000;

fn bench_single_thread(c: &mut Criterion) {
  let mut group = c.benchmark_group("single_thread");
  group.throughput(Throughput::Elements(1));

  let store = StoreBuilder::<u64, u64>::new().build().unwrap();
  for i in 0..NUM_ITEMS {
    store.set(i, i).unwrap();
  }

  let mut key = 0u64;
  group.bench_function("get_hit", |b| {
    b.iter(|| {
      key = (key + 1) % NUM_ITEMS;
      black_box(store.get(&key).unwrap());
    })
  });

  group.bench_function("get_miss", |b| {
    b.iter(|| black_box(store.get(&(NUM_ITEMS + 1)).is_err()))
  });

  group.bench_function("set", |b| {
    b.iter(|| {
      key = (key + 1) % NUM_ITEMS;
      store.set(key, key).unwrap();
    })
  });

  let loading = StoreBuilder::<u64, u64>::new()
    .build_with_loader(|key: u64| Ok::<_, CacheError>(key * 2))
    .unwrap();
  group.bench_function("load_on_miss", |b| {
    b.iter(|| {
      key += 1;
      black_box(loading.get(&key).unwrap());
    })
  });

  group.finish();
}

fn bench_contended_get(c: &mut Criterion) {
  let mut group = c.benchmark_group("contended_get");

  for concurrency in [2usize, 4, 8] {
    let store = Arc::new(StoreBuilder::<u64, u64>::new().build().unwrap());
    for i in 0..NUM_ITEMS {
      store.set(i, i).unwrap();
    }

    group.throughput(Throughput::Elements(concurrency as u64));
    group.bench_with_input(BenchmarkId::from_parameter(concurrency), &concurrency, |b, &n| {
      b.iter_custom(|iters| {
        let barrier = Arc::new(Barrier::new(n + 1));
        let handles: Vec<_> = (0..n)
          .map(|t| {
            let store = store.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
              barrier.wait();
              for i in 0..iters {
                black_box(store.get(&((i + t as u64) % NUM_ITEMS)).unwrap());
              }
            })
          })
          .collect();

        let start = Instant::now();
        barrier.wait();
        for handle in handles {
          handle.join().unwrap();
        }
        start.elapsed()
      })
    });
  }

  group.finish();
}

criterion_group!(benches, bench_single_thread, bench_contended_get);
criterion_main!(benches);
