use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// A thread-safe, internal metrics collector for a store.
/// All fields are atomic so they can be bumped under a shared lock.
#[derive(Debug)]
pub(crate) struct Metrics {
  // --- Hit/Miss Ratios ---
  pub(crate) hits: AtomicU64,
  pub(crate) misses: AtomicU64,

  // --- Throughput ---
  pub(crate) inserts: AtomicU64,
  pub(crate) deletes: AtomicU64,

  // --- Expiration ---
  pub(crate) evicted_by_idle: AtomicU64,
  pub(crate) evicted_by_age: AtomicU64,
  pub(crate) sweeps: AtomicU64,

  // --- Loading ---
  pub(crate) loads: AtomicU64,
  pub(crate) load_failures: AtomicU64,
  pub(crate) refreshes: AtomicU64,

  created_at: Instant,
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      hits: AtomicU64::new(0),
      misses: AtomicU64::new(0),
      inserts: AtomicU64::new(0),
      deletes: AtomicU64::new(0),
      evicted_by_idle: AtomicU64::new(0),
      evicted_by_age: AtomicU64::new(0),
      sweeps: AtomicU64::new(0),
      loads: AtomicU64::new(0),
      load_failures: AtomicU64::new(0),
      refreshes: AtomicU64::new(0),
      created_at: Instant::now(),
    }
  }
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  #[inline]
  pub(crate) fn bump(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
  }

  /// Creates a point-in-time snapshot of the current metrics.
  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let total_lookups = hits + misses;

    MetricsSnapshot {
      hits,
      misses,
      hit_ratio: if total_lookups == 0 {
        0.0
      } else {
        hits as f64 / total_lookups as f64
      },
      inserts: self.inserts.load(Ordering::Relaxed),
      deletes: self.deletes.load(Ordering::Relaxed),
      evicted_by_idle: self.evicted_by_idle.load(Ordering::Relaxed),
      evicted_by_age: self.evicted_by_age.load(Ordering::Relaxed),
      sweeps: self.sweeps.load(Ordering::Relaxed),
      loads: self.loads.load(Ordering::Relaxed),
      load_failures: self.load_failures.load(Ordering::Relaxed),
      refreshes: self.refreshes.load(Ordering::Relaxed),
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }
}

/// A point-in-time, public-facing snapshot of a store's metrics.
#[derive(Clone)]
pub struct MetricsSnapshot {
  /// The number of lookups that found an entry.
  pub hits: u64,
  /// The number of lookups that found nothing.
  pub misses: u64,
  /// The hit ratio (hits / (hits + misses)).
  pub hit_ratio: f64,
  /// The total number of `set` calls, including overwrites and loaded values.
  pub inserts: u64,
  /// The number of entries removed by `delete`.
  pub deletes: u64,
  /// The number of entries removed because they sat idle too long.
  pub evicted_by_idle: u64,
  /// The number of entries removed because they were written too long ago.
  pub evicted_by_age: u64,
  /// The number of completed cleanup passes, manual or background.
  pub sweeps: u64,
  /// The number of successful loader invocations.
  pub loads: u64,
  /// The number of failed loader invocations.
  pub load_failures: u64,
  /// The number of successful refreshes.
  pub refreshes: u64,
  /// The number of seconds the store has existed.
  pub uptime_secs: u64,
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("inserts", &self.inserts)
      .field("deletes", &self.deletes)
      .field("evicted_by_idle", &self.evicted_by_idle)
      .field("evicted_by_age", &self.evicted_by_age)
      .field("sweeps", &self.sweeps)
      .field("loads", &self.loads)
      .field("load_failures", &self.load_failures)
      .field("refreshes", &self.refreshes)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
