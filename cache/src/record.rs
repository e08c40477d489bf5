use crate::time;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A stored value together with the timestamps the expiration policies read.
#[derive(Debug)]
pub(crate) struct Record<V> {
  /// The user's value, wrapped in an Arc so reads never clone `V`.
  value: Arc<V>,
  /// Nanoseconds since the cache epoch of the last successful read.
  /// Atomic because readers refresh it while holding only a shared lock.
  last_access: AtomicU64,
  /// Nanoseconds since the cache epoch of the write that created this record.
  last_write: u64,
}

impl<V> Record<V> {
  /// Creates a record with both timestamps set to now.
  pub(crate) fn new(value: V) -> Self {
    let now = time::now_nanos();
    Self {
      value: Arc::new(value),
      last_access: AtomicU64::new(now),
      last_write: now,
    }
  }

  /// Returns a clone of the `Arc` containing the value.
  #[inline]
  pub(crate) fn value(&self) -> Arc<V> {
    self.value.clone()
  }

  #[inline]
  pub(crate) fn into_value(self) -> Arc<V> {
    self.value
  }

  /// Updates the last accessed timestamp to the current time.
  #[inline]
  pub(crate) fn touch(&self) {
    self.last_access.store(time::now_nanos(), Ordering::Relaxed);
  }

  /// True if `last_access + idle` lies strictly before `now_nanos`.
  #[inline]
  pub(crate) fn idle_expired(&self, idle: Duration, now_nanos: u64) -> bool {
    let last_access = self.last_access.load(Ordering::Relaxed);
    last_access.saturating_add(time::duration_to_nanos(idle)) < now_nanos
  }

  /// True if `last_write + age` lies strictly before `now_nanos`.
  #[inline]
  pub(crate) fn age_expired(&self, age: Duration, now_nanos: u64) -> bool {
    self.last_write.saturating_add(time::duration_to_nanos(age)) < now_nanos
  }
}
