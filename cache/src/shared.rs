use crate::listener::{EvictionListener, EvictionReason};
use crate::metrics::Metrics;
use crate::store::Storage;
use crate::time;

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The internal, thread-safe core shared by a store handle and its sweeper.
pub(crate) struct StoreShared<K, V, H> {
  pub(crate) storage: Storage<K, V, H>,
  pub(crate) metrics: Metrics,
  pub(crate) listener: Option<Arc<dyn EvictionListener<K, V>>>,
  pub(crate) time_to_idle: Option<Duration>,
  pub(crate) time_to_live: Option<Duration>,
}

impl<K, V, H> fmt::Debug for StoreShared<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StoreShared")
      .field("time_to_idle", &self.time_to_idle)
      .field("time_to_live", &self.time_to_live)
      .field("has_listener", &self.listener.is_some())
      .field("metrics", &self.metrics.snapshot())
      .finish_non_exhaustive()
  }
}

impl<K, V, H> StoreShared<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher + Clone,
{
  /// Hands a removed entry to the listener and records why it left.
  fn on_removed(&self, key: K, value: Arc<V>, reason: EvictionReason) {
    match reason {
      EvictionReason::IdleExpired => Metrics::bump(&self.metrics.evicted_by_idle),
      EvictionReason::AgeExpired => Metrics::bump(&self.metrics.evicted_by_age),
      EvictionReason::Deleted => Metrics::bump(&self.metrics.deletes),
    }
    if let Some(listener) = &self.listener {
      listener.on_evict(key, value, reason);
    }
  }

  pub(crate) fn delete(&self, key: &K) {
    self.storage.remove_with(key, |key, value| {
      self.on_removed(key, value, EvictionReason::Deleted)
    });
  }

  /// Applies both expiration policies as of `now`.
  ///
  /// Idle expiration is checked first; a record removed for idleness is
  /// never also reported as aged out.
  pub(crate) fn cleanup_at(&self, now: Instant) -> usize {
    let removed = match (self.time_to_idle, self.time_to_live) {
      (None, None) => 0,
      (idle, age) => {
        let now_nanos = time::instant_to_nanos(now);
        self.storage.remove_where(
          |record| {
            if idle.is_some_and(|idle| record.idle_expired(idle, now_nanos)) {
              Some(EvictionReason::IdleExpired)
            } else if age.is_some_and(|age| record.age_expired(age, now_nanos)) {
              Some(EvictionReason::AgeExpired)
            } else {
              None
            }
          },
          |key, value, reason| self.on_removed(key, value, reason),
        )
      }
    };
    Metrics::bump(&self.metrics.sweeps);
    removed
  }
}
