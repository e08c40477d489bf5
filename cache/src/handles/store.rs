use crate::error::{BuildError, CacheError};
use crate::handles::Cache;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::shared::StoreShared;
use crate::task::sweeper::Sweeper;

use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// A thread-safe key-value store with idle and age expiration.
///
/// All entries live in one map behind one reader/writer lock. `get` and
/// `snapshot` share it; `set`, `delete` and sweeps take it exclusively.
/// Expiration is lazy: an entry stays readable until a sweep removes it,
/// even if its deadline has already passed.
///
/// The store owns a background sweeper thread that is joined by [`Store::stop`]
/// or when the store is dropped.
///
/// # Example
///
/// ```rust
/// use loadcache::StoreBuilder;
/// use std::time::Duration;
///
/// let store = StoreBuilder::<&str, u32>::new()
///   .time_to_idle(Duration::from_secs(30))
///   .build()
///   .unwrap();
///
/// store.set("answer", 42).unwrap();
/// assert_eq!(*store.get(&"answer").unwrap(), 42);
/// store.stop();
/// ```
pub struct Store<K, V, H = ahash::RandomState> {
  pub(crate) shared: Arc<StoreShared<K, V, H>>,
  sweeper: Mutex<Option<Sweeper>>,
  sweep_interval: Duration,
}

impl<K, V, H> fmt::Debug for Store<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Store")
      .field("shared", &self.shared)
      .field("sweep_interval", &self.sweep_interval)
      .field("sweeping", &self.sweeper.lock().is_some())
      .finish()
  }
}

impl<K, V, H> Drop for Store<K, V, H> {
  fn drop(&mut self) {
    if let Some(sweeper) = self.sweeper.get_mut().take() {
      sweeper.stop();
    }
  }
}

impl<K, V, H> Store<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher + Clone,
{
  /// Returns the value for `key` and refreshes its idle timer.
  ///
  /// Returns [`CacheError::NoEntry`] if the key is absent. An entry whose
  /// deadline passed but which has not been swept yet is still returned.
  pub fn get(&self, key: &K) -> Result<Arc<V>, CacheError> {
    match self.shared.storage.get(key) {
      Some(value) => {
        Metrics::bump(&self.shared.metrics.hits);
        Ok(value)
      }
      None => {
        Metrics::bump(&self.shared.metrics.misses);
        Err(CacheError::NoEntry)
      }
    }
  }

  /// Creates or replaces the entry for `key`, resetting both timestamps.
  ///
  /// Replacing an entry does not notify the eviction listener. This never
  /// fails today; the `Result` leaves room for admission checks.
  pub fn set(&self, key: K, value: V) -> Result<(), CacheError> {
    self.put(key, value);
    Ok(())
  }

  /// Stores a value and hands back the shared handle to it.
  pub(crate) fn put(&self, key: K, value: V) -> Arc<V> {
    Metrics::bump(&self.shared.metrics.inserts);
    self.shared.storage.insert(key, value)
  }

  /// Removes `key` if present.
  ///
  /// The eviction listener is called with the removed value before the
  /// exclusive lock is released. Deleting an absent key does nothing.
  pub fn delete(&self, key: &K) {
    self.shared.delete(key);
  }

  /// Returns a copy of every entry, taken under one shared lock.
  ///
  /// The map is independent of the store: later writes are not reflected.
  pub fn snapshot(&self) -> HashMap<K, Arc<V>, H> {
    self.shared.storage.snapshot()
  }

  /// Applies the expiration policies as of now. See [`Store::cleanup_at`].
  pub fn cleanup(&self) -> usize {
    self.cleanup_at(Instant::now())
  }

  /// Removes every entry whose idle or age deadline lies strictly before `now`.
  ///
  /// Each removed entry is reported to the eviction listener once, idle
  /// expiration taking precedence over age expiration. Returns the number of
  /// removed entries.
  pub fn cleanup_at(&self, now: Instant) -> usize {
    self.shared.cleanup_at(now)
  }

  /// Checks for `key` without refreshing its idle timer.
  pub fn contains_key(&self, key: &K) -> bool {
    self.shared.storage.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.shared.storage.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.shared.metrics.snapshot()
  }

  pub fn time_to_idle(&self) -> Option<Duration> {
    self.shared.time_to_idle
  }

  pub fn time_to_live(&self) -> Option<Duration> {
    self.shared.time_to_live
  }

  pub fn sweep_interval(&self) -> Duration {
    self.sweep_interval
  }
}

impl<K, V, H> Store<K, V, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  H: BuildHasher + Clone + Send + Sync + 'static,
{
  pub(crate) fn from_shared(shared: StoreShared<K, V, H>, sweep_interval: Duration) -> Self {
    Self {
      shared: Arc::new(shared),
      sweeper: Mutex::new(None),
      sweep_interval,
    }
  }

  /// Starts the background sweeper. Does nothing if it is already running.
  ///
  /// A sweeper whose thread died (a listener panicked mid-sweep) is reaped
  /// and replaced.
  pub fn start(&self) -> Result<(), BuildError> {
    let mut sweeper = self.sweeper.lock();
    if sweeper.as_ref().is_some_and(Sweeper::is_running) {
      return Ok(());
    }
    if let Some(dead) = sweeper.take() {
      dead.stop();
    }
    *sweeper = Some(Sweeper::spawn(self.shared.clone(), self.sweep_interval)?);
    Ok(())
  }

  /// Stops the background sweeper and waits for it to exit.
  ///
  /// A sweep already in progress completes first; once this returns no
  /// sweep runs and the listener is not called from the background. Calling
  /// it again, or on a store that never started sweeping, is a no-op.
  /// Explicit `cleanup` calls keep working afterwards.
  ///
  /// Must not be called from inside an eviction listener.
  pub fn stop(&self) {
    let sweeper = self.sweeper.lock().take();
    if let Some(sweeper) = sweeper {
      sweeper.stop();
    }
  }

  /// Whether a background sweeper thread is alive for this store.
  pub fn is_sweeping(&self) -> bool {
    self.sweeper.lock().as_ref().is_some_and(Sweeper::is_running)
  }
}

impl<K, V, H> Cache<K, V, H> for Store<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher + Clone,
{
  type Error = CacheError;

  fn get(&self, key: &K) -> Result<Arc<V>, CacheError> {
    Store::get(self, key)
  }

  fn set(&self, key: K, value: V) -> Result<(), CacheError> {
    Store::set(self, key, value)
  }

  fn delete(&self, key: &K) {
    Store::delete(self, key)
  }

  fn snapshot(&self) -> HashMap<K, Arc<V>, H> {
    Store::snapshot(self)
  }

  fn cleanup(&self) -> usize {
    Store::cleanup(self)
  }
}
