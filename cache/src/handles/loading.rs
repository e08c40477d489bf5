use crate::error::{BuildError, CacheError};
use crate::handles::{Cache, LoadingCache, Store};
use crate::loader::{self, FallbackLoader, Loader};
use crate::metrics::{Metrics, MetricsSnapshot};

use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;
use std::time::Instant;

/// A [`Store`] that can compute missing values.
///
/// Loaders are plain closures returning `Result<V, E>`. A loader error is
/// handed back to the caller unchanged, and a failed load never touches the
/// store. `E` must be constructible from [`CacheError`] so that misses
/// without a usable loader can be reported in the caller's error type.
///
/// Loads are not deduplicated: concurrent misses on one key each run the
/// loader, and the last `set` wins.
///
/// # Example
///
/// ```rust
/// use loadcache::{CacheError, StoreBuilder};
///
/// let users = StoreBuilder::<u64, String>::new()
///   .build_with_loader(|id: u64| Ok::<_, CacheError>(format!("user-{id}")))
///   .unwrap();
///
/// assert_eq!(*users.get(&7).unwrap(), "user-7");
/// assert!(users.contains_key(&7));
/// ```
pub struct LoadingStore<K, V, E = CacheError, H = ahash::RandomState> {
  store: Store<K, V, H>,
  loader: Option<Loader<K, V, E>>,
}

impl<K, V, E, H> fmt::Debug for LoadingStore<K, V, E, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LoadingStore")
      .field("store", &self.store)
      .field("has_loader", &self.loader.is_some())
      .finish()
  }
}

impl<K, V, E, H> LoadingStore<K, V, E, H> {
  pub(crate) fn new(store: Store<K, V, H>, loader: Option<Loader<K, V, E>>) -> Self {
    Self { store, loader }
  }

  /// The wrapped store. Lookups through it never invoke a loader.
  pub fn store(&self) -> &Store<K, V, H> {
    &self.store
  }

  pub fn has_loader(&self) -> bool {
    self.loader.is_some()
  }
}

impl<K, V, E, H> LoadingStore<K, V, E, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher + Clone,
  E: From<CacheError>,
{
  /// Returns the cached value, or runs the default loader on a miss.
  ///
  /// A loaded value is stored before it is returned. Without a default
  /// loader a miss yields `NoEntry`.
  pub fn get(&self, key: &K) -> Result<Arc<V>, E> {
    if let Ok(value) = self.store.get(key) {
      return Ok(value);
    }
    match &self.loader {
      Some(load) => self.load_and_store(key, load.as_ref()),
      None => Err(CacheError::NoEntry.into()),
    }
  }

  /// Returns the cached value, or tries `loaders` in order on a miss.
  ///
  /// A hit refreshes the idle timer exactly like [`LoadingStore::get`] and
  /// calls no loader. On a miss the first successful loader's value is
  /// stored and returned. If every loader fails, the last error is returned
  /// and nothing is stored. An empty `loaders` slice on a miss yields
  /// `NoEntry`; the default loader is not consulted.
  pub fn get_or_load(&self, key: &K, loaders: &[FallbackLoader<'_, K, V, E>]) -> Result<Arc<V>, E> {
    if let Ok(value) = self.store.get(key) {
      return Ok(value);
    }

    let metrics = &self.store.shared.metrics;
    let outcome = loader::first_success(key, loaders, |ok| {
      if ok {
        Metrics::bump(&metrics.loads);
      } else {
        Metrics::bump(&metrics.load_failures);
      }
    });

    match outcome {
      Some(Ok(value)) => Ok(self.store.put(key.clone(), value)),
      Some(Err(err)) => {
        tracing::debug!(attempts = loaders.len(), "all fallback loaders failed");
        Err(err)
      }
      None => Err(CacheError::NoEntry.into()),
    }
  }

  /// Reloads `key` with the default loader, if the key is currently present.
  ///
  /// An absent key yields `NoEntry` and nothing is loaded; refresh never
  /// creates entries. The key may still expire between the presence check
  /// and the reload, in which case the reload re-creates it. On success both
  /// timestamps are reset. A loader error leaves the existing entry alone.
  /// A store built without a default loader answers `NoEntry`.
  pub fn refresh(&self, key: &K) -> Result<(), E> {
    if !self.store.contains_key(key) {
      tracing::debug!("refresh skipped, key not present");
      return Err(CacheError::NoEntry.into());
    }
    let Some(load) = &self.loader else {
      return Err(CacheError::NoEntry.into());
    };

    self.load_and_store(key, load.as_ref())?;
    Metrics::bump(&self.store.shared.metrics.refreshes);
    Ok(())
  }

  fn load_and_store<F>(&self, key: &K, load: F) -> Result<Arc<V>, E>
  where
    F: FnOnce(K) -> Result<V, E>,
  {
    let metrics = &self.store.shared.metrics;
    match load(key.clone()) {
      Ok(value) => {
        Metrics::bump(&metrics.loads);
        Ok(self.store.put(key.clone(), value))
      }
      Err(err) => {
        Metrics::bump(&metrics.load_failures);
        tracing::debug!("loader failed, store left unchanged");
        Err(err)
      }
    }
  }

  /// See [`Store::set`].
  pub fn set(&self, key: K, value: V) -> Result<(), E> {
    self.store.set(key, value).map_err(E::from)
  }

  /// See [`Store::delete`].
  pub fn delete(&self, key: &K) {
    self.store.delete(key)
  }

  /// See [`Store::snapshot`].
  pub fn snapshot(&self) -> HashMap<K, Arc<V>, H> {
    self.store.snapshot()
  }

  /// See [`Store::cleanup`].
  pub fn cleanup(&self) -> usize {
    self.store.cleanup()
  }

  /// See [`Store::cleanup_at`].
  pub fn cleanup_at(&self, now: Instant) -> usize {
    self.store.cleanup_at(now)
  }

  pub fn contains_key(&self, key: &K) -> bool {
    self.store.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.store.is_empty()
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.store.metrics()
  }
}

impl<K, V, E, H> LoadingStore<K, V, E, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  H: BuildHasher + Clone + Send + Sync + 'static,
{
  /// See [`Store::start`].
  pub fn start(&self) -> Result<(), BuildError> {
    self.store.start()
  }

  /// See [`Store::stop`].
  pub fn stop(&self) {
    self.store.stop()
  }

  pub fn is_sweeping(&self) -> bool {
    self.store.is_sweeping()
  }
}

impl<K, V, E, H> Cache<K, V, H> for LoadingStore<K, V, E, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher + Clone,
  E: From<CacheError>,
{
  type Error = E;

  fn get(&self, key: &K) -> Result<Arc<V>, E> {
    LoadingStore::get(self, key)
  }

  fn set(&self, key: K, value: V) -> Result<(), E> {
    LoadingStore::set(self, key, value)
  }

  fn delete(&self, key: &K) {
    LoadingStore::delete(self, key)
  }

  fn snapshot(&self) -> HashMap<K, Arc<V>, H> {
    LoadingStore::snapshot(self)
  }

  fn cleanup(&self) -> usize {
    LoadingStore::cleanup(self)
  }
}

impl<K, V, E, H> LoadingCache<K, V, H> for LoadingStore<K, V, E, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher + Clone,
  E: From<CacheError>,
{
  fn get_or_load(&self, key: &K, loaders: &[FallbackLoader<'_, K, V, E>]) -> Result<Arc<V>, E> {
    LoadingStore::get_or_load(self, key, loaders)
  }

  fn refresh(&self, key: &K) -> Result<(), E> {
    LoadingStore::refresh(self, key)
  }
}
