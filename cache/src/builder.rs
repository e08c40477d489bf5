use crate::config::StoreConfig;
use crate::error::{BuildError, CacheError};
use crate::handles::{LoadingStore, Store};
use crate::loader::Loader;
use crate::metrics::Metrics;
use crate::shared::StoreShared;
use crate::store::Storage;
use crate::{time, EvictionListener};

use core::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// A builder for creating `Store` and `LoadingStore` instances.
///
/// Every setting is optional and applied before the store becomes active;
/// nothing can be reconfigured afterwards.
pub struct StoreBuilder<K, V, H = ahash::RandomState> {
  initial_capacity: usize,
  time_to_idle: Option<Duration>,
  time_to_live: Option<Duration>,
  sweep_interval: Duration,
  background_sweep: bool,
  hasher: H,
  listener: Option<Arc<dyn EvictionListener<K, V>>>,
  _key_marker: PhantomData<K>,
  _value_marker: PhantomData<V>,
}

impl<K, V, H> fmt::Debug for StoreBuilder<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("StoreBuilder")
      .field("initial_capacity", &self.initial_capacity)
      .field("time_to_idle", &self.time_to_idle)
      .field("time_to_live", &self.time_to_live)
      .field("sweep_interval", &self.sweep_interval)
      .field("background_sweep", &self.background_sweep)
      .field("has_listener", &self.listener.is_some())
      .finish_non_exhaustive()
  }
}

// --- General Configuration Methods ---
impl<K, V, H> StoreBuilder<K, V, H> {
  /// Pre-sizes the backing map. This is a hint, not a limit.
  pub fn initial_capacity(mut self, capacity: usize) -> Self {
    self.initial_capacity = capacity;
    self
  }

  /// Removes entries that have not been read for `duration`.
  pub fn time_to_idle(mut self, duration: Duration) -> Self {
    self.time_to_idle = Some(duration);
    self
  }

  /// Removes entries that have not been written for `duration`.
  pub fn time_to_live(mut self, duration: Duration) -> Self {
    self.time_to_live = Some(duration);
    self
  }

  /// Sets the delay between background sweeps. Defaults to one second.
  pub fn sweep_interval(mut self, interval: Duration) -> Self {
    self.sweep_interval = interval;
    self
  }

  /// Whether `build` starts the sweeper thread. Defaults to `true`.
  ///
  /// With `false`, expiration only happens on explicit `cleanup` calls
  /// until `start` is called.
  pub fn background_sweep(mut self, enabled: bool) -> Self {
    self.background_sweep = enabled;
    self
  }

  /// Sets the hasher for the backing map.
  pub fn hasher(mut self, hasher: H) -> Self {
    self.hasher = hasher;
    self
  }

  /// Sets the eviction listener, called on every delete and expiration.
  ///
  /// The listener runs under the store's exclusive lock and must not call
  /// back into the same store. Any `Fn(K, Arc<V>, EvictionReason)` works.
  pub fn eviction_listener<Listener>(mut self, listener: Listener) -> Self
  where
    Listener: EvictionListener<K, V> + 'static,
  {
    self.listener = Some(Arc::new(listener));
    self
  }
}

// --- Default Constructor ---
impl<K, V, H: BuildHasher + Default> StoreBuilder<K, V, H> {
  /// Creates a new `StoreBuilder` with default settings.
  pub fn new() -> Self {
    Self::from_config(&StoreConfig::default())
  }

  /// Creates a builder seeded from declarative settings.
  pub fn from_config(config: &StoreConfig) -> Self {
    Self {
      initial_capacity: config.initial_capacity,
      time_to_idle: config.time_to_idle,
      time_to_live: config.time_to_live,
      sweep_interval: config.sweep_interval,
      background_sweep: true,
      hasher: H::default(),
      listener: None,
      _key_marker: PhantomData,
      _value_marker: PhantomData,
    }
  }
}

impl<K, V> Default for StoreBuilder<K, V, ahash::RandomState> {
  fn default() -> Self {
    Self::new()
  }
}

// --- Build Methods ---
impl<K, V, H> StoreBuilder<K, V, H>
where
  K: Eq + Hash + Clone + Send + Sync + 'static,
  V: Send + Sync + 'static,
  H: BuildHasher + Clone + Send + Sync + 'static,
{
  /// Builds a plain `Store`.
  pub fn build(self) -> Result<Store<K, V, H>, BuildError> {
    self.validate()?;
    // Pin the timestamp epoch before any caller can capture an `Instant`
    // to pass to `cleanup_at`.
    time::now_nanos();

    let background_sweep = self.background_sweep;
    let sweep_interval = self.sweep_interval;
    let shared = StoreShared {
      storage: Storage::new(self.initial_capacity, self.hasher),
      metrics: Metrics::new(),
      listener: self.listener,
      time_to_idle: self.time_to_idle,
      time_to_live: self.time_to_live,
    };

    let store = Store::from_shared(shared, sweep_interval);
    if background_sweep {
      store.start()?;
    }
    Ok(store)
  }

  /// Builds a `LoadingStore` without a default loader.
  ///
  /// `get` then behaves like `Store::get`, and values can only be loaded
  /// through `get_or_load`.
  pub fn build_loading<E>(self) -> Result<LoadingStore<K, V, E, H>, BuildError>
  where
    E: From<CacheError>,
  {
    Ok(LoadingStore::new(self.build()?, None))
  }

  /// Builds a `LoadingStore` whose `get` and `refresh` call `loader` on a miss.
  pub fn build_with_loader<E, F>(self, loader: F) -> Result<LoadingStore<K, V, E, H>, BuildError>
  where
    E: From<CacheError>,
    F: Fn(K) -> Result<V, E> + Send + Sync + 'static,
  {
    let loader: Loader<K, V, E> = Arc::new(loader);
    Ok(LoadingStore::new(self.build()?, Some(loader)))
  }

  /// Validates the builder configuration.
  pub(crate) fn validate(&self) -> Result<(), BuildError> {
    if self.sweep_interval.is_zero() {
      return Err(BuildError::ZeroSweepInterval);
    }
    Ok(())
  }
}
