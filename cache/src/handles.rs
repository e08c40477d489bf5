//! The user-facing handles and the uniform interface they share.

mod loading;
mod store;

pub use loading::LoadingStore;
pub use store::Store;

use crate::loader::FallbackLoader;

use std::collections::HashMap;
use std::sync::Arc;

/// The operations every cache handle supports.
///
/// Lookups hand out the stored `Arc<V>`; nothing here clones `V` itself.
pub trait Cache<K, V, H = ahash::RandomState> {
  /// Error returned by lookups.
  type Error;

  /// Returns the value for `key`, refreshing its idle timer.
  fn get(&self, key: &K) -> Result<Arc<V>, Self::Error>;

  /// Creates or overwrites the entry for `key`, resetting both timers.
  fn set(&self, key: K, value: V) -> Result<(), Self::Error>;

  /// Removes `key`, notifying the eviction listener if it was present.
  fn delete(&self, key: &K);

  /// Copies out every current entry under a single lock acquisition.
  fn snapshot(&self) -> HashMap<K, Arc<V>, H>;

  /// Runs an expiration sweep immediately and returns how many entries it removed.
  fn cleanup(&self) -> usize;
}

/// A cache that can compute missing values.
pub trait LoadingCache<K, V, H = ahash::RandomState>: Cache<K, V, H> {
  /// Returns the cached value, or tries `loaders` in order on a miss.
  fn get_or_load(
    &self,
    key: &K,
    loaders: &[FallbackLoader<'_, K, V, Self::Error>],
  ) -> Result<Arc<V>, Self::Error>;

  /// Reloads an entry that is currently present with the default loader.
  fn refresh(&self, key: &K) -> Result<(), Self::Error>;
}
