use crate::record::Record;

use core::fmt;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use parking_lot::RwLock;

/// The key → record mapping behind a single reader/writer lock.
///
/// Every access goes through the methods below, so a partitioned or
/// finer-grained implementation can replace this type without touching the
/// handles. Closures passed to the mutating methods run while the exclusive
/// lock is held.
pub(crate) struct Storage<K, V, H> {
  map: RwLock<HashMap<K, Record<V>, H>>,
}

impl<K, V, H> fmt::Debug for Storage<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Storage")
      .field("len", &self.map.read().len())
      .finish()
  }
}

impl<K, V, H> Storage<K, V, H>
where
  K: Eq + Hash,
  H: BuildHasher + Clone,
{
  /// Creates storage pre-sized for `capacity` entries.
  pub(crate) fn new(capacity: usize, hasher: H) -> Self {
    Self {
      map: RwLock::new(HashMap::with_capacity_and_hasher(capacity, hasher)),
    }
  }

  /// Returns the value under a shared lock, refreshing its access time.
  pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
    let guard = self.map.read();
    guard.get(key).map(|record| {
      record.touch();
      record.value()
    })
  }

  pub(crate) fn contains_key(&self, key: &K) -> bool {
    self.map.read().contains_key(key)
  }

  /// Replaces or creates the record for `key` and returns the stored value.
  /// The previous record, if any, is dropped without notification.
  pub(crate) fn insert(&self, key: K, value: V) -> Arc<V> {
    let record = Record::new(value);
    let stored = record.value();
    self.map.write().insert(key, record);
    stored
  }

  /// Removes `key` if present, handing the owned key and value to
  /// `on_removed` before the exclusive lock is released.
  pub(crate) fn remove_with<F>(&self, key: &K, on_removed: F) -> bool
  where
    F: FnOnce(K, Arc<V>),
  {
    let mut guard = self.map.write();
    match guard.remove_entry(key) {
      Some((key, record)) => {
        on_removed(key, record.into_value());
        true
      }
      None => false,
    }
  }

  /// Removes every record for which `select` returns a reason, calling
  /// `on_removed` for each one under the same exclusive lock.
  /// Returns the number of removed records.
  pub(crate) fn remove_where<R, S, F>(&self, mut select: S, mut on_removed: F) -> usize
  where
    K: Clone,
    S: FnMut(&Record<V>) -> Option<R>,
    F: FnMut(K, Arc<V>, R),
  {
    let mut guard = self.map.write();

    let victims: Vec<(K, R)> = guard
      .iter()
      .filter_map(|(key, record)| select(record).map(|reason| (key.clone(), reason)))
      .collect();

    let mut removed = 0;
    for (key, reason) in victims {
      if let Some((key, record)) = guard.remove_entry(&key) {
        on_removed(key, record.into_value(), reason);
        removed += 1;
      }
    }
    removed
  }

  /// Copies every key and value out under one shared lock acquisition.
  pub(crate) fn snapshot(&self) -> HashMap<K, Arc<V>, H>
  where
    K: Clone,
  {
    let guard = self.map.read();
    let mut copy = HashMap::with_capacity_and_hasher(guard.len(), guard.hasher().clone());
    for (key, record) in guard.iter() {
      copy.insert(key.clone(), record.value());
    }
    copy
  }

  pub(crate) fn len(&self) -> usize {
    self.map.read().len()
  }
}
