mod common;

use common::Recorder;
use loadcache::{Cache, CacheError, EvictionReason, StoreBuilder};
use std::sync::Arc;

#[test]
fn test_get_on_empty_store() {
  let store = StoreBuilder::<&str, String>::new().build().unwrap();

  assert_eq!(store.get(&"bogus-123").unwrap_err(), CacheError::NoEntry);
  assert!(store.is_empty());
  assert_eq!(store.metrics().misses, 1);
}

#[test]
fn test_set_then_get() {
  let store = StoreBuilder::<&str, String>::new().build().unwrap();

  store.set("bogus-123", "test".to_string()).unwrap();

  let value = store.get(&"bogus-123").unwrap();
  assert_eq!(*value, "test");
  assert_eq!(store.len(), 1);

  let metrics = store.metrics();
  assert_eq!(metrics.inserts, 1);
  assert_eq!(metrics.hits, 1);
}

#[test]
fn test_overwrite_replaces_value_without_eviction() {
  let recorder = Recorder::<&'static str, String>::new();
  let store = StoreBuilder::<&str, String>::new()
    .initial_capacity(1)
    .eviction_listener(recorder.clone())
    .build()
    .unwrap();

  store.set("bogus-123", "first".to_string()).unwrap();
  store.set("bogus-123", "second".to_string()).unwrap();

  assert_eq!(*store.get(&"bogus-123").unwrap(), "second");
  assert_eq!(store.len(), 1);
  assert_eq!(recorder.count(), 0, "an overwrite is not an eviction");
}

#[test]
fn test_delete_notifies_once() {
  let recorder = Recorder::<&'static str, String>::new();
  let store = StoreBuilder::<&str, String>::new()
    .eviction_listener(recorder.clone())
    .build()
    .unwrap();

  store.set("bogus-123", "test".to_string()).unwrap();
  store.delete(&"bogus-123");

  assert_eq!(store.get(&"bogus-123").unwrap_err(), CacheError::NoEntry);
  assert_eq!(
    recorder.events(),
    vec![("bogus-123", "test".to_string(), EvictionReason::Deleted)]
  );

  // Deleting again is a silent no-op.
  store.delete(&"bogus-123");
  assert_eq!(recorder.count(), 1);
  assert_eq!(store.metrics().deletes, 1);
}

#[test]
fn test_delete_absent_key_is_noop() {
  let recorder = Recorder::<&'static str, String>::new();
  let store = StoreBuilder::<&str, String>::new()
    .eviction_listener(recorder.clone())
    .build()
    .unwrap();

  store.delete(&"never-set");
  assert_eq!(recorder.count(), 0);
}

#[test]
fn test_snapshot_is_independent_copy() {
  let store = StoreBuilder::<&str, String>::new().build().unwrap();
  store.set("a", "1".to_string()).unwrap();
  store.set("b", "2".to_string()).unwrap();

  let snapshot = store.snapshot();
  store.set("c", "3".to_string()).unwrap();
  store.delete(&"a");

  assert_eq!(snapshot.len(), 2);
  assert_eq!(snapshot.get("a").map(|v| v.as_str()), Some("1"));
  assert_eq!(snapshot.get("b").map(|v| v.as_str()), Some("2"));
  assert!(!snapshot.contains_key("c"));
}

#[test]
fn test_get_returns_shared_value() {
  struct NotClone(u32);

  let store = StoreBuilder::<u32, NotClone>::new().build().unwrap();
  store.set(1, NotClone(7)).unwrap();

  let first = store.get(&1).unwrap();
  let second = store.get(&1).unwrap();
  assert!(Arc::ptr_eq(&first, &second));
  assert_eq!(first.0, 7);
}

#[test]
fn test_contains_key_does_not_count_as_hit() {
  let store = StoreBuilder::<&str, String>::new().build().unwrap();
  store.set("k", "v".to_string()).unwrap();

  assert!(store.contains_key(&"k"));
  assert!(!store.contains_key(&"other"));
  assert_eq!(store.metrics().hits, 0);
}

fn exercise<C>(cache: &C)
where
  C: Cache<u32, u32, Error = CacheError>,
{
  cache.set(1, 10).unwrap();
  cache.set(2, 20).unwrap();
  assert_eq!(*cache.get(&1).unwrap(), 10);
  cache.delete(&1);
  assert_eq!(cache.get(&1).unwrap_err(), CacheError::NoEntry);
  assert_eq!(cache.snapshot().len(), 1);
  assert_eq!(cache.cleanup(), 0);
}

#[test]
fn test_uniform_interface() {
  let store = StoreBuilder::<u32, u32>::new().build().unwrap();
  exercise(&store);

  let loading = StoreBuilder::<u32, u32>::new().build_loading::<CacheError>().unwrap();
  exercise(&loading);
}
