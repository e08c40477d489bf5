mod common;

use common::{manual_store, Recorder, SWEEP_TICK, TINY_TTL};
use loadcache::{CacheError, EvictionReason, StoreBuilder};
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_reads_do_not_extend_age() {
  let recorder = Recorder::new();
  let age = Duration::from_millis(20);
  let store = manual_store(None, Some(age), &recorder);

  store.set("key", "value".to_string()).unwrap();
  for _ in 0..5 {
    thread::sleep(Duration::from_millis(5));
    store.get(&"key").unwrap();
  }

  assert_eq!(store.cleanup_at(Instant::now() + age), 1);
  assert_eq!(
    recorder.events(),
    vec![("key", "value".to_string(), EvictionReason::AgeExpired)]
  );
  assert_eq!(store.metrics().evicted_by_age, 1);
}

#[test]
fn test_overwrite_resets_age() {
  let recorder = Recorder::new();
  let age = Duration::from_millis(20);
  let store = manual_store(None, Some(age), &recorder);

  store.set("fresh", "v1".to_string()).unwrap();
  store.set("stale", "v1".to_string()).unwrap();
  thread::sleep(Duration::from_millis(30));

  let before_overwrite = Instant::now();
  store.set("fresh", "v2".to_string()).unwrap();

  assert_eq!(store.cleanup_at(before_overwrite + Duration::from_millis(1)), 1);
  assert_eq!(*store.get(&"fresh").unwrap(), "v2");
  assert_eq!(store.get(&"stale").unwrap_err(), CacheError::NoEntry);
  assert_eq!(
    recorder.events(),
    vec![("stale", "v1".to_string(), EvictionReason::AgeExpired)]
  );
}

#[test]
fn test_idle_takes_precedence_over_age() {
  let recorder = Recorder::new();
  let store = manual_store(
    Some(Duration::from_millis(10)),
    Some(Duration::from_millis(10)),
    &recorder,
  );

  store.set("key", "value".to_string()).unwrap();

  assert_eq!(store.cleanup_at(Instant::now() + Duration::from_millis(50)), 1);
  assert_eq!(
    recorder.events(),
    vec![("key", "value".to_string(), EvictionReason::IdleExpired)],
    "one notification, reported as idle"
  );
  let metrics = store.metrics();
  assert_eq!(metrics.evicted_by_idle, 1);
  assert_eq!(metrics.evicted_by_age, 0);
}

#[test]
fn test_item_expires_after_ttl_without_reads() {
  let store = StoreBuilder::<&str, &str>::new()
    .time_to_live(TINY_TTL)
    .sweep_interval(SWEEP_TICK)
    .build()
    .unwrap();

  store.set("key", "value").unwrap();
  assert!(store.contains_key(&"key"));

  thread::sleep(TINY_TTL + SWEEP_TICK * 3);

  assert_eq!(store.get(&"key").unwrap_err(), CacheError::NoEntry);
}
