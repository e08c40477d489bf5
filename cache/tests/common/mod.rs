#![allow(dead_code)]

use loadcache::{CacheError, EvictionListener, EvictionReason, Store, StoreBuilder};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TINY_TTI: Duration = Duration::from_millis(200);
pub const TINY_TTL: Duration = Duration::from_millis(200);
pub const SWEEP_TICK: Duration = Duration::from_millis(50);

/// An eviction listener that records every notification it receives.
pub struct Recorder<K, V> {
  events: Arc<Mutex<Vec<(K, V, EvictionReason)>>>,
}

impl<K, V> Clone for Recorder<K, V> {
  fn clone(&self) -> Self {
    Self {
      events: self.events.clone(),
    }
  }
}

impl<K: Clone, V: Clone> Recorder<K, V> {
  pub fn new() -> Self {
    Self {
      events: Arc::new(Mutex::new(Vec::new())),
    }
  }

  pub fn events(&self) -> Vec<(K, V, EvictionReason)> {
    self.events.lock().unwrap().clone()
  }

  pub fn count(&self) -> usize {
    self.events.lock().unwrap().len()
  }
}

impl<K, V> EvictionListener<K, V> for Recorder<K, V>
where
  K: Send,
  V: Clone + Send + Sync,
{
  fn on_evict(&self, key: K, value: Arc<V>, reason: EvictionReason) {
    self.events.lock().unwrap().push((key, (*value).clone(), reason));
  }
}

/// A store without a background sweeper, so expiration only happens on
/// explicit `cleanup_at` calls and tests control the clock.
pub fn manual_store(
  idle: Option<Duration>,
  age: Option<Duration>,
  recorder: &Recorder<&'static str, String>,
) -> Store<&'static str, String> {
  let mut builder = StoreBuilder::<&'static str, String>::new()
    .background_sweep(false)
    .eviction_listener(recorder.clone());
  if let Some(idle) = idle {
    builder = builder.time_to_idle(idle);
  }
  if let Some(age) = age {
    builder = builder.time_to_live(age);
  }
  builder.build().unwrap()
}

/// The error type used by loaders in the integration tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
  Missing,
  Backend(String),
}

impl From<CacheError> for LookupError {
  fn from(err: CacheError) -> Self {
    match err {
      CacheError::NoEntry => LookupError::Missing,
    }
  }
}
