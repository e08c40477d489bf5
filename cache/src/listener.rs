use std::fmt;
use std::sync::Arc;

/// Describes the reason an entry was removed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
  /// The entry was not read within the configured idle duration.
  IdleExpired,
  /// The entry was not rewritten within the configured age duration.
  AgeExpired,
  /// The entry was removed by an explicit `delete`.
  Deleted,
}

impl EvictionReason {
  /// True for the two expiration reasons.
  pub fn is_expiration(&self) -> bool {
    matches!(self, EvictionReason::IdleExpired | EvictionReason::AgeExpired)
  }
}

impl fmt::Display for EvictionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionReason::IdleExpired => write!(f, "expired after idle period"),
      EvictionReason::AgeExpired => write!(f, "expired after maximum age"),
      EvictionReason::Deleted => write!(f, "manually deleted"),
    }
  }
}

/// A listener that can be registered with a store to be told about removals.
///
/// `on_evict` runs synchronously on the thread performing the removal while
/// the store's exclusive lock is held. It must not call back into the same
/// store: any such call deadlocks. Overwriting a key with `set` is not a
/// removal and does not notify the listener.
pub trait EvictionListener<K, V>: Send + Sync {
  fn on_evict(&self, key: K, value: Arc<V>, reason: EvictionReason);
}

impl<K, V, F> EvictionListener<K, V> for F
where
  F: Fn(K, Arc<V>, EvictionReason) + Send + Sync,
{
  fn on_evict(&self, key: K, value: Arc<V>, reason: EvictionReason) {
    self(key, value, reason)
  }
}
