use std::sync::Arc;

/// A default loader stored inside a `LoadingStore`.
///
/// It is called with an owned copy of the missing key and must return the
/// value to cache or the caller's error. Loaders run on the calling thread
/// outside of any store lock; they own their own timeouts and cancellation.
pub type Loader<K, V, E> = Arc<dyn Fn(K) -> Result<V, E> + Send + Sync>;

/// A borrowed fallback loader passed to `get_or_load`.
pub type FallbackLoader<'a, K, V, E> = &'a dyn Fn(K) -> Result<V, E>;

/// Tries `loaders` in order and stops at the first success.
///
/// Returns `None` when `loaders` is empty, otherwise the first success or the
/// last failure. `on_attempt` observes the outcome of each call.
pub(crate) fn first_success<K, V, E, A>(
  key: &K,
  loaders: &[FallbackLoader<'_, K, V, E>],
  mut on_attempt: A,
) -> Option<Result<V, E>>
where
  K: Clone,
  A: FnMut(bool),
{
  let mut last = None;
  for load in loaders {
    match load(key.clone()) {
      Ok(value) => {
        on_attempt(true);
        return Some(Ok(value));
      }
      Err(err) => {
        on_attempt(false);
        last = Some(Err(err));
      }
    }
  }
  last
}
