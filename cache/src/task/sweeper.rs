use crate::shared::StoreShared;

use std::hash::{BuildHasher, Hash};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// The stop flag and the condition variable the sweeper sleeps on, so a
/// stop request wakes it immediately instead of after the current tick.
#[derive(Default)]
struct StopSignal {
  stopped: Mutex<bool>,
  wakeup: Condvar,
}

/// The background thread responsible for periodic expiration sweeps.
pub(crate) struct Sweeper {
  handle: JoinHandle<()>,
  signal: Arc<StopSignal>,
}

impl Sweeper {
  /// Spawns a new sweeper thread that calls `cleanup_at` once per `interval`.
  pub(crate) fn spawn<K, V, H>(shared: Arc<StoreShared<K, V, H>>, interval: Duration) -> io::Result<Self>
  where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
    H: BuildHasher + Clone + Send + Sync + 'static,
  {
    let signal = Arc::new(StopSignal::default());
    let thread_signal = signal.clone();

    let handle = thread::Builder::new()
      .name("loadcache-sweeper".into())
      .spawn(move || Self::run(&shared, &thread_signal, interval))?;

    tracing::debug!(interval = ?interval, "sweeper started");
    Ok(Self { handle, signal })
  }

  fn run<K, V, H>(shared: &StoreShared<K, V, H>, signal: &StopSignal, interval: Duration)
  where
    K: Eq + Hash + Clone,
    H: BuildHasher + Clone,
  {
    // `None` when the next tick lies beyond what `Instant` can represent; the
    // thread then only waits for a stop request.
    let mut next_tick = Instant::now().checked_add(interval);

    loop {
      {
        let mut stopped = signal.stopped.lock();
        while !*stopped {
          match next_tick {
            Some(deadline) if Instant::now() < deadline => {
              signal.wakeup.wait_until(&mut stopped, deadline);
            }
            Some(_) => break,
            None => signal.wakeup.wait(&mut stopped),
          }
        }
        if *stopped {
          return;
        }
      } // Release the signal lock before touching the store.

      let tick = Instant::now();
      let removed = shared.cleanup_at(tick);
      tracing::trace!(removed, elapsed = ?tick.elapsed(), "sweep finished");

      // A sweep that overran its slot does not cause a burst of catch-up ticks.
      next_tick = next_tick
        .and_then(|previous| previous.checked_add(interval))
        .filter(|&next| next > tick)
        .or_else(|| tick.checked_add(interval));
    }
  }

  /// Whether the thread is still alive. It only exits early if an eviction
  /// listener panicked during a sweep.
  pub(crate) fn is_running(&self) -> bool {
    !self.handle.is_finished()
  }

  /// Signals the sweeper thread to stop and waits for it to exit.
  ///
  /// A sweep that is already running finishes before this returns.
  pub(crate) fn stop(self) {
    *self.signal.stopped.lock() = true;
    self.signal.wakeup.notify_all();

    if self.handle.join().is_err() {
      // The thread only panics if an eviction listener panicked.
      tracing::warn!("sweeper thread panicked before it was stopped");
    } else {
      tracing::debug!("sweeper stopped");
    }
  }
}
