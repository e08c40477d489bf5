use thiserror::Error;

/// Errors returned by cache lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CacheError {
  /// The key is not present, and no loader produced a value for it.
  #[error("no cache entry")]
  NoEntry,
}

/// Errors that can occur when building a store.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The sweep interval was set to zero, which would spin the sweeper.
  #[error("sweep interval cannot be zero")]
  ZeroSweepInterval,
  /// The operating system refused to spawn the sweeper thread.
  #[error("failed to spawn sweeper thread: {0}")]
  SpawnSweeper(#[from] std::io::Error),
}
