//! A small in-process key-value cache with time-based expiration and
//! optional load-on-miss.
//!
//! # Features
//! - **Two expiration policies**: time-to-idle (since last read) and
//!   time-to-live (since last write), applied independently.
//! - **Owned sweeper**: each store runs its own background sweep thread,
//!   joined deterministically on `stop` or drop.
//! - **Loading**: `LoadingStore` fills misses from a default loader or an
//!   ordered list of fallback loaders, passing loader errors through as-is.
//! - **Non-Clone Support**: values are stored in an `Arc<V>`, so `V` never
//!   needs to be `Clone`.
//!
//! The store is deliberately simple: one reader/writer lock guards the whole
//! map, there is no size-based eviction and no sharding. Expiration is lazy;
//! an entry past its deadline is readable until the next sweep removes it.
//!
//! # Example
//!
//! ```rust
//! use loadcache::{CacheError, EvictionReason, StoreBuilder};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = StoreBuilder::<String, u64>::new()
//!   .time_to_live(Duration::from_secs(60))
//!   .sweep_interval(Duration::from_millis(500))
//!   .eviction_listener(|key: String, _value: Arc<u64>, reason: EvictionReason| {
//!     println!("{key} removed: {reason}");
//!   })
//!   .build_with_loader(|key: String| Ok::<_, CacheError>(key.len() as u64))
//!   .unwrap();
//!
//! assert_eq!(*store.get(&"hello".to_string()).unwrap(), 5);
//! store.stop();
//! ```

// Public modules that form the API
pub mod builder;
pub mod config;
pub mod error;
pub mod handles;
pub mod listener;
pub mod loader;
pub mod metrics;

// Internal, crate-only modules
mod record;
mod shared;
mod store;
mod task;
mod time;

// Re-export the primary user-facing types for convenience
pub use builder::StoreBuilder;
pub use config::StoreConfig;
pub use error::{BuildError, CacheError};
pub use handles::{Cache, LoadingCache, LoadingStore, Store};
pub use listener::{EvictionListener, EvictionReason};
pub use loader::{FallbackLoader, Loader};
pub use metrics::MetricsSnapshot;
