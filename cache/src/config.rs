use std::time::Duration;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Number of entries the backing map is pre-sized for when no hint is given.
pub const DEFAULT_INITIAL_CAPACITY: usize = 100;

/// How often the sweeper runs when no interval is given.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Plain, declarative store settings.
///
/// With the `serde` feature this can be read from any serde format. Durations
/// are written in `humantime` notation, e.g. `"250ms"`, `"30s"` or `"5m"`.
/// Listeners and loaders are code, so they are added on the builder
/// returned by `StoreBuilder::from_config`.
///
/// ```rust
/// # #[cfg(feature = "serde")] {
/// use loadcache::StoreConfig;
/// use std::time::Duration;
///
/// let config: StoreConfig =
///   serde_json::from_str(r#"{ "time_to_idle": "30s", "sweep_interval": "5s" }"#).unwrap();
/// assert_eq!(config.time_to_idle, Some(Duration::from_secs(30)));
/// assert_eq!(config.time_to_live, None);
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default, deny_unknown_fields))]
pub struct StoreConfig {
  /// Pre-sizing hint for the backing map.
  pub initial_capacity: usize,
  /// Remove entries not read for this long.
  #[cfg_attr(feature = "serde", serde(deserialize_with = "de::optional_duration"))]
  pub time_to_idle: Option<Duration>,
  /// Remove entries not written for this long.
  #[cfg_attr(feature = "serde", serde(deserialize_with = "de::optional_duration"))]
  pub time_to_live: Option<Duration>,
  /// Delay between background sweeps.
  #[cfg_attr(feature = "serde", serde(deserialize_with = "de::duration"))]
  pub sweep_interval: Duration,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      initial_capacity: DEFAULT_INITIAL_CAPACITY,
      time_to_idle: None,
      time_to_live: None,
      sweep_interval: DEFAULT_SWEEP_INTERVAL,
    }
  }
}

#[cfg(feature = "serde")]
mod de {
  use serde::de::Error;
  use serde::{Deserialize, Deserializer};
  use std::time::Duration;

  pub(super) fn duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(D::Error::custom)
  }

  pub(super) fn optional_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
  where
    D: Deserializer<'de>,
  {
    Option::<String>::deserialize(deserializer)?
      .map(|raw| humantime::parse_duration(&raw).map_err(D::Error::custom))
      .transpose()
  }
}
