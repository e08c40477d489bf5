use loadcache::{CacheError, FallbackLoader, StoreBuilder};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum LookupError {
  NotCached,
  Unavailable(&'static str),
}

impl From<CacheError> for LookupError {
  fn from(_: CacheError) -> Self {
    LookupError::NotCached
  }
}

fn main() {
  // RUST_LOG=loadcache=debug shows loader failures and sweeper lifecycle.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let prices = StoreBuilder::<String, u32>::new()
    .time_to_live(Duration::from_secs(30))
    .build_loading::<LookupError>()
    .expect("Failed to build store");

  let primary = |_: String| -> Result<u32, LookupError> { Err(LookupError::Unavailable("primary feed down")) };
  let replica = |symbol: String| -> Result<u32, LookupError> { Ok(symbol.len() as u32 * 100) };
  let loaders: [FallbackLoader<'_, String, u32, LookupError>; 2] = [&primary, &replica];

  let symbol = "ACME".to_string();
  let price = prices.get_or_load(&symbol, &loaders).unwrap();
  println!("{} loaded through the fallback chain: {}", symbol, price);

  // Cached now, so no loader is consulted.
  let cached = prices.get_or_load(&symbol, &[]).unwrap();
  println!("{} served from cache: {}", symbol, cached);

  match prices.get_or_load(&"NONE".to_string(), &[&primary]) {
    Ok(_) => unreachable!(),
    Err(err) => println!("every loader failed: {:?}", err),
  }

  println!("Metrics: {:#?}", prices.metrics());
}
