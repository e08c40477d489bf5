use loadcache::{EvictionReason, StoreBuilder};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() {
  // Create a store with a 2-second idle expiration swept twice a second.
  let store = StoreBuilder::<&str, &str>::new()
    .time_to_idle(Duration::from_secs(2))
    .sweep_interval(Duration::from_millis(500))
    .eviction_listener(|key: &str, value: Arc<&str>, reason: EvictionReason| {
      println!("Listener: ('{}', '{}') {}", key, value, reason);
    })
    .build()
    .expect("Failed to build store");

  println!("--- Time-to-Idle Demonstration ---");
  store.set("my_key", "my_value").unwrap();
  println!("Set ('my_key', 'my_value'). It is swept 2 seconds after its last read.");

  println!("\n--- Part 1: Resetting the Idle Timer ---");
  for i in 1..=4 {
    thread::sleep(Duration::from_secs(1));
    assert!(store.get(&"my_key").is_ok());
    println!("[Cycle {}] Read 'my_key'. Its idle timer has been reset.", i);
  }

  println!("\n--- Part 2: Letting the Item Expire ---");
  println!("Waiting for 3 seconds without reading the key...");
  thread::sleep(Duration::from_secs(3));

  assert!(store.get(&"my_key").is_err(), "Item should be swept by now.");
  println!("'my_key' was swept after being idle for more than 2 seconds.");

  store.stop();
  println!("\nFinal Metrics: {:#?}", store.metrics());
  assert_eq!(store.metrics().evicted_by_idle, 1);
}
