//! Async logging example
//!
//! Demonstrates queued delivery from several threads and draining on close.
//!
//! Run with: cargo run --example async_logging

use fanout_logger::prelude::*;
use fanout_logger::info;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

/// Adapter counting the records it receives
struct Counter(Arc<AtomicUsize>);

impl Adapter for Counter {
    fn init(&mut self, _config: &str) -> Result<()> {
        Ok(())
    }

    fn write_msg(&mut self, _message: &str, _level: LogLevel) -> Result<()> {
        self.0.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn flush(&mut self) {}

    fn destroy(&mut self) {}
}

fn main() -> Result<()> {
    println!("=== Fanout Logger - Async Logging Example ===\n");

    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);

    let registry = Arc::new(AdapterRegistry::new());
    registry.register("counter", move || {
        Box::new(Counter(Arc::clone(&count_clone))) as Box<dyn Adapter>
    });

    let logger = Arc::new(
        Logger::builder(registry)
            .queue_capacity(1000)
            .async_mode(true)
            .adapter("counter", "")
            .build()?,
    );

    let mut handles = vec![];
    for thread_id in 0..5 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..20 {
                let _ = info!(logger, "Thread {} - Message {}", thread_id, i);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    logger.close();
    println!("Delivered {} records", count.load(Ordering::Relaxed));
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
