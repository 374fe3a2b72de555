//! Basic logger usage example
//!
//! Demonstrates synchronous logging to a stdout adapter at different levels.
//!
//! Run with: cargo run --example basic_usage

use fanout_logger::prelude::*;
use fanout_logger::{debug, error, info, notice, warning};
use std::sync::Arc;

/// Minimal adapter printing each line to stdout
struct Stdout {
    prefix: String,
}

impl Adapter for Stdout {
    fn init(&mut self, config: &str) -> Result<()> {
        self.prefix = config.to_string();
        Ok(())
    }

    fn write_msg(&mut self, message: &str, _level: LogLevel) -> Result<()> {
        println!("{}{}", self.prefix, message);
        Ok(())
    }

    fn flush(&mut self) {}

    fn destroy(&mut self) {}
}

fn main() -> Result<()> {
    println!("=== Fanout Logger - Basic Usage Example ===\n");

    let registry = Arc::new(AdapterRegistry::new());
    registry.register("stdout", || {
        Box::new(Stdout {
            prefix: String::new(),
        }) as Box<dyn Adapter>
    });

    let logger = Logger::new(registry, 100);
    logger.add_adapter("stdout", "demo> ")?;

    println!("1. Logging at different levels:");
    debug!(logger, "This is a debug message")?;
    info!(logger, "This is an info message")?;
    notice!(logger, "This is a notice")?;
    warning!(logger, "This is a warning message")?;
    error!(logger, "This is an error message, code {}", 500)?;

    println!("\n2. Raising the minimum level to Warning:");
    logger.set_min_level(LogLevel::Warning);
    debug!(logger, "Debug message (hidden)")?;
    info!(logger, "Info message (hidden)")?;
    warning!(logger, "Warning message (visible)")?;

    println!("\n3. Tag and caller location:");
    logger.set_tag("demo");
    logger.enable_caller_location(true);
    error!(logger, "Located error")?;

    logger.close();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
