//! Adapter trait for log output destinations

use super::{error::Result, log_level::LogLevel};

/// A backend that receives formatted log lines.
///
/// Instances are produced by an [`AdapterRegistry`](super::AdapterRegistry)
/// factory and owned by exactly one logger, which calls `init` once before
/// any write and `destroy` once when the adapter is removed or the logger
/// closes.
pub trait Adapter: Send {
    /// Configure the adapter. `config` is passed through uninterpreted.
    fn init(&mut self, config: &str) -> Result<()>;

    fn write_msg(&mut self, message: &str, level: LogLevel) -> Result<()>;

    fn flush(&mut self);

    fn destroy(&mut self);
}
