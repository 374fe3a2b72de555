//! Log record structure

use super::log_level::LogLevel;

/// A formatted message on its way to the adapters.
///
/// Created once per accepted logging call and consumed by delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

impl LogRecord {
    pub fn new(level: LogLevel, message: String) -> Self {
        Self { level, message }
    }
}
