//! # Fanout Logger
//!
//! A small multi-output logging facade: one [`Logger`] formats each message
//! once and fans it out to every active [`Adapter`], either directly or
//! through a bounded queue drained by a background dispatcher.
//!
//! ## Features
//!
//! - **RFC 5424 Levels**: Emergency through Debug, with legacy aliases
//! - **Pluggable Adapters**: built by name from a caller-owned [`AdapterRegistry`]
//! - **Sync or Async Delivery**: switch to queued delivery at any time
//! - **Clean Shutdown**: `close()` drains the queue before adapters are destroyed

pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        Adapter, AdapterConfig, AdapterFactory, AdapterRegistry, CallerLocation, DeliveryPath,
        DiagnosticSink, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result, WriteFailureMode, DEFAULT_CALLER_SKIP, DEFAULT_QUEUE_CAPACITY,
    };
}

pub use core::{
    Adapter, AdapterConfig, AdapterFactory, AdapterRegistry, CallerLocation, DeliveryPath,
    DiagnosticSink, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerMetrics, Result, WriteFailureMode, DEFAULT_CALLER_SKIP, DEFAULT_QUEUE_CAPACITY,
};
