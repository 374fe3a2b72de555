//! Core logger types and traits

pub mod adapter;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod format;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod registry;

pub use adapter::Adapter;
pub use config::{AdapterConfig, LoggerConfig, DEFAULT_QUEUE_CAPACITY};
pub use diagnostic::{silent_sink, stderr_sink, DiagnosticSink};
pub use error::{LoggerError, Result};
pub use format::{format_message, CallerLocation, DEFAULT_CALLER_SKIP, UNKNOWN_FILE};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{DeliveryPath, Logger, LoggerBuilder, WriteFailureMode, DISPATCHER_THREAD_NAME};
pub use metrics::LoggerMetrics;
pub use registry::{AdapterFactory, AdapterRegistry};
