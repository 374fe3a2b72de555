//! Logger settings as plain data
//!
//! [`LoggerConfig`] mirrors every [`LoggerBuilder`](super::LoggerBuilder)
//! option so settings can be deserialized from any serde format and applied
//! with [`LoggerBuilder::from_config`](super::LoggerBuilder::from_config).

use super::format::DEFAULT_CALLER_SKIP;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};

/// Default size of the asynchronous delivery queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub caller_location: bool,
    pub caller_skip: usize,
    pub tag: String,
    pub async_mode: bool,
    pub queue_capacity: usize,
    pub adapters: Vec<AdapterConfig>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Debug,
            caller_location: false,
            caller_skip: DEFAULT_CALLER_SKIP,
            tag: String::new(),
            async_mode: false,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            adapters: Vec::new(),
        }
    }
}

/// One adapter to attach, with its configuration payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub name: String,
    #[serde(default)]
    pub config: serde_json::Value,
}

impl AdapterConfig {
    pub fn new(name: impl Into<String>, config: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }

    /// The text handed to `Adapter::init`.
    ///
    /// `null` becomes an empty string and a JSON string is passed as its
    /// contents; any other value is rendered as compact JSON.
    pub fn config_blob(&self) -> String {
        match &self.config {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
