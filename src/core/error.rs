//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Adapter name not registered (on add) or not active (on remove)
    #[error("unknown adapter {name:?} (forgotten register?)")]
    UnknownAdapter { name: String },

    /// Adapter rejected its configuration
    #[error("adapter '{name}' failed to initialize: {message}")]
    AdapterInit { name: String, message: String },

    /// Adapter failed to write a record
    #[error("adapter '{name}' failed to write: {message}")]
    AdapterWrite { name: String, message: String },

    /// Adapter panicked while handling a call
    #[error("adapter '{name}' panicked: {message}")]
    AdapterPanicked { name: String, message: String },

    /// Adapter name registered twice
    #[error("adapter '{name}' is already registered")]
    DuplicateAdapter { name: String },

    /// Registration without a factory
    #[error("no factory provided for adapter '{name}'")]
    MissingFactory { name: String },

    /// Logger already closed
    #[error("Logger already stopped")]
    LoggerStopped,

    /// Queue full with no active adapter to drain it
    #[error("Log queue full: {current}/{max} records buffered and no adapter is active")]
    QueueFull { current: usize, max: usize },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LoggerError {
    /// Create an unknown adapter error
    pub fn unknown_adapter(name: impl Into<String>) -> Self {
        LoggerError::UnknownAdapter { name: name.into() }
    }

    /// Create an adapter initialization error
    pub fn adapter_init(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::AdapterInit {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an adapter write error
    pub fn adapter_write(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::AdapterWrite {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an adapter panic error
    pub fn adapter_panicked(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::AdapterPanicked {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn duplicate_adapter(name: impl Into<String>) -> Self {
        LoggerError::DuplicateAdapter { name: name.into() }
    }

    pub fn missing_factory(name: impl Into<String>) -> Self {
        LoggerError::MissingFactory { name: name.into() }
    }

    pub fn queue_full(current: usize, max: usize) -> Self {
        LoggerError::QueueFull { current, max }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::unknown_adapter("smtp");
        assert!(matches!(err, LoggerError::UnknownAdapter { .. }));

        let err = LoggerError::adapter_init("file", "missing filename");
        assert!(matches!(err, LoggerError::AdapterInit { .. }));

        let err = LoggerError::adapter_write("conn", "broken pipe");
        assert!(matches!(err, LoggerError::AdapterWrite { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::unknown_adapter("smtp");
        assert_eq!(
            err.to_string(),
            "unknown adapter \"smtp\" (forgotten register?)"
        );

        let err = LoggerError::adapter_init("file", "missing filename");
        assert_eq!(
            err.to_string(),
            "adapter 'file' failed to initialize: missing filename"
        );

        let err = LoggerError::duplicate_adapter("console");
        assert_eq!(err.to_string(), "adapter 'console' is already registered");

        assert_eq!(LoggerError::LoggerStopped.to_string(), "Logger already stopped");

        let err = LoggerError::queue_full(2, 2);
        assert_eq!(
            err.to_string(),
            "Log queue full: 2/2 records buffered and no adapter is active"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "thread limit");
        let err: LoggerError = io_err.into();

        assert!(matches!(err, LoggerError::IoError(_)));
        assert!(err.to_string().contains("thread limit"));
    }
}
