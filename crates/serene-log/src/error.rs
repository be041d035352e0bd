//! Error types for log emission.

use thiserror::Error;

/// Errors raised while formatting or writing a log record.
#[derive(Debug, Error)]
pub enum LogError {
    /// The output writer failed.
    #[error("Failed to write log record: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded as JSON.
    #[error("Failed to serialize log record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for log operations.
pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = LogError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(err.to_string(), "Failed to write log record: closed");
    }
}
