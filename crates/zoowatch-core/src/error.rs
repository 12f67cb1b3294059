//! Error types for zoowatch

/// Result type alias using zoowatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zoowatch operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Knowledge-base lookup errors (bad status, malformed body)
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Chat action or webhook delivery errors
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP transport errors
    #[error("http error: {0}")]
    Http(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a new delivery error
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether the error came from talking to a remote service
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::lookup("no results field").to_string(),
            "lookup error: no results field"
        );
        assert_eq!(Error::Timeout.to_string(), "operation timed out");
    }

    #[test]
    fn test_transient_errors() {
        assert!(Error::http("connection reset").is_transient());
        assert!(Error::Timeout.is_transient());
        assert!(!Error::config("missing channel").is_transient());
    }
}
