//! Error types for the PerpX client.

use thiserror::Error;

/// The main error type for PerpX.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The PerpX backend answered with a failure.
    #[error("RPC error: {service}/{method}: {message}")]
    Rpc {
        service: String,
        method: String,
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Channel communication errors
    #[error("Channel error: {0}")]
    Channel(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid input or state
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The backend could not be reached or timed out.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend asked us to slow down.
    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u64),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new RPC error for a service method.
    pub fn rpc(service: &str, method: &str, msg: impl Into<String>) -> Self {
        Self::Rpc {
            service: service.to_string(),
            method: method.to_string(),
            message: msg.into(),
        }
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new channel error.
    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    /// Create a new auth error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Check if this error is recoverable (user can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited(_) | Self::Channel(_) | Self::Http(_)
        )
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_display() {
        let err = Error::rpc("perpx.PerpxService", "GetProfile", "token expired");
        assert_eq!(
            err.to_string(),
            "RPC error: perpx.PerpxService/GetProfile: token expired"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::network("timeout").is_recoverable());
        assert!(Error::RateLimited(2).is_recoverable());
        assert!(!Error::auth("bad token").is_recoverable());
        assert!(!Error::invalid_input("x").is_recoverable());
    }
}
