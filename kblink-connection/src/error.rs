//! Error types for kblink-connection

use kblink_vocab::errors as codes;
use thiserror::Error;

/// Result type alias using ConnectionError
pub type Result<T> = std::result::Result<T, ConnectionError>;

/// Errors raised while setting up an executor.
///
/// Failures of individual queries are reported as
/// [`kblink_sparql::ExecutorError`] instead.
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Invalid endpoint configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// RDF data could not be loaded into the embedded store
    #[error("Load error: {0}")]
    Load(String),

    /// The embedded store could not be created
    #[error("Store error: {0}")]
    Store(String),

    /// HTTP client construction failed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl ConnectionError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        ConnectionError::InvalidConfig(msg.into())
    }

    /// Create a load error
    pub fn load(msg: impl Into<String>) -> Self {
        ConnectionError::Load(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        ConnectionError::Store(msg.into())
    }

    /// Stable error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectionError::InvalidConfig(_) | ConnectionError::Client(_) => codes::CONFIG,
            ConnectionError::Load(_) => codes::LOAD,
            ConnectionError::Store(_) => codes::QUERY_EXECUTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_category() {
        assert_eq!(
            ConnectionError::invalid_config("no endpoint").error_code(),
            "err:connection/Config"
        );
        assert_eq!(ConnectionError::load("bad turtle").error_code(), "err:connection/Load");
    }

    #[test]
    fn messages() {
        let err = ConnectionError::invalid_config("endpoint must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: endpoint must not be empty"
        );
    }
}
