//! Endpoint configuration
//!
//! ```json
//! {
//!   "endpoint": "https://kb.example.org/sparql",
//!   "auth_token": "secret",
//!   "connect_timeout_ms": 5000,
//!   "request_timeout_ms": 30000,
//!   "infer_parameter": "infer"
//! }
//! ```

use crate::error::{ConnectionError, Result};
use serde::{Deserialize, Serialize};

/// Default connect timeout (5 seconds)
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default request timeout (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default query parameter carrying the inference toggle
pub const DEFAULT_INFER_PARAMETER: &str = "infer";

fn default_infer_parameter() -> Option<String> {
    Some(DEFAULT_INFER_PARAMETER.to_string())
}

/// Connection settings for a SPARQL 1.1 Protocol endpoint.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Query endpoint URL
    pub endpoint: String,

    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Connection timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,

    /// Query parameter that carries `include_inferred`.
    ///
    /// `None` sends no parameter, for endpoints that reject unknown ones.
    #[serde(default = "default_infer_parameter")]
    pub infer_parameter: Option<String>,
}

impl EndpointConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: None,
            connect_timeout_ms: None,
            request_timeout_ms: None,
            infer_parameter: default_infer_parameter(),
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_connect_timeout_ms(mut self, ms: u64) -> Self {
        self.connect_timeout_ms = Some(ms);
        self
    }

    pub fn with_request_timeout_ms(mut self, ms: u64) -> Self {
        self.request_timeout_ms = Some(ms);
        self
    }

    pub fn with_infer_parameter(mut self, name: Option<&str>) -> Self {
        self.infer_parameter = name.map(str::to_string);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConnectionError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn connect_timeout_ms(&self) -> u64 {
        self.connect_timeout_ms.unwrap_or(DEFAULT_CONNECT_TIMEOUT_MS)
    }

    pub fn request_timeout_ms(&self) -> u64 {
        self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS)
    }

    /// Check the endpoint is an absolute http(s) URL and timeouts are non-zero.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            return Err(ConnectionError::invalid_config("endpoint must not be empty"));
        }
        let url = reqwest::Url::parse(&self.endpoint).map_err(|e| {
            ConnectionError::invalid_config(format!("invalid endpoint '{}': {}", self.endpoint, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConnectionError::invalid_config(format!(
                "endpoint scheme must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.connect_timeout_ms == Some(0) || self.request_timeout_ms == Some(0) {
            return Err(ConnectionError::invalid_config("timeouts must be positive"));
        }
        if self
            .infer_parameter
            .as_deref()
            .is_some_and(|name| name.trim().is_empty())
        {
            return Err(ConnectionError::invalid_config(
                "infer_parameter must not be blank",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("endpoint", &self.endpoint)
            .field("has_auth_token", &self.auth_token.is_some())
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("infer_parameter", &self.infer_parameter)
            .finish()
    }
}
