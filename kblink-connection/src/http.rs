//! SPARQL 1.1 Protocol executor over HTTP.
//!
//! Queries are sent as `POST` with an `application/sparql-query` body and
//! answers are read as SPARQL 1.1 Query Results JSON. The executor owns the
//! connect and request timeouts; nothing is retried.

use crate::config::EndpointConfig;
use crate::error::Result;
use async_trait::async_trait;
use kblink_sparql::{CompiledQuery, ExecutorError, QueryExecutor, Row, SparqlResults};
use reqwest::{header, Client, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::Instrument;

/// Request body media type
pub const SPARQL_QUERY: &str = "application/sparql-query";

/// Accepted answer media type
pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

/// Executor for a remote SPARQL endpoint.
///
/// # Example
///
/// ```ignore
/// let config = EndpointConfig::new("http://localhost:7200/repositories/kb")
///     .with_auth_token("secret");
/// let executor = HttpSparqlExecutor::from_config(&config)?;
/// let rows = executor.execute(&compiled, true).await?;
/// ```
pub struct HttpSparqlExecutor {
    client: Client,
    endpoint: String,
    auth_token: Option<String>,
    infer_parameter: Option<String>,
    request_timeout: Duration,
}

impl HttpSparqlExecutor {
    /// Create an executor from validated configuration.
    pub fn from_config(config: &EndpointConfig) -> Result<Self> {
        config.validate()?;

        let connect_timeout = Duration::from_millis(config.connect_timeout_ms());
        let request_timeout = Duration::from_millis(config.request_timeout_ms());

        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            auth_token: config.auth_token.clone(),
            infer_parameter: config.infer_parameter.clone(),
            request_timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, text: &str, include_inferred: bool) -> std::result::Result<Vec<u8>, ExecutorError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, SPARQL_QUERY)
            .header(header::ACCEPT, SPARQL_RESULTS_JSON)
            .body(text.to_string());

        if let Some(ref name) = self.infer_parameter {
            request = request.query(&[(name.as_str(), include_inferred.to_string())]);
        }
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status(status, &body));
        }

        let body = response.bytes().await.map_err(map_send_error)?;
        Ok(body.to_vec())
    }
}

/// Classify a failed send or body read.
fn map_send_error(err: reqwest::Error) -> ExecutorError {
    if err.is_timeout() {
        ExecutorError::Timeout
    } else if err.is_connect() {
        ExecutorError::Transport(format!("failed to connect to SPARQL endpoint: {}", err))
    } else {
        ExecutorError::Transport(format!("SPARQL request failed: {}", err))
    }
}

/// Classify a non-success HTTP status.
///
/// Endpoints answer syntax errors with 400 and put the parser message in the
/// body.
pub(crate) fn map_status(status: StatusCode, body: &str) -> ExecutorError {
    let body = body.trim();
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no message")
            .to_string()
    } else {
        body.to_string()
    };
    match status {
        StatusCode::BAD_REQUEST => ExecutorError::malformed(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ExecutorError::Timeout,
        _ => ExecutorError::Backend {
            status: Some(status.as_u16()),
            message,
        },
    }
}

impl fmt::Debug for HttpSparqlExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSparqlExecutor")
            .field("endpoint", &self.endpoint)
            .field("has_auth_token", &self.auth_token.is_some())
            .field("infer_parameter", &self.infer_parameter)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

#[async_trait]
impl QueryExecutor for HttpSparqlExecutor {
    async fn execute(
        &self,
        query: &CompiledQuery,
        include_inferred: bool,
    ) -> std::result::Result<Vec<Row>, ExecutorError> {
        let span = tracing::debug_span!(
            "sparql_http_select",
            endpoint = %self.endpoint,
            include_inferred
        );
        async move {
            let body = self.post(query.text(), include_inferred).await?;
            let rows = SparqlResults::from_json(&body)?.into_rows()?;
            tracing::debug!(rows = rows.len(), "endpoint answered");
            Ok(rows)
        }
        .instrument(span)
        .await
    }

    async fn exists(
        &self,
        query: &CompiledQuery,
        include_inferred: bool,
    ) -> std::result::Result<bool, ExecutorError> {
        let span = tracing::debug_span!(
            "sparql_http_ask",
            endpoint = %self.endpoint,
            include_inferred
        );
        async move {
            let body = self.post(query.text(), include_inferred).await?;
            SparqlResults::from_json(&body)?.into_boolean()
        }
        .instrument(span)
        .await
    }
}
