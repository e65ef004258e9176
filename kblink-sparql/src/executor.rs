//! The boundary to whatever actually runs SPARQL.
//!
//! The core never performs I/O itself: terminal operations hand a
//! [`CompiledQuery`] to a [`QueryExecutor`] and read back [`Row`]s or a
//! boolean. Implementations own transport, timeouts and retries.
//!
//! Rows can be read from the W3C SPARQL 1.1 Query Results JSON format with
//! [`SparqlResults::from_json`], which HTTP-based executors share.

use crate::compiled::CompiledQuery;
use crate::span::LineCol;
use async_trait::async_trait;
use kblink_vocab::errors as codes;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// One RDF term bound in a result row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfValue {
    Iri(String),
    Literal {
        value: String,
        language: Option<String>,
        datatype: Option<String>,
    },
    BlankNode(String),
}

impl RdfValue {
    /// Plain literal without language or datatype.
    pub fn literal(value: impl Into<String>) -> Self {
        RdfValue::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    pub fn lang_literal(value: impl Into<String>, language: impl Into<String>) -> Self {
        RdfValue::Literal {
            value: value.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        RdfValue::Literal {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            RdfValue::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Lexical value of a literal, IRI or blank node label
    pub fn lexical(&self) -> &str {
        match self {
            RdfValue::Iri(v) | RdfValue::BlankNode(v) => v,
            RdfValue::Literal { value, .. } => value,
        }
    }

    /// Language tag of a literal, if any
    pub fn language(&self) -> Option<&str> {
        match self {
            RdfValue::Literal { language, .. } => language.as_deref().filter(|l| !l.is_empty()),
            _ => None,
        }
    }

    pub fn datatype(&self) -> Option<&str> {
        match self {
            RdfValue::Literal { datatype, .. } => datatype.as_deref(),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, RdfValue::Literal { .. })
    }
}

/// One solution: variable name (without `?`) to bound term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    bindings: BTreeMap<String, RdfValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, variable: impl Into<String>, value: RdfValue) -> Self {
        self.insert(variable, value);
        self
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: RdfValue) {
        self.bindings.insert(variable.into(), value);
    }

    pub fn get(&self, variable: &str) -> Option<&RdfValue> {
        self.bindings.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RdfValue)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, RdfValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, RdfValue)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// Failure reported by a [`QueryExecutor`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// The backend rejected the query text at parse time
    #[error("malformed query: {message}")]
    MalformedQuery {
        message: String,
        /// Position reported by the backend, if it gave one in structured form
        position: Option<LineCol>,
    },

    /// The backend did not answer in time
    #[error("query timed out")]
    Timeout,

    /// The backend could not be reached
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend failed while executing the query
    #[error("backend error: {message}")]
    Backend {
        /// HTTP status, for HTTP backends
        status: Option<u16>,
        message: String,
    },

    /// The answer could not be read as a result document
    #[error("invalid result document: {0}")]
    ResultFormat(String),
}

impl ExecutorError {
    pub fn malformed(message: impl Into<String>) -> Self {
        ExecutorError::MalformedQuery {
            message: message.into(),
            position: None,
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        ExecutorError::Backend {
            status: None,
            message: message.into(),
        }
    }

    pub fn result_format(message: impl Into<String>) -> Self {
        ExecutorError::ResultFormat(message.into())
    }

    /// Stable error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExecutorError::MalformedQuery { .. } => codes::MALFORMED_QUERY,
            ExecutorError::Timeout => codes::QUERY_TIMEOUT,
            ExecutorError::Transport(_) => codes::TRANSPORT,
            ExecutorError::Backend { .. } => codes::QUERY_EXECUTION,
            ExecutorError::ResultFormat(_) => codes::RESULT_FORMAT,
        }
    }
}

/// Runs compiled queries.
///
/// `include_inferred` asks the backend to include entailed statements where it
/// supports toggling inference; backends without the notion ignore it.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a SELECT query and collect its rows.
    async fn execute(
        &self,
        query: &CompiledQuery,
        include_inferred: bool,
    ) -> Result<Vec<Row>, ExecutorError>;

    /// Run an ASK query.
    async fn exists(&self, query: &CompiledQuery, include_inferred: bool)
        -> Result<bool, ExecutorError>;
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    async fn execute(
        &self,
        query: &CompiledQuery,
        include_inferred: bool,
    ) -> Result<Vec<Row>, ExecutorError> {
        (**self).execute(query, include_inferred).await
    }

    async fn exists(
        &self,
        query: &CompiledQuery,
        include_inferred: bool,
    ) -> Result<bool, ExecutorError> {
        (**self).exists(query, include_inferred).await
    }
}

// =============================================================================
// SPARQL 1.1 Query Results JSON
// =============================================================================

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum JsonTerm {
    Uri {
        value: String,
    },
    Literal {
        value: String,
        #[serde(rename = "xml:lang", default)]
        lang: Option<String>,
        #[serde(default)]
        datatype: Option<String>,
    },
    // SPARQL 1.0 JSON results
    TypedLiteral {
        value: String,
        #[serde(default)]
        datatype: Option<String>,
    },
    Bnode {
        value: String,
    },
}

impl From<JsonTerm> for RdfValue {
    fn from(term: JsonTerm) -> Self {
        match term {
            JsonTerm::Uri { value } => RdfValue::Iri(value),
            JsonTerm::Literal {
                value,
                lang,
                datatype,
            } => RdfValue::Literal {
                value,
                language: lang.filter(|l| !l.is_empty()),
                datatype,
            },
            JsonTerm::TypedLiteral { value, datatype } => RdfValue::Literal {
                value,
                language: None,
                datatype,
            },
            JsonTerm::Bnode { value } => RdfValue::BlankNode(value),
        }
    }
}

#[derive(Deserialize, Default)]
struct JsonHead {
    #[serde(default)]
    vars: Vec<String>,
}

#[derive(Deserialize)]
struct JsonBindings {
    bindings: Vec<BTreeMap<String, JsonTerm>>,
}

#[derive(Deserialize)]
struct JsonResults {
    #[serde(default)]
    head: JsonHead,
    #[serde(default)]
    results: Option<JsonBindings>,
    #[serde(default)]
    boolean: Option<bool>,
}

/// A parsed SPARQL results document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SparqlResults {
    Solutions { variables: Vec<String>, rows: Vec<Row> },
    Boolean(bool),
}

impl SparqlResults {
    /// Parse `application/sparql-results+json`.
    pub fn from_json(body: &[u8]) -> Result<Self, ExecutorError> {
        let doc: JsonResults =
            serde_json::from_slice(body).map_err(|e| ExecutorError::result_format(e.to_string()))?;
        if let Some(boolean) = doc.boolean {
            return Ok(SparqlResults::Boolean(boolean));
        }
        let results = doc
            .results
            .ok_or_else(|| ExecutorError::result_format("neither 'results' nor 'boolean' present"))?;
        let rows: Vec<Row> = results
            .bindings
            .into_iter()
            .map(|binding| {
                binding
                    .into_iter()
                    .map(|(k, v)| (k, RdfValue::from(v)))
                    .collect::<Row>()
            })
            .collect();
        Ok(SparqlResults::Solutions {
            variables: doc.head.vars,
            rows,
        })
    }

    /// Rows of a solutions document.
    pub fn into_rows(self) -> Result<Vec<Row>, ExecutorError> {
        match self {
            SparqlResults::Solutions { rows, .. } => Ok(rows),
            SparqlResults::Boolean(_) => Err(ExecutorError::result_format(
                "expected solutions, got a boolean result",
            )),
        }
    }

    /// Answer of a boolean document.
    pub fn into_boolean(self) -> Result<bool, ExecutorError> {
        match self {
            SparqlResults::Boolean(b) => Ok(b),
            SparqlResults::Solutions { .. } => Err(ExecutorError::result_format(
                "expected a boolean result, got solutions",
            )),
        }
    }
}
