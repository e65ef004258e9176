//! Shared harness for kblink-sparql integration tests.

#![allow(dead_code)]

pub mod tracing;

use async_trait::async_trait;
use kblink_sparql::{CompiledQuery, ExecutorError, QueryExecutor, QueryForm, RdfValue, Row};
use std::sync::Mutex;

pub const KB: &str = "http://example.org/kb#";

pub fn kb(name: &str) -> String {
    format!("{}{}", KB, name)
}

pub fn iri(value: &str) -> RdfValue {
    RdfValue::Iri(value.to_string())
}

/// Executor answering from fixed scripts and recording every query it sees.
///
/// The label sub-property lookup is recognised by projecting only `?p`.
pub struct ScriptedExecutor {
    pub lookup: Result<Vec<Row>, ExecutorError>,
    pub rows: Result<Vec<Row>, ExecutorError>,
    pub ask: Result<bool, ExecutorError>,
    seen: Mutex<Vec<(QueryForm, String)>>,
}

impl ScriptedExecutor {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            lookup: Ok(Vec::new()),
            rows: Ok(rows),
            ask: Ok(true),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_lookup(mut self, lookup: Result<Vec<Row>, ExecutorError>) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_rows(mut self, rows: Result<Vec<Row>, ExecutorError>) -> Self {
        self.rows = rows;
        self
    }

    pub fn with_ask(mut self, ask: Result<bool, ExecutorError>) -> Self {
        self.ask = ask;
        self
    }

    /// Texts received, in order
    pub fn seen(&self) -> Vec<(QueryForm, String)> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> String {
        self.seen().last().map(|(_, t)| t.clone()).unwrap_or_default()
    }
}

fn is_lookup(query: &CompiledQuery) -> bool {
    query.variables() == ["p".to_string()]
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        query: &CompiledQuery,
        _include_inferred: bool,
    ) -> Result<Vec<Row>, ExecutorError> {
        self.seen
            .lock()
            .unwrap()
            .push((query.form(), query.text().to_string()));
        if is_lookup(query) {
            self.lookup.clone()
        } else {
            self.rows.clone()
        }
    }

    async fn exists(
        &self,
        query: &CompiledQuery,
        _include_inferred: bool,
    ) -> Result<bool, ExecutorError> {
        self.seen
            .lock()
            .unwrap()
            .push((query.form(), query.text().to_string()));
        self.ask.clone()
    }
}
