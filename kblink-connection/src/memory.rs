//! Embedded in-memory knowledge base backed by `oxigraph`.
//!
//! Used by tests and for small local knowledge bases loaded from Turtle. The
//! store has no entailment regime, so `include_inferred` is accepted and
//! ignored.

use crate::error::{ConnectionError, Result};
use async_trait::async_trait;
use kblink_sparql::{CompiledQuery, ExecutorError, QueryExecutor, RdfValue, Row};
use kblink_vocab::{rdf, xsd};
use oxigraph::io::RdfFormat;
use oxigraph::model::Term;
use oxigraph::sparql::{Query, QueryResults};
use oxigraph::store::Store;

/// Executor over an in-memory `oxigraph` store.
#[derive(Clone)]
pub struct MemoryExecutor {
    store: Store,
}

impl MemoryExecutor {
    /// Empty store.
    pub fn new() -> Result<Self> {
        let store = Store::new().map_err(|e| ConnectionError::store(e.to_string()))?;
        Ok(Self { store })
    }

    /// Store pre-loaded with a Turtle document.
    pub fn from_turtle(turtle: &str) -> Result<Self> {
        let executor = Self::new()?;
        executor.load_turtle(turtle)?;
        Ok(executor)
    }

    /// Load a Turtle document into the default graph.
    pub fn load_turtle(&self, turtle: &str) -> Result<()> {
        self.store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| ConnectionError::load(e.to_string()))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    fn run(&self, text: &str) -> std::result::Result<QueryResults, ExecutorError> {
        let query =
            Query::parse(text, None).map_err(|e| ExecutorError::malformed(e.to_string()))?;
        self.store
            .query(query)
            .map_err(|e| ExecutorError::backend(e.to_string()))
    }
}

impl From<Store> for MemoryExecutor {
    fn from(store: Store) -> Self {
        Self { store }
    }
}

impl std::fmt::Debug for MemoryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryExecutor").finish_non_exhaustive()
    }
}

fn to_value(term: &Term) -> Option<RdfValue> {
    #[allow(unreachable_patterns)]
    match term {
        Term::NamedNode(node) => Some(RdfValue::Iri(node.as_str().to_string())),
        Term::BlankNode(node) => Some(RdfValue::BlankNode(node.as_str().to_string())),
        Term::Literal(lit) => {
            let datatype = lit.datatype().as_str();
            // Plain and language-tagged literals carry no datatype, as in the JSON results format
            let datatype = (datatype != xsd::STRING && datatype != rdf::LANG_STRING)
                .then(|| datatype.to_string());
            Some(RdfValue::Literal {
                value: lit.value().to_string(),
                language: lit.language().map(str::to_string),
                datatype,
            })
        }
        _ => None,
    }
}

#[async_trait]
impl QueryExecutor for MemoryExecutor {
    async fn execute(
        &self,
        query: &CompiledQuery,
        _include_inferred: bool,
    ) -> std::result::Result<Vec<Row>, ExecutorError> {
        match self.run(query.text())? {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| ExecutorError::backend(e.to_string()))?;
                    let mut row = Row::new();
                    for (variable, term) in solution.iter() {
                        if let Some(value) = to_value(term) {
                            row.insert(variable.as_str(), value);
                        }
                    }
                    rows.push(row);
                }
                tracing::debug!(rows = rows.len(), "memory store answered");
                Ok(rows)
            }
            QueryResults::Boolean(_) => Err(ExecutorError::result_format(
                "expected solutions, got a boolean",
            )),
            QueryResults::Graph(_) => Err(ExecutorError::result_format(
                "expected solutions, got a graph",
            )),
        }
    }

    async fn exists(
        &self,
        query: &CompiledQuery,
        _include_inferred: bool,
    ) -> std::result::Result<bool, ExecutorError> {
        match self.run(query.text())? {
            QueryResults::Boolean(answer) => Ok(answer),
            _ => Err(ExecutorError::result_format("expected a boolean answer")),
        }
    }
}
