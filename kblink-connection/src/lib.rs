//! # kblink connections
//!
//! [`QueryExecutor`](kblink_sparql::QueryExecutor) implementations:
//!
//! - [`HttpSparqlExecutor`]: a remote SPARQL 1.1 Protocol endpoint
//! - [`MemoryExecutor`] (feature `memory`): an embedded `oxigraph` store
//!
//! ```no_run
//! use kblink_connection::{EndpointConfig, HttpSparqlExecutor};
//! use kblink_sparql::{DialectProfile, SparqlQueryBuilder};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = HttpSparqlExecutor::from_config(
//!     &EndpointConfig::new("http://localhost:7200/repositories/kb"),
//! )?;
//! let handles = SparqlQueryBuilder::for_classes(Arc::new(DialectProfile::owl()))
//!     .with_label_starting_with("Green Go")?
//!     .retrieve_label()
//!     .as_handles(&executor, false)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "memory")]
pub mod memory;

pub use config::EndpointConfig;
pub use error::{ConnectionError, Result};
pub use http::HttpSparqlExecutor;
#[cfg(feature = "memory")]
pub use memory::MemoryExecutor;
