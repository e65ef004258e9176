//! # kblink SPARQL query construction
//!
//! Turns declarative lookups against a knowledge base (list classes,
//! instances, properties or items; filter by identifier, label, hierarchy
//! position or domain; ask for labels, descriptions, domain/range and
//! deprecation) into SPARQL text suited to the backend, and maps result rows
//! back into [`Handle`]s.
//!
//! ## Architecture
//!
//! 1. **Profile**: a [`DialectProfile`] names the vocabulary and full-text
//!    dialect of one knowledge base.
//! 2. **Narrow**: a [`SparqlQueryBuilder`] accumulates an immutable
//!    [`QueryIntentSpec`]; conflicting calls fail with [`BuilderError`].
//! 3. **Compile**: label, hierarchy and full-text strategies produce a
//!    [`CompiledQuery`] (pure, deterministic).
//! 4. **Execute**: a [`QueryExecutor`] runs the text; [`ResultMapper`] folds
//!    rows into deduplicated, language-ranked handles.
//!
//! ## Quick Start
//!
//! ```
//! use kblink_sparql::{DialectProfile, SparqlQueryBuilder};
//! use std::sync::Arc;
//!
//! let profile = Arc::new(DialectProfile::rdfs());
//! let text = SparqlQueryBuilder::for_classes(profile)
//!     .with_label_starting_with("Green Go")
//!     .unwrap()
//!     .retrieve_label()
//!     .select_query();
//! assert!(text.starts_with("SELECT DISTINCT ?s ?l ?m"));
//! ```

pub mod builder;
pub mod compiled;
pub mod error;
pub mod executor;
pub mod fts;
pub mod handle;
pub mod hierarchy;
pub mod intent;
pub mod label;
pub mod mapper;
pub mod profile;
pub mod sanitize;
pub mod span;
pub mod text;

// Re-exports
pub use builder::SparqlQueryBuilder;
pub use compiled::{CompiledQuery, LanguagePreference, QueryForm};
pub use error::{BuilderError, MalformedQueryError, ProfileError, QueryError, Result};
pub use executor::{ExecutorError, QueryExecutor, RdfValue, Row, SparqlResults};
pub use fts::{FtsDialect, FtsText};
pub use handle::{Handle, MatchTerm};
pub use hierarchy::HierarchyNavigator;
pub use intent::{HierarchyFilter, LabelFilter, LabelFilterKind, Mode, Projection, QueryIntentSpec};
pub use label::LabelProperties;
pub use mapper::ResultMapper;
pub use profile::DialectProfile;
pub use sanitize::{sanitize, SearchTerm};
pub use span::{LineCol, LineIndex};
