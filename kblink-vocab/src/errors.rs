//! Error type compact IRIs
//!
//! These compact IRI strings identify error types reported to the editors and
//! linking services that call into kblink. They follow the pattern
//! `err:category/ErrorName`.
//!
//! # Example Usage
//!
//! ```json
//! {
//!   "error": "conflict on field 'hierarchy': parents_of() already set",
//!   "@type": "err:builder/Conflict"
//! }
//! ```

/// Error namespace prefix
pub const ERR_PREFIX: &str = "err:";

// =============================================================================
// Builder Errors (builder)
// =============================================================================

/// A single-valued constraint was set twice, or label filter kinds were mixed
pub const BUILDER_CONFLICT: &str = "err:builder/Conflict";

/// A builder argument was rejected (relative IRI, blank terms, zero limit, ...)
pub const BUILDER_INVALID: &str = "err:builder/Invalid";

// =============================================================================
// Profile Errors (profile)
// =============================================================================

/// A knowledge-base profile failed validation
pub const PROFILE_INVALID: &str = "err:profile/Invalid";

/// A knowledge-base profile could not be parsed
pub const PROFILE_PARSE: &str = "err:profile/Parse";

// =============================================================================
// Query Errors (query)
// =============================================================================

/// The backend rejected the compiled query text at parse time
pub const MALFORMED_QUERY: &str = "err:query/MalformedQuery";

/// Query execution failed in the backend
pub const QUERY_EXECUTION: &str = "err:query/Execution";

/// Query execution timed out
pub const QUERY_TIMEOUT: &str = "err:query/Timeout";

// =============================================================================
// Connection Errors (connection)
// =============================================================================

/// The endpoint could not be reached
pub const TRANSPORT: &str = "err:connection/Transport";

/// The endpoint answered with an unreadable result document
pub const RESULT_FORMAT: &str = "err:connection/ResultFormat";

/// Invalid endpoint configuration
pub const CONFIG: &str = "err:connection/Config";

/// RDF data could not be loaded into an embedded store
pub const LOAD: &str = "err:connection/Load";

// =============================================================================
// Helper Functions
// =============================================================================

/// Check if a string is an error type IRI
pub fn is_error_type(s: &str) -> bool {
    s.starts_with(ERR_PREFIX)
}

/// Get the category from an error type (e.g., "query" from "err:query/Timeout")
pub fn error_category(error_type: &str) -> Option<&str> {
    error_type.strip_prefix(ERR_PREFIX)?.split('/').next()
}

/// Get the error name from an error type (e.g., "Timeout" from "err:query/Timeout")
pub fn error_name(error_type: &str) -> Option<&str> {
    error_type.strip_prefix(ERR_PREFIX)?.split('/').nth(1)
}
