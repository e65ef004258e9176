//! Error types for kblink-sparql

use crate::executor::ExecutorError;
use crate::span::{LineCol, LineIndex};
use kblink_vocab::errors as codes;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Result type alias using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;

/// Result type alias for profile loading
pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

/// Error raised by a builder call that would produce an ambiguous or invalid
/// intent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A single-valued constraint was set twice, or label filter kinds were mixed.
    #[error("conflict on field '{field}': {message}")]
    Conflict {
        /// Field name (e.g., "hierarchy")
        field: &'static str,
        /// Description of the conflict
        message: String,
    },
    /// A value is invalid for this builder context.
    #[error("invalid field '{field}': {message}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// Description of the problem
        message: String,
    },
}

impl BuilderError {
    pub(crate) fn conflict(field: &'static str, message: impl Into<String>) -> Self {
        BuilderError::Conflict {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        BuilderError::Invalid {
            field,
            message: message.into(),
        }
    }

    /// Stable error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            BuilderError::Conflict { .. } => codes::BUILDER_CONFLICT,
            BuilderError::Invalid { .. } => codes::BUILDER_INVALID,
        }
    }
}

/// Invalid knowledge-base profile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// An IRI field holds a relative or otherwise unusable IRI
    #[error("profile field '{field}' is not an absolute IRI: {value}")]
    RelativeIri { field: &'static str, value: String },

    /// Any other violated constraint
    #[error("invalid profile field '{field}': {message}")]
    Invalid { field: &'static str, message: String },

    /// The profile document could not be parsed
    #[error("profile parse error: {0}")]
    Parse(String),
}

impl ProfileError {
    /// Stable error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProfileError::RelativeIri { .. } | ProfileError::Invalid { .. } => {
                codes::PROFILE_INVALID
            }
            ProfileError::Parse(_) => codes::PROFILE_PARSE,
        }
    }
}

/// The backend rejected compiled query text at parse time.
///
/// Carries the offending line from the compiled text when the backend message
/// includes a recognisable position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedQueryError {
    /// Backend message, verbatim
    pub message: String,
    /// Best-effort location in the compiled text
    pub position: Option<LineCol>,
    /// The compiled line at `position`
    pub excerpt: Option<String>,
}

// "line 3 col 7", "line 3, column 7", "3:7", "position 42"
static LINE_COL_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)line\s+(\d+)\s*,?\s*col(?:umn)?\s+(\d+)").unwrap()
});
static LINE_COL_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+):(\d+)\b").unwrap());
static OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:position|offset|char(?:acter)?)\s+(\d+)").unwrap()
});

impl MalformedQueryError {
    /// Annotate a backend message against the compiled text.
    ///
    /// `reported` takes precedence over any position parsed from the message.
    pub fn annotate(message: impl Into<String>, reported: Option<LineCol>, text: &str) -> Self {
        let message = message.into();
        let index = LineIndex::new(text);
        let position = reported.or_else(|| locate(&message, &index, text));
        let excerpt = position
            .and_then(|pos| index.line_text(pos.line, text))
            .map(str::to_string);
        Self {
            message,
            position,
            excerpt,
        }
    }

    pub fn error_code(&self) -> &'static str {
        codes::MALFORMED_QUERY
    }
}

fn parse_pair(caps: &regex::Captures<'_>) -> Option<LineCol> {
    let line = caps.get(1)?.as_str().parse().ok()?;
    let col = caps.get(2)?.as_str().parse().ok()?;
    (line > 0).then_some(LineCol::new(line, col))
}

fn locate(message: &str, index: &LineIndex, text: &str) -> Option<LineCol> {
    let found = LINE_COL_WORDS
        .captures(message)
        .and_then(|caps| parse_pair(&caps))
        .or_else(|| {
            LINE_COL_PAIR
                .captures(message)
                .and_then(|caps| parse_pair(&caps))
        });
    if let Some(pos) = found {
        return (pos.line as usize <= index.line_count()).then_some(pos);
    }
    let offset: usize = OFFSET.captures(message)?.get(1)?.as_str().parse().ok()?;
    (offset <= text.len()).then(|| index.line_col(offset))
}

impl std::fmt::Display for MalformedQueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed query: {}", self.message)?;
        if let Some(pos) = self.position {
            write!(f, "\n --> {}", pos)?;
            if let Some(line) = &self.excerpt {
                let gutter = pos.line.to_string().len();
                write!(f, "\n{:>w$} |\n{} | {}", "", pos.line, line, w = gutter)?;
                let caret = (pos.col as usize).saturating_sub(1).min(line.len());
                write!(f, "\n{:>w$} | {:caret$}^", "", "", w = gutter, caret = caret)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for MalformedQueryError {}

/// Error returned by terminal operations.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Builder validation failed
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// The knowledge-base profile failed validation
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// The backend could not parse the compiled text
    #[error(transparent)]
    MalformedQuery(#[from] MalformedQueryError),

    /// Execution failed in the connection
    #[error(transparent)]
    Execution(ExecutorError),
}

impl QueryError {
    /// Lift an executor failure, annotating parse errors against `text`.
    pub(crate) fn from_executor(err: ExecutorError, text: &str) -> Self {
        match err {
            ExecutorError::MalformedQuery { message, position } => {
                QueryError::MalformedQuery(MalformedQueryError::annotate(message, position, text))
            }
            other => QueryError::Execution(other),
        }
    }

    /// Stable error code string.
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::Builder(e) => e.error_code(),
            QueryError::Profile(e) => e.error_code(),
            QueryError::MalformedQuery(e) => e.error_code(),
            QueryError::Execution(e) => e.error_code(),
        }
    }
}
