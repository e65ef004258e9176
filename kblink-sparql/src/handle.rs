//! Typed references to knowledge-base resources.

use serde::Serialize;
use std::hash::{Hash, Hasher};

/// A literal that satisfied an exact label filter, with its language rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTerm {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Position in the language preference; lower is better
    pub rank: usize,
}

/// A resource found in a knowledge base.
///
/// Two handles are equal when their identifiers are equal; labels and other
/// decorations do not take part in equality or hashing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Handle {
    identifier: String,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<String>,
    deprecated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    match_terms: Vec<MatchTerm>,
}

impl Handle {
    pub(crate) fn new(identifier: String, label: String) -> Self {
        Self {
            identifier,
            label,
            description: None,
            language: None,
            domain: None,
            range: None,
            deprecated: false,
            match_terms: Vec::new(),
        }
    }

    pub(crate) fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub(crate) fn set_language(&mut self, language: Option<String>) {
        self.language = language;
    }

    pub(crate) fn set_domain_range(&mut self, domain: Option<String>, range: Option<String>) {
        self.domain = domain;
        self.range = range;
    }

    pub(crate) fn set_deprecated(&mut self, deprecated: bool) {
        self.deprecated = deprecated;
    }

    pub(crate) fn set_match_terms(&mut self, match_terms: Vec<MatchTerm>) {
        self.match_terms = match_terms;
    }

    /// Absolute IRI of the resource
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Display label
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Language tag of the display label
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn range(&self) -> Option<&str> {
        self.range.as_deref()
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Matched literals of an exact label filter, best rank first
    pub fn match_terms(&self) -> &[MatchTerm] {
        &self.match_terms
    }

    /// A copy with a different display label.
    pub fn with_label(&self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self.clone()
        }
    }

    /// A copy with a different description.
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..self.clone()
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.label, self.identifier)
    }
}
