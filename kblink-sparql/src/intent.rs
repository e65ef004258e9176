//! Declarative query intent accumulated by the builder.

use crate::sanitize::SearchTerm;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of resource a builder lists. Fixed when the builder is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Class,
    Instance,
    Property,
    Item,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Class => "CLASS",
            Mode::Instance => "INSTANCE",
            Mode::Property => "PROPERTY",
            Mode::Item => "ITEM",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position in the taxonomy relative to an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyFilter {
    /// Top-level resources
    Roots,
    /// Direct parents of the anchor
    Parents(String),
    /// Direct children of the anchor
    Children(String),
    /// Transitive parents of the anchor, excluding it
    Ancestors(String),
    /// Transitive children of the anchor, excluding it
    Descendants(String),
}

impl HierarchyFilter {
    /// Name of the builder call that set this filter
    pub fn call_name(&self) -> &'static str {
        match self {
            HierarchyFilter::Roots => "roots()",
            HierarchyFilter::Parents(_) => "parents_of()",
            HierarchyFilter::Children(_) => "children_of()",
            HierarchyFilter::Ancestors(_) => "ancestors_of()",
            HierarchyFilter::Descendants(_) => "descendants_of()",
        }
    }

    pub fn anchor(&self) -> Option<&str> {
        match self {
            HierarchyFilter::Roots => None,
            HierarchyFilter::Parents(x)
            | HierarchyFilter::Children(x)
            | HierarchyFilter::Ancestors(x)
            | HierarchyFilter::Descendants(x) => Some(x),
        }
    }

    /// Whether results lie below the anchor
    pub fn is_downward(&self) -> bool {
        matches!(
            self,
            HierarchyFilter::Children(_) | HierarchyFilter::Descendants(_)
        )
    }
}

/// How label filter terms are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LabelFilterKind {
    /// Label starts with the term
    StartsWith,
    /// Label contains the term as a substring
    Contains,
    /// Label contains the term as a whole-word phrase
    MatchesAnyOf,
    /// Label equals the term
    MatchesExactly,
}

impl LabelFilterKind {
    pub fn call_name(&self) -> &'static str {
        match self {
            LabelFilterKind::StartsWith => "with_label_starting_with()",
            LabelFilterKind::Contains => "with_label_containing_any_of()",
            LabelFilterKind::MatchesAnyOf => "with_label_matching_any_of()",
            LabelFilterKind::MatchesExactly => "with_label_matching_exactly_any_of()",
        }
    }
}

/// Label filter: one kind, one or more OR'd terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    pub kind: LabelFilterKind,
    pub terms: Vec<SearchTerm>,
}

/// Auxiliary values requested alongside each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Projection {
    Label,
    Description,
    DomainRange,
    Deprecation,
}

/// Everything a builder has been told so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIntentSpec {
    pub mode: Mode,
    pub identifiers: Option<Vec<String>>,
    pub hierarchy: Option<HierarchyFilter>,
    pub label: Option<LabelFilter>,
    pub domain: Option<String>,
    pub projections: BTreeSet<Projection>,
    pub limit: Option<usize>,
    /// Appended after the profile's fallback languages
    pub extra_fallback_languages: Vec<String>,
    /// Overrides the profile's case sensitivity
    pub case_sensitive: Option<bool>,
}

impl QueryIntentSpec {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            identifiers: None,
            hierarchy: None,
            label: None,
            domain: None,
            projections: BTreeSet::new(),
            limit: None,
            extra_fallback_languages: Vec::new(),
            case_sensitive: None,
        }
    }

    pub fn has_projection(&self, projection: Projection) -> bool {
        self.projections.contains(&projection)
    }

    /// Whether the compiled query touches label properties at all
    pub fn uses_labels(&self) -> bool {
        self.label.is_some() || self.has_projection(Projection::Label)
    }
}
