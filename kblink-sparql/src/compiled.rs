//! Compiled query text and metadata.

use crate::intent::{Mode, Projection};
use crate::profile::DialectProfile;
use std::collections::BTreeSet;

/// SPARQL query form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryForm {
    Select,
    Ask,
}

/// Label languages in priority order.
///
/// The default language ranks first, then each fallback in order, then
/// untagged literals. Without a default language only untagged literals are
/// visible.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguagePreference {
    default: Option<String>,
    fallbacks: Vec<String>,
}

impl LanguagePreference {
    /// Preferences of `profile`, with `extra` fallbacks appended.
    pub fn resolve(profile: &DialectProfile, extra: &[String]) -> Self {
        let default = profile.default_language.as_ref().map(|l| l.to_ascii_lowercase());
        let mut fallbacks: Vec<String> = Vec::new();
        if default.is_some() {
            for lang in profile.fallback_languages.iter().chain(extra) {
                let lang = lang.to_ascii_lowercase();
                if Some(&lang) != default.as_ref() && !fallbacks.contains(&lang) {
                    fallbacks.push(lang);
                }
            }
        } else if !profile.fallback_languages.is_empty() || !extra.is_empty() {
            tracing::debug!("no default language configured; fallback languages ignored");
        }
        Self { default, fallbacks }
    }

    pub fn default_language(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn fallbacks(&self) -> &[String] {
        &self.fallbacks
    }

    /// Rank of a literal's language tag; lower is better. `None` means the
    /// literal is not visible under this preference.
    pub fn rank(&self, tag: Option<&str>) -> Option<usize> {
        let tag = tag.unwrap_or("");
        if tag.is_empty() {
            return Some(self.untagged_rank());
        }
        let default = self.default.as_deref()?;
        if lang_matches(tag, default) {
            return Some(0);
        }
        self.fallbacks
            .iter()
            .position(|lang| lang_matches(tag, lang))
            .map(|i| i + 1)
    }

    /// Rank given to literals without a language tag
    pub fn untagged_rank(&self) -> usize {
        if self.default.is_some() {
            self.fallbacks.len() + 1
        } else {
            0
        }
    }

    /// SPARQL boolean expression admitting literals visible under this
    /// preference.
    pub fn filter_expr(&self, variable: &str) -> String {
        let untagged = format!("LANG({}) = \"\"", variable);
        match &self.default {
            None => untagged,
            Some(default) => {
                let mut parts = Vec::with_capacity(self.fallbacks.len() + 2);
                for lang in std::iter::once(default).chain(&self.fallbacks) {
                    parts.push(format!(
                        "LANGMATCHES(LANG({}), {})",
                        variable,
                        crate::text::string_literal(lang)
                    ));
                }
                parts.push(untagged);
                parts.join(" || ")
            }
        }
    }
}

/// `langMatches` for a concrete range: equal, or a subtag extension of it.
pub(crate) fn lang_matches(tag: &str, range: &str) -> bool {
    let tag = tag.to_ascii_lowercase();
    let range = range.to_ascii_lowercase();
    tag == range
        || tag
            .strip_prefix(range.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
}

/// Query text produced by one compile call, plus what a mapper needs to read
/// its rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledQuery {
    pub(crate) text: String,
    pub(crate) form: QueryForm,
    pub(crate) mode: Mode,
    pub(crate) projections: BTreeSet<Projection>,
    pub(crate) variables: Vec<String>,
    pub(crate) full_text: bool,
    pub(crate) limit: Option<usize>,
    pub(crate) languages: LanguagePreference,
    pub(crate) records_match_terms: bool,
}

impl CompiledQuery {
    /// The SPARQL text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn form(&self) -> QueryForm {
        self.form
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Projections bound by the query
    pub fn projections(&self) -> &BTreeSet<Projection> {
        &self.projections
    }

    /// Names of the projected variables, without `?`
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Whether a full-text index pattern was emitted
    pub fn uses_full_text(&self) -> bool {
        self.full_text
    }

    /// The embedded row limit
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn languages(&self) -> &LanguagePreference {
        &self.languages
    }

    /// Whether matched literals are recorded as ranked match terms
    pub fn records_match_terms(&self) -> bool {
        self.records_match_terms
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl std::fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
