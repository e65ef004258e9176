//! Result rows to [`Handle`]s.
//!
//! One resource usually arrives in several rows (one per label, description or
//! language variant). The mapper folds them per identifier in first-seen order
//! and keeps, for each aspect, the candidate with the best language rank.

use crate::compiled::{CompiledQuery, LanguagePreference};
use crate::executor::{RdfValue, Row};
use crate::handle::{Handle, MatchTerm};
use crate::text::vars;
use kblink_vocab::xsd;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Ranked {
    rank: usize,
    value: String,
    language: Option<String>,
}

#[derive(Debug, Default)]
struct Accumulator {
    identifier: String,
    label: Option<Ranked>,
    matched: Option<Ranked>,
    description: Option<Ranked>,
    domain: Option<String>,
    range: Option<String>,
    deprecated: bool,
    match_terms: Vec<MatchTerm>,
}

fn offer(slot: &mut Option<Ranked>, candidate: Ranked) {
    if slot.as_ref().map_or(true, |current| candidate.rank < current.rank) {
        *slot = Some(candidate);
    }
}

/// Whether a bound deprecation value means "deprecated".
///
/// Boolean true, the string "true", and the integer 1 are deprecated; anything
/// else is not.
pub fn is_deprecated_value(value: &RdfValue) -> bool {
    let RdfValue::Literal {
        value, datatype, ..
    } = value
    else {
        return false;
    };
    let lexical = value.trim();
    match datatype.as_deref() {
        Some(xsd::BOOLEAN) => lexical == "true" || lexical == "1",
        Some(dt) if xsd::is_integer_family(dt) => lexical.parse::<i64>() == Ok(1),
        dt if xsd::is_string_like(dt) => lexical == "true",
        _ => false,
    }
}

/// Folds rows of one compiled query into handles.
#[derive(Debug)]
pub struct ResultMapper<'a> {
    languages: &'a LanguagePreference,
    records_match_terms: bool,
    base_prefix: Option<&'a str>,
}

impl<'a> ResultMapper<'a> {
    pub fn new(query: &'a CompiledQuery, base_prefix: Option<&'a str>) -> Self {
        Self {
            languages: query.languages(),
            records_match_terms: query.records_match_terms(),
            base_prefix,
        }
    }

    fn ranked(&self, value: &RdfValue) -> Option<Ranked> {
        if !value.is_literal() {
            return None;
        }
        let language = value.language().map(str::to_string);
        let rank = self.languages.rank(language.as_deref())?;
        Some(Ranked {
            rank,
            value: value.lexical().to_string(),
            language,
        })
    }

    /// Deduplicated handles in first-seen order.
    pub fn map<I>(&self, rows: I) -> Vec<Handle>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut order: Vec<Accumulator> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        for row in rows {
            let Some(identifier) = row.get(vars::SUBJECT).and_then(RdfValue::as_iri) else {
                continue;
            };
            let slot = match index.get(identifier) {
                Some(&i) => i,
                None => {
                    index.insert(identifier.to_string(), order.len());
                    order.push(Accumulator {
                        identifier: identifier.to_string(),
                        ..Accumulator::default()
                    });
                    order.len() - 1
                }
            };
            self.fold(&mut order[slot], &row);
        }
        order.into_iter().map(|acc| self.finish(acc)).collect()
    }

    fn fold(&self, acc: &mut Accumulator, row: &Row) {
        if let Some(label) = row.get(vars::LABEL).and_then(|v| self.ranked(v)) {
            offer(&mut acc.label, label);
        }
        if let Some(matched) = row.get(vars::MATCH).and_then(|v| self.ranked(v)) {
            if self.records_match_terms
                && !acc
                    .match_terms
                    .iter()
                    .any(|t| t.label == matched.value && t.language == matched.language)
            {
                acc.match_terms.push(MatchTerm {
                    label: matched.value.clone(),
                    language: matched.language.clone(),
                    rank: matched.rank,
                });
            }
            offer(&mut acc.matched, matched);
        }
        if let Some(description) = row.get(vars::DESCRIPTION).and_then(|v| self.ranked(v)) {
            offer(&mut acc.description, description);
        }
        if acc.domain.is_none() {
            acc.domain = row
                .get(vars::DOMAIN)
                .and_then(RdfValue::as_iri)
                .map(str::to_string);
        }
        if acc.range.is_none() {
            acc.range = row
                .get(vars::RANGE)
                .and_then(RdfValue::as_iri)
                .map(str::to_string);
        }
        if row.get(vars::DEPRECATED).is_some_and(is_deprecated_value) {
            acc.deprecated = true;
        }
    }

    fn finish(&self, mut acc: Accumulator) -> Handle {
        let (label, language) = match acc.label.take().or_else(|| acc.matched.take()) {
            Some(ranked) => (ranked.value, ranked.language),
            None => (self.local_name(&acc.identifier).to_string(), None),
        };
        let mut handle = Handle::new(acc.identifier, label);
        handle.set_language(language);
        handle.set_description(acc.description.map(|d| d.value));
        handle.set_domain_range(acc.domain, acc.range);
        handle.set_deprecated(acc.deprecated);
        acc.match_terms.sort_by_key(|t| t.rank);
        handle.set_match_terms(acc.match_terms);
        handle
    }

    /// Display fallback derived from the identifier.
    fn local_name<'i>(&self, identifier: &'i str) -> &'i str {
        if let Some(rest) = self
            .base_prefix
            .and_then(|prefix| identifier.strip_prefix(prefix))
            .filter(|rest| !rest.is_empty())
        {
            return rest;
        }
        identifier
            .rfind(['#', '/', ':'])
            .map(|i| &identifier[i + 1..])
            .filter(|rest| !rest.is_empty())
            .unwrap_or(identifier)
    }
}
