//! Full-text search dialects.
//!
//! Each backend family exposes full-text search through a different magic
//! predicate or service, with its own query-string syntax. This module holds one
//! [`FtsAdapter`] per dialect in a static table: the adapter turns a sanitized
//! term into the dialect's query string and writes the graph pattern that binds
//! `?s` and the matched literal.
//!
//! Adapters report whether their query string only approximates the requested
//! match (`lossy`); the label strategy then adds a precise regex post-filter.

use crate::intent::LabelFilterKind;
use crate::sanitize::SearchTerm;
use crate::text::{iri, string_literal, var};
use kblink_vocab::fts;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Full-text search dialect of a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FtsDialect {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "LUCENE_STYLE")]
    Lucene,
    #[serde(rename = "WIKIDATA_STYLE")]
    Wikidata,
    #[serde(rename = "FUSEKI_STYLE")]
    Fuseki,
    #[serde(rename = "STARDOG_STYLE")]
    Stardog,
    #[serde(rename = "VIRTUOSO_STYLE")]
    Virtuoso,
    #[serde(rename = "ALLEGROGRAPH_STYLE")]
    AllegroGraph,
    #[serde(rename = "GRAPHDB_STYLE")]
    GraphDb,
    #[serde(rename = "BLAZEGRAPH_STYLE")]
    Blazegraph,
}

impl FtsDialect {
    /// Infer the dialect from a well-known full-text predicate or service IRI.
    pub fn detect(fts_iri: &str) -> FtsDialect {
        match fts_iri {
            fts::lucene::MATCHES => FtsDialect::Lucene,
            fts::jena::QUERY => FtsDialect::Fuseki,
            fts::stardog::TEXT_MATCH => FtsDialect::Stardog,
            fts::virtuoso::CONTAINS => FtsDialect::Virtuoso,
            fts::allegrograph::MATCH => FtsDialect::AllegroGraph,
            fts::blazegraph::SEARCH => FtsDialect::Blazegraph,
            fts::wikidata::MWAPI => FtsDialect::Wikidata,
            other if other.starts_with(fts::graphdb::NS) => FtsDialect::GraphDb,
            _ => FtsDialect::None,
        }
    }

    /// The adapter for this dialect; `None` for [`FtsDialect::None`].
    pub fn adapter(self) -> Option<&'static FtsAdapter> {
        ADAPTERS.iter().find(|adapter| adapter.dialect == self)
    }
}

/// A dialect query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FtsText {
    pub query: String,
    /// The dialect cannot express the requested match exactly
    pub lossy: bool,
}

/// Inputs for writing one full-text pattern.
#[derive(Debug, Clone, Copy)]
pub struct FtsPattern<'a> {
    /// Variable bound to matching resources
    pub subject: &'a str,
    /// Variable bound to the matching literal
    pub matched: &'a str,
    /// Label property searched; ignored by property-independent dialects
    pub property: &'a str,
    /// Configured predicate or service IRI of the index
    pub fts_iri: &'a str,
    /// Dialect query string
    pub query: &'a str,
    /// Result cap passed to dialects that take one
    pub limit: usize,
    /// Search language for dialects that take one
    pub language: &'a str,
    /// Scratch variable name for dialects that bind a score
    pub scratch: &'a str,
}

/// Strategy entry for one dialect.
pub struct FtsAdapter {
    pub dialect: FtsDialect,
    /// One pattern covers all label properties
    pub property_independent: bool,
    /// Dialect query string for a term; `None` when nothing searchable remains
    pub text: fn(LabelFilterKind, &SearchTerm) -> Option<FtsText>,
    /// Graph pattern binding `subject` (and `matched` unless property-independent)
    pub pattern: fn(&FtsPattern<'_>, &mut String),
}

impl std::fmt::Debug for FtsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtsAdapter")
            .field("dialect", &self.dialect)
            .field("property_independent", &self.property_independent)
            .finish()
    }
}

static ADAPTERS: [FtsAdapter; 8] = [
    FtsAdapter {
        dialect: FtsDialect::Lucene,
        property_independent: false,
        text: lucene_text,
        pattern: lucene_sail_pattern,
    },
    FtsAdapter {
        dialect: FtsDialect::Fuseki,
        property_independent: false,
        text: lucene_text,
        pattern: jena_pattern,
    },
    FtsAdapter {
        dialect: FtsDialect::Stardog,
        property_independent: false,
        text: lucene_text,
        pattern: stardog_pattern,
    },
    FtsAdapter {
        dialect: FtsDialect::GraphDb,
        property_independent: false,
        text: lucene_text,
        pattern: literal_predicate_pattern,
    },
    FtsAdapter {
        dialect: FtsDialect::Virtuoso,
        property_independent: false,
        text: virtuoso_text,
        pattern: virtuoso_pattern,
    },
    FtsAdapter {
        dialect: FtsDialect::AllegroGraph,
        property_independent: false,
        text: allegrograph_text,
        pattern: allegrograph_pattern,
    },
    FtsAdapter {
        dialect: FtsDialect::Blazegraph,
        property_independent: false,
        text: blazegraph_text,
        pattern: blazegraph_pattern,
    },
    FtsAdapter {
        dialect: FtsDialect::Wikidata,
        property_independent: true,
        text: wikidata_text,
        pattern: wikidata_pattern,
    },
];

// =============================================================================
// Query strings
// =============================================================================

fn is_phrase(kind: LabelFilterKind) -> bool {
    matches!(
        kind,
        LabelFilterKind::MatchesAnyOf | LabelFilterKind::MatchesExactly
    )
}

/// Whether `index` is the token that gets a trailing wildcard.
fn wildcard_at(kind: LabelFilterKind, term: &SearchTerm, index: usize, count: usize) -> bool {
    match kind {
        LabelFilterKind::Contains => true,
        LabelFilterKind::StartsWith => index + 1 == count && !term.complete_final_token(),
        _ => false,
    }
}

fn lucene_escape(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    for ch in token.chars() {
        if matches!(
            ch,
            '+' | '-' | '&' | '|' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~'
                | '*' | '?' | ':' | '\\' | '/'
        ) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn quoted_phrase(term: &SearchTerm) -> String {
    let mut out = String::from("\"");
    for ch in term.text().chars() {
        if matches!(ch, '"' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// Lucene query syntax (LuceneSail, Jena text, Stardog, GraphDB).
fn lucene_text(kind: LabelFilterKind, term: &SearchTerm) -> Option<FtsText> {
    if is_phrase(kind) {
        return Some(FtsText {
            query: quoted_phrase(term),
            lossy: false,
        });
    }
    let tokens: Vec<&str> = term.tokens().collect();
    let count = tokens.len();
    let parts: Vec<String> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let mut part = lucene_escape(token);
            if wildcard_at(kind, term, i, count) {
                part.push('*');
            }
            part
        })
        .collect();
    Some(FtsText {
        query: parts.join(" AND "),
        // token-wise prefixes do not enforce substring adjacency
        lossy: kind == LabelFilterKind::Contains && count > 1,
    })
}

/// Characters Virtuoso's free-text grammar accepts inside a quoted word.
fn virtuoso_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| !matches!(c, '\'' | '"' | '*' | '\\'))
        .collect()
}

/// `bif:contains` expressions. Wildcards need at least four leading characters;
/// shorter prefix tokens are dropped and left to the post-filter.
fn virtuoso_text(kind: LabelFilterKind, term: &SearchTerm) -> Option<FtsText> {
    let tokens: Vec<String> = term
        .tokens()
        .map(virtuoso_token)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return None;
    }
    if is_phrase(kind) {
        return Some(FtsText {
            query: format!("\"{}\"", tokens.join(" ")),
            lossy: false,
        });
    }
    let count = tokens.len();
    let mut lossy = kind == LabelFilterKind::Contains;
    let mut parts = Vec::with_capacity(count);
    for (i, token) in tokens.iter().enumerate() {
        if wildcard_at(kind, term, i, count) {
            if token.chars().count() >= 4 {
                parts.push(format!("'{}*'", token));
            } else {
                lossy = true;
            }
        } else {
            parts.push(format!("'{}'", token));
        }
    }
    if parts.is_empty() {
        return None;
    }
    Some(FtsText {
        query: parts.join(" AND "),
        lossy,
    })
}

fn allegrograph_text(kind: LabelFilterKind, term: &SearchTerm) -> Option<FtsText> {
    let query = if is_phrase(kind) {
        quoted_phrase(term)
    } else {
        let tokens: Vec<&str> = term.tokens().collect();
        let count = tokens.len();
        let parts: Vec<String> = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                let clean: String = token.chars().filter(|c| !matches!(c, '"' | '*' | '?')).collect();
                if wildcard_at(kind, term, i, count) {
                    format!("{}*", clean)
                } else {
                    clean
                }
            })
            .filter(|part| !part.is_empty() && part != "*")
            .collect();
        if parts.is_empty() {
            return None;
        }
        parts.join(" ")
    };
    Some(FtsText { query, lossy: true })
}

fn blazegraph_text(kind: LabelFilterKind, term: &SearchTerm) -> Option<FtsText> {
    let tokens: Vec<&str> = term.tokens().collect();
    let count = tokens.len();
    let parts: Vec<String> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let clean: String = token.chars().filter(|c| *c != '*').collect();
            if wildcard_at(kind, term, i, count) && !clean.is_empty() {
                format!("{}*", clean)
            } else {
                clean
            }
        })
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(FtsText {
        query: parts.join(" "),
        lossy: is_phrase(kind) || (kind == LabelFilterKind::Contains && count > 1),
    })
}

/// The MediaWiki entity search takes the text as typed.
fn wikidata_text(_kind: LabelFilterKind, term: &SearchTerm) -> Option<FtsText> {
    Some(FtsText {
        query: term.text().to_string(),
        lossy: true,
    })
}

// =============================================================================
// Graph patterns
// =============================================================================

fn bind_label(p: &FtsPattern<'_>, out: &mut String) {
    writeln!(out, "{} {} {} .", var(p.subject), iri(p.property), var(p.matched)).unwrap();
}

fn lucene_sail_pattern(p: &FtsPattern<'_>, out: &mut String) {
    writeln!(
        out,
        "{} {} [ {} {} ; {} {} ] .",
        var(p.subject),
        iri(p.fts_iri),
        iri(fts::lucene::QUERY),
        string_literal(p.query),
        iri(fts::lucene::PROPERTY),
        iri(p.property)
    )
    .unwrap();
    bind_label(p, out);
}

fn jena_pattern(p: &FtsPattern<'_>, out: &mut String) {
    writeln!(
        out,
        "({} {} {}) {} ({} {} {}) .",
        var(p.subject),
        var(p.scratch),
        var(p.matched),
        iri(p.fts_iri),
        iri(p.property),
        string_literal(p.query),
        p.limit
    )
    .unwrap();
}

fn stardog_pattern(p: &FtsPattern<'_>, out: &mut String) {
    writeln!(
        out,
        "{} {} ({} {}) .",
        var(p.matched),
        iri(p.fts_iri),
        string_literal(p.query),
        p.limit
    )
    .unwrap();
    bind_label(p, out);
}

/// GraphDB: the index predicate relates the literal to the query string.
fn literal_predicate_pattern(p: &FtsPattern<'_>, out: &mut String) {
    writeln!(
        out,
        "{} {} {} .",
        var(p.matched),
        iri(p.fts_iri),
        string_literal(p.query)
    )
    .unwrap();
    bind_label(p, out);
}

fn virtuoso_pattern(p: &FtsPattern<'_>, out: &mut String) {
    bind_label(p, out);
    writeln!(
        out,
        "{} {} {} .",
        var(p.matched),
        iri(p.fts_iri),
        string_literal(p.query)
    )
    .unwrap();
}

fn allegrograph_pattern(p: &FtsPattern<'_>, out: &mut String) {
    writeln!(
        out,
        "{} {} {} .",
        var(p.subject),
        iri(p.fts_iri),
        string_literal(p.query)
    )
    .unwrap();
    bind_label(p, out);
}

fn blazegraph_pattern(p: &FtsPattern<'_>, out: &mut String) {
    writeln!(
        out,
        "{} {} {} .",
        var(p.matched),
        iri(p.fts_iri),
        string_literal(p.query)
    )
    .unwrap();
    writeln!(
        out,
        "{} {} \"true\" .",
        var(p.matched),
        iri(fts::blazegraph::MATCH_ALL_TERMS)
    )
    .unwrap();
    bind_label(p, out);
}

fn wikidata_pattern(p: &FtsPattern<'_>, out: &mut String) {
    let param = iri(fts::blazegraph::SERVICE_PARAM);
    writeln!(out, "SERVICE {} {{", iri(p.fts_iri)).unwrap();
    writeln!(
        out,
        "{} {} \"EntitySearch\" .",
        param,
        iri(fts::wikidata::API)
    )
    .unwrap();
    writeln!(
        out,
        "{} {} {} .",
        param,
        iri(fts::wikidata::ENDPOINT),
        string_literal(fts::wikidata::DEFAULT_HOST)
    )
    .unwrap();
    writeln!(
        out,
        "{} {} {} .",
        param,
        iri(fts::wikidata::SEARCH),
        string_literal(p.query)
    )
    .unwrap();
    writeln!(
        out,
        "{} {} {} .",
        param,
        iri(fts::wikidata::LANGUAGE),
        string_literal(p.language)
    )
    .unwrap();
    writeln!(
        out,
        "{} {} {} .",
        var(p.subject),
        iri(fts::wikidata::API_OUTPUT_ITEM),
        iri(fts::wikidata::ITEM)
    )
    .unwrap();
    out.push_str("}\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(raw: &str) -> SearchTerm {
        SearchTerm::parse(raw).unwrap()
    }

    fn pattern_for(dialect: FtsDialect, fts_iri: &str) -> String {
        let adapter = dialect.adapter().unwrap();
        let mut out = String::new();
        (adapter.pattern)(
            &FtsPattern {
                subject: "s",
                matched: "m",
                property: "http://www.w3.org/2000/01/rdf-schema#label",
                fts_iri,
                query: "green gob*",
                limit: 50,
                language: "en",
                scratch: "_v0",
            },
            &mut out,
        );
        out
    }

    #[test]
    fn every_dialect_has_an_adapter() {
        for dialect in [
            FtsDialect::Lucene,
            FtsDialect::Wikidata,
            FtsDialect::Fuseki,
            FtsDialect::Stardog,
            FtsDialect::Virtuoso,
            FtsDialect::AllegroGraph,
            FtsDialect::GraphDb,
            FtsDialect::Blazegraph,
        ] {
            assert_eq!(dialect.adapter().unwrap().dialect, dialect);
        }
        assert!(FtsDialect::None.adapter().is_none());
    }

    #[test]
    fn detect_known_iris() {
        assert_eq!(FtsDialect::detect(fts::lucene::MATCHES), FtsDialect::Lucene);
        assert_eq!(FtsDialect::detect(fts::jena::QUERY), FtsDialect::Fuseki);
        assert_eq!(FtsDialect::detect("bif:contains"), FtsDialect::Virtuoso);
        assert_eq!(
            FtsDialect::detect("http://www.ontotext.com/owlim/lucene#labels"),
            FtsDialect::GraphDb
        );
        assert_eq!(FtsDialect::detect("http://example.org/x"), FtsDialect::None);
    }

    #[test]
    fn lucene_prefix_wildcard_on_last_token_only() {
        let text = lucene_text(LabelFilterKind::StartsWith, &term("Green Go")).unwrap();
        assert_eq!(text.query, "Green AND Go*");
        assert!(!text.lossy);
    }

    #[test]
    fn lucene_trailing_space_disables_wildcard() {
        let text = lucene_text(LabelFilterKind::StartsWith, &term("Green Go ")).unwrap();
        assert_eq!(text.query, "Green AND Go");
    }

    #[test]
    fn lucene_escapes_operators() {
        let text = lucene_text(LabelFilterKind::StartsWith, &term("AC/DC (band)")).unwrap();
        assert_eq!(text.query, "AC\\/DC AND \\(band\\)*");
    }

    #[test]
    fn lucene_phrase_for_exact_kinds() {
        let text = lucene_text(LabelFilterKind::MatchesExactly, &term("say \"hi\"")).unwrap();
        assert_eq!(text.query, "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn virtuoso_short_prefix_dropped() {
        let text = virtuoso_text(LabelFilterKind::StartsWith, &term("Green Go")).unwrap();
        assert_eq!(text.query, "'Green'");
        assert!(text.lossy);

        let text = virtuoso_text(LabelFilterKind::StartsWith, &term("Green Gobl")).unwrap();
        assert_eq!(text.query, "'Green' AND 'Gobl*'");
        assert!(!text.lossy);
    }

    #[test]
    fn virtuoso_nothing_searchable() {
        assert!(virtuoso_text(LabelFilterKind::StartsWith, &term("Go")).is_none());
        assert!(virtuoso_text(LabelFilterKind::Contains, &term("'\"")).is_none());
    }

    #[test]
    fn virtuoso_strips_quotes() {
        let text = virtuoso_text(LabelFilterKind::MatchesAnyOf, &term("o'brien x")).unwrap();
        assert_eq!(text.query, "\"obrien x\"");
    }

    #[test]
    fn blazegraph_phrase_is_lossy() {
        let text = blazegraph_text(LabelFilterKind::MatchesAnyOf, &term("green goblin")).unwrap();
        assert_eq!(text.query, "green goblin");
        assert!(text.lossy);
    }

    #[test]
    fn wikidata_is_raw_and_lossy() {
        let text = wikidata_text(LabelFilterKind::StartsWith, &term("Green\nGob")).unwrap();
        assert_eq!(text.query, "Green Gob");
        assert!(text.lossy);
    }

    #[test]
    fn lucene_sail_shape() {
        let out = pattern_for(FtsDialect::Lucene, fts::lucene::MATCHES);
        assert!(out.starts_with(
            "?s <http://www.openrdf.org/contrib/lucenesail#matches> [ <http://www.openrdf.org/contrib/lucenesail#query> \"green gob*\" ;"
        ));
        assert!(out.ends_with("?s <http://www.w3.org/2000/01/rdf-schema#label> ?m .\n"));
    }

    #[test]
    fn jena_shape() {
        let out = pattern_for(FtsDialect::Fuseki, fts::jena::QUERY);
        assert_eq!(
            out,
            "(?s ?_v0 ?m) <http://jena.apache.org/text#query> (<http://www.w3.org/2000/01/rdf-schema#label> \"green gob*\" 50) .\n"
        );
    }

    #[test]
    fn virtuoso_shape() {
        let out = pattern_for(FtsDialect::Virtuoso, "bif:contains");
        assert_eq!(
            out,
            "?s <http://www.w3.org/2000/01/rdf-schema#label> ?m .\n?m <bif:contains> \"green gob*\" .\n"
        );
    }

    #[test]
    fn wikidata_service_block() {
        let out = pattern_for(FtsDialect::Wikidata, fts::wikidata::MWAPI);
        assert!(out.starts_with("SERVICE <http://wikiba.se/ontology#mwapi> {\n"));
        assert!(out.contains("\"EntitySearch\""));
        assert!(out.contains("\"www.wikidata.org\""));
        assert!(out.contains("?s <http://wikiba.se/ontology#apiOutputItem>"));
        assert!(!out.contains("rdf-schema#label"));
    }
}
