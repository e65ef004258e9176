//! Label resolution: which properties carry labels, how label filters become
//! graph patterns, and which literals are visible under a language preference.

use crate::compiled::{CompiledQuery, LanguagePreference, QueryForm};
use crate::executor::Row;
use crate::fts::FtsPattern;
use crate::intent::{LabelFilter, LabelFilterKind, Mode};
use crate::profile::DialectProfile;
use crate::sanitize::SearchTerm;
use crate::text::{alternative_path, iri, regex_escape, string_literal, var, vars, FreshVars};
use std::collections::BTreeSet;
use std::fmt::Write as _;

/// Resolved label property sets for one terminal call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelProperties {
    display: Vec<String>,
    matching: Vec<String>,
}

impl LabelProperties {
    /// The configured label property for `mode` plus the profile's additional
    /// matching properties, without any discovered sub-properties.
    pub fn configured(profile: &DialectProfile, mode: Mode) -> Self {
        let display: Vec<String> = profile
            .label_property(mode == Mode::Property)
            .map(|p| vec![p.to_string()])
            .unwrap_or_default();
        let mut props = Self {
            matching: display.clone(),
            display,
        };
        for extra in &profile.additional_matching_properties {
            push_unique(&mut props.matching, extra);
        }
        props
    }

    /// Add discovered sub-properties of the label property. They take part in
    /// both display and matching.
    pub fn with_sub_properties<I, S>(mut self, discovered: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for property in discovered {
            let property = property.into();
            push_unique(&mut self.display, &property);
            push_unique(&mut self.matching, &property);
        }
        self
    }

    /// Properties read for display labels
    pub fn display(&self) -> &[String] {
        &self.display
    }

    /// Properties searched by label filters
    pub fn matching(&self) -> &[String] {
        &self.matching
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// The lookup that discovers transitive sub-properties of the label property,
/// or `None` when the profile has no sub-property or label IRI.
pub fn sub_property_query(profile: &DialectProfile, mode: Mode) -> Option<CompiledQuery> {
    let sub = profile.sub_property_iri.as_deref()?;
    let label = profile.label_property(mode == Mode::Property)?;
    let p = var(vars::PROPERTY);
    let mut text = format!("SELECT DISTINCT {}\n", p);
    if let Some(dataset) = &profile.default_dataset {
        writeln!(text, "FROM {}", iri(dataset)).unwrap();
    }
    write!(
        text,
        "WHERE {{\n{} {}+ {} .\nFILTER(isIRI({}))\n}}\nLIMIT {}",
        p,
        iri(sub),
        iri(label),
        p,
        profile.max_results
    )
    .unwrap();
    Some(CompiledQuery {
        text,
        form: QueryForm::Select,
        mode,
        projections: BTreeSet::new(),
        variables: vec![vars::PROPERTY.to_string()],
        full_text: false,
        limit: Some(profile.max_results),
        languages: LanguagePreference::default(),
        records_match_terms: false,
    })
}

/// IRIs bound to `?p` in the lookup rows, in row order.
pub fn discovered_properties(rows: &[Row]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for row in rows {
        if let Some(p) = row.get(vars::PROPERTY).and_then(|v| v.as_iri()) {
            push_unique(&mut out, p);
        }
    }
    out
}

/// Everything label pattern writers need from the compile call.
pub(crate) struct LabelContext<'a> {
    pub profile: &'a DialectProfile,
    pub mode: Mode,
    pub props: &'a LabelProperties,
    pub languages: &'a LanguagePreference,
    pub case_sensitive: bool,
    pub limit: usize,
}

/// Precise boolean test of `variable` against one term.
pub(crate) fn match_expr(
    kind: LabelFilterKind,
    term: &SearchTerm,
    case_sensitive: bool,
    variable: &str,
) -> String {
    let escaped = regex_escape(term.text());
    let pattern = match kind {
        LabelFilterKind::StartsWith if term.complete_final_token() => {
            format!("^{}($|\\s)", escaped)
        }
        LabelFilterKind::StartsWith => format!("^{}", escaped),
        LabelFilterKind::Contains => escaped,
        LabelFilterKind::MatchesAnyOf => format!("(^|\\W){}($|\\W)", escaped),
        LabelFilterKind::MatchesExactly => {
            return if case_sensitive {
                format!("STR({}) = {}", variable, string_literal(term.text()))
            } else {
                format!(
                    "LCASE(STR({})) = LCASE({})",
                    variable,
                    string_literal(term.text())
                )
            };
        }
    };
    if case_sensitive {
        format!("REGEX(STR({}), {})", variable, string_literal(&pattern))
    } else {
        format!("REGEX(STR({}), {}, \"i\")", variable, string_literal(&pattern))
    }
}

fn match_any_expr(filter: &LabelFilter, case_sensitive: bool, variable: &str) -> String {
    filter
        .terms
        .iter()
        .map(|term| match_expr(filter.kind, term, case_sensitive, variable))
        .collect::<Vec<_>>()
        .join(" || ")
}

pub(crate) fn write_union(out: &mut String, branches: &[String]) {
    match branches {
        [] => {}
        [single] => out.push_str(single),
        _ => {
            for (i, branch) in branches.iter().enumerate() {
                if i > 0 {
                    out.push_str("UNION\n");
                }
                out.push_str("{\n");
                out.push_str(branch);
                out.push_str("}\n");
            }
        }
    }
}

/// Write the patterns binding `?s` and `?m` for a label filter.
///
/// Returns whether a full-text pattern was emitted.
pub(crate) fn write_label_filter(
    cx: &LabelContext<'_>,
    filter: &LabelFilter,
    fresh: &mut FreshVars,
    out: &mut String,
) -> bool {
    let props = cx.props.matching();
    if props.is_empty() {
        tracing::debug!(mode = %cx.mode, "no label property configured; label filter matches nothing");
        out.push_str("FILTER(false)\n");
        return false;
    }
    let s = var(vars::SUBJECT);
    let m = var(vars::MATCH);
    let plain = format!("{} {} {} .\n", s, alternative_path(props), m);

    let adapter = cx
        .profile
        .fts_dialect
        .adapter()
        .zip(cx.profile.fts_iri.as_deref())
        .filter(|_| cx.profile.full_text_enabled());

    let mut full_text = false;
    let mut post_filter = true;
    match adapter {
        Some((adapter, fts_iri)) => {
            post_filter = matches!(
                filter.kind,
                LabelFilterKind::StartsWith | LabelFilterKind::MatchesExactly
            );
            let language = cx.languages.default_language().unwrap_or("en");
            let mut branches: Vec<String> = Vec::new();
            for term in &filter.terms {
                let Some(text) = (adapter.text)(filter.kind, term) else {
                    post_filter = true;
                    if !branches.contains(&plain) {
                        branches.push(plain.clone());
                    }
                    continue;
                };
                post_filter |= text.lossy;
                full_text = true;
                let targets: Vec<&str> = if adapter.property_independent {
                    vec![props[0].as_str()]
                } else {
                    props.iter().map(String::as_str).collect()
                };
                for property in targets {
                    let scratch = fresh.fresh();
                    let mut branch = String::new();
                    (adapter.pattern)(
                        &FtsPattern {
                            subject: vars::SUBJECT,
                            matched: vars::MATCH,
                            property,
                            fts_iri,
                            query: &text.query,
                            limit: cx.limit,
                            language,
                            scratch: &scratch,
                        },
                        &mut branch,
                    );
                    if adapter.property_independent {
                        branch.push_str(&plain);
                    }
                    branches.push(branch);
                }
            }
            write_union(out, &branches);
        }
        None => out.push_str(&plain),
    }
    writeln!(out, "FILTER({})", cx.languages.filter_expr(&m)).unwrap();
    if post_filter {
        writeln!(out, "FILTER({})", match_any_expr(filter, cx.case_sensitive, &m)).unwrap();
    }
    full_text
}

/// Optional display label binding `?l`.
pub(crate) fn write_display_label(cx: &LabelContext<'_>, out: &mut String) -> bool {
    let props = cx.props.display();
    if props.is_empty() {
        return false;
    }
    let l = var(vars::LABEL);
    writeln!(
        out,
        "OPTIONAL {{ {} {} {} . FILTER({}) }}",
        var(vars::SUBJECT),
        alternative_path(props),
        l,
        cx.languages.filter_expr(&l)
    )
    .unwrap();
    true
}

/// Optional description binding `?d`.
pub(crate) fn write_description(cx: &LabelContext<'_>, out: &mut String) -> bool {
    let Some(property) = cx.profile.description_property(cx.mode == Mode::Property) else {
        return false;
    };
    let d = var(vars::DESCRIPTION);
    writeln!(
        out,
        "OPTIONAL {{ {} {} {} . FILTER({}) }}",
        var(vars::SUBJECT),
        iri(property),
        d,
        cx.languages.filter_expr(&d)
    )
    .unwrap();
    true
}
