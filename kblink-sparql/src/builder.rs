//! Fluent query builder.
//!
//! A builder is bound to one knowledge-base profile and one [`Mode`]. Every
//! narrowing call returns a new builder and leaves the receiver untouched, so a
//! partially narrowed builder can be shared and extended in several directions.
//! Single-valued constraints set twice are rejected at the call with a
//! [`BuilderError`].
//!
//! # Example
//!
//! ```ignore
//! let profile = Arc::new(DialectProfile::rdfs());
//! let goblins = SparqlQueryBuilder::for_instances(profile)
//!     .with_label_starting_with("Green Go")?
//!     .retrieve_label()
//!     .limit(10)?
//!     .as_handles(&executor, false)
//!     .await?;
//! ```

use crate::compiled::{CompiledQuery, LanguagePreference, QueryForm};
use crate::error::{BuilderError, QueryError, Result};
use crate::executor::QueryExecutor;
use crate::handle::Handle;
use crate::hierarchy::HierarchyNavigator;
use crate::intent::{
    HierarchyFilter, LabelFilter, LabelFilterKind, Mode, Projection, QueryIntentSpec,
};
use crate::label::{self, LabelContext, LabelProperties};
use crate::mapper::ResultMapper;
use crate::profile::{is_language_tag, DialectProfile};
use crate::sanitize::SearchTerm;
use crate::text::{iri, is_absolute_iri, var, vars, FreshVars};
use kblink_vocab::rdfs;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::Instrument;

/// Builds SPARQL for one knowledge base and mode.
#[derive(Debug, Clone)]
pub struct SparqlQueryBuilder {
    profile: Arc<DialectProfile>,
    intent: QueryIntentSpec,
}

fn check_iri(field: &'static str, value: &str) -> std::result::Result<(), BuilderError> {
    if is_absolute_iri(value) {
        Ok(())
    } else {
        Err(BuilderError::invalid(
            field,
            format!("'{}' is not an absolute IRI", value),
        ))
    }
}

impl SparqlQueryBuilder {
    fn new(profile: Arc<DialectProfile>, mode: Mode) -> Self {
        Self {
            profile,
            intent: QueryIntentSpec::new(mode),
        }
    }

    /// List classes.
    pub fn for_classes(profile: Arc<DialectProfile>) -> Self {
        Self::new(profile, Mode::Class)
    }

    /// List instances (resources typed with something that is not a class
    /// or property type).
    pub fn for_instances(profile: Arc<DialectProfile>) -> Self {
        Self::new(profile, Mode::Instance)
    }

    /// List properties.
    pub fn for_properties(profile: Arc<DialectProfile>) -> Self {
        Self::new(profile, Mode::Property)
    }

    /// List any IRI that is the subject of at least one statement.
    pub fn for_items(profile: Arc<DialectProfile>) -> Self {
        Self::new(profile, Mode::Item)
    }

    pub fn profile(&self) -> &DialectProfile {
        &self.profile
    }

    pub fn mode(&self) -> Mode {
        self.intent.mode
    }

    pub fn intent(&self) -> &QueryIntentSpec {
        &self.intent
    }

    fn narrowed(&self, apply: impl FnOnce(&mut QueryIntentSpec)) -> Self {
        let mut next = self.clone();
        apply(&mut next.intent);
        next
    }

    // =========================================================================
    // Filters
    // =========================================================================

    /// Restrict results to the given IRIs.
    pub fn with_identifier<I, S>(&self, identifiers: I) -> std::result::Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.intent.identifiers.is_some() {
            return Err(BuilderError::conflict(
                "identifier",
                "with_identifier() already set",
            ));
        }
        let mut list: Vec<String> = Vec::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref();
            check_iri("identifier", identifier)?;
            if !list.iter().any(|i| i == identifier) {
                list.push(identifier.to_string());
            }
        }
        if list.is_empty() {
            return Err(BuilderError::invalid(
                "identifier",
                "at least one identifier is required",
            ));
        }
        Ok(self.narrowed(|intent| intent.identifiers = Some(list)))
    }

    fn with_hierarchy(&self, filter: HierarchyFilter) -> std::result::Result<Self, BuilderError> {
        if let Some(existing) = &self.intent.hierarchy {
            return Err(BuilderError::conflict(
                "hierarchy",
                format!(
                    "{} cannot be combined with {}",
                    filter.call_name(),
                    existing.call_name()
                ),
            ));
        }
        if let Some(anchor) = filter.anchor() {
            check_iri("hierarchy", anchor)?;
        }
        Ok(self.narrowed(|intent| intent.hierarchy = Some(filter)))
    }

    /// Only top-level resources: the profile's explicit root concepts when it
    /// lists any, otherwise resources without a parent.
    pub fn roots(&self) -> std::result::Result<Self, BuilderError> {
        self.with_hierarchy(HierarchyFilter::Roots)
    }

    pub fn parents_of(&self, identifier: &str) -> std::result::Result<Self, BuilderError> {
        self.with_hierarchy(HierarchyFilter::Parents(identifier.to_string()))
    }

    pub fn children_of(&self, identifier: &str) -> std::result::Result<Self, BuilderError> {
        self.with_hierarchy(HierarchyFilter::Children(identifier.to_string()))
    }

    pub fn ancestors_of(&self, identifier: &str) -> std::result::Result<Self, BuilderError> {
        self.with_hierarchy(HierarchyFilter::Ancestors(identifier.to_string()))
    }

    pub fn descendants_of(&self, identifier: &str) -> std::result::Result<Self, BuilderError> {
        self.with_hierarchy(HierarchyFilter::Descendants(identifier.to_string()))
    }

    fn with_label_filter<I, S>(
        &self,
        kind: LabelFilterKind,
        raw_terms: I,
    ) -> std::result::Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: Vec<SearchTerm> = raw_terms
            .into_iter()
            .filter_map(|raw| SearchTerm::parse(raw.as_ref()))
            .collect();
        if terms.is_empty() {
            return Err(BuilderError::invalid(
                "label",
                format!("{} needs at least one non-blank term", kind.call_name()),
            ));
        }
        let mut filter = match &self.intent.label {
            Some(existing) if existing.kind != kind => {
                return Err(BuilderError::conflict(
                    "label",
                    format!(
                        "{} cannot be combined with {}",
                        kind.call_name(),
                        existing.kind.call_name()
                    ),
                ));
            }
            Some(existing) => existing.clone(),
            None => LabelFilter {
                kind,
                terms: Vec::new(),
            },
        };
        for term in terms {
            if !filter.terms.contains(&term) {
                filter.terms.push(term);
            }
        }
        Ok(self.narrowed(|intent| intent.label = Some(filter)))
    }

    /// Label starts with `prefix`. A trailing space makes the last word
    /// complete: `"Green Go "` does not match "Green Goblin".
    pub fn with_label_starting_with(&self, prefix: &str) -> std::result::Result<Self, BuilderError> {
        self.with_label_filter(LabelFilterKind::StartsWith, [prefix])
    }

    /// Label contains any of `terms` as a substring.
    pub fn with_label_containing_any_of<I, S>(&self, terms: I) -> std::result::Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_label_filter(LabelFilterKind::Contains, terms)
    }

    /// Label contains any of `terms` as whole words.
    pub fn with_label_matching_any_of<I, S>(&self, terms: I) -> std::result::Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_label_filter(LabelFilterKind::MatchesAnyOf, terms)
    }

    /// Label equals any of `terms`. Matched literals are reported as ranked
    /// match terms on each handle.
    pub fn with_label_matching_exactly_any_of<I, S>(
        &self,
        terms: I,
    ) -> std::result::Result<Self, BuilderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_label_filter(LabelFilterKind::MatchesExactly, terms)
    }

    /// Properties whose declared domain is `domain`. PROPERTY mode only.
    pub fn matching_domain(&self, domain: &str) -> std::result::Result<Self, BuilderError> {
        if self.intent.mode != Mode::Property {
            return Err(BuilderError::invalid(
                "domain",
                format!("matching_domain() requires PROPERTY mode, not {}", self.intent.mode),
            ));
        }
        if self.intent.domain.is_some() {
            return Err(BuilderError::conflict("domain", "matching_domain() already set"));
        }
        check_iri("domain", domain)?;
        let domain = domain.to_string();
        Ok(self.narrowed(|intent| intent.domain = Some(domain)))
    }

    /// Cap the number of result rows, overriding the profile's maximum.
    pub fn limit(&self, limit: usize) -> std::result::Result<Self, BuilderError> {
        if limit == 0 {
            return Err(BuilderError::invalid("limit", "must be greater than zero"));
        }
        if self.intent.limit.is_some() {
            return Err(BuilderError::conflict("limit", "limit() already set"));
        }
        Ok(self.narrowed(|intent| intent.limit = Some(limit)))
    }

    /// Override the profile's case sensitivity for label matching.
    pub fn case_sensitive(&self, case_sensitive: bool) -> Self {
        self.narrowed(|intent| intent.case_sensitive = Some(case_sensitive))
    }

    /// Extra fallback languages tried after the profile's own fallbacks.
    pub fn with_fallback_languages<I, S>(&self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extra = self.intent.extra_fallback_languages.clone();
        for lang in languages {
            let lang = lang.as_ref().trim().to_ascii_lowercase();
            if !is_language_tag(&lang) {
                tracing::warn!(language = %lang, "ignoring invalid fallback language tag");
                continue;
            }
            if !extra.contains(&lang) {
                extra.push(lang);
            }
        }
        self.narrowed(|intent| intent.extra_fallback_languages = extra)
    }

    // =========================================================================
    // Projections
    // =========================================================================

    fn with_projection(&self, projection: Projection) -> Self {
        self.narrowed(|intent| {
            intent.projections.insert(projection);
        })
    }

    pub fn retrieve_label(&self) -> Self {
        self.with_projection(Projection::Label)
    }

    pub fn retrieve_description(&self) -> Self {
        self.with_projection(Projection::Description)
    }

    pub fn retrieve_domain_and_range(&self) -> Self {
        self.with_projection(Projection::DomainRange)
    }

    pub fn retrieve_deprecation(&self) -> Self {
        self.with_projection(Projection::Deprecation)
    }

    // =========================================================================
    // Compilation
    // =========================================================================

    /// Compile with the configured label properties only.
    pub fn compile(&self) -> CompiledQuery {
        self.compile_with(&LabelProperties::configured(&self.profile, self.intent.mode))
    }

    /// Compile with an explicit set of label properties, e.g. one that includes
    /// discovered sub-properties.
    pub fn compile_with(&self, props: &LabelProperties) -> CompiledQuery {
        self.compile_form(props, QueryForm::Select)
    }

    /// SELECT text with the configured label properties.
    pub fn select_query(&self) -> String {
        self.compile().into_text()
    }

    /// ASK text with the configured label properties.
    pub fn ask_query(&self) -> String {
        self.compile_form(
            &LabelProperties::configured(&self.profile, self.intent.mode),
            QueryForm::Ask,
        )
        .into_text()
    }

    fn effective_limit(&self) -> usize {
        self.intent.limit.unwrap_or(self.profile.max_results)
    }

    fn compile_form(&self, props: &LabelProperties, form: QueryForm) -> CompiledQuery {
        let profile = &*self.profile;
        let intent = &self.intent;
        let mode = intent.mode;
        let limit = self.effective_limit();
        let languages = LanguagePreference::resolve(profile, &intent.extra_fallback_languages);
        let case_sensitive = intent.case_sensitive.unwrap_or(profile.case_sensitive);
        let cx = LabelContext {
            profile,
            mode,
            props,
            languages: &languages,
            case_sensitive,
            limit,
        };
        let nav = HierarchyNavigator::new(profile, mode);
        let s = var(vars::SUBJECT);

        let mut fresh = FreshVars::new();
        let mut body = String::new();
        let mut bound = false;
        let mut restricted = false;
        let mut full_text = false;

        if let Some(identifiers) = &intent.identifiers {
            let values: Vec<String> = identifiers.iter().map(|i| iri(i)).collect();
            writeln!(body, "VALUES {} {{ {} }}", s, values.join(" ")).unwrap();
            bound = true;
        }
        if let Some(filter) = &intent.hierarchy {
            restricted = nav.write(filter, bound, &mut fresh, &mut body);
            bound = true;
        }
        if let Some(filter) = &intent.label {
            full_text = label::write_label_filter(&cx, filter, &mut fresh, &mut body);
            bound = true;
        }
        if let Some(domain) = &intent.domain {
            let property = profile.domain_iri.as_deref().unwrap_or(rdfs::DOMAIN);
            writeln!(body, "{} {} {} .", s, iri(property), iri(domain)).unwrap();
            bound = true;
        }
        if !restricted && nav.restricts(intent.hierarchy.as_ref()) {
            nav.write_restriction(mode, bound, &mut fresh, &mut body);
        }
        writeln!(body, "FILTER(isIRI({}))", s).unwrap();

        let mut projections = BTreeSet::new();
        let mut variables = vec![vars::SUBJECT.to_string()];
        if form == QueryForm::Select {
            let wants_label = intent.label.is_some() || intent.has_projection(Projection::Label);
            if wants_label && label::write_display_label(&cx, &mut body) {
                projections.insert(Projection::Label);
                variables.push(vars::LABEL.to_string());
            }
            if intent.label.is_some() {
                variables.push(vars::MATCH.to_string());
            }
            if intent.has_projection(Projection::Description)
                && label::write_description(&cx, &mut body)
            {
                projections.insert(Projection::Description);
                variables.push(vars::DESCRIPTION.to_string());
            }
            if intent.has_projection(Projection::DomainRange) {
                let domain = profile.domain_iri.as_deref().unwrap_or(rdfs::DOMAIN);
                let range = profile.range_iri.as_deref().unwrap_or(rdfs::RANGE);
                writeln!(
                    body,
                    "OPTIONAL {{ {} {} {} }}",
                    s,
                    iri(domain),
                    var(vars::DOMAIN)
                )
                .unwrap();
                writeln!(
                    body,
                    "OPTIONAL {{ {} {} {} }}",
                    s,
                    iri(range),
                    var(vars::RANGE)
                )
                .unwrap();
                projections.insert(Projection::DomainRange);
                variables.push(vars::DOMAIN.to_string());
                variables.push(vars::RANGE.to_string());
            }
            if intent.has_projection(Projection::Deprecation) {
                if let Some(deprecation) = profile.deprecation_iri.as_deref() {
                    writeln!(
                        body,
                        "OPTIONAL {{ {} {} {} }}",
                        s,
                        iri(deprecation),
                        var(vars::DEPRECATED)
                    )
                    .unwrap();
                    projections.insert(Projection::Deprecation);
                    variables.push(vars::DEPRECATED.to_string());
                }
            }
        }

        let mut text = String::new();
        match form {
            QueryForm::Select => {
                let projected: Vec<String> = variables.iter().map(|v| var(v)).collect();
                writeln!(text, "SELECT DISTINCT {}", projected.join(" ")).unwrap();
            }
            QueryForm::Ask => text.push_str("ASK\n"),
        }
        if let Some(dataset) = &profile.default_dataset {
            writeln!(text, "FROM {}", iri(dataset)).unwrap();
        }
        write!(text, "WHERE {{\n{}}}", body).unwrap();
        let embedded_limit = match form {
            QueryForm::Select => {
                write!(text, "\nLIMIT {}", limit).unwrap();
                Some(limit)
            }
            QueryForm::Ask => None,
        };

        let records_match_terms = form == QueryForm::Select
            && intent
                .label
                .as_ref()
                .is_some_and(|l| l.kind == LabelFilterKind::MatchesExactly);

        tracing::debug!(
            mode = %mode,
            form = ?form,
            full_text,
            limit = ?embedded_limit,
            label_properties = props.matching().len(),
            "compiled query"
        );
        tracing::trace!(text = %text, "query text");

        CompiledQuery {
            text,
            form,
            mode,
            projections,
            variables,
            full_text,
            limit: embedded_limit,
            languages,
            records_match_terms,
        }
    }

    // =========================================================================
    // Terminals
    // =========================================================================

    /// Run the sub-property lookup when the query touches labels.
    ///
    /// Failures degrade to the configured label property and are only logged.
    async fn resolve_label_properties<E>(
        &self,
        executor: &E,
        include_inferred: bool,
        uses_labels: bool,
    ) -> LabelProperties
    where
        E: QueryExecutor + ?Sized,
    {
        let configured = LabelProperties::configured(&self.profile, self.intent.mode);
        if !uses_labels {
            return configured;
        }
        let Some(lookup) = label::sub_property_query(&self.profile, self.intent.mode) else {
            return configured;
        };
        match executor.execute(&lookup, include_inferred).await {
            Ok(rows) => {
                let found = label::discovered_properties(&rows);
                if found.is_empty() {
                    tracing::debug!("no label sub-properties found; using configured label property");
                } else {
                    tracing::debug!(count = found.len(), "label sub-properties discovered");
                }
                configured.with_sub_properties(found)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "label sub-property lookup failed; using configured label property only"
                );
                configured
            }
        }
    }

    /// Execute and map the results into handles.
    pub async fn as_handles<E>(&self, executor: &E, include_inferred: bool) -> Result<Vec<Handle>>
    where
        E: QueryExecutor + ?Sized,
    {
        let span = tracing::debug_span!(
            "kblink_as_handles",
            mode = %self.intent.mode,
            include_inferred
        );
        async move {
            if !self.profile.enabled {
                tracing::debug!("knowledge base disabled; returning no results");
                return Ok(Vec::new());
            }
            self.profile.validate()?;
            let props = self
                .resolve_label_properties(executor, include_inferred, self.intent.uses_labels())
                .await;
            let compiled = self.compile_with(&props);
            let rows = executor
                .execute(&compiled, include_inferred)
                .await
                .map_err(|e| QueryError::from_executor(e, compiled.text()))?;
            let handles = ResultMapper::new(&compiled, self.profile.base_prefix.as_deref()).map(rows);
            tracing::debug!(count = handles.len(), "mapped handles");
            Ok(handles)
        }
        .instrument(span)
        .await
    }

    /// Whether at least one resource satisfies the intent.
    pub async fn exists<E>(&self, executor: &E, include_inferred: bool) -> Result<bool>
    where
        E: QueryExecutor + ?Sized,
    {
        let span = tracing::debug_span!(
            "kblink_exists",
            mode = %self.intent.mode,
            include_inferred
        );
        async move {
            if !self.profile.enabled {
                tracing::debug!("knowledge base disabled; nothing exists");
                return Ok(false);
            }
            self.profile.validate()?;
            let props = self
                .resolve_label_properties(executor, include_inferred, self.intent.label.is_some())
                .await;
            let compiled = self.compile_form(&props, QueryForm::Ask);
            executor
                .exists(&compiled, include_inferred)
                .await
                .map_err(|e| QueryError::from_executor(e, compiled.text()))
        }
        .instrument(span)
        .await
    }
}
