//! Terminal operations against a scripted executor.

mod support;

use kblink_sparql::{
    DialectProfile, ExecutorError, LineCol, QueryError, QueryForm, RdfValue, Row,
    SparqlQueryBuilder,
};
use kblink_vocab::{errors, rdfs};
use std::sync::Arc;
use support::tracing::init_test_tracing;
use support::{iri, kb, ScriptedExecutor};

fn profile() -> Arc<DialectProfile> {
    let mut profile = DialectProfile::rdfs();
    profile.default_language = Some("fr".to_string());
    profile.fallback_languages = vec!["en".to_string()];
    Arc::new(profile)
}

fn labelled(id: &str, label: RdfValue) -> Row {
    Row::new().with("s", iri(id)).with("l", label)
}

#[tokio::test]
async fn lookup_failure_degrades_to_configured_label() {
    let (store, _guard) = init_test_tracing();
    let exec = ScriptedExecutor::new(vec![labelled(
        &kb("green-goblin"),
        RdfValue::lang_literal("Green Goblin", "en"),
    )])
    .with_lookup(Err(ExecutorError::Transport("connection refused".into())));

    let handles = SparqlQueryBuilder::for_instances(profile())
        .with_label_starting_with("Green Go")
        .unwrap()
        .as_handles(&exec, false)
        .await
        .unwrap();

    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].label(), "Green Goblin");
    assert!(store.has_event(tracing::Level::WARN, "sub-property lookup failed"));
    assert!(store.has_span("kblink_as_handles"));

    let seen = exec.seen();
    assert_eq!(seen.len(), 2);
    assert!(seen[1].1.contains(&format!("?s <{}> ?m .", rdfs::LABEL)));
}

#[tokio::test]
async fn discovered_sub_properties_join_label_path() {
    let name = "http://example.org/vocab#name";
    let exec = ScriptedExecutor::new(Vec::new())
        .with_lookup(Ok(vec![Row::new().with("p", iri(name))]));

    SparqlQueryBuilder::for_classes(profile())
        .retrieve_label()
        .as_handles(&exec, false)
        .await
        .unwrap();

    let text = exec.last_text();
    assert!(text.contains(&format!("(<{}>|<{}>)", rdfs::LABEL, name)));
}

#[tokio::test]
async fn no_lookup_when_labels_unused() {
    let exec = ScriptedExecutor::new(Vec::new());
    SparqlQueryBuilder::for_classes(profile())
        .children_of(&kb("explicitRoot"))
        .unwrap()
        .as_handles(&exec, false)
        .await
        .unwrap();
    assert_eq!(exec.seen().len(), 1);
}

#[tokio::test]
async fn lookup_runs_per_call() {
    let exec = ScriptedExecutor::new(Vec::new());
    let builder = SparqlQueryBuilder::for_classes(profile()).retrieve_label();
    builder.as_handles(&exec, false).await.unwrap();
    builder.as_handles(&exec, false).await.unwrap();
    let lookups = exec
        .seen()
        .iter()
        .filter(|(_, text)| text.starts_with("SELECT DISTINCT ?p\n"))
        .count();
    assert_eq!(lookups, 2);
}

#[tokio::test]
async fn french_label_preferred_then_english() {
    let goblin = kb("green-goblin");
    let spider = kb("spider-man");
    let exec = ScriptedExecutor::new(vec![
        labelled(&goblin, RdfValue::lang_literal("Green Goblin", "en")),
        labelled(&goblin, RdfValue::lang_literal("Bouffon Vert", "fr")),
        labelled(&spider, RdfValue::lang_literal("Spider-Man", "en")),
        labelled(&spider, RdfValue::literal("spiderman")),
    ]);
    let handles = SparqlQueryBuilder::for_instances(profile())
        .retrieve_label()
        .as_handles(&exec, false)
        .await
        .unwrap();
    assert_eq!(handles[0].label(), "Bouffon Vert");
    assert_eq!(handles[0].language(), Some("fr"));
    assert_eq!(handles[1].label(), "Spider-Man");
    assert_eq!(handles[1].language(), Some("en"));
}

#[tokio::test]
async fn malformed_query_is_annotated() {
    let exec = ScriptedExecutor::new(Vec::new()).with_rows(Err(ExecutorError::malformed(
        "Encountered \" \"}\" at line 3, column 1.",
    )));
    let builder = SparqlQueryBuilder::for_classes(profile());
    let err = builder.as_handles(&exec, false).await.unwrap_err();
    let QueryError::MalformedQuery(malformed) = &err else {
        panic!("expected a malformed query error, got {err:?}");
    };
    assert_eq!(malformed.position, Some(LineCol::new(3, 1)));
    let third_line = exec.last_text().lines().nth(2).map(str::to_string);
    assert_eq!(malformed.excerpt, third_line);
    assert_eq!(err.error_code(), errors::MALFORMED_QUERY);
}

#[tokio::test]
async fn execution_errors_pass_through() {
    let exec = ScriptedExecutor::new(Vec::new()).with_rows(Err(ExecutorError::Timeout));
    let err = SparqlQueryBuilder::for_items(profile())
        .as_handles(&exec, false)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Execution(ExecutorError::Timeout)));
    assert_eq!(err.to_string(), "query timed out");
    assert_eq!(err.error_code(), errors::QUERY_TIMEOUT);
}

#[tokio::test]
async fn exists_sends_ask() {
    let exec = ScriptedExecutor::new(Vec::new()).with_ask(Ok(false));
    let found = SparqlQueryBuilder::for_classes(profile())
        .with_label_matching_exactly_any_of(["Goblin"])
        .unwrap()
        .exists(&exec, true)
        .await
        .unwrap();
    assert!(!found);
    let (form, text) = exec.seen().pop().unwrap();
    assert_eq!(form, QueryForm::Ask);
    assert!(text.starts_with("ASK\n"));
}

#[tokio::test]
async fn disabled_knowledge_base_never_queries() {
    let mut disabled = DialectProfile::rdfs();
    disabled.enabled = false;
    let disabled = Arc::new(disabled);
    let exec = ScriptedExecutor::new(vec![labelled(&kb("x"), RdfValue::literal("x"))]);

    let builder = SparqlQueryBuilder::for_classes(disabled).retrieve_label();
    assert!(builder.as_handles(&exec, false).await.unwrap().is_empty());
    assert!(!builder.exists(&exec, false).await.unwrap());
    assert!(exec.seen().is_empty());
}

#[tokio::test]
async fn unvalidated_profile_is_rejected_before_querying() {
    let mut hostile = DialectProfile::rdfs();
    hostile.root_concepts = vec!["http://example.org/kb#x> } DROP ALL { <y".to_string()];
    let exec = ScriptedExecutor::new(Vec::new()).with_ask(Ok(true));

    let builder = SparqlQueryBuilder::for_classes(Arc::new(hostile)).roots().unwrap();
    let err = builder.as_handles(&exec, false).await.unwrap_err();
    assert!(matches!(err, QueryError::Profile(_)), "{:?}", err);
    assert_eq!(err.error_code(), errors::PROFILE_INVALID);
    assert!(matches!(
        builder.exists(&exec, false).await,
        Err(QueryError::Profile(_))
    ));
    assert!(exec.seen().is_empty());

    // The text itself keeps the value inside one IRI
    let text = builder.select_query();
    assert!(text.contains("<http://example.org/kb#x%3E%20%7D%20DROP%20ALL%20%7B%20%3Cy>"));
    assert!(!text.contains("DROP ALL {"));
}

#[tokio::test]
async fn exact_match_terms_recorded() {
    let goblin = kb("green-goblin");
    let exec = ScriptedExecutor::new(vec![
        Row::new()
            .with("s", iri(&goblin))
            .with("m", RdfValue::lang_literal("green goblin", "en")),
        Row::new()
            .with("s", iri(&goblin))
            .with("m", RdfValue::lang_literal("Green Goblin", "fr")),
    ]);
    let handles = SparqlQueryBuilder::for_instances(profile())
        .with_label_matching_exactly_any_of(["Green Goblin"])
        .unwrap()
        .as_handles(&exec, false)
        .await
        .unwrap();
    let terms = handles[0].match_terms();
    assert_eq!(terms.len(), 2);
    assert_eq!(terms[0].language.as_deref(), Some("fr"));
    assert_eq!(terms[0].rank, 0);
    assert_eq!(terms[1].rank, 1);
}
