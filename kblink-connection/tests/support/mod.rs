//! Shared harness for kblink-connection integration tests.

#![allow(dead_code)]

use kblink_connection::MemoryExecutor;
use kblink_sparql::DialectProfile;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const KB: &str = "http://example.org/kb#";

pub fn kb(name: &str) -> String {
    format!("{}{}", KB, name)
}

/// A small class hierarchy with multilingual labels.
///
/// ```text
/// topClass
/// ├── subclass1
/// │   └── subclass1-1
/// │       └── subclass1-1-1
/// └── subclass2
/// implicitRoot            (never typed, only a superclass)
/// └── implicitChild
/// GreenGoblin             (instance: norman)
/// Hobgoblin               (labelled through a label sub-property)
/// ```
pub const GOBLINS_TTL: &str = r#"
@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix kb: <http://example.org/kb#> .

kb:shortName rdfs:subPropertyOf rdfs:label .

kb:topClass a rdfs:Class ;
    rdfs:label "Top class"@en .
kb:subclass1 rdfs:subClassOf kb:topClass ;
    rdfs:label "Subclass one"@en .
kb:subclass1-1 rdfs:subClassOf kb:subclass1 .
kb:subclass1-1-1 rdfs:subClassOf kb:subclass1-1 .
kb:subclass2 rdfs:subClassOf kb:topClass .

kb:implicitChild rdfs:subClassOf kb:implicitRoot .

kb:GreenGoblin a rdfs:Class ;
    rdfs:label "Green Goblin"@en, "Bouffon vert"@fr, "Grüner Kobold"@de ;
    rdfs:comment "A goblin, but green."@en .

kb:Hobgoblin a rdfs:Class ;
    kb:shortName "Hobgoblin"@en .

kb:norman a kb:GreenGoblin ;
    rdfs:label "Norman Osborn"@en .

kb:Person a rdfs:Class ;
    rdfs:label "Person"@en .

kb:nemesis a rdf:Property ;
    rdfs:label "nemesis"@en ;
    rdfs:domain kb:Person ;
    rdfs:range kb:Person .
"#;

pub fn goblins() -> MemoryExecutor {
    MemoryExecutor::from_turtle(GOBLINS_TTL).unwrap()
}

/// RDFS profile showing English labels.
pub fn english() -> Arc<DialectProfile> {
    let mut profile = DialectProfile::rdfs();
    profile.default_language = Some("en".to_string());
    Arc::new(profile)
}

/// RDFS profile preferring French, falling back to English.
pub fn french_then_english() -> Arc<DialectProfile> {
    let mut profile = DialectProfile::rdfs();
    profile.default_language = Some("fr".to_string());
    profile.fallback_languages = vec!["en".to_string()];
    Arc::new(profile)
}

// =============================================================================
// Mock SPARQL endpoint
// =============================================================================

pub const RESULTS_JSON: &str = "application/sparql-results+json";

/// Endpoint URL served by `server`.
pub fn endpoint(server: &MockServer) -> String {
    format!("{}/sparql", server.uri())
}

/// A results document answered with `status`.
pub fn answer(status: u16, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.as_bytes().to_vec(), RESULTS_JSON)
}

/// Mock server answering every `POST /sparql` with `template`.
pub async fn serve(template: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sparql"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

/// Mock server that holds every answer well past any test timeout.
pub async fn serve_slowly() -> MockServer {
    serve(answer(200, r#"{"head": {}, "boolean": true}"#).set_delay(Duration::from_secs(5))).await
}
