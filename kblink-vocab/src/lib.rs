//! RDF Vocabulary Constants for kblink
//!
//! This crate provides a centralized location for the vocabulary IRIs that the
//! knowledge-base profiles and query builders refer to.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `rdfs` - RDFS vocabulary (http://www.w3.org/2000/01/rdf-schema#)
//! - `owl` - OWL vocabulary (http://www.w3.org/2002/07/owl#)
//! - `skos` - SKOS vocabulary (http://www.w3.org/2004/02/skos/core#)
//! - `xsd` - the XSD datatypes the result mapper inspects
//! - `schema` / `wikidata` - IRIs used by the built-in profile presets
//! - `fts` - full-text search predicates, one module per backend family
//! - `errors` - Error type compact IRIs for API responses

pub mod errors;

/// RDF vocabulary constants
pub mod rdf {
    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:Property IRI
    pub const PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// RDFS vocabulary constants
pub mod rdfs {
    /// rdfs:Class IRI
    pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";

    /// rdfs:subClassOf IRI
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";

    /// rdfs:subPropertyOf IRI
    pub const SUB_PROPERTY_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subPropertyOf";

    /// rdfs:label IRI
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    /// rdfs:comment IRI
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";

    /// rdfs:domain IRI
    pub const DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";

    /// rdfs:range IRI
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
}

/// OWL vocabulary constants
pub mod owl {
    /// owl:Class IRI
    pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";

    /// owl:ObjectProperty IRI
    pub const OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";

    /// owl:Thing IRI
    pub const THING: &str = "http://www.w3.org/2002/07/owl#Thing";

    /// owl:deprecated IRI
    pub const DEPRECATED: &str = "http://www.w3.org/2002/07/owl#deprecated";
}

/// SKOS vocabulary constants
pub mod skos {
    /// skos:Concept IRI
    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";

    /// skos:broader IRI
    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";

    /// skos:prefLabel IRI
    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";

    /// skos:altLabel IRI
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";

    /// skos:definition IRI
    pub const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
}

/// schema.org constants
pub mod schema {
    /// schema:description IRI (as used by Wikidata)
    pub const DESCRIPTION: &str = "http://schema.org/description";
}

/// Wikidata constants
pub mod wikidata {
    /// wd:Q35120 ("entity"), the root class of the Wikidata item hierarchy
    pub const ENTITY: &str = "http://www.wikidata.org/entity/Q35120";

    /// wdt:P31 ("instance of")
    pub const INSTANCE_OF: &str = "http://www.wikidata.org/prop/direct/P31";

    /// wdt:P279 ("subclass of")
    pub const SUBCLASS_OF: &str = "http://www.wikidata.org/prop/direct/P279";

    /// wdt:P1647 ("subproperty of")
    pub const SUBPROPERTY_OF: &str = "http://www.wikidata.org/prop/direct/P1647";

    /// wikibase:Property
    pub const PROPERTY: &str = "http://wikiba.se/ontology#Property";

    /// Entity IRI prefix
    pub const ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";
}

/// XSD datatypes inspected when reading result literals
pub mod xsd {
    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:int IRI
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:short IRI
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";

    /// xsd:byte IRI
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";

    /// xsd:nonNegativeInteger IRI
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";

    /// xsd:positiveInteger IRI
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";

    /// xsd:unsignedInt IRI
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";

    /// xsd:unsignedLong IRI
    pub const UNSIGNED_LONG: &str = "http://www.w3.org/2001/XMLSchema#unsignedLong";

    /// Check if a datatype IRI is an integer-family type
    #[inline]
    pub fn is_integer_family(datatype_iri: &str) -> bool {
        matches!(
            datatype_iri,
            INTEGER
                | LONG
                | INT
                | SHORT
                | BYTE
                | NON_NEGATIVE_INTEGER
                | POSITIVE_INTEGER
                | UNSIGNED_INT
                | UNSIGNED_LONG
        )
    }

    /// Check if a datatype IRI is a string-like type (or absent, which means xsd:string)
    #[inline]
    pub fn is_string_like(datatype_iri: Option<&str>) -> bool {
        matches!(datatype_iri, None | Some(STRING) | Some(super::rdf::LANG_STRING))
    }
}

/// Full-text search vocabularies
///
/// Each backend family exposes its text index through a magic predicate,
/// property function or service. The main entry point of each family doubles as
/// the IRI a knowledge-base profile is configured with.
pub mod fts {
    /// RDF4J LuceneSail
    pub mod lucene {
        /// Namespace
        pub const NS: &str = "http://www.openrdf.org/contrib/lucenesail#";
        /// search:matches
        pub const MATCHES: &str = "http://www.openrdf.org/contrib/lucenesail#matches";
        /// search:query
        pub const QUERY: &str = "http://www.openrdf.org/contrib/lucenesail#query";
        /// search:property
        pub const PROPERTY: &str = "http://www.openrdf.org/contrib/lucenesail#property";
    }

    /// Apache Jena text (Fuseki)
    pub mod jena {
        /// Namespace
        pub const NS: &str = "http://jena.apache.org/text#";
        /// text:query
        pub const QUERY: &str = "http://jena.apache.org/text#query";
    }

    /// Stardog
    pub mod stardog {
        /// Namespace
        pub const NS: &str = "tag:stardog:api:property:";
        /// textMatch property function
        pub const TEXT_MATCH: &str = "tag:stardog:api:property:textMatch";
    }

    /// OpenLink Virtuoso
    pub mod virtuoso {
        /// bif:contains built-in
        pub const CONTAINS: &str = "bif:contains";
    }

    /// Franz AllegroGraph
    pub mod allegrograph {
        /// Namespace
        pub const NS: &str = "http://franz.com/ns/allegrograph/2.2/textindex/";
        /// fti:match
        pub const MATCH: &str = "http://franz.com/ns/allegrograph/2.2/textindex/match";
    }

    /// Ontotext GraphDB Lucene plugin (one predicate per configured index)
    pub mod graphdb {
        /// Namespace; index predicates are `NS + index name`
        pub const NS: &str = "http://www.ontotext.com/owlim/lucene#";
    }

    /// Blazegraph
    pub mod blazegraph {
        /// Namespace
        pub const NS: &str = "http://www.bigdata.com/rdf/search#";
        /// bds:search
        pub const SEARCH: &str = "http://www.bigdata.com/rdf/search#search";
        /// bds:matchAllTerms
        pub const MATCH_ALL_TERMS: &str = "http://www.bigdata.com/rdf/search#matchAllTerms";
        /// bd:serviceParam (shared with the Wikidata query service)
        pub const SERVICE_PARAM: &str = "http://www.bigdata.com/rdf#serviceParam";
    }

    /// Wikidata MediaWiki API service
    pub mod wikidata {
        /// wikibase:mwapi service IRI
        pub const MWAPI: &str = "http://wikiba.se/ontology#mwapi";
        /// wikibase:api
        pub const API: &str = "http://wikiba.se/ontology#api";
        /// wikibase:endpoint
        pub const ENDPOINT: &str = "http://wikiba.se/ontology#endpoint";
        /// wikibase:apiOutputItem
        pub const API_OUTPUT_ITEM: &str = "http://wikiba.se/ontology#apiOutputItem";
        /// mwapi:search
        pub const SEARCH: &str = "https://www.mediawiki.org/ontology#API/search";
        /// mwapi:language
        pub const LANGUAGE: &str = "https://www.mediawiki.org/ontology#API/language";
        /// mwapi:item
        pub const ITEM: &str = "https://www.mediawiki.org/ontology#API/item";
        /// Default MediaWiki endpoint host
        pub const DEFAULT_HOST: &str = "www.wikidata.org";
    }
}
