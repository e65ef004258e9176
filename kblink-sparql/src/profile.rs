//! Knowledge-base profiles.
//!
//! A [`DialectProfile`] describes the vocabulary and capabilities of one
//! knowledge base: which IRIs denote classes, labels, descriptions and hierarchy
//! edges, which full-text dialect the backend speaks, and which languages are
//! preferred. Profiles are validated once and then shared read-only
//! (`Arc<DialectProfile>`) across any number of builders.

use crate::error::{ProfileError, ProfileResult};
use crate::fts::FtsDialect;
use crate::text::is_absolute_iri;
use kblink_vocab::{owl, rdf, rdfs, schema, skos, wikidata};
use serde::{Deserialize, Serialize};

/// Default cap on result rows when a profile does not set one.
pub const DEFAULT_MAX_RESULTS: usize = 1000;

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_true() -> bool {
    true
}

/// Vocabulary and capability description of one knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialectProfile {
    /// IRI that classes are typed with (e.g. `rdfs:Class`)
    pub class_iri: String,
    /// IRI linking a resource to its type (e.g. `rdf:type`)
    pub type_iri: String,
    /// IRI linking a class to its superclass (e.g. `rdfs:subClassOf`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subclass_iri: Option<String>,
    /// Label property of classes and instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_iri: Option<String>,
    /// Label property of properties (falls back to `label_iri`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_label_iri: Option<String>,
    /// Description property of classes and instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_iri: Option<String>,
    /// Description property of properties (falls back to `description_iri`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_description_iri: Option<String>,
    /// IRI linking a property to its super-property (e.g. `rdfs:subPropertyOf`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_property_iri: Option<String>,
    /// IRI that properties are typed with (e.g. `rdf:Property`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_type_iri: Option<String>,
    /// Domain declaration property (e.g. `rdfs:domain`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_iri: Option<String>,
    /// Range declaration property (e.g. `rdfs:range`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_iri: Option<String>,
    /// Deprecation flag property (e.g. `owl:deprecated`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation_iri: Option<String>,
    /// Explicit root concepts. When non-empty, `roots()` returns exactly these.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_concepts: Vec<String>,
    /// Extra properties searched by label filters (never used for display)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_matching_properties: Vec<String>,
    /// Full-text search dialect of the backend
    #[serde(default)]
    pub fts_dialect: FtsDialect,
    /// Predicate or service IRI of the full-text index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fts_iri: Option<String>,
    /// Preferred label language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    /// Languages tried after the default, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_languages: Vec<String>,
    /// Whether label matching is case sensitive
    #[serde(default)]
    pub case_sensitive: bool,
    /// Maximum number of result rows
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Base IRI prefix of the knowledge base
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_prefix: Option<String>,
    /// Default graph queried via `FROM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dataset: Option<String>,
    /// A disabled knowledge base answers every query with an empty result
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl DialectProfile {
    /// A bare profile with only the required IRIs and defaults elsewhere.
    pub fn new(class_iri: impl Into<String>, type_iri: impl Into<String>) -> Self {
        Self {
            class_iri: class_iri.into(),
            type_iri: type_iri.into(),
            subclass_iri: None,
            label_iri: None,
            property_label_iri: None,
            description_iri: None,
            property_description_iri: None,
            sub_property_iri: None,
            property_type_iri: None,
            domain_iri: None,
            range_iri: None,
            deprecation_iri: None,
            root_concepts: Vec::new(),
            additional_matching_properties: Vec::new(),
            fts_dialect: FtsDialect::None,
            fts_iri: None,
            default_language: None,
            fallback_languages: Vec::new(),
            case_sensitive: false,
            max_results: DEFAULT_MAX_RESULTS,
            base_prefix: None,
            default_dataset: None,
            enabled: true,
        }
    }

    /// RDF Schema vocabulary.
    pub fn rdfs() -> Self {
        Self {
            subclass_iri: Some(rdfs::SUB_CLASS_OF.to_string()),
            label_iri: Some(rdfs::LABEL.to_string()),
            property_label_iri: Some(rdfs::LABEL.to_string()),
            description_iri: Some(rdfs::COMMENT.to_string()),
            property_description_iri: Some(rdfs::COMMENT.to_string()),
            sub_property_iri: Some(rdfs::SUB_PROPERTY_OF.to_string()),
            property_type_iri: Some(rdf::PROPERTY.to_string()),
            domain_iri: Some(rdfs::DOMAIN.to_string()),
            range_iri: Some(rdfs::RANGE.to_string()),
            ..Self::new(rdfs::CLASS, rdf::TYPE)
        }
    }

    /// OWL vocabulary (RDFS labels, `owl:Class`, `owl:deprecated`).
    pub fn owl() -> Self {
        Self {
            class_iri: owl::CLASS.to_string(),
            property_type_iri: Some(owl::OBJECT_PROPERTY.to_string()),
            deprecation_iri: Some(owl::DEPRECATED.to_string()),
            ..Self::rdfs()
        }
    }

    /// SKOS vocabulary (`skos:broader` as the hierarchy edge).
    pub fn skos() -> Self {
        Self {
            subclass_iri: Some(skos::BROADER.to_string()),
            label_iri: Some(skos::PREF_LABEL.to_string()),
            property_label_iri: Some(skos::PREF_LABEL.to_string()),
            description_iri: Some(skos::DEFINITION.to_string()),
            property_description_iri: Some(skos::DEFINITION.to_string()),
            sub_property_iri: Some(rdfs::SUB_PROPERTY_OF.to_string()),
            property_type_iri: Some(rdf::PROPERTY.to_string()),
            domain_iri: Some(rdfs::DOMAIN.to_string()),
            range_iri: Some(rdfs::RANGE.to_string()),
            additional_matching_properties: vec![skos::ALT_LABEL.to_string()],
            ..Self::new(skos::CONCEPT, rdf::TYPE)
        }
    }

    /// The public Wikidata query service.
    pub fn wikidata() -> Self {
        Self {
            subclass_iri: Some(wikidata::SUBCLASS_OF.to_string()),
            label_iri: Some(rdfs::LABEL.to_string()),
            property_label_iri: Some(rdfs::LABEL.to_string()),
            description_iri: Some(schema::DESCRIPTION.to_string()),
            property_description_iri: Some(schema::DESCRIPTION.to_string()),
            sub_property_iri: Some(wikidata::SUBPROPERTY_OF.to_string()),
            property_type_iri: Some(wikidata::PROPERTY.to_string()),
            root_concepts: vec![wikidata::ENTITY.to_string()],
            fts_dialect: FtsDialect::Wikidata,
            fts_iri: Some(kblink_vocab::fts::wikidata::MWAPI.to_string()),
            default_language: Some("en".to_string()),
            base_prefix: Some(wikidata::ENTITY_PREFIX.to_string()),
            ..Self::new(wikidata::ENTITY, wikidata::INSTANCE_OF)
        }
    }

    /// Parse and validate a profile from JSON.
    pub fn from_json_str(json: &str) -> ProfileResult<Self> {
        let profile: Self =
            serde_json::from_str(json).map_err(|e| ProfileError::Parse(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }

    /// Check the profile invariants: every configured IRI is absolute and the
    /// result limit is positive.
    pub fn validate(&self) -> ProfileResult<()> {
        let singles: [(&'static str, Option<&String>); 14] = [
            ("classIri", Some(&self.class_iri)),
            ("typeIri", Some(&self.type_iri)),
            ("subclassIri", self.subclass_iri.as_ref()),
            ("labelIri", self.label_iri.as_ref()),
            ("propertyLabelIri", self.property_label_iri.as_ref()),
            ("descriptionIri", self.description_iri.as_ref()),
            ("propertyDescriptionIri", self.property_description_iri.as_ref()),
            ("subPropertyIri", self.sub_property_iri.as_ref()),
            ("propertyTypeIri", self.property_type_iri.as_ref()),
            ("domainIri", self.domain_iri.as_ref()),
            ("rangeIri", self.range_iri.as_ref()),
            ("deprecationIri", self.deprecation_iri.as_ref()),
            ("ftsIri", self.fts_iri.as_ref()),
            ("defaultDataset", self.default_dataset.as_ref()),
        ];
        for (field, value) in singles {
            if let Some(value) = value {
                check_iri(field, value)?;
            }
        }
        for value in &self.root_concepts {
            check_iri("rootConcepts", value)?;
        }
        for value in &self.additional_matching_properties {
            check_iri("additionalMatchingProperties", value)?;
        }
        if self.max_results == 0 {
            return Err(ProfileError::Invalid {
                field: "maxResults",
                message: "must be greater than zero".to_string(),
            });
        }
        for lang in self.default_language.iter().chain(&self.fallback_languages) {
            if !is_language_tag(lang) {
                return Err(ProfileError::Invalid {
                    field: "languages",
                    message: format!("'{}' is not a language tag", lang),
                });
            }
        }
        Ok(())
    }

    /// Label property for the given kind of resource.
    pub fn label_property(&self, for_properties: bool) -> Option<&str> {
        if for_properties {
            self.property_label_iri
                .as_deref()
                .or(self.label_iri.as_deref())
        } else {
            self.label_iri.as_deref()
        }
    }

    /// Description property for the given kind of resource.
    pub fn description_property(&self, for_properties: bool) -> Option<&str> {
        if for_properties {
            self.property_description_iri
                .as_deref()
                .or(self.description_iri.as_deref())
        } else {
            self.description_iri.as_deref()
        }
    }

    /// Whether full-text search is usable: a dialect is selected and an index
    /// IRI is configured.
    pub fn full_text_enabled(&self) -> bool {
        self.fts_dialect != FtsDialect::None && self.fts_iri.is_some()
    }
}

fn check_iri(field: &'static str, value: &str) -> ProfileResult<()> {
    if is_absolute_iri(value) {
        Ok(())
    } else {
        Err(ProfileError::RelativeIri {
            field,
            value: value.to_string(),
        })
    }
}

/// BCP 47 shape check: alphanumeric subtags of 1-8 characters joined by `-`.
pub(crate) fn is_language_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .split('-')
            .all(|sub| (1..=8).contains(&sub.len()) && sub.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        for profile in [
            DialectProfile::rdfs(),
            DialectProfile::owl(),
            DialectProfile::skos(),
            DialectProfile::wikidata(),
        ] {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn relative_iri_rejected() {
        let mut profile = DialectProfile::rdfs();
        profile.label_iri = Some("label".to_string());
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, ProfileError::RelativeIri { field: "labelIri", .. }));
    }

    #[test]
    fn zero_limit_rejected() {
        let mut profile = DialectProfile::rdfs();
        profile.max_results = 0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn json_round_trip_uses_camel_case_and_defaults() {
        let json = r#"{
            "classIri": "http://www.w3.org/2000/01/rdf-schema#Class",
            "typeIri": "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
            "labelIri": "http://www.w3.org/2000/01/rdf-schema#label",
            "ftsDialect": "VIRTUOSO_STYLE",
            "ftsIri": "bif:contains",
            "defaultLanguage": "fr",
            "fallbackLanguages": ["en"]
        }"#;
        let profile = DialectProfile::from_json_str(json).unwrap();
        assert_eq!(profile.max_results, DEFAULT_MAX_RESULTS);
        assert!(profile.enabled);
        assert_eq!(profile.fts_dialect, FtsDialect::Virtuoso);
        assert!(profile.full_text_enabled());
        assert_eq!(profile.fallback_languages, vec!["en".to_string()]);
    }

    #[test]
    fn json_with_relative_root_fails_validation() {
        let json = r##"{
            "classIri": "http://www.w3.org/2000/01/rdf-schema#Class",
            "typeIri": "http://www.w3.org/1999/02/22-rdf-syntax-ns#type",
            "rootConcepts": ["#root"]
        }"##;
        let err = DialectProfile::from_json_str(json).unwrap_err();
        assert!(matches!(err, ProfileError::RelativeIri { field: "rootConcepts", .. }));
    }

    #[test]
    fn fts_requires_iri() {
        let mut profile = DialectProfile::rdfs();
        profile.fts_dialect = FtsDialect::Lucene;
        assert!(!profile.full_text_enabled());
        profile.fts_iri = Some(kblink_vocab::fts::lucene::MATCHES.to_string());
        assert!(profile.full_text_enabled());
    }

    #[test]
    fn property_label_falls_back_to_label() {
        let mut profile = DialectProfile::rdfs();
        profile.property_label_iri = None;
        assert_eq!(profile.label_property(true), Some(rdfs::LABEL));
    }

    #[test]
    fn language_tags() {
        assert!(is_language_tag("en"));
        assert!(is_language_tag("en-GB"));
        assert!(!is_language_tag(""));
        assert!(!is_language_tag("en GB"));
        assert!(!is_language_tag("\"en"));
    }
}
