//! Per-record entity construction.
//!
//! For one record the [`EntityBuilder`] emits, in order: the organization
//! individual with its label and class, the city facts of each address, the
//! relationship annotations, the exact synonyms, and the cross-references.
//! Failures are contained at the narrowest scope:
//!
//! | Failure                         | Skipped                           |
//! |---------------------------------|-----------------------------------|
//! | record id is not an IRI         | the whole record                  |
//! | organization name not a literal | every fact after the declaration  |
//! | city name not a literal         | that address                      |
//! | relationship target not an IRI  | that relationship                 |
//! | synonym / xref not a literal    | that fact                         |
//! | identifier not a string         | that identifier                   |
//! | unknown identifier scheme       | that scheme (reported once a run) |
//!
//! An unknown relationship label follows the [`UnknownRelationPolicy`].

use rorio_ontology::model::iris::{self, known};
use rorio_ontology::{Axiom, EntityKind, Iri, Literal, LiteralError, OntologyDocument};
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::lexicon::{Lexicon, TermStatus};
use crate::normalize::NameNormalizer;
use crate::record::{City, Record, Text};
use crate::relations::{RelationMap, UnknownRelationPolicy, UnknownRelationship};
use crate::resolver::{IdentifierResolver, Resolution};

/// A failure that aborts the run.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A relationship label outside the fixed vocabulary under
    /// [`UnknownRelationPolicy::Fail`].
    #[error("[{entity}] {source}")]
    UnknownRelationship {
        /// The organization carrying the relationship.
        entity: String,
        /// The unrecognized label.
        source: UnknownRelationship,
    },
}

/// Where the builder writes: the ontology, the diagnostics and the lexicon.
#[derive(Debug)]
pub struct BuildContext<'a> {
    /// The accumulator.
    pub document: &'a mut OntologyDocument,
    /// Recoverable failures.
    pub diagnostics: &'a mut Diagnostics,
    /// Side list of names and synonyms.
    pub lexicon: &'a mut Lexicon,
}

/// What happened to one record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Axioms appended.
    pub axioms: usize,
    /// Diagnostics reported.
    pub diagnostics: usize,
    /// Whether the organization's label and class were emitted.
    pub organization: bool,
}

/// Maps records to axioms. Holds the lookup tables and the resolver state of
/// one run.
#[derive(Debug, Clone)]
pub struct EntityBuilder {
    normalizer: NameNormalizer,
    resolver: IdentifierResolver,
    relations: RelationMap,
    policy: UnknownRelationPolicy,
    organization_class: Iri,
    city_class: Iri,
    located_in: Iri,
    exact_synonym: Iri,
    db_xref: Iri,
}

impl EntityBuilder {
    /// Creates a builder from its tables.
    #[must_use]
    pub fn new(
        normalizer: NameNormalizer,
        resolver: IdentifierResolver,
        relations: RelationMap,
        policy: UnknownRelationPolicy,
    ) -> Self {
        // `known` is only handed constants of `iris`.
        Self {
            normalizer,
            resolver,
            relations,
            policy,
            organization_class: known(iris::ORGANIZATION),
            city_class: known(iris::CITY),
            located_in: known(iris::LOCATED_IN),
            exact_synonym: known(iris::OIO_EXACT_SYNONYM),
            db_xref: known(iris::OIO_DB_XREF),
        }
    }

    /// The identifier resolver, with the prefixes it could not resolve so far.
    #[must_use]
    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    /// Maps one record into `cx`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::UnknownRelationship`] only under
    /// [`UnknownRelationPolicy::Fail`]; every other failure is reported to
    /// `cx.diagnostics` and contained.
    pub fn build(
        &mut self,
        record: &Record,
        cx: &mut BuildContext<'_>,
    ) -> Result<RecordOutcome, MappingError> {
        let axioms_before = cx.document.axioms().len();
        let diagnostics_before = cx.diagnostics.len();
        let organization = self.build_record(record, cx)?;
        let outcome = RecordOutcome {
            axioms: cx.document.axioms().len() - axioms_before,
            diagnostics: cx.diagnostics.len() - diagnostics_before,
            organization,
        };
        debug!(id = %record.id, axioms = outcome.axioms, diagnostics = outcome.diagnostics, "record mapped");
        Ok(outcome)
    }

    fn build_record(&mut self, record: &Record, cx: &mut BuildContext<'_>) -> Result<bool, MappingError> {
        let org = match Iri::new(record.id.as_str()) {
            Ok(iri) => iri,
            Err(e) => {
                cx.diagnostics
                    .report(Diagnostic::invalid_iri(&record.id, "id", &record.id, e));
                return Ok(false);
            }
        };

        let name = record.name.as_str().map(|n| self.normalizer.normalize(n));
        cx.document.declare(EntityKind::NamedIndividual, org.clone());
        let Some(label) = text_literal(cx.diagnostics, &record.id, "name", &record.name, name) else {
            return Ok(false);
        };
        cx.document.assert_all([
            Axiom::label(org.clone(), label.clone()),
            Axiom::ClassAssertion {
                class: self.organization_class.clone(),
                individual: org.clone(),
            },
        ]);
        cx.lexicon
            .add(label.as_str(), &record.id, label.as_str(), TermStatus::Name);

        for city in record.addresses.iter().filter_map(|a| a.geonames_city.as_ref()) {
            self.build_city(&org, record, city, cx);
        }
        self.build_relationships(&org, record, cx)?;
        self.build_synonyms(&org, record, &label, cx);
        self.build_xrefs(&org, record, cx);
        Ok(true)
    }

    fn build_city(&self, org: &Iri, record: &Record, city: &City, cx: &mut BuildContext<'_>) {
        let id = city.id.to_string();
        let city_iri = match Iri::in_namespace(iris::GEONAMES, &id) {
            Ok(iri) => iri,
            Err(e) => {
                cx.diagnostics
                    .report(Diagnostic::invalid_iri(&record.id, "geonames_city.id", &id, e));
                return;
            }
        };
        let name = city.city.as_str().map(|n| self.normalizer.normalize(n));
        cx.document.declare(EntityKind::NamedIndividual, city_iri.clone());
        if let Some(label) = text_literal(cx.diagnostics, &record.id, "city", &city.city, name) {
            cx.document.assert_all([
                Axiom::ObjectPropertyAssertion {
                    property: self.located_in.clone(),
                    subject: org.clone(),
                    object: city_iri.clone(),
                },
                Axiom::label(city_iri.clone(), label),
                Axiom::ClassAssertion {
                    class: self.city_class.clone(),
                    individual: city_iri,
                },
            ]);
        }
    }

    fn build_relationships(
        &self,
        org: &Iri,
        record: &Record,
        cx: &mut BuildContext<'_>,
    ) -> Result<(), MappingError> {
        for rel in &record.relationships {
            let property = match self.relations.map(&rel.kind) {
                Ok(property) => property.clone(),
                Err(source) => match self.policy {
                    UnknownRelationPolicy::Fail => {
                        return Err(MappingError::UnknownRelationship {
                            entity: record.id.clone(),
                            source,
                        })
                    }
                    UnknownRelationPolicy::Report => {
                        cx.diagnostics.report(Diagnostic::unknown_relationship(
                            &record.id, &rel.kind, &rel.id,
                        ));
                        continue;
                    }
                },
            };
            match Iri::new(rel.id.as_str()) {
                Ok(target) => cx
                    .document
                    .assert(Axiom::annotate_iri(property, org.clone(), target)),
                Err(e) => cx
                    .diagnostics
                    .report(Diagnostic::invalid_iri(&record.id, "relationships", &rel.id, e)),
            }
        }
        Ok(())
    }

    fn build_synonyms(&self, org: &Iri, record: &Record, label: &Literal, cx: &mut BuildContext<'_>) {
        let fields = [("aliases", &record.aliases), ("acronyms", &record.acronyms)];
        for (field, values) in fields {
            for value in values {
                let Some(synonym) = text_literal(cx.diagnostics, &record.id, field, value, value.as_str())
                else {
                    continue;
                };
                cx.lexicon
                    .add(synonym.as_str(), &record.id, label.as_str(), TermStatus::Synonym);
                cx.document
                    .assert(Axiom::annotate(self.exact_synonym.clone(), org.clone(), synonym));
            }
        }
    }

    fn build_xrefs(&mut self, org: &Iri, record: &Record, cx: &mut BuildContext<'_>) {
        for (prefix, ids) in &record.external_ids {
            match self.resolver.resolve(prefix, &ids.all) {
                Resolution::Resolved(curies) => {
                    for curie in curies {
                        match Literal::new(curie.as_str()) {
                            Ok(xref) => cx.document.assert(Axiom::annotate(
                                self.db_xref.clone(),
                                org.clone(),
                                xref,
                            )),
                            Err(e) => cx.diagnostics.report(Diagnostic::invalid_literal(
                                &record.id,
                                format!("external_ids.{prefix}"),
                                Some(curie.as_str()),
                                e,
                            )),
                        }
                    }
                    for value in ids.all.rejected() {
                        cx.diagnostics.report(Diagnostic::invalid_literal(
                            &record.id,
                            format!("external_ids.{prefix}"),
                            Some(&value.to_string()),
                            NOT_A_STRING,
                        ));
                    }
                }
                Resolution::Unresolved {
                    first_occurrence: true,
                } => cx.diagnostics.report(Diagnostic::unhandled_prefix(
                    &record.id,
                    prefix,
                    ids.all.iter(),
                )),
                Resolution::Unresolved {
                    first_occurrence: false,
                }
                | Resolution::Skipped => {}
            }
        }
    }
}

const NOT_A_STRING: &str = "expected a string";

/// Builds a literal from a text field whose string, after any
/// normalization, is `text`. A rejection is reported against `field`.
fn text_literal(
    diagnostics: &mut Diagnostics,
    entity: &str,
    field: &str,
    raw: &Text,
    text: Option<&str>,
) -> Option<Literal> {
    let rejection = match text {
        Some(text) => match Literal::new(text) {
            Ok(literal) => return Some(literal),
            Err(e) => Diagnostic::invalid_literal(entity, field, Some(text), e),
        },
        None if raw.is_null() => Diagnostic::invalid_literal(entity, field, None, LiteralError::Missing),
        None => Diagnostic::invalid_literal(entity, field, Some(&raw.to_string()), NOT_A_STRING),
    };
    diagnostics.report(rejection);
    None
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::record::{Address, ExternalIds, GeonamesId, Identifiers, Relationship};
    use crate::resolver::PrefixRegistry;
    use rorio_ontology::{AnnotationValue, Header, Vocabulary};

    struct Harness {
        builder: EntityBuilder,
        document: OntologyDocument,
        diagnostics: Diagnostics,
        lexicon: Lexicon,
    }

    impl Harness {
        fn new(policy: UnknownRelationPolicy) -> Self {
            Self {
                builder: EntityBuilder::new(
                    NameNormalizer::standard(),
                    IdentifierResolver::new(PrefixRegistry::standard()),
                    RelationMap::standard(),
                    policy,
                ),
                document: OntologyDocument::new(
                    Header::new(Iri::new("https://w3id.org/rorio/rorio.owl").expect("valid")),
                    &Vocabulary::standard(),
                ),
                diagnostics: Diagnostics::new(),
                lexicon: Lexicon::new(),
            }
        }

        fn build(&mut self, record: &Record) -> Result<RecordOutcome, MappingError> {
            let mut cx = BuildContext {
                document: &mut self.document,
                diagnostics: &mut self.diagnostics,
                lexicon: &mut self.lexicon,
            };
            self.builder.build(record, &mut cx)
        }

        fn literals_of(&self, property: &str) -> Vec<&str> {
            self.document
                .axioms()
                .iter()
                .filter_map(|a| match a {
                    Axiom::AnnotationAssertion {
                        property: p,
                        value: AnnotationValue::Literal(l),
                        ..
                    } if p.as_str() == property => Some(l.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    fn record(id: &str, name: Option<&str>) -> Record {
        Record {
            id: id.to_owned(),
            name: Text::from(name),
            ..Record::default()
        }
    }

    fn city(id: u64, name: Option<&str>) -> Address {
        Address {
            geonames_city: Some(City {
                id: GeonamesId::Number(id),
                city: Text::from(name),
            }),
        }
    }

    #[test]
    fn invalid_name_skips_remaining_organization_facts() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/bad", Some("Bad\u{1}Name"));
        r.aliases = vec![Text::from("B")];
        r.addresses = vec![city(1, Some("Town"))];
        let outcome = h.build(&r).expect("contained");
        assert!(!outcome.organization);
        assert_eq!(outcome.axioms, 1, "only the declaration is kept");
        assert_eq!(h.document.class_assertions(), 0);
        assert_eq!(h.diagnostics.entries()[0].field, "name");
        assert!(h.lexicon.is_empty());
    }

    #[test]
    fn missing_name_is_reported_as_null() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        h.build(&record("https://ror.org/anon", None)).expect("contained");
        assert_eq!(h.diagnostics.entries()[0].value, "null");
    }

    #[test]
    fn invalid_record_id_skips_record() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let outcome = h.build(&record("not an iri", Some("X"))).expect("contained");
        assert_eq!(outcome.axioms, 0);
        assert_eq!(h.diagnostics.entries()[0].kind, DiagnosticKind::InvalidIri);
    }

    #[test]
    fn bad_city_only_skips_that_address() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/org", Some("Org"));
        r.addresses = vec![city(1, Some("Bad\u{7f}")), city(2, Some("Good Town"))];
        r.aliases = vec![Text::from("O")];
        let outcome = h.build(&r).expect("contained");
        assert!(outcome.organization);
        assert_eq!(outcome.diagnostics, 1);
        assert_eq!(h.document.declared_individuals(), 3);
        assert_eq!(h.document.object_property_assertions(), 1);
        assert_eq!(h.literals_of(iris::OIO_EXACT_SYNONYM), vec!["O"]);
    }

    #[test]
    fn normalizes_organization_and_city_names() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/org", Some("Hematology\\Oncology Clinic"));
        r.addresses = vec![city(2747351, Some("'s-Hertogenbosch"))];
        h.build(&r).expect("contained");
        let labels = h.literals_of(iris::RDFS_LABEL);
        assert!(labels.contains(&"Hematology/Oncology Clinic"));
        assert!(labels.contains(&"Den Bosch"));
    }

    #[test]
    fn bad_synonym_skips_only_that_fact() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/org", Some("Org"));
        r.aliases = vec![Text::from("One"), Text::default(), Text::from("Two")];
        r.acronyms = vec![Text::from("\u{1}"), Text::from("O")];
        h.build(&r).expect("contained");
        assert_eq!(h.literals_of(iris::OIO_EXACT_SYNONYM), vec!["One", "Two", "O"]);
        let fields: Vec<&str> = h.diagnostics.entries().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["aliases", "acronyms"]);
        assert_eq!(h.lexicon.len(), 4);
    }

    #[test]
    fn wrongly_typed_text_is_reported_as_json() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/org", Some("Org"));
        r.aliases = vec![Text::Other(serde_json::json!(42)), Text::from("")];
        r.addresses = vec![Address {
            geonames_city: Some(City {
                id: GeonamesId::Number(5),
                city: Text::Other(serde_json::json!({"en": "Town"})),
            }),
        }];
        let outcome = h.build(&r).expect("contained");
        assert!(outcome.organization);
        let reported: Vec<(&str, &str, &str)> = h
            .diagnostics
            .entries()
            .iter()
            .map(|d| (d.field.as_str(), d.value.as_str(), d.reason.as_str()))
            .collect();
        assert_eq!(
            reported,
            vec![
                ("city", r#"{"en":"Town"}"#, "expected a string"),
                ("aliases", "42", "expected a string"),
            ]
        );
        assert_eq!(h.literals_of(iris::OIO_EXACT_SYNONYM), vec![""]);
    }

    #[test]
    fn non_string_identifiers_are_skipped_and_reported() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/a", Some("A"));
        r.external_ids.insert(
            "Wikidata".to_owned(),
            ExternalIds {
                all: Identifiers::Many(vec![Text::from("Q1"), Text::Other(serde_json::Value::Null)]),
            },
        );
        h.build(&r).expect("contained");
        assert_eq!(h.literals_of(iris::OIO_DB_XREF), vec!["wikidata:Q1"]);
        let d = &h.diagnostics.entries()[0];
        assert_eq!((d.kind, d.field.as_str(), d.value.as_str()), (
            DiagnosticKind::InvalidLiteral,
            "external_ids.Wikidata",
            "null"
        ));
    }

    #[test]
    fn relationships_become_iri_annotations() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/child", Some("Child Org"));
        r.relationships = vec![Relationship {
            kind: "Parent".to_owned(),
            id: "https://ror.org/parent".to_owned(),
        }];
        h.build(&r).expect("contained");
        let last = h.document.axioms().last().cloned();
        assert_eq!(
            last,
            Some(Axiom::annotate_iri(
                known(iris::PART_OF),
                Iri::new("https://ror.org/child").expect("valid"),
                Iri::new("https://ror.org/parent").expect("valid")
            ))
        );
    }

    #[test]
    fn unknown_relationship_is_reported_under_report_policy() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/a", Some("A"));
        r.relationships = vec![
            Relationship {
                kind: "Sibling".to_owned(),
                id: "https://ror.org/b".to_owned(),
            },
            Relationship {
                kind: "Related".to_owned(),
                id: "https://ror.org/c".to_owned(),
            },
        ];
        r.aliases = vec![Text::from("Alpha")];
        let outcome = h.build(&r).expect("report policy contains the failure");
        assert_eq!(outcome.diagnostics, 1);
        assert_eq!(
            h.diagnostics.entries()[0].kind,
            DiagnosticKind::UnknownRelationship
        );
        assert_eq!(h.literals_of(iris::OIO_EXACT_SYNONYM), vec!["Alpha"]);
    }

    #[test]
    fn unknown_relationship_aborts_under_fail_policy() {
        let mut h = Harness::new(UnknownRelationPolicy::Fail);
        let mut r = record("https://ror.org/a", Some("A"));
        r.relationships = vec![Relationship {
            kind: "Sibling".to_owned(),
            id: "https://ror.org/b".to_owned(),
        }];
        let err = h.build(&r).expect_err("fail policy aborts");
        assert_eq!(
            err.to_string(),
            "[https://ror.org/a] unknown relationship type \"Sibling\""
        );
    }

    #[test]
    fn excluded_scheme_is_silent() {
        let mut h = Harness::new(UnknownRelationPolicy::Report);
        let mut r = record("https://ror.org/a", Some("A"));
        r.external_ids.insert(
            "OrgRef".to_owned(),
            ExternalIds {
                all: Identifiers::from(vec!["123"]),
            },
        );
        h.build(&r).expect("contained");
        assert!(h.diagnostics.is_empty());
        assert!(h.literals_of(iris::OIO_DB_XREF).is_empty());
    }
}
