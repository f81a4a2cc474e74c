//! Fixed vocabulary of the generated ontology.
//!
//! Two classes (organization, city) and the object properties used for
//! location and inter-organization relationships, each with a fixed label,
//! plus the prefix bindings every serializer abbreviates with.

use crate::model::iris::{self, known};
use crate::model::{EntityKind, Iri, Literal};

/// A namespace prefix binding (e.g. `ror:` → `https://ror.org/`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    /// The prefix name without the trailing colon.
    pub name: &'static str,
    /// The namespace IRI.
    pub namespace: &'static str,
}

/// A declared vocabulary term and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Declaration kind.
    pub kind: EntityKind,
    /// Full IRI.
    pub iri: Iri,
    /// Human-readable label.
    pub label: Literal,
}

/// The declared classes and properties, built once per run.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    prefixes: Vec<Prefix>,
    terms: Vec<Term>,
}

const PREFIXES: &[(&str, &str)] = &[
    ("dc", iris::DC),
    ("orcid", iris::ORCID),
    ("ror", iris::ROR),
    ("dcterms", iris::DCTERMS),
    ("owl", iris::OWL),
    ("rdf", iris::RDF),
    ("rdfs", iris::RDFS),
    ("xsd", iris::XSD),
    ("geonames", iris::GEONAMES),
    ("oio", iris::OIO),
    ("BFO", iris::BFO),
    ("RO", iris::RO),
    ("OBI", iris::OBI),
    ("ENVO", iris::ENVO),
];

const TERMS: &[(EntityKind, &str, &str)] = &[
    (EntityKind::Class, iris::CITY, "city"),
    (EntityKind::Class, iris::ORGANIZATION, "organization"),
    (EntityKind::ObjectProperty, iris::LOCATED_IN, "located in"),
    (EntityKind::ObjectProperty, iris::RDFS_SEE_ALSO, "see also"),
    (EntityKind::ObjectProperty, iris::HAS_PART, "has part"),
    (EntityKind::ObjectProperty, iris::PART_OF, "part of"),
    (EntityKind::ObjectProperty, iris::PRECEDED_BY, "preceded by"),
    (EntityKind::ObjectProperty, iris::PRECEDES, "precedes"),
];

impl Vocabulary {
    /// Returns the standard registry vocabulary.
    #[must_use]
    pub fn standard() -> Self {
        let prefixes = PREFIXES
            .iter()
            .map(|&(name, namespace)| Prefix { name, namespace })
            .collect();
        let terms = TERMS
            .iter()
            .filter_map(|&(kind, iri, label)| {
                Literal::new(label).ok().map(|label| Term {
                    kind,
                    iri: known(iri),
                    label,
                })
            })
            .collect();
        Self { prefixes, terms }
    }

    /// Prefix bindings in serialization order.
    #[must_use]
    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    /// Declared terms in declaration order.
    #[must_use]
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Looks up a term by its full IRI.
    #[must_use]
    pub fn find(&self, iri: &str) -> Option<&Term> {
        self.terms.iter().find(|t| t.iri.as_str() == iri)
    }
}
