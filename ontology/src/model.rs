//! Core ontology model types.
//!
//! The [`OntologyDocument`] is an append-only accumulator: a fixed header, a
//! fixed set of prefix bindings, and a single ordered list of [`Axiom`]s.
//! Nothing in the document is mutated after it has been appended. Entity
//! identity is carried by [`Iri`]; literal text by [`Literal`]. Both
//! constructors validate their input, which is where malformed registry data
//! surfaces as a recoverable error.

use thiserror::Error;

use crate::vocabulary::{Prefix, Vocabulary};

/// Errors produced when validating an [`Iri`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IriError {
    /// The provided text was empty.
    #[error("empty IRI")]
    Empty,
    /// The provided text has no scheme and so is not an absolute IRI.
    #[error("not an absolute IRI: {value}")]
    NotAbsolute {
        /// The rejected text.
        value: String,
    },
    /// The provided text contains a character that may not appear in an IRI reference.
    #[error("illegal character {character:?} in IRI: {value}")]
    IllegalCharacter {
        /// The rejected text.
        value: String,
        /// The first offending character.
        character: char,
    },
}

/// An absolute IRI naming an ontology entity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri {
    value: String,
}

impl Iri {
    /// Validates and constructs a new [`Iri`].
    ///
    /// # Errors
    ///
    /// Returns [`IriError`] if `value` is empty, has no scheme, or contains
    /// whitespace, control characters or any of `<>"{}|^`\`.
    pub fn new(value: impl Into<String>) -> Result<Self, IriError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IriError::Empty);
        }
        if let Some(character) = value.chars().find(|c| is_illegal_iri_char(*c)) {
            return Err(IriError::IllegalCharacter { value, character });
        }
        let has_scheme = value
            .split_once(':')
            .is_some_and(|(scheme, _)| is_scheme(scheme));
        if !has_scheme {
            return Err(IriError::NotAbsolute { value });
        }
        Ok(Self { value })
    }

    /// Joins a namespace IRI and a local name.
    ///
    /// # Errors
    ///
    /// Returns [`IriError`] if the concatenation is not a valid IRI.
    pub fn in_namespace(namespace: &str, local: &str) -> Result<Self, IriError> {
        Self::new(format!("{namespace}{local}"))
    }

    /// Returns the underlying textual representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

fn is_illegal_iri_char(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Errors produced when validating a [`Literal`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LiteralError {
    /// The source field carried no text at all.
    #[error("missing literal value")]
    Missing,
    /// The text contains a character that cannot be carried by an RDF literal.
    #[error("unencodable character U+{code:04X} in literal {value:?}")]
    Unencodable {
        /// The rejected text.
        value: String,
        /// Code point of the first offending character.
        code: u32,
    },
}

/// A plain string literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    value: String,
}

impl Literal {
    /// Validates and constructs a new [`Literal`].
    ///
    /// # Errors
    ///
    /// Returns [`LiteralError`] if the text contains control characters
    /// (other than tab, line feed and carriage return) or the non-characters
    /// U+FFFE / U+FFFF. Empty text is a valid literal.
    pub fn new(value: impl Into<String>) -> Result<Self, LiteralError> {
        let value = value.into();
        if let Some(c) = value.chars().find(|c| !is_encodable(*c)) {
            return Err(LiteralError::Unencodable {
                code: u32::from(c),
                value,
            });
        }
        Ok(Self { value })
    }

    /// Returns the literal text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

fn is_encodable(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        c => !c.is_control(),
    }
}

/// The kind of entity introduced by a `Declaration` axiom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// `owl:Class`.
    Class,
    /// `owl:ObjectProperty`.
    ObjectProperty,
    /// `owl:AnnotationProperty`.
    AnnotationProperty,
    /// `owl:NamedIndividual`.
    NamedIndividual,
}

impl EntityKind {
    /// Functional-syntax keyword for this kind.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            EntityKind::Class => "Class",
            EntityKind::ObjectProperty => "ObjectProperty",
            EntityKind::AnnotationProperty => "AnnotationProperty",
            EntityKind::NamedIndividual => "NamedIndividual",
        }
    }

    /// Full IRI of the OWL type this kind maps to in RDF.
    #[must_use]
    pub fn rdf_type(self) -> &'static str {
        match self {
            EntityKind::Class => iris::OWL_CLASS,
            EntityKind::ObjectProperty => iris::OWL_OBJECT_PROPERTY,
            EntityKind::AnnotationProperty => iris::OWL_ANNOTATION_PROPERTY,
            EntityKind::NamedIndividual => iris::OWL_NAMED_INDIVIDUAL,
        }
    }
}

/// The value side of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    /// A plain string literal.
    Literal(Literal),
    /// An IRI reference to another resource.
    Iri(Iri),
}

/// A single OWL axiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Axiom {
    /// `Declaration(<kind>(iri))`.
    Declaration {
        /// What is being declared.
        kind: EntityKind,
        /// The declared entity.
        iri: Iri,
    },
    /// `ClassAssertion(class individual)`.
    ClassAssertion {
        /// The class the individual belongs to.
        class: Iri,
        /// The classified individual.
        individual: Iri,
    },
    /// `ObjectPropertyAssertion(property subject object)`.
    ObjectPropertyAssertion {
        /// The object property.
        property: Iri,
        /// Source individual.
        subject: Iri,
        /// Target individual.
        object: Iri,
    },
    /// `AnnotationAssertion(property subject value)`.
    AnnotationAssertion {
        /// The annotation property.
        property: Iri,
        /// The annotated entity.
        subject: Iri,
        /// Literal or IRI value.
        value: AnnotationValue,
    },
}

impl Axiom {
    /// Builds an `rdfs:label` annotation assertion.
    #[must_use]
    pub fn label(subject: Iri, label: Literal) -> Self {
        Axiom::AnnotationAssertion {
            property: iris::rdfs_label(),
            subject,
            value: AnnotationValue::Literal(label),
        }
    }

    /// Builds an annotation assertion carrying a literal value.
    #[must_use]
    pub fn annotate(property: Iri, subject: Iri, value: Literal) -> Self {
        Axiom::AnnotationAssertion {
            property,
            subject,
            value: AnnotationValue::Literal(value),
        }
    }

    /// Builds an annotation assertion pointing at another resource.
    #[must_use]
    pub fn annotate_iri(property: Iri, subject: Iri, value: Iri) -> Self {
        Axiom::AnnotationAssertion {
            property,
            subject,
            value: AnnotationValue::Iri(value),
        }
    }
}

/// An ontology-level annotation (title, creator, license, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// The annotation property.
    pub property: Iri,
    /// Literal or IRI value.
    pub value: AnnotationValue,
}

/// Ontology header: the ontology IRI and its annotations. Set once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    iri: Iri,
    annotations: Vec<Annotation>,
}

impl Header {
    /// Creates a header for the ontology named `iri`.
    #[must_use]
    pub fn new(iri: Iri) -> Self {
        Self {
            iri,
            annotations: Vec::new(),
        }
    }

    /// Adds a literal-valued ontology annotation.
    #[must_use]
    pub fn with_literal(mut self, property: Iri, value: Literal) -> Self {
        self.annotations.push(Annotation {
            property,
            value: AnnotationValue::Literal(value),
        });
        self
    }

    /// Adds an IRI-valued ontology annotation.
    #[must_use]
    pub fn with_iri(mut self, property: Iri, value: Iri) -> Self {
        self.annotations.push(Annotation {
            property,
            value: AnnotationValue::Iri(value),
        });
        self
    }

    /// The ontology IRI.
    #[must_use]
    pub fn iri(&self) -> &Iri {
        &self.iri
    }

    /// Ontology annotations in insertion order.
    #[must_use]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// The ontology under construction.
///
/// Created with the header and vocabulary already in place; afterwards only
/// grows. Duplicate declarations and assertions are kept as appended.
#[derive(Debug, Clone)]
pub struct OntologyDocument {
    header: Header,
    prefixes: Vec<Prefix>,
    axioms: Vec<Axiom>,
}

impl OntologyDocument {
    /// Creates a document holding `header` and the declarations and labels of
    /// every term in `vocabulary`.
    #[must_use]
    pub fn new(header: Header, vocabulary: &Vocabulary) -> Self {
        let mut doc = Self {
            header,
            prefixes: vocabulary.prefixes().to_vec(),
            axioms: Vec::new(),
        };
        for term in vocabulary.terms() {
            doc.declare(term.kind, term.iri.clone());
        }
        for term in vocabulary.terms() {
            doc.assert(Axiom::label(term.iri.clone(), term.label.clone()));
        }
        doc
    }

    /// Appends a declaration. No uniqueness check is made.
    pub fn declare(&mut self, kind: EntityKind, iri: Iri) {
        self.axioms.push(Axiom::Declaration { kind, iri });
    }

    /// Appends an axiom.
    pub fn assert(&mut self, axiom: Axiom) {
        self.axioms.push(axiom);
    }

    /// Appends several axioms, in order.
    pub fn assert_all(&mut self, axioms: impl IntoIterator<Item = Axiom>) {
        self.axioms.extend(axioms);
    }

    /// The ontology header.
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Prefix bindings used for abbreviation, in declaration order.
    #[must_use]
    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    /// All axioms in append order.
    #[must_use]
    pub fn axioms(&self) -> &[Axiom] {
        &self.axioms
    }

    /// Number of `Declaration(NamedIndividual(..))` axioms.
    #[must_use]
    pub fn declared_individuals(&self) -> usize {
        self.count(|a| {
            matches!(
                a,
                Axiom::Declaration {
                    kind: EntityKind::NamedIndividual,
                    ..
                }
            )
        })
    }

    /// Number of class assertions.
    #[must_use]
    pub fn class_assertions(&self) -> usize {
        self.count(|a| matches!(a, Axiom::ClassAssertion { .. }))
    }

    /// Number of object property assertions.
    #[must_use]
    pub fn object_property_assertions(&self) -> usize {
        self.count(|a| matches!(a, Axiom::ObjectPropertyAssertion { .. }))
    }

    /// Number of annotation assertions (vocabulary labels included).
    #[must_use]
    pub fn annotation_assertions(&self) -> usize {
        self.count(|a| matches!(a, Axiom::AnnotationAssertion { .. }))
    }

    fn count(&self, pred: impl Fn(&Axiom) -> bool) -> usize {
        self.axioms.iter().filter(|a| pred(a)).count()
    }
}

/// Standard IRI constants.
pub mod iris {
    use super::Iri;

    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// Dublin Core elements namespace.
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// Dublin Core terms namespace.
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    /// ORCID namespace.
    pub const ORCID: &str = "https://orcid.org/";
    /// ROR namespace.
    pub const ROR: &str = "https://ror.org/";
    /// GeoNames namespace.
    pub const GEONAMES: &str = "https://www.geonames.org/";
    /// oboInOwl namespace.
    pub const OIO: &str = "http://www.geneontology.org/formats/oboInOwl#";
    /// BFO term namespace.
    pub const BFO: &str = "http://purl.obolibrary.org/obo/BFO_";
    /// Relation Ontology term namespace.
    pub const RO: &str = "http://purl.obolibrary.org/obo/RO_";
    /// OBI term namespace.
    pub const OBI: &str = "http://purl.obolibrary.org/obo/OBI_";
    /// ENVO term namespace.
    pub const ENVO: &str = "http://purl.obolibrary.org/obo/ENVO_";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:seeAlso`.
    pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
    /// `owl:Ontology`.
    pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:ObjectProperty`.
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:AnnotationProperty`.
    pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
    /// `owl:NamedIndividual`.
    pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
    /// `owl:versionInfo`.
    pub const OWL_VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `dc:title`.
    pub const DC_TITLE: &str = "http://purl.org/dc/elements/1.1/title";
    /// `dc:creator`.
    pub const DC_CREATOR: &str = "http://purl.org/dc/elements/1.1/creator";
    /// `dc:source`.
    pub const DC_SOURCE: &str = "http://purl.org/dc/elements/1.1/source";
    /// `dcterms:license`.
    pub const DCTERMS_LICENSE: &str = "http://purl.org/dc/terms/license";
    /// `oio:hasExactSynonym`.
    pub const OIO_EXACT_SYNONYM: &str = "http://www.geneontology.org/formats/oboInOwl#hasExactSynonym";
    /// `oio:hasDbXref`.
    pub const OIO_DB_XREF: &str = "http://www.geneontology.org/formats/oboInOwl#hasDbXref";

    /// Organization class (`OBI:0000245`).
    pub const ORGANIZATION: &str = "http://purl.obolibrary.org/obo/OBI_0000245";
    /// City class (`ENVO:00000856`).
    pub const CITY: &str = "http://purl.obolibrary.org/obo/ENVO_00000856";
    /// `RO:0001025` located in.
    pub const LOCATED_IN: &str = "http://purl.obolibrary.org/obo/RO_0001025";
    /// `BFO:0000050` part of.
    pub const PART_OF: &str = "http://purl.obolibrary.org/obo/BFO_0000050";
    /// `BFO:0000051` has part.
    pub const HAS_PART: &str = "http://purl.obolibrary.org/obo/BFO_0000051";
    /// `BFO:0000062` preceded by.
    pub const PRECEDED_BY: &str = "http://purl.obolibrary.org/obo/BFO_0000062";
    /// `BFO:0000063` precedes.
    pub const PRECEDES: &str = "http://purl.obolibrary.org/obo/BFO_0000063";

    /// Every constant of this module.
    pub const ALL: &[&str] = &[
        OWL,
        RDF,
        RDFS,
        XSD,
        DC,
        DCTERMS,
        ORCID,
        ROR,
        GEONAMES,
        OIO,
        BFO,
        RO,
        OBI,
        ENVO,
        RDF_TYPE,
        RDFS_LABEL,
        RDFS_SEE_ALSO,
        OWL_ONTOLOGY,
        OWL_CLASS,
        OWL_OBJECT_PROPERTY,
        OWL_ANNOTATION_PROPERTY,
        OWL_NAMED_INDIVIDUAL,
        OWL_VERSION_INFO,
        XSD_STRING,
        DC_TITLE,
        DC_CREATOR,
        DC_SOURCE,
        DCTERMS_LICENSE,
        OIO_EXACT_SYNONYM,
        OIO_DB_XREF,
        ORGANIZATION,
        CITY,
        LOCATED_IN,
        PART_OF,
        HAS_PART,
        PRECEDED_BY,
        PRECEDES,
    ];

    /// Wraps one of the constants in this module without validating it.
    ///
    /// Callers must pass a member of [`ALL`], all of which are well-formed
    /// IRIs. Any other text goes through [`Iri::new`]; debug builds check
    /// the membership.
    #[must_use]
    pub fn known(value: &'static str) -> Iri {
        debug_assert!(ALL.contains(&value), "{value} is not a vocabulary IRI");
        Iri {
            value: value.to_owned(),
        }
    }

    /// `rdfs:label` as an [`Iri`].
    #[must_use]
    pub fn rdfs_label() -> Iri {
        known(RDFS_LABEL)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_constants_are_valid_iris() {
        for value in iris::ALL {
            assert_eq!(Iri::new(*value).map(|i| i.to_string()), Ok((*value).to_owned()));
        }
    }

    #[test]
    fn accepts_ror_identifier() {
        let iri = Iri::new("https://ror.org/0abc1def2");
        assert_eq!(iri.map(|i| i.to_string()), Ok("https://ror.org/0abc1def2".to_owned()));
    }

    #[test]
    fn rejects_relative_and_spaced_iris() {
        assert_eq!(Iri::new(""), Err(IriError::Empty));
        assert!(matches!(Iri::new("0abc1def2"), Err(IriError::NotAbsolute { .. })));
        assert!(matches!(
            Iri::new("https://ror.org/0abc 1def2"),
            Err(IriError::IllegalCharacter { character: ' ', .. })
        ));
    }

    #[test]
    fn literal_accepts_blank_text_and_rejects_control_characters() {
        assert!(Literal::new("Universit\u{e9} de Test").is_ok());
        assert!(Literal::new("line\nbreak").is_ok());
        assert_eq!(Literal::new("").map(|l| l.as_str().len()), Ok(0));
        assert_eq!(Literal::new("   ").map(|l| l.as_str().to_owned()), Ok("   ".to_owned()));
        assert!(matches!(
            Literal::new("bad\u{0}name"),
            Err(LiteralError::Unencodable { code: 0, .. })
        ));
        assert!(matches!(
            Literal::new("bad\u{FFFF}"),
            Err(LiteralError::Unencodable { code: 0xFFFF, .. })
        ));
    }

    #[test]
    fn document_starts_with_vocabulary() {
        let header = Header::new(Iri::new("https://w3id.org/rorio/rorio.owl").expect("valid"));
        let doc = OntologyDocument::new(header, &Vocabulary::standard());
        let terms = Vocabulary::standard().terms().len();
        assert_eq!(doc.axioms().len(), terms * 2);
        assert_eq!(doc.declared_individuals(), 0);
        assert_eq!(doc.annotation_assertions(), terms);
    }

    #[test]
    fn declarations_are_not_deduplicated() {
        let header = Header::new(Iri::new("https://w3id.org/rorio/rorio.owl").expect("valid"));
        let mut doc = OntologyDocument::new(header, &Vocabulary::standard());
        let city = Iri::new("https://www.geonames.org/123").expect("valid");
        doc.declare(EntityKind::NamedIndividual, city.clone());
        doc.declare(EntityKind::NamedIndividual, city);
        assert_eq!(doc.declared_individuals(), 2);
    }
}
