//! Turtle 1.1 serializer.
//!
//! Produces a valid Turtle document: `@prefix` declarations, the ontology
//! node with its header annotations, then one triple per axiom in append
//! order.

use crate::model::iris::RDF_TYPE;
use crate::model::{AnnotationValue, Axiom, OntologyDocument};
use crate::serializer::compact_or_bracketed;
use crate::vocabulary::Prefix;

/// Serializes the document to a Turtle string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid Turtle string.
#[must_use]
pub fn to_turtle(doc: &OntologyDocument) -> String {
    let prefixes = doc.prefixes();
    let mut out = String::with_capacity(128 + doc.axioms().len() * 96);

    for p in prefixes {
        out.push_str(&format!("@prefix {}: <{}> .\n", p.name, p.namespace));
    }
    out.push('\n');

    // Root ontology
    out.push_str(&format!("<{}>\n  a owl:Ontology", doc.header().iri()));
    for annotation in doc.header().annotations() {
        out.push_str(&format!(
            " ;\n  {} {}",
            term(annotation.property.as_str(), prefixes),
            value_to_turtle(&annotation.value, prefixes)
        ));
    }
    out.push_str(" .\n\n");

    for axiom in doc.axioms() {
        let (s, p, o) = match axiom {
            Axiom::Declaration { kind, iri } => (
                term(iri.as_str(), prefixes),
                "a".to_owned(),
                term(kind.rdf_type(), prefixes),
            ),
            Axiom::ClassAssertion { class, individual } => (
                term(individual.as_str(), prefixes),
                "a".to_owned(),
                term(class.as_str(), prefixes),
            ),
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => (
                term(subject.as_str(), prefixes),
                predicate(property.as_str(), prefixes),
                term(object.as_str(), prefixes),
            ),
            Axiom::AnnotationAssertion {
                property,
                subject,
                value,
            } => (
                term(subject.as_str(), prefixes),
                predicate(property.as_str(), prefixes),
                value_to_turtle(value, prefixes),
            ),
        };
        out.push_str(&format!("{s} {p} {o} .\n"));
    }

    out
}

fn term(iri: &str, prefixes: &[Prefix]) -> String {
    compact_or_bracketed(iri, prefixes)
}

fn predicate(iri: &str, prefixes: &[Prefix]) -> String {
    if iri == RDF_TYPE {
        "a".to_owned()
    } else {
        term(iri, prefixes)
    }
}

fn value_to_turtle(value: &AnnotationValue, prefixes: &[Prefix]) -> String {
    match value {
        AnnotationValue::Literal(lit) => turtle_string(lit.as_str()),
        AnnotationValue::Iri(iri) => term(iri.as_str(), prefixes),
    }
}

fn turtle_string(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("\"{}\"", escaped)
}
