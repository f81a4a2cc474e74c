//! N-Triples serializer.
//!
//! Produces a valid N-Triples document (one triple per line, absolute IRIs).
//! N-Triples is suitable for streaming, bulk loading, and diff-friendly storage.

use std::fmt::{self, Write as _};

use crate::model::iris::{OWL_ONTOLOGY, RDF_TYPE, XSD_STRING};
use crate::model::{AnnotationValue, Axiom, OntologyDocument};

/// Object position of a triple.
enum Node<'a> {
    Iri(&'a str),
    Literal(&'a str),
}

impl<'a> From<&'a AnnotationValue> for Node<'a> {
    fn from(value: &'a AnnotationValue) -> Self {
        match value {
            AnnotationValue::Literal(l) => Node::Literal(l.as_str()),
            AnnotationValue::Iri(i) => Node::Iri(i.as_str()),
        }
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Literal(text) => {
                f.write_char('"')?;
                for c in text.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '"' => f.write_str("\\\"")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        c => f.write_char(c)?,
                    }
                }
                write!(f, "\"^^<{XSD_STRING}>")
            }
        }
    }
}

/// Serializes the document to an N-Triples string.
///
/// # Errors
///
/// This function is infallible; it always returns a valid N-Triples string.
#[must_use]
pub fn to_ntriples(doc: &OntologyDocument) -> String {
    let mut out = String::with_capacity(128 + doc.axioms().len() * 128);
    let root = doc.header().iri().as_str();

    emit(&mut out, root, RDF_TYPE, Node::Iri(OWL_ONTOLOGY));
    for annotation in doc.header().annotations() {
        emit(&mut out, root, annotation.property.as_str(), (&annotation.value).into());
    }

    for axiom in doc.axioms() {
        match axiom {
            Axiom::Declaration { kind, iri } => {
                emit(&mut out, iri.as_str(), RDF_TYPE, Node::Iri(kind.rdf_type()));
            }
            Axiom::ClassAssertion { class, individual } => {
                emit(&mut out, individual.as_str(), RDF_TYPE, Node::Iri(class.as_str()));
            }
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => emit(&mut out, subject.as_str(), property.as_str(), Node::Iri(object.as_str())),
            Axiom::AnnotationAssertion {
                property,
                subject,
                value,
            } => emit(&mut out, subject.as_str(), property.as_str(), value.into()),
        }
    }
    out
}

fn emit(out: &mut String, subject: &str, predicate: &str, object: Node<'_>) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "<{subject}> <{predicate}> {object} .");
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::{Header, Iri, Literal};
    use crate::Vocabulary;

    fn document() -> OntologyDocument {
        OntologyDocument::new(
            Header::new(Iri::new("https://w3id.org/rorio/rorio.owl").expect("valid")),
            &Vocabulary::standard(),
        )
    }

    #[test]
    fn every_line_ends_with_period() {
        let nt = to_ntriples(&document());
        for line in nt.lines() {
            assert!(line.ends_with(" ."), "Line does not end with ' .': {line}");
        }
    }

    #[test]
    fn one_line_per_axiom_plus_ontology_node() {
        let doc = document();
        let nt = to_ntriples(&doc);
        assert_eq!(nt.lines().count(), doc.axioms().len() + 1);
    }

    #[test]
    fn uses_absolute_iris_only() {
        let nt = to_ntriples(&document());
        assert!(nt.contains(
            "<http://purl.obolibrary.org/obo/OBI_0000245> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#Class> .\n"
        ));
        assert!(!nt.contains("OBI:"));
    }

    #[test]
    fn escapes_literal_text() {
        let text = Literal::new("say \"hi\"\nto C:\\").expect("valid literal");
        let node = AnnotationValue::Literal(text);
        assert_eq!(
            Node::from(&node).to_string(),
            "\"say \\\"hi\\\"\\nto C:\\\\\"^^<http://www.w3.org/2001/XMLSchema#string>"
        );
    }
}
