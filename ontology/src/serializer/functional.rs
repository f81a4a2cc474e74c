//! OWL 2 functional-style syntax serializer.
//!
//! Produces the primary `rorio.ofn` document: `Prefix(..)` bindings, then a
//! single `Ontology(..)` block with the header annotations followed by one
//! axiom per line in append order.

use crate::model::{AnnotationValue, Axiom, OntologyDocument};
use crate::serializer::compact_or_bracketed;
use crate::vocabulary::Prefix;

/// Serializes the document to OWL functional syntax.
///
/// # Errors
///
/// This function is infallible; it always returns a complete document.
#[must_use]
pub fn to_functional(doc: &OntologyDocument) -> String {
    let prefixes = doc.prefixes();
    let mut out = String::with_capacity(128 + doc.axioms().len() * 96);

    for p in prefixes {
        out.push_str(&format!("Prefix({}:=<{}>)\n", p.name, p.namespace));
    }
    out.push('\n');

    out.push_str(&format!("Ontology(<{}>\n", doc.header().iri()));
    for annotation in doc.header().annotations() {
        out.push_str(&format!(
            "Annotation({} {})\n",
            term(annotation.property.as_str(), prefixes),
            value(&annotation.value, prefixes)
        ));
    }
    out.push('\n');

    for axiom in doc.axioms() {
        out.push_str(&axiom_to_functional(axiom, prefixes));
        out.push('\n');
    }
    out.push_str(")\n");
    out
}

/// Renders a single axiom without a trailing newline.
#[must_use]
pub fn axiom_to_functional(axiom: &Axiom, prefixes: &[Prefix]) -> String {
    match axiom {
        Axiom::Declaration { kind, iri } => format!(
            "Declaration({}({}))",
            kind.keyword(),
            term(iri.as_str(), prefixes)
        ),
        Axiom::ClassAssertion { class, individual } => format!(
            "ClassAssertion({} {})",
            term(class.as_str(), prefixes),
            term(individual.as_str(), prefixes)
        ),
        Axiom::ObjectPropertyAssertion {
            property,
            subject,
            object,
        } => format!(
            "ObjectPropertyAssertion({} {} {})",
            term(property.as_str(), prefixes),
            term(subject.as_str(), prefixes),
            term(object.as_str(), prefixes)
        ),
        Axiom::AnnotationAssertion {
            property,
            subject,
            value: v,
        } => format!(
            "AnnotationAssertion({} {} {})",
            term(property.as_str(), prefixes),
            term(subject.as_str(), prefixes),
            value(v, prefixes)
        ),
    }
}

fn term(iri: &str, prefixes: &[Prefix]) -> String {
    compact_or_bracketed(iri, prefixes)
}

fn value(v: &AnnotationValue, prefixes: &[Prefix]) -> String {
    match v {
        AnnotationValue::Literal(lit) => quoted(lit.as_str()),
        AnnotationValue::Iri(iri) => term(iri.as_str(), prefixes),
    }
}

/// Quotes a string for functional syntax: only `"` and `\` are escaped.
#[must_use]
pub fn quoted(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::model::iris::{self, known};
    use crate::model::{EntityKind, Header, Iri, Literal};
    use crate::Vocabulary;

    fn document() -> OntologyDocument {
        let title = Literal::new("ROR in OWL").expect("valid title");
        let header = Header::new(Iri::new("https://w3id.org/rorio/rorio.owl").expect("valid"))
            .with_literal(known(iris::DC_TITLE), title);
        OntologyDocument::new(header, &Vocabulary::standard())
    }

    #[test]
    fn writes_prefixes_and_header() {
        let ofn = to_functional(&document());
        assert!(ofn.starts_with("Prefix(dc:=<http://purl.org/dc/elements/1.1/>)\n"));
        assert!(ofn.contains("Ontology(<https://w3id.org/rorio/rorio.owl>\n"));
        assert!(ofn.contains("Annotation(dc:title \"ROR in OWL\")\n"));
        assert!(ofn.ends_with(")\n"));
    }

    #[test]
    fn declares_vocabulary_with_labels() {
        let ofn = to_functional(&document());
        assert!(ofn.contains("Declaration(Class(OBI:0000245))"));
        assert!(ofn.contains("Declaration(ObjectProperty(RO:0001025))"));
        assert!(ofn.contains("AnnotationAssertion(rdfs:label ENVO:00000856 \"city\")"));
        assert!(ofn.contains("AnnotationAssertion(rdfs:label rdfs:seeAlso \"see also\")"));
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(quoted(r#"a "b" \c"#), r#""a \"b\" \\c""#);
    }

    #[test]
    fn renders_individual_axioms() {
        let mut doc = document();
        let org = Iri::new("https://ror.org/0abc1def2").expect("valid");
        doc.declare(EntityKind::NamedIndividual, org.clone());
        doc.assert(Axiom::ClassAssertion {
            class: known(iris::ORGANIZATION),
            individual: org,
        });
        let ofn = to_functional(&doc);
        assert!(ofn.contains("Declaration(NamedIndividual(ror:0abc1def2))\n"));
        assert!(ofn.contains("ClassAssertion(OBI:0000245 ror:0abc1def2)\n"));
    }
}
