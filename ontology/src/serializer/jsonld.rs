//! JSON-LD 1.1 serializer.
//!
//! Produces a single JSON-LD document with an `@context` built from the
//! prefix bindings and a flat `@graph` holding one node per axiom. Nodes
//! sharing an `@id` are merged by any JSON-LD processor.

use serde_json::{json, Map, Value};

use crate::model::{AnnotationValue, Axiom, OntologyDocument};
use crate::serializer::abbreviate;
use crate::vocabulary::Prefix;

/// Serializes the document to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
///
/// # Errors
///
/// This function is infallible; it always returns a valid JSON-LD `Value`.
#[must_use]
pub fn to_json_ld(doc: &OntologyDocument) -> Value {
    json!({
        "@context": build_context(doc.prefixes()),
        "@graph": build_graph(doc)
    })
}

fn build_context(prefixes: &[Prefix]) -> Value {
    let mut ctx = Map::new();
    for p in prefixes {
        ctx.insert(p.name.to_owned(), json!(p.namespace));
    }
    Value::Object(ctx)
}

fn build_graph(doc: &OntologyDocument) -> Value {
    let prefixes = doc.prefixes();
    let mut nodes: Vec<Value> = Vec::with_capacity(doc.axioms().len() + 1);

    let mut root = Map::new();
    root.insert("@id".to_owned(), json!(doc.header().iri().as_str()));
    root.insert("@type".to_owned(), json!("owl:Ontology"));
    for annotation in doc.header().annotations() {
        root.insert(
            compact(annotation.property.as_str(), prefixes),
            value_node(&annotation.value, prefixes),
        );
    }
    nodes.push(Value::Object(root));

    for axiom in doc.axioms() {
        let node = match axiom {
            Axiom::Declaration { kind, iri } => json!({
                "@id": compact(iri.as_str(), prefixes),
                "@type": compact(kind.rdf_type(), prefixes)
            }),
            Axiom::ClassAssertion { class, individual } => json!({
                "@id": compact(individual.as_str(), prefixes),
                "@type": compact(class.as_str(), prefixes)
            }),
            Axiom::ObjectPropertyAssertion {
                property,
                subject,
                object,
            } => {
                let mut node = Map::new();
                node.insert("@id".to_owned(), json!(compact(subject.as_str(), prefixes)));
                node.insert(
                    compact(property.as_str(), prefixes),
                    json!({ "@id": compact(object.as_str(), prefixes) }),
                );
                Value::Object(node)
            }
            Axiom::AnnotationAssertion {
                property,
                subject,
                value,
            } => {
                let mut node = Map::new();
                node.insert("@id".to_owned(), json!(compact(subject.as_str(), prefixes)));
                node.insert(compact(property.as_str(), prefixes), value_node(value, prefixes));
                Value::Object(node)
            }
        };
        nodes.push(node);
    }

    Value::Array(nodes)
}

fn compact(iri: &str, prefixes: &[Prefix]) -> String {
    abbreviate(iri, prefixes).unwrap_or_else(|| iri.to_owned())
}

fn value_node(value: &AnnotationValue, prefixes: &[Prefix]) -> Value {
    match value {
        AnnotationValue::Literal(lit) => json!(lit.as_str()),
        AnnotationValue::Iri(iri) => json!({ "@id": compact(iri.as_str(), prefixes) }),
    }
}
