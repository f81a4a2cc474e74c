//! Artifact validators: functional syntax, RDF (Turtle and N-Triples), JSON-LD.

pub mod functional;
pub mod jsonld;
pub mod rdf;
