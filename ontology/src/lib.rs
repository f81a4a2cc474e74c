//! OWL 2 ontology document model for the organization registry.
//!
//! The `rorio-ontology` crate provides the append-only [`OntologyDocument`]
//! that the mapping engine populates: a fixed header, the fixed registry
//! [`Vocabulary`] (organization and city classes, location and relationship
//! properties), and an ordered list of [`Axiom`]s. Serializers produce OWL
//! functional syntax, Turtle, N-Triples and JSON-LD.
//!
//! # Entry Point
//!
//! ```
//! use rorio_ontology::model::iris;
//! use rorio_ontology::{Header, Iri, OntologyDocument, Vocabulary};
//!
//! let iri = Iri::new("https://w3id.org/rorio/rorio.owl").map_err(|e| e.to_string())?;
//! let doc = OntologyDocument::new(Header::new(iri), &Vocabulary::standard());
//! let ofn = rorio_ontology::serializer::functional::to_functional(&doc);
//! assert!(ofn.contains(iris::OBI));
//! # Ok::<(), String>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod serializer;
pub mod vocabulary;

pub use model::{
    Annotation, AnnotationValue, Axiom, EntityKind, Header, Iri, IriError, Literal, LiteralError,
    OntologyDocument,
};
pub use vocabulary::{Prefix, Term, Vocabulary};
