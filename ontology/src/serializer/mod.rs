//! Serializers for the generated ontology.
//!
//! Four serialization formats are supported:
//! - **OWL functional syntax** ([`functional`]) — the primary output, `rorio.ofn`
//! - **Turtle** ([`turtle`]) — for RDF tooling, `rorio.ttl`
//! - **N-Triples** ([`ntriples`]) — for streaming/bulk processing, `rorio.nt`
//! - **JSON-LD** ([`jsonld`]) — `rorio.json`
//!
//! Every serializer is a pure function of the document, so identical input
//! yields byte-identical output.

pub mod functional;
#[cfg(feature = "serializers")]
pub mod jsonld;
pub mod ntriples;
pub mod turtle;

use crate::model::OntologyDocument;
use crate::vocabulary::Prefix;

/// An output format and its fixed artifact file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// OWL functional syntax, `rorio.ofn`.
    Functional,
    /// Turtle, `rorio.ttl`.
    Turtle,
    /// N-Triples, `rorio.nt`.
    NTriples,
    /// JSON-LD, `rorio.json`.
    #[cfg(feature = "serializers")]
    JsonLd,
}

impl Format {
    /// Every available format, primary first.
    #[must_use]
    pub fn all() -> Vec<Format> {
        let mut all = vec![Format::Functional, Format::Turtle, Format::NTriples];
        #[cfg(feature = "serializers")]
        all.push(Format::JsonLd);
        all
    }

    /// The artifact file name.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Format::Functional => "rorio.ofn",
            Format::Turtle => "rorio.ttl",
            Format::NTriples => "rorio.nt",
            #[cfg(feature = "serializers")]
            Format::JsonLd => "rorio.json",
        }
    }

    /// Serializes `doc` in this format.
    #[must_use]
    pub fn render(self, doc: &OntologyDocument) -> String {
        match self {
            Format::Functional => functional::to_functional(doc),
            Format::Turtle => turtle::to_turtle(doc),
            Format::NTriples => ntriples::to_ntriples(doc),
            #[cfg(feature = "serializers")]
            Format::JsonLd => format!("{:#}\n", jsonld::to_json_ld(doc)),
        }
    }
}

/// Abbreviates `iri` to `prefix:local` using the first binding whose
/// namespace it starts with and whose remainder is a legal local name.
/// Returns `None` when no binding applies.
#[must_use]
pub fn abbreviate(iri: &str, prefixes: &[Prefix]) -> Option<String> {
    prefixes.iter().find_map(|p| {
        iri.strip_prefix(p.namespace)
            .filter(|local| is_local_name(local))
            .map(|local| format!("{}:{}", p.name, local))
    })
}

/// Abbreviated form if possible, otherwise `<iri>`.
#[must_use]
pub fn compact_or_bracketed(iri: &str, prefixes: &[Prefix]) -> String {
    abbreviate(iri, prefixes).unwrap_or_else(|| format!("<{iri}>"))
}

// Conservative subset of PN_LOCAL shared by Turtle and functional syntax.
fn is_local_name(local: &str) -> bool {
    let Some(first) = local.chars().next() else {
        return false;
    };
    (first.is_ascii_alphanumeric() || first == '_')
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
