//! Relationship labels to ontology relation terms.

use std::collections::HashMap;

use rorio_ontology::model::iris::{self, known};
use rorio_ontology::Iri;
use serde::Deserialize;
use thiserror::Error;

const RELATIONS: &[(&str, &str)] = &[
    ("Related", iris::RDFS_SEE_ALSO),
    ("Child", iris::HAS_PART),
    ("Parent", iris::PART_OF),
    ("Predecessor", iris::PRECEDED_BY),
    ("Successor", iris::PRECEDES),
];

/// A relationship label outside the fixed vocabulary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown relationship type {label:?}")]
pub struct UnknownRelationship {
    /// The unrecognized label.
    pub label: String,
}

/// What to do with a relationship whose label is not recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownRelationPolicy {
    /// Report the relationship and skip it.
    #[default]
    Report,
    /// Abort the run.
    Fail,
}

/// Closed mapping from relationship labels to relation terms.
#[derive(Debug, Clone)]
pub struct RelationMap {
    terms: HashMap<&'static str, Iri>,
}

impl Default for RelationMap {
    fn default() -> Self {
        Self::standard()
    }
}

impl RelationMap {
    /// The five registry relationship types.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            // Every term is an `iris` constant.
            terms: RELATIONS
                .iter()
                .map(|&(label, term)| (label, known(term)))
                .collect(),
        }
    }

    /// Maps a relationship label.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownRelationship`] if `label` is not one of the five
    /// recognized types.
    pub fn map(&self, label: &str) -> Result<&Iri, UnknownRelationship> {
        self.terms.get(label).ok_or_else(|| UnknownRelationship {
            label: label.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_all_five_labels() {
        let map = RelationMap::standard();
        let term = |label: &str| map.map(label).map(|iri| iri.as_str().to_owned());
        assert_eq!(term("Related"), Ok(iris::RDFS_SEE_ALSO.to_owned()));
        assert_eq!(term("Child"), Ok(iris::HAS_PART.to_owned()));
        assert_eq!(term("Parent"), Ok(iris::PART_OF.to_owned()));
        assert_eq!(term("Predecessor"), Ok(iris::PRECEDED_BY.to_owned()));
        assert_eq!(term("Successor"), Ok(iris::PRECEDES.to_owned()));
    }

    #[test]
    fn unknown_label_is_an_error() {
        let map = RelationMap::standard();
        let err = map.map("Sibling");
        assert_eq!(
            err,
            Err(UnknownRelationship {
                label: "Sibling".to_owned()
            })
        );
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!(RelationMap::standard().map("parent").is_err());
    }
}
