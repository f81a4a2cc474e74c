//! Run configuration.
//!
//! Every lookup table the mapping uses is built from a [`MappingConfig`]
//! once at the start of a run and handed to the components that need it.
//! The defaults reproduce the built-in behaviour; a TOML file can extend
//! the tables or change the header and the unknown-relationship policy.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rorio_ontology::model::iris::{self, known};
use rorio_ontology::{Header, Iri, IriError, Literal, LiteralError};
use serde::Deserialize;
use thiserror::Error;

use crate::normalize::NameNormalizer;
use crate::relations::UnknownRelationPolicy;
use crate::resolver::{PrefixRegistry, WIKIPEDIA_PAGE_PREFIX};
use crate::source::SourceMeta;

/// Errors produced while loading configuration or building the header.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration file is not valid TOML for [`MappingConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A header field that must be an IRI is not one.
    #[error("header field {field}: {source}")]
    HeaderIri {
        /// Header field name.
        field: &'static str,
        /// Validation error.
        source: IriError,
    },
    /// A header field that must be a literal is not one.
    #[error("header field {field}: {source}")]
    HeaderLiteral {
        /// Header field name.
        field: &'static str,
        /// Validation error.
        source: LiteralError,
    },
}

/// Ontology header fields that do not depend on the input snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    /// IRI of the generated ontology.
    pub ontology_iri: String,
    /// `dc:title`.
    pub title: String,
    /// `dc:creator`, an IRI.
    pub creator: String,
    /// `dcterms:license`.
    pub license: String,
    /// `rdfs:seeAlso` on the ontology.
    pub see_also: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            ontology_iri: "https://w3id.org/rorio/rorio.owl".to_owned(),
            title: "ROR in OWL".to_owned(),
            creator: "https://orcid.org/0000-0003-4423-4370".to_owned(),
            license: "https://creativecommons.org/publicdomain/zero/1.0/".to_owned(),
            see_also: "https://github.com/cthoyt/rorio".to_owned(),
        }
    }
}

/// Everything configurable about a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    /// Policy for relationship labels outside the fixed vocabulary.
    pub unknown_relationships: UnknownRelationPolicy,
    /// Identifier schemes that are skipped without a report.
    pub excluded_prefixes: Vec<String>,
    /// Header fields.
    pub header: HeaderConfig,
    /// Extra or overriding name corrections.
    pub name_corrections: BTreeMap<String, String>,
    /// Extra scheme synonyms, mapped to their canonical prefix.
    pub prefixes: BTreeMap<String, String>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            unknown_relationships: UnknownRelationPolicy::default(),
            excluded_prefixes: vec![WIKIPEDIA_PAGE_PREFIX.to_owned()],
            header: HeaderConfig::default(),
            name_corrections: BTreeMap::new(),
            prefixes: BTreeMap::new(),
        }
    }
}

impl MappingConfig {
    /// Parses a TOML document. Missing keys take their default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`MappingConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Builds the name normalizer.
    #[must_use]
    pub fn name_normalizer(&self) -> NameNormalizer {
        NameNormalizer::standard().with_corrections(self.name_corrections.clone())
    }

    /// Builds the prefix registry.
    #[must_use]
    pub fn prefix_registry(&self) -> PrefixRegistry {
        let registry = self
            .prefixes
            .iter()
            .fold(PrefixRegistry::standard().without_exclusions(), |r, (synonym, canonical)| {
                r.with_synonym(synonym, canonical)
            });
        self.excluded_prefixes
            .iter()
            .fold(registry, |r, prefix| r.with_excluded(prefix))
    }

    /// Builds the ontology header for one input snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HeaderIri`] or [`ConfigError::HeaderLiteral`]
    /// if a configured or snapshot value is malformed.
    pub fn header(&self, meta: &SourceMeta) -> Result<Header, ConfigError> {
        let h = &self.header;
        // Annotation properties are `iris` constants; configured values are validated.
        Ok(Header::new(iri("ontology_iri", &h.ontology_iri)?)
            .with_literal(known(iris::DC_TITLE), literal("title", &h.title)?)
            .with_iri(known(iris::DC_CREATOR), iri("creator", &h.creator)?)
            .with_literal(known(iris::DCTERMS_LICENSE), literal("license", &h.license)?)
            .with_literal(known(iris::RDFS_SEE_ALSO), literal("see_also", &h.see_also)?)
            .with_literal(known(iris::OWL_VERSION_INFO), literal("version", &meta.version)?)
            .with_literal(known(iris::DC_SOURCE), literal("provenance", &meta.provenance)?))
    }
}

fn iri(field: &'static str, value: &str) -> Result<Iri, ConfigError> {
    Iri::new(value).map_err(|source| ConfigError::HeaderIri { field, source })
}

fn literal(field: &'static str, value: &str) -> Result<Literal, ConfigError> {
    Literal::new(value).map_err(|source| ConfigError::HeaderLiteral { field, source })
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::resolver::Lookup;

    fn meta() -> SourceMeta {
        SourceMeta::new("v1.17.1-2022-12-16", "https://zenodo.org/record/7448410")
    }

    #[test]
    fn empty_document_is_default() {
        let config = MappingConfig::from_toml_str("").expect("parses");
        assert_eq!(config, MappingConfig::default());
        assert_eq!(config.excluded_prefixes, vec!["OrgRef"]);
    }

    #[test]
    fn parses_policy_and_tables() {
        let config = MappingConfig::from_toml_str(
            r#"
            unknown_relationships = "fail"
            excluded_prefixes = ["OrgRef", "CNRS"]

            [header]
            title = "Registry in OWL"

            [name_corrections]
            "Foo\\Bar" = "Foo/Bar"

            [prefixes]
            UKPRN = "ukprn"
            "#,
        )
        .expect("parses");
        assert_eq!(config.unknown_relationships, UnknownRelationPolicy::Fail);
        assert_eq!(config.header.title, "Registry in OWL");
        assert_eq!(config.header.ontology_iri, HeaderConfig::default().ontology_iri);
        assert_eq!(config.name_normalizer().normalize("Foo\\Bar"), "Foo/Bar");
        let registry = config.prefix_registry();
        assert_eq!(registry.lookup("UKPRN"), Lookup::Canonical("ukprn"));
        assert_eq!(registry.lookup("CNRS"), Lookup::Excluded);
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = MappingConfig::from_toml_str("colour = \"blue\"");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn header_carries_snapshot_metadata() {
        let header = MappingConfig::default().header(&meta()).expect("valid header");
        assert_eq!(header.iri().as_str(), "https://w3id.org/rorio/rorio.owl");
        assert_eq!(header.annotations().len(), 6);
    }

    #[test]
    fn unencodable_version_is_rejected() {
        let err = MappingConfig::default().header(&SourceMeta::new("v1\u{0}", "x"));
        assert!(matches!(
            err,
            Err(ConfigError::HeaderLiteral {
                field: "version",
                ..
            })
        ));
    }
}
