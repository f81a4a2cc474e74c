//! Record-to-ontology mapping engine for the organization registry.
//!
//! The `rorio-mapping` crate turns a stream of registry records into a single
//! [`OntologyDocument`](rorio_ontology::OntologyDocument). Each record
//! becomes an organization individual with its label and class, the cities
//! it is located in, relationship annotations, exact synonyms and database
//! cross-references. Malformed values are reported as [`Diagnostic`]s and
//! contained to the smallest enclosing fact; only an unrecognized
//! relationship under [`UnknownRelationPolicy::Fail`] aborts a run.
//!
//! # Entry Point
//!
//! ```
//! use rorio_mapping::{run, MappingConfig, SourceMeta};
//!
//! let input = r#"[{"id": "https://ror.org/02mhbdp94", "name": "Test University"}]"#;
//! let meta = SourceMeta::new("v1.17.1-2022-12-16", "https://zenodo.org/record/7448410");
//! let generation = run(&MappingConfig::default(), &meta, input.as_bytes())
//!     .map_err(|e| e.to_string())?;
//! assert_eq!(generation.records, 1);
//! assert_eq!(generation.document.class_assertions(), 1);
//! # Ok::<(), String>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod lexicon;
pub mod normalize;
pub mod record;
pub mod relations;
pub mod resolver;
pub mod source;

pub use builder::{BuildContext, EntityBuilder, MappingError, RecordOutcome};
pub use config::{ConfigError, HeaderConfig, MappingConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use driver::{
    post_process, run, ExternalCommand, Generation, Generator, PostProcessError, PostProcessor,
    RunError,
};
pub use lexicon::{LexicalEntry, Lexicon, TermStatus};
pub use normalize::NameNormalizer;
pub use record::{Record, Text};
pub use relations::{RelationMap, UnknownRelationPolicy, UnknownRelationship};
pub use resolver::{IdentifierResolver, PrefixRegistry, Resolution};
pub use source::{SourceError, SourceMeta};
