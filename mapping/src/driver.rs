//! Run driver: one pass over the record stream into a single ontology.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use rorio_ontology::{OntologyDocument, Vocabulary};
use thiserror::Error;
use tracing::{info, warn};

use crate::builder::{BuildContext, EntityBuilder, MappingError, RecordOutcome};
use crate::config::{ConfigError, MappingConfig};
use crate::diagnostics::Diagnostics;
use crate::lexicon::Lexicon;
use crate::record::Record;
use crate::relations::RelationMap;
use crate::resolver::IdentifierResolver;
use crate::source::{stream_records, SourceError, SourceMeta};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Configuration or header construction failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The record stream could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),
    /// A record triggered a fatal mapping failure.
    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct Generation {
    /// The ontology.
    pub document: OntologyDocument,
    /// Every recoverable failure, in report order.
    pub diagnostics: Diagnostics,
    /// Names and synonyms of the mapped organizations.
    pub lexicon: Lexicon,
    /// Number of records processed.
    pub records: usize,
}

/// Owns the state of one run: the document under construction, the
/// resolver's memory of unknown prefixes, diagnostics and lexicon.
#[derive(Debug)]
pub struct Generator {
    builder: EntityBuilder,
    document: OntologyDocument,
    diagnostics: Diagnostics,
    lexicon: Lexicon,
    records: usize,
}

impl Generator {
    /// Creates a generator whose document already holds the header for
    /// `meta` and the fixed vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured header is malformed.
    pub fn new(config: &MappingConfig, meta: &SourceMeta) -> Result<Self, ConfigError> {
        let header = config.header(meta)?;
        Ok(Self {
            builder: EntityBuilder::new(
                config.name_normalizer(),
                IdentifierResolver::new(config.prefix_registry()),
                RelationMap::standard(),
                config.unknown_relationships,
            ),
            document: OntologyDocument::new(header, &Vocabulary::standard()),
            diagnostics: Diagnostics::new(),
            lexicon: Lexicon::new(),
            records: 0,
        })
    }

    /// Maps one record. Processing the same record twice appends its facts
    /// twice.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] when the record must abort the run.
    pub fn process(&mut self, record: &Record) -> Result<RecordOutcome, MappingError> {
        let mut cx = BuildContext {
            document: &mut self.document,
            diagnostics: &mut self.diagnostics,
            lexicon: &mut self.lexicon,
        };
        let outcome = self.builder.build(record, &mut cx)?;
        self.records += 1;
        Ok(outcome)
    }

    /// Maps records in order, stopping at the first fatal failure.
    ///
    /// # Errors
    ///
    /// As [`Generator::process`].
    pub fn process_all<'a, I>(&mut self, records: I) -> Result<usize, MappingError>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut n = 0;
        for record in records {
            self.process(record)?;
            n += 1;
        }
        Ok(n)
    }

    /// The document so far.
    #[must_use]
    pub fn document(&self) -> &OntologyDocument {
        &self.document
    }

    /// Diagnostics so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Ends the run.
    #[must_use]
    pub fn finish(self) -> Generation {
        let unhandled: Vec<&str> = self.builder.resolver().unhandled_prefixes().collect();
        info!(
            records = self.records,
            axioms = self.document.axioms().len(),
            diagnostics = %self.diagnostics.summary(),
            unhandled_prefixes = ?unhandled,
            "mapping finished"
        );
        Generation {
            document: self.document,
            diagnostics: self.diagnostics,
            lexicon: self.lexicon,
            records: self.records,
        }
    }
}

/// Maps every record of a JSON array read from `reader`.
///
/// # Errors
///
/// Returns [`RunError`] on a malformed header, undecodable input, or a
/// fatal mapping failure. No partial result is returned in those cases.
pub fn run<R: Read>(
    config: &MappingConfig,
    meta: &SourceMeta,
    reader: R,
) -> Result<Generation, RunError> {
    info!(version = %meta.version, source = %meta.provenance, "mapping records");
    let mut generator = Generator::new(config, meta)?;
    stream_records(reader, |record| generator.process(&record).map(drop))??;
    Ok(generator.finish())
}

/// A step run on the serialized primary artifact, such as a format
/// converter. Its outcome never affects the run.
pub trait PostProcessor {
    /// Processes the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PostProcessError`] if the step did not succeed.
    fn post_process(&self, path: &Path) -> Result<(), PostProcessError>;
}

/// Failure of a [`PostProcessor`].
#[derive(Debug, Error)]
pub enum PostProcessError {
    /// The program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// The program.
        program: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The program exited unsuccessfully.
    #[error("{program} exited with {status}")]
    Status {
        /// The program.
        program: PathBuf,
        /// Its exit status.
        status: std::process::ExitStatus,
    },
}

/// Runs an external program with the artifact path as its only argument.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: PathBuf,
}

impl ExternalCommand {
    /// Wraps `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PostProcessor for ExternalCommand {
    fn post_process(&self, path: &Path) -> Result<(), PostProcessError> {
        let status = Command::new(&self.program)
            .arg(path)
            .status()
            .map_err(|source| PostProcessError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(PostProcessError::Status {
                program: self.program.clone(),
                status,
            })
        }
    }
}

/// Runs `processor` on `path`, logging a failure instead of returning it.
/// Returns whether the step succeeded.
pub fn post_process(processor: &dyn PostProcessor, path: &Path) -> bool {
    match processor.post_process(path) {
        Ok(()) => {
            info!(path = %path.display(), "post-processing finished");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "post-processing failed; continuing");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::relations::UnknownRelationPolicy;

    struct Failing;

    impl PostProcessor for Failing {
        fn post_process(&self, path: &Path) -> Result<(), PostProcessError> {
            Err(PostProcessError::Spawn {
                program: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            })
        }
    }

    fn meta() -> SourceMeta {
        SourceMeta::new("v1", "test")
    }

    #[test]
    fn post_processing_failure_is_swallowed() {
        assert!(!post_process(&Failing, Path::new("rorio.ofn")));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = ExternalCommand::new("/nonexistent/rorio-converter")
            .post_process(Path::new("rorio.ofn"))
            .expect_err("no such program");
        assert!(matches!(err, PostProcessError::Spawn { .. }));
    }

    #[test]
    fn counts_processed_records() {
        let input = r#"[{"id": "https://ror.org/a", "name": "A"}, {"id": "https://ror.org/b", "name": "B"}]"#;
        let generation = run(&MappingConfig::default(), &meta(), input.as_bytes()).expect("runs");
        assert_eq!(generation.records, 2);
        assert_eq!(generation.lexicon.len(), 2);
        assert!(generation.diagnostics.is_empty());
    }

    #[test]
    fn fail_policy_aborts_run() {
        let config = MappingConfig {
            unknown_relationships: UnknownRelationPolicy::Fail,
            ..MappingConfig::default()
        };
        let input = r#"[{"id": "https://ror.org/a", "name": "A",
            "relationships": [{"type": "Sibling", "id": "https://ror.org/b"}]}]"#;
        let err = run(&config, &meta(), input.as_bytes()).expect_err("aborts");
        assert!(matches!(err, RunError::Mapping(_)));
    }

    #[test]
    fn malformed_input_aborts_run() {
        let err = run(&MappingConfig::default(), &meta(), "[{".as_bytes()).expect_err("aborts");
        assert!(matches!(err, RunError::Source(_)));
    }
}
