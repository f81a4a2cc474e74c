//! Record input: snapshot metadata and a streaming reader over a JSON array
//! of records.
//!
//! The reader hands records to a callback one at a time while the array is
//! being decoded, so memory use is bounded by a single record rather than
//! the whole dump.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer as _, SeqAccess, Visitor};
use thiserror::Error;

use crate::record::Record;

/// Version label and provenance of one input snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMeta {
    /// Version label written to `owl:versionInfo`.
    pub version: String,
    /// Where the snapshot came from, written to `dc:source`.
    pub provenance: String,
}

impl SourceMeta {
    /// Creates snapshot metadata.
    pub fn new(version: impl Into<String>, provenance: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            provenance: provenance.into(),
        }
    }

    /// Metadata for a local dump such as `v1.17.1-2022-12-16-ror-data.json`:
    /// the version is the file stem without the `-ror-data` suffix, the
    /// provenance is the path.
    #[must_use]
    pub fn for_file(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let version = stem.strip_suffix("-ror-data").unwrap_or(&stem).to_owned();
        Self::new(version, path.display().to_string())
    }
}

/// Errors produced while reading the record stream.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The input file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        /// Path of the input.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The input is not a JSON array of records.
    #[error("failed to decode records: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Opens a local JSON dump for [`stream_records`].
///
/// # Errors
///
/// Returns [`SourceError::Open`] if the file cannot be opened.
pub fn open(path: &Path) -> Result<BufReader<File>, SourceError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Decodes a JSON array of records from `reader`, calling `on_record` for
/// each element in order.
///
/// The outer result reports decoding failures. The inner result is `Err`
/// when `on_record` returned an error, in which case decoding stops at that
/// record; otherwise it holds the number of records processed.
///
/// # Errors
///
/// Returns [`SourceError::Decode`] if the input is not a JSON array of
/// records.
pub fn stream_records<R, F, E>(reader: R, mut on_record: F) -> Result<Result<usize, E>, SourceError>
where
    R: Read,
    F: FnMut(Record) -> Result<(), E>,
{
    let mut halted = None;
    let mut de = serde_json::Deserializer::from_reader(reader);
    let visitor = RecordVisitor {
        on_record: &mut on_record,
        halted: &mut halted,
    };
    let decoded = (&mut de).deserialize_seq(visitor);
    if let Some(err) = halted {
        return Ok(Err(err));
    }
    let count = decoded?;
    de.end()?;
    Ok(Ok(count))
}

struct RecordVisitor<'a, F, E> {
    on_record: &'a mut F,
    halted: &'a mut Option<E>,
}

impl<'de, F, E> Visitor<'de> for RecordVisitor<'_, F, E>
where
    F: FnMut(Record) -> Result<(), E>,
{
    type Value = usize;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of organization records")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut count = 0;
        while let Some(record) = seq.next_element::<Record>()? {
            if let Err(err) = (self.on_record)(record) {
                *self.halted = Some(err);
                return Err(de::Error::custom("record stream halted"));
            }
            count += 1;
        }
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    const DUMP: &str = r#"[
        {"id": "https://ror.org/a", "name": "A"},
        {"id": "https://ror.org/b", "name": "B"},
        {"id": "https://ror.org/c", "name": "C"}
    ]"#;

    #[test]
    fn streams_every_record_in_order() {
        let mut seen = Vec::new();
        let count = stream_records(DUMP.as_bytes(), |r| {
            seen.push(r.id);
            Ok::<(), ()>(())
        })
        .expect("decodes");
        assert_eq!(count, Ok(3));
        assert_eq!(seen, vec!["https://ror.org/a", "https://ror.org/b", "https://ror.org/c"]);
    }

    #[test]
    fn callback_error_stops_the_stream() {
        let mut seen = 0;
        let outcome = stream_records(DUMP.as_bytes(), |r| {
            seen += 1;
            if r.id.ends_with('b') {
                Err("stop")
            } else {
                Ok(())
            }
        })
        .expect("decodes");
        assert_eq!(outcome, Err("stop"));
        assert_eq!(seen, 2);
    }

    #[test]
    fn rejects_non_array_input() {
        let err = stream_records(r#"{"id": "x"}"#.as_bytes(), |_| Ok::<(), ()>(()));
        assert!(matches!(err, Err(SourceError::Decode(_))));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let err = stream_records("[] []".as_bytes(), |_| Ok::<(), ()>(()));
        assert!(matches!(err, Err(SourceError::Decode(_))));
    }

    #[test]
    fn version_label_from_dump_file_name() {
        let meta = SourceMeta::for_file(Path::new("/data/v1.17.1-2022-12-16-ror-data.json"));
        assert_eq!(meta.version, "v1.17.1-2022-12-16");
        assert_eq!(meta.provenance, "/data/v1.17.1-2022-12-16-ror-data.json");
    }
}
