//! Conformance checks for the generated registry ontology.
//!
//! Re-reads every artifact `rorio-build` writes and checks it against its
//! format and against the primary document.
//!
//! | Artifact     | Checks                                                   |
//! |--------------|----------------------------------------------------------|
//! | `rorio.ofn`  | OWL 2 functional syntax re-parse, header, axiom shapes   |
//! | `rorio.ttl`  | Turtle 1.1 parse, counts match `rorio.ofn`               |
//! | `rorio.nt`   | N-Triples parse and line structure, agrees with Turtle   |
//! | `rorio.json` | JSON-LD `@context` prefixes, one `@graph` node per axiom |
//!
//! # Entry Point
//!
//! ```no_run
//! use std::path::Path;
//!
//! let report = rorio_conformance::run_all(Path::new("public"))?;
//! assert!(report.all_passed(), "{report}");
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::Path;

pub mod report;
pub mod validators;

pub use report::{CheckResult, ConformanceReport, Severity};

/// Runs every validator over the artifacts directory.
///
/// The functional document is checked first; its counts feed the RDF and
/// JSON-LD comparisons, which are skipped when it does not parse.
///
/// # Errors
///
/// Returns an error only if an artifact exists but cannot be read, or if
/// the JSON-LD artifact is not JSON.
pub fn run_all(artifacts: &Path) -> anyhow::Result<ConformanceReport> {
    let (mut report, functional) = validators::functional::inspect(artifacts)?;
    report.extend(validators::rdf::validate(artifacts, functional.as_ref())?);
    report.extend(validators::jsonld::validate(artifacts, functional.as_ref())?);
    Ok(report)
}
