//! `rorio-conformance` re-reads the artifacts written by `rorio-build` and
//! checks each against its format and against the functional-syntax
//! document.
//!
//! **Usage:**
//! ```text
//! rorio-conformance [--artifacts <path>]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use rorio_conformance::run_all;

/// Run the artifact conformance checks.
#[derive(Parser)]
#[command(
    name = "rorio-conformance",
    about = "Validate the generated registry ontology artifacts"
)]
struct Args {
    /// Path to the built artifacts directory.
    #[arg(long, default_value = "public")]
    artifacts: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let report = run_all(&args.artifacts)?;

    println!("Registry Ontology Conformance Report");
    println!("====================================");
    println!();
    println!("{report}");

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }
    println!("Conformance PASSED.");
    Ok(())
}
