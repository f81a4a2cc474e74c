//! `rorio-build` maps a registry data dump to the ontology and writes the
//! artifacts to the output directory.
//!
//! **Outputs:**
//! - `<out>/rorio.ofn`: OWL 2 functional syntax (primary)
//! - `<out>/rorio.ttl`: Turtle 1.1
//! - `<out>/rorio.nt`: N-Triples
//! - `<out>/rorio.json`: JSON-LD
//! - `--terms <path>`: tab-separated names and synonyms, when requested
//!
//! **Usage:**
//! ```text
//! rorio-build --input v1.17.1-2022-12-16-ror-data.json [--out public]
//!             [--version-label LABEL] [--source-uri URI] [--config rorio.toml]
//!             [--convert-with PROGRAM] [--terms terms.tsv]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rorio_mapping::source::{self, SourceMeta};
use rorio_mapping::{post_process, run, ExternalCommand, MappingConfig};
use rorio_ontology::serializer::Format;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Build the registry ontology artifacts.
#[derive(Parser)]
#[command(name = "rorio-build", about = "Build the organization registry ontology")]
struct Args {
    /// Registry data dump: a JSON array of records.
    #[arg(long)]
    input: PathBuf,

    /// Output directory for generated artifacts.
    #[arg(long, default_value = "public")]
    out: PathBuf,

    /// Version label for `owl:versionInfo` (default: the input file stem
    /// without `-ror-data`).
    #[arg(long)]
    version_label: Option<String>,

    /// Provenance for `dc:source` (default: the input path).
    #[arg(long)]
    source_uri: Option<String>,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Program run on the functional-syntax file after it is written.
    /// Failures are logged and ignored.
    #[arg(long)]
    convert_with: Option<PathBuf>,

    /// Also write the names and synonyms lexicon to this file.
    #[arg(long)]
    terms: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => MappingConfig::load(path)?,
        None => MappingConfig::default(),
    };
    let mut meta = SourceMeta::for_file(&args.input);
    if let Some(version) = args.version_label {
        meta.version = version;
    }
    if let Some(uri) = args.source_uri {
        meta.provenance = uri;
    }

    let reader = source::open(&args.input)?;
    let generation = run(&config, &meta, reader)
        .with_context(|| format!("Failed to map {}", args.input.display()))?;

    let out = &args.out;
    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;
    for format in Format::all() {
        let path = out.join(format.file_name());
        fs::write(&path, format.render(&generation.document))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "written");
    }

    if let Some(path) = &args.terms {
        fs::write(path, generation.lexicon.to_tsv())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), entries = generation.lexicon.len(), "lexicon written");
    }

    if let Some(program) = args.convert_with {
        post_process(
            &ExternalCommand::new(program),
            &out.join(Format::Functional.file_name()),
        );
    }

    println!(
        "Built {} records into {} axioms ({}).",
        generation.records,
        generation.document.axioms().len(),
        generation.diagnostics.summary()
    );
    Ok(())
}
