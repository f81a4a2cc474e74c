//! JSON-LD validator.
//!
//! Verifies that `rorio.json` is a JSON-LD document whose `@context` binds
//! every registry prefix, whose `@graph` holds the ontology node plus one
//! node per axiom, and whose `@id`s are all absolute or prefixed.

use std::path::Path;

use anyhow::{Context, Result};
use rorio_ontology::Vocabulary;
use serde_json::Value;

use super::functional::FunctionalSummary;
use crate::report::{CheckResult, ConformanceReport};

/// File name of the JSON-LD artifact.
pub const FILE: &str = "rorio.json";

const VALIDATOR: &str = "artifact/jsonld";

/// Checks the JSON-LD artifact in `artifacts`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or is not JSON.
pub fn validate(artifacts: &Path, functional: Option<&FunctionalSummary>) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    let path = artifacts.join(FILE);
    if !path.exists() {
        report.push(CheckResult::fail(VALIDATOR, format!("{FILE} not found")));
        return Ok(report);
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;

    check_context(&value, &mut report);
    check_graph(&value, functional, &mut report);
    Ok(report)
}

fn check_context(value: &Value, report: &mut ConformanceReport) {
    let Some(context) = value.get("@context") else {
        report.push(CheckResult::fail(VALIDATOR, "document has no @context"));
        return;
    };
    let missing: Vec<String> = Vocabulary::standard()
        .prefixes()
        .iter()
        .filter(|p| context.get(p.name).and_then(Value::as_str) != Some(p.namespace))
        .map(|p| format!("{} => {}", p.name, p.namespace))
        .collect();
    if missing.is_empty() {
        report.push(CheckResult::pass(VALIDATOR, "@context binds every prefix"));
    } else {
        report.push(CheckResult::fail_with_details(
            VALIDATOR,
            "@context is missing prefix bindings",
            missing,
        ));
    }
}

fn check_graph(value: &Value, functional: Option<&FunctionalSummary>, report: &mut ConformanceReport) {
    let Some(graph) = value.get("@graph").and_then(Value::as_array) else {
        report.push(CheckResult::fail(VALIDATOR, "document has no @graph array"));
        return;
    };

    if let Some(f) = functional {
        let expected = 1 + f.axioms();
        if graph.len() == expected {
            report.push(CheckResult::pass(
                VALIDATOR,
                format!("@graph has {expected} nodes, one per axiom plus the ontology"),
            ));
        } else {
            report.push(CheckResult::fail(
                VALIDATOR,
                format!("@graph has {} nodes, expected {expected}", graph.len()),
            ));
        }
    }

    let bad_ids: Vec<String> = graph
        .iter()
        .filter_map(|node| match node.get("@id").and_then(Value::as_str) {
            Some(id) if id.contains(':') => None,
            Some(id) => Some(id.to_owned()),
            None => Some(format!("node without @id: {node}")),
        })
        .take(10)
        .collect();
    if bad_ids.is_empty() {
        report.push(CheckResult::pass(VALIDATOR, "every @id is an IRI or prefixed name"));
    } else {
        report.push(CheckResult::fail_with_details(
            VALIDATOR,
            "@graph has relative or missing @ids",
            bad_ids,
        ));
    }
}
