//! RDF 1.1 validator for the Turtle and N-Triples alternates.
//!
//! Both files are parsed with `sophia_turtle`. Their triple counts must
//! agree with each other, and the individual, class-membership and location
//! triples must agree with the axiom counts of the functional-syntax
//! document.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rorio_ontology::model::iris;
use sophia_api::source::TripleSource;
use sophia_api::term::{SimpleTerm, Term};
use sophia_turtle::parser::{nt, turtle};

use super::functional::FunctionalSummary;
use crate::report::{CheckResult, ConformanceReport};

/// File name of the Turtle artifact.
pub const TURTLE_FILE: &str = "rorio.ttl";
/// File name of the N-Triples artifact.
pub const NTRIPLES_FILE: &str = "rorio.nt";

const VALIDATOR: &str = "artifact/rdf";

type Triple = [SimpleTerm<'static>; 3];

/// Counts gathered from a parsed graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RdfSummary {
    /// All triples, duplicates included.
    pub triples: usize,
    /// `?x rdf:type owl:NamedIndividual`.
    pub named_individuals: usize,
    /// `rdf:type` triples whose object is not an OWL built-in.
    pub class_assertions: usize,
    /// Triples using the located-in property.
    pub located_in: usize,
}

fn iri_of(term: &SimpleTerm<'static>) -> Option<String> {
    term.iri().map(|iri| iri.as_str().to_owned())
}

/// Counts the triples of a parsed graph.
#[must_use]
pub fn summarize(triples: &[Triple]) -> RdfSummary {
    let mut summary = RdfSummary {
        triples: triples.len(),
        ..RdfSummary::default()
    };
    for [_, p, o] in triples {
        let Some(predicate) = iri_of(p) else { continue };
        if predicate == iris::LOCATED_IN {
            summary.located_in += 1;
        } else if predicate == iris::RDF_TYPE {
            match iri_of(o) {
                Some(class) if class == iris::OWL_NAMED_INDIVIDUAL => summary.named_individuals += 1,
                Some(class) if !class.starts_with(iris::OWL) => summary.class_assertions += 1,
                _ => {}
            }
        }
    }
    summary
}

/// Parses a Turtle document.
///
/// # Errors
///
/// Returns an error describing the first syntax error.
pub fn parse_turtle(text: &str) -> Result<Vec<Triple>> {
    turtle::parse_str(text)
        .collect_triples()
        .map_err(|e| anyhow!("{e}"))
}

/// Parses an N-Triples document.
///
/// # Errors
///
/// Returns an error describing the first syntax error.
pub fn parse_ntriples(text: &str) -> Result<Vec<Triple>> {
    nt::parse_str(text)
        .collect_triples()
        .map_err(|e| anyhow!("{e}"))
}

fn read(artifacts: &Path, file: &str, report: &mut ConformanceReport) -> Result<Option<String>> {
    let path = artifacts.join(file);
    if !path.exists() {
        report.push(CheckResult::fail(VALIDATOR, format!("{file} not found")));
        return Ok(None);
    }
    std::fs::read_to_string(&path)
        .map(Some)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn parsed(
    file: &str,
    text: &str,
    parse: fn(&str) -> Result<Vec<Triple>>,
    report: &mut ConformanceReport,
) -> Option<RdfSummary> {
    match parse(text) {
        Ok(triples) => {
            let summary = summarize(&triples);
            report.push(CheckResult::pass(
                VALIDATOR,
                format!("{file} parses ({} triples)", summary.triples),
            ));
            Some(summary)
        }
        Err(e) => {
            report.push(CheckResult::fail_with_details(
                VALIDATOR,
                format!("{file} does not parse"),
                vec![e.to_string()],
            ));
            None
        }
    }
}

// One triple per line, each terminated by " .".
fn check_ntriples_lines(text: &str, report: &mut ConformanceReport) {
    let malformed: Vec<String> = text
        .lines()
        .enumerate()
        .filter(|(_, l)| {
            let t = l.trim();
            !t.is_empty() && !t.ends_with(" .")
        })
        .map(|(i, _)| format!("line {}: does not end with \" .\"", i + 1))
        .take(10)
        .collect();
    if malformed.is_empty() {
        report.push(CheckResult::pass(
            VALIDATOR,
            format!("{NTRIPLES_FILE} has one terminated triple per line"),
        ));
    } else {
        report.push(CheckResult::fail_with_details(
            VALIDATOR,
            format!("{NTRIPLES_FILE} has malformed lines"),
            malformed,
        ));
    }
}

fn compare(report: &mut ConformanceReport, what: &str, expected: usize, found: usize, source: &str) {
    if expected == found {
        report.push(CheckResult::pass(
            VALIDATOR,
            format!("{source}: {found} {what}, as in the functional document"),
        ));
    } else {
        report.push(CheckResult::fail(
            VALIDATOR,
            format!("{source}: {found} {what}, functional document has {expected}"),
        ));
    }
}

/// Checks the Turtle and N-Triples artifacts in `artifacts`, comparing them
/// with `functional` when it is available.
///
/// # Errors
///
/// Returns an error if an artifact exists but cannot be read.
pub fn validate(artifacts: &Path, functional: Option<&FunctionalSummary>) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    let ttl = read(artifacts, TURTLE_FILE, &mut report)?
        .and_then(|text| parsed(TURTLE_FILE, &text, parse_turtle, &mut report));
    let nt = match read(artifacts, NTRIPLES_FILE, &mut report)? {
        Some(text) => {
            check_ntriples_lines(&text, &mut report);
            parsed(NTRIPLES_FILE, &text, parse_ntriples, &mut report)
        }
        None => None,
    };

    if let (Some(ttl), Some(nt)) = (&ttl, &nt) {
        if ttl == nt {
            report.push(CheckResult::pass(
                VALIDATOR,
                format!("{TURTLE_FILE} and {NTRIPLES_FILE} agree ({} triples)", ttl.triples),
            ));
        } else {
            report.push(CheckResult::fail_with_details(
                VALIDATOR,
                format!("{TURTLE_FILE} and {NTRIPLES_FILE} disagree"),
                vec![format!("turtle: {ttl:?}"), format!("n-triples: {nt:?}")],
            ));
        }
    }

    if let (Some(f), Some(ttl)) = (functional, &ttl) {
        compare(&mut report, "named individuals", f.named_individuals, ttl.named_individuals, TURTLE_FILE);
        compare(&mut report, "class assertions", f.class_assertions, ttl.class_assertions, TURTLE_FILE);
        compare(
            &mut report,
            "location facts",
            f.object_property_assertions,
            ttl.located_in,
            TURTLE_FILE,
        );
        // Root typing, header annotations, then one triple per axiom.
        compare(
            &mut report,
            "triples",
            1 + f.header_annotations + f.axioms(),
            ttl.triples,
            TURTLE_FILE,
        );
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    const TTL: &str = r#"@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ror: <https://ror.org/> .
@prefix geonames: <https://www.geonames.org/> .
@prefix OBI: <http://purl.obolibrary.org/obo/OBI_> .
@prefix RO: <http://purl.obolibrary.org/obo/RO_> .

<https://w3id.org/rorio/rorio.owl>
  a owl:Ontology .

ror:0abc1def2 a owl:NamedIndividual .
ror:0abc1def2 a OBI:0000245 .
ror:0abc1def2 rdfs:label "Test University" .
ror:0abc1def2 RO:0001025 geonames:123 .
ror:0abc1def2 a OBI:0000245 .
"#;

    #[test]
    fn counts_typed_and_location_triples() {
        let triples = parse_turtle(TTL).expect("valid turtle");
        let summary = summarize(&triples);
        assert_eq!(
            summary,
            RdfSummary {
                triples: 6,
                named_individuals: 1,
                class_assertions: 2,
                located_in: 1,
            }
        );
    }

    #[test]
    fn reports_turtle_syntax_errors() {
        assert!(parse_turtle("ror:x a .").is_err());
    }

    #[test]
    fn parses_ntriples() {
        let nt = "<https://ror.org/a> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#NamedIndividual> .\n";
        let summary = summarize(&parse_ntriples(nt).expect("valid n-triples"));
        assert_eq!(summary.named_individuals, 1);
    }
}
