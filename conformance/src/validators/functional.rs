//! OWL 2 functional-syntax validator.
//!
//! Re-reads `rorio.ofn` with a small tokenizer and expression parser, then
//! checks that the document has exactly one `Ontology(..)` block, that every
//! abbreviated IRI uses a declared prefix, and that every axiom has the shape
//! the generator emits. The per-kind axiom counts are returned for the
//! cross-format comparison in [`super::rdf`].

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::report::{CheckResult, ConformanceReport};

/// File name of the primary artifact.
pub const FILE: &str = "rorio.ofn";

const VALIDATOR: &str = "artifact/functional";

/// A syntax error, with the 1-based line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    /// Line number.
    pub line: usize,
    /// What is wrong.
    pub message: String,
}

/// Counts gathered from a functional-syntax document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionalSummary {
    /// The ontology IRI.
    pub ontology_iri: String,
    /// `Prefix(..)` bindings.
    pub prefixes: usize,
    /// Header `Annotation(..)`s.
    pub header_annotations: usize,
    /// The `owl:versionInfo` header value, if present.
    pub version_info: Option<String>,
    /// `Declaration(NamedIndividual(..))`.
    pub named_individuals: usize,
    /// Declarations of classes and properties.
    pub other_declarations: usize,
    /// `ClassAssertion(..)`.
    pub class_assertions: usize,
    /// `ObjectPropertyAssertion(..)`.
    pub object_property_assertions: usize,
    /// `AnnotationAssertion(..)`.
    pub annotation_assertions: usize,
}

impl FunctionalSummary {
    /// Number of axioms inside the ontology block, header excluded.
    #[must_use]
    pub fn axioms(&self) -> usize {
        self.named_individuals
            + self.other_declarations
            + self.class_assertions
            + self.object_property_assertions
            + self.annotation_assertions
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Open,
    Close,
    Name(String),
    Iri(String),
    Literal(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Expr {
    Atom { token: Token, line: usize },
    Call { name: String, args: Vec<Expr>, line: usize },
}

impl Expr {
    fn line(&self) -> usize {
        match self {
            Expr::Atom { line, .. } | Expr::Call { line, .. } => *line,
        }
    }
}

fn error(line: usize, message: impl Into<String>) -> SyntaxError {
    SyntaxError {
        line,
        message: message.into(),
    }
}

fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => line += 1,
            c if c.is_whitespace() => {}
            '(' => tokens.push((line, Token::Open)),
            ')' => tokens.push((line, Token::Close)),
            '<' => {
                let start = line;
                let mut iri = String::new();
                loop {
                    match chars.next() {
                        Some('>') => break,
                        Some(c) if c.is_whitespace() => {
                            return Err(error(line, "whitespace inside IRI"))
                        }
                        Some(c) => iri.push(c),
                        None => return Err(error(start, "unterminated IRI")),
                    }
                }
                tokens.push((start, Token::Iri(iri)));
            }
            '"' => {
                let start = line;
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('"' | '\\')) => literal.push(c),
                            Some(c) => return Err(error(line, format!("invalid escape \\{c}"))),
                            None => return Err(error(start, "unterminated literal")),
                        },
                        Some(c) => {
                            if c == '\n' {
                                line += 1;
                            }
                            literal.push(c);
                        }
                        None => return Err(error(start, "unterminated literal")),
                    }
                }
                tokens.push((start, Token::Literal(literal)));
            }
            c => {
                let mut name = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_whitespace() || matches!(next, '(' | ')' | '<' | '"') {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }
                tokens.push((line, Token::Name(name)));
            }
        }
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.pos)
    }

    // Parses expressions until a closing parenthesis (left unconsumed) or
    // the end of input.
    fn exprs(&mut self) -> Result<Vec<Expr>, SyntaxError> {
        let mut out = Vec::new();
        while let Some((line, token)) = self.peek().cloned() {
            match token {
                Token::Close => break,
                Token::Open => return Err(error(line, "parenthesis without a name")),
                Token::Name(name) if matches!(self.tokens.get(self.pos + 1), Some((_, Token::Open))) => {
                    self.pos += 2;
                    let args = self.exprs()?;
                    match self.peek() {
                        Some((_, Token::Close)) => self.pos += 1,
                        _ => return Err(error(line, format!("unclosed {name}("))),
                    }
                    out.push(Expr::Call { name, args, line });
                }
                token => {
                    self.pos += 1;
                    out.push(Expr::Atom { token, line });
                }
            }
        }
        Ok(out)
    }
}

fn parse(text: &str) -> Result<Vec<Expr>, SyntaxError> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
    };
    let exprs = parser.exprs()?;
    if let Some((line, _)) = parser.peek() {
        return Err(error(*line, "unbalanced closing parenthesis"));
    }
    Ok(exprs)
}

/// Parses a functional-syntax document and counts its axioms.
///
/// # Errors
///
/// Returns [`SyntaxError`] if the text is not a single well-formed ontology
/// document of the shape the generator writes.
pub fn summarize(text: &str) -> Result<FunctionalSummary, SyntaxError> {
    let mut summary = FunctionalSummary::default();
    let mut prefixes = BTreeSet::new();
    let mut ontology = None;

    for expr in parse(text)? {
        match expr {
            Expr::Call { name, args, line } if name == "Prefix" => match args.as_slice() {
                [Expr::Atom {
                    token: Token::Name(binding),
                    ..
                }, Expr::Atom {
                    token: Token::Iri(_),
                    ..
                }] => {
                    let prefix = binding
                        .strip_suffix(":=")
                        .ok_or_else(|| error(line, format!("malformed prefix binding {binding}")))?;
                    prefixes.insert(prefix.to_owned());
                    summary.prefixes += 1;
                }
                _ => return Err(error(line, "malformed Prefix(..)")),
            },
            Expr::Call { name, args, line } if name == "Ontology" => {
                if ontology.is_some() {
                    return Err(error(line, "second Ontology(..) block"));
                }
                ontology = Some(args);
            }
            other => return Err(error(other.line(), "expected Prefix(..) or Ontology(..)")),
        }
    }

    let body = ontology.ok_or_else(|| error(1, "no Ontology(..) block"))?;
    let mut body = body.into_iter();
    match body.next() {
        Some(Expr::Atom {
            token: Token::Iri(iri),
            ..
        }) => summary.ontology_iri = iri,
        _ => return Err(error(1, "Ontology(..) does not start with an IRI")),
    }
    for expr in body {
        count_axiom(&expr, &prefixes, &mut summary)?;
    }
    Ok(summary)
}

fn count_axiom(
    expr: &Expr,
    prefixes: &BTreeSet<String>,
    summary: &mut FunctionalSummary,
) -> Result<(), SyntaxError> {
    let Expr::Call { name, args, line } = expr else {
        return Err(error(expr.line(), "expected an axiom"));
    };
    let line = *line;
    match (name.as_str(), args.as_slice()) {
        ("Annotation", [property, value]) => {
            let property = entity(property, prefixes)?;
            value_of(value, prefixes)?;
            summary.header_annotations += 1;
            if property == "owl:versionInfo" {
                if let Expr::Atom {
                    token: Token::Literal(v),
                    ..
                } = value
                {
                    summary.version_info = Some(v.clone());
                }
            }
        }
        ("Declaration", [Expr::Call { name: kind, args, .. }]) => {
            let [declared] = args.as_slice() else {
                return Err(error(line, "declaration of more than one entity"));
            };
            entity(declared, prefixes)?;
            match kind.as_str() {
                "NamedIndividual" => summary.named_individuals += 1,
                "Class" | "ObjectProperty" | "AnnotationProperty" => summary.other_declarations += 1,
                other => return Err(error(line, format!("unexpected entity kind {other}"))),
            }
        }
        ("ClassAssertion", [class, individual]) => {
            entity(class, prefixes)?;
            entity(individual, prefixes)?;
            summary.class_assertions += 1;
        }
        ("ObjectPropertyAssertion", [property, subject, object]) => {
            for e in [property, subject, object] {
                entity(e, prefixes)?;
            }
            summary.object_property_assertions += 1;
        }
        ("AnnotationAssertion", [property, subject, value]) => {
            entity(property, prefixes)?;
            entity(subject, prefixes)?;
            value_of(value, prefixes)?;
            summary.annotation_assertions += 1;
        }
        (other, args) => {
            return Err(error(
                line,
                format!("unexpected {other}(..) with {} arguments", args.len()),
            ))
        }
    }
    Ok(())
}

// Returns the entity as written: `prefix:local` or the full IRI.
fn entity<'a>(expr: &'a Expr, prefixes: &BTreeSet<String>) -> Result<&'a str, SyntaxError> {
    match expr {
        Expr::Atom {
            token: Token::Iri(iri),
            ..
        } => Ok(iri.as_str()),
        Expr::Atom {
            token: Token::Name(name),
            line,
        } => match name.split_once(':') {
            Some((prefix, local)) if prefixes.contains(prefix) && !local.is_empty() => {
                Ok(name.as_str())
            }
            _ => Err(error(*line, format!("undeclared prefix in {name}"))),
        },
        other => Err(error(other.line(), "expected an IRI")),
    }
}

fn value_of(expr: &Expr, prefixes: &BTreeSet<String>) -> Result<(), SyntaxError> {
    match expr {
        Expr::Atom {
            token: Token::Literal(_),
            ..
        } => Ok(()),
        other => entity(other, prefixes).map(drop),
    }
}

/// Checks `rorio.ofn` in `artifacts` and returns its summary when it parses.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn inspect(artifacts: &Path) -> Result<(ConformanceReport, Option<FunctionalSummary>)> {
    let mut report = ConformanceReport::new();
    let path = artifacts.join(FILE);
    if !path.exists() {
        report.push(CheckResult::fail(VALIDATOR, format!("{FILE} not found")));
        return Ok((report, None));
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let summary = match summarize(&text) {
        Ok(summary) => summary,
        Err(e) => {
            report.push(CheckResult::fail_with_details(
                VALIDATOR,
                format!("{FILE} does not parse"),
                vec![e.to_string()],
            ));
            return Ok((report, None));
        }
    };
    report.push(CheckResult::pass(
        VALIDATOR,
        format!(
            "{FILE} parses: {} prefixes, {} axioms, {} named individuals",
            summary.prefixes,
            summary.axioms(),
            summary.named_individuals
        ),
    ));

    match &summary.version_info {
        Some(version) => report.push(CheckResult::pass(
            VALIDATOR,
            format!("ontology header carries version {version}"),
        )),
        None => report.push(CheckResult::fail(
            VALIDATOR,
            "ontology header has no owl:versionInfo",
        )),
    }
    if summary.class_assertions > summary.named_individuals {
        report.push(CheckResult::fail(
            VALIDATOR,
            format!(
                "{} class assertions for {} declared individuals",
                summary.class_assertions, summary.named_individuals
            ),
        ));
    }
    Ok((report, Some(summary)))
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    const DOC: &str = r#"Prefix(rdfs:=<http://www.w3.org/2000/01/rdf-schema#>)
Prefix(owl:=<http://www.w3.org/2002/07/owl#>)
Prefix(ror:=<https://ror.org/>)
Prefix(OBI:=<http://purl.obolibrary.org/obo/OBI_>)

Ontology(<https://w3id.org/rorio/rorio.owl>
Annotation(owl:versionInfo "v1")

Declaration(Class(OBI:0000245))
Declaration(NamedIndividual(ror:0abc1def2))
AnnotationAssertion(rdfs:label ror:0abc1def2 "Say \"hi\" (\\o/)")
ClassAssertion(OBI:0000245 ror:0abc1def2)
AnnotationAssertion(rdfs:seeAlso ror:0abc1def2 <https://ror.org/a/b>)
)
"#;

    #[test]
    fn counts_axioms_by_kind() {
        let summary = summarize(DOC).expect("parses");
        assert_eq!(summary.ontology_iri, "https://w3id.org/rorio/rorio.owl");
        assert_eq!(summary.prefixes, 4);
        assert_eq!(summary.version_info.as_deref(), Some("v1"));
        assert_eq!(summary.named_individuals, 1);
        assert_eq!(summary.other_declarations, 1);
        assert_eq!(summary.class_assertions, 1);
        assert_eq!(summary.annotation_assertions, 2);
        assert_eq!(summary.axioms(), 5);
    }

    #[test]
    fn literal_escapes_are_decoded() {
        let tokens = tokenize(r#""a \"b\" \\c""#).expect("tokenizes");
        assert_eq!(tokens, vec![(1, Token::Literal(r#"a "b" \c"#.to_owned()))]);
    }

    #[test]
    fn rejects_undeclared_prefix() {
        let doc = DOC.replace("ClassAssertion(OBI:0000245", "ClassAssertion(ENVO:00000856");
        let err = summarize(&doc).expect_err("ENVO is not bound");
        assert_eq!(err.line, 12);
    }

    #[test]
    fn rejects_unbalanced_parentheses() {
        let err = summarize(&DOC.replace(")\n", "\n")).expect_err("unclosed");
        assert!(err.message.contains("unclosed"), "{err}");
        assert!(summarize(&format!("{DOC})")).is_err());
    }

    #[test]
    fn rejects_unterminated_literal() {
        let err = summarize("Ontology(<https://w3id.org/o>\nAnnotation(owl:versionInfo \"v1)\n)")
            .expect_err("unterminated");
        assert_eq!(err, error(2, "unterminated literal"));
    }
}
