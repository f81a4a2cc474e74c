//! Recoverable mapping failures: kinds, individual diagnostics, and the
//! per-run collection.
//!
//! Every diagnostic is logged as soon as it is reported and kept for the
//! end-of-run summary. Nothing here ever stops the run.

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

/// Category of a recoverable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticKind {
    /// A record or relationship identifier is not a valid IRI.
    InvalidIri,
    /// A name, city, synonym or cross-reference cannot be encoded as a literal.
    InvalidLiteral,
    /// An external identifier scheme is not in the prefix registry.
    UnhandledPrefix,
    /// A relationship label is outside the fixed vocabulary.
    UnknownRelationship,
}

impl DiagnosticKind {
    /// Short stable name used in summaries.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::InvalidIri => "invalid-iri",
            DiagnosticKind::InvalidLiteral => "invalid-literal",
            DiagnosticKind::UnhandledPrefix => "unhandled-prefix",
            DiagnosticKind::UnknownRelationship => "unknown-relationship",
        }
    }
}

/// A single recoverable failure with enough context for manual follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Identifier of the organization being mapped.
    pub entity: String,
    /// Source field (`name`, `city`, `aliases`, `external_ids.ISNI`, ...).
    pub field: String,
    /// The offending value as found in the record.
    pub value: String,
    /// Why the value was rejected.
    pub reason: String,
    /// Additional detail lines.
    pub details: Vec<String>,
}

impl Diagnostic {
    /// A value that could not become a literal.
    pub fn invalid_literal(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: Option<&str>,
        reason: impl fmt::Display,
    ) -> Self {
        Self::new(DiagnosticKind::InvalidLiteral, entity, field, value, reason)
    }

    /// A value that could not become an IRI.
    pub fn invalid_iri(
        entity: impl Into<String>,
        field: impl Into<String>,
        value: &str,
        reason: impl fmt::Display,
    ) -> Self {
        Self::new(DiagnosticKind::InvalidIri, entity, field, Some(value), reason)
    }

    /// An identifier scheme missing from the registry, with every raw value
    /// the record carried for it.
    pub fn unhandled_prefix<'a>(
        entity: impl Into<String>,
        prefix: &str,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut d = Self::new(
            DiagnosticKind::UnhandledPrefix,
            entity,
            format!("external_ids.{prefix}"),
            Some(prefix),
            "prefix not in registry",
        );
        d.details = values.into_iter().map(str::to_owned).collect();
        d
    }

    /// A relationship label outside the fixed vocabulary.
    pub fn unknown_relationship(entity: impl Into<String>, label: &str, target: &str) -> Self {
        let mut d = Self::new(
            DiagnosticKind::UnknownRelationship,
            entity,
            "relationships",
            Some(label),
            "relationship type not recognized",
        );
        d.details = vec![format!("target: {target}")];
        d
    }

    fn new(
        kind: DiagnosticKind,
        entity: impl Into<String>,
        field: impl Into<String>,
        value: Option<&str>,
        reason: impl fmt::Display,
    ) -> Self {
        Self {
            kind,
            entity: entity.into(),
            field: field.into(),
            value: value.map_or_else(|| "null".to_owned(), str::to_owned),
            reason: reason.to_string(),
            details: Vec::new(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} in {}: {:?} ({})",
            self.entity,
            self.kind.as_str(),
            self.field,
            self.value,
            self.reason
        )?;
        for line in &self.details {
            write!(f, "\n  - {line}")?;
        }
        Ok(())
    }
}

/// All diagnostics of one run, in report order.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs and records a diagnostic.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        warn!(
            kind = diagnostic.kind.as_str(),
            entity = %diagnostic.entity,
            "{diagnostic}"
        );
        self.entries.push(diagnostic);
    }

    /// All diagnostics in report order.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostics of one kind.
    pub fn of_kind(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(move |d| d.kind == kind)
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count per kind, in kind order.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<DiagnosticKind, usize> {
        let mut counts = BTreeMap::new();
        for d in &self.entries {
            *counts.entry(d.kind).or_insert(0) += 1;
        }
        counts
    }

    /// One-line summary such as `invalid-literal=2, unhandled-prefix=1`.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.entries.is_empty() {
            return "no diagnostics".to_owned();
        }
        self.counts()
            .into_iter()
            .map(|(kind, n)| format!("{}={n}", kind.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
