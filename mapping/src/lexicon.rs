//! Lexical entries collected alongside the ontology: one per organization
//! name and one per synonym, for downstream name lookup.

use std::fmt::Write as _;

/// Whether a term is the primary name or a synonym.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermStatus {
    /// The organization's display name.
    Name,
    /// An alias or acronym.
    Synonym,
}

impl TermStatus {
    /// Lowercase name used in the tab-separated export.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TermStatus::Name => "name",
            TermStatus::Synonym => "synonym",
        }
    }
}

/// One term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexicalEntry {
    /// The term as written.
    pub term: String,
    /// Lowercased, whitespace-collapsed form.
    pub normalized: String,
    /// Identifier of the owning organization.
    pub entity: String,
    /// Label of the owning organization.
    pub label: String,
    /// Name or synonym.
    pub status: TermStatus,
}

/// Side list of lexical entries; not part of the ontology.
#[derive(Debug, Default, Clone)]
pub struct Lexicon {
    entries: Vec<LexicalEntry>,
}

impl Lexicon {
    /// Creates an empty lexicon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry for `term` owned by `entity`.
    pub fn add(&mut self, term: &str, entity: &str, label: &str, status: TermStatus) {
        self.entries.push(LexicalEntry {
            term: term.to_owned(),
            normalized: normalize_term(term),
            entity: entity.to_owned(),
            label: label.to_owned(),
            status,
        });
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[LexicalEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tab-separated export: term, normalized, entity, label, status.
    /// Tabs and line breaks inside fields are replaced by spaces.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        let mut out = String::from("term\tnorm_text\tid\tentry_name\tstatus\n");
        for e in &self.entries {
            let _ = writeln!(
                out,
                "{}\t{}\t{}\t{}\t{}",
                tsv_field(&e.term),
                tsv_field(&e.normalized),
                tsv_field(&e.entity),
                tsv_field(&e.label),
                e.status.as_str()
            );
        }
        out
    }
}

fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn tsv_field(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}
