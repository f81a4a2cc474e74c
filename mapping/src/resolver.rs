//! Resolution of external identifiers to canonical `prefix:identifier`
//! cross-references.
//!
//! A [`PrefixRegistry`] maps the scheme names used by the registry (in any
//! casing or punctuation) to canonical prefixes. The [`IdentifierResolver`]
//! applies it per record and remembers which unknown schemes it has already
//! seen, so each one is reported once per run.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::record::Identifiers;

/// Canonical prefixes and the synonyms that resolve to them.
const KNOWN_PREFIXES: &[(&str, &[&str])] = &[
    ("grid", &["GRID"]),
    ("isni", &["ISNI"]),
    ("wikidata", &["Wikidata", "WD"]),
    ("crossref.funder", &["FundRef", "crossref_funder"]),
    ("ror", &["ROR"]),
    ("orcid", &["ORCID"]),
    ("ringgold", &["Ringgold"]),
];

/// The prefix whose identifiers are Wikipedia page ids, skipped on purpose.
pub const WIKIPEDIA_PAGE_PREFIX: &str = "OrgRef";

/// Outcome of a registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The scheme is known under this canonical prefix.
    Canonical(&'a str),
    /// The scheme is deliberately not resolved.
    Excluded,
    /// The scheme is not in the registry.
    Unknown,
}

/// Known-scheme registry. Immutable once built.
#[derive(Debug, Clone)]
pub struct PrefixRegistry {
    canonical: HashMap<String, String>,
    excluded: HashSet<String>,
}

impl Default for PrefixRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl PrefixRegistry {
    /// The built-in registry, with the Wikipedia page-id scheme excluded.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self {
            canonical: HashMap::new(),
            excluded: HashSet::new(),
        };
        for &(canonical, synonyms) in KNOWN_PREFIXES {
            registry = registry.with_synonym(canonical, canonical);
            for synonym in synonyms {
                registry = registry.with_synonym(*synonym, canonical);
            }
        }
        registry.with_excluded(WIKIPEDIA_PAGE_PREFIX)
    }

    /// A registry with no exclusions.
    #[must_use]
    pub fn without_exclusions(mut self) -> Self {
        self.excluded.clear();
        self
    }

    /// Registers `synonym` as resolving to `canonical`.
    #[must_use]
    pub fn with_synonym(mut self, synonym: &str, canonical: &str) -> Self {
        self.canonical
            .insert(normalize_key(synonym), canonical.to_owned());
        self
    }

    /// Marks a prefix as deliberately skipped.
    #[must_use]
    pub fn with_excluded(mut self, prefix: &str) -> Self {
        self.excluded.insert(normalize_key(prefix));
        self
    }

    /// Looks `prefix` up. Exclusion wins over registry presence.
    #[must_use]
    pub fn lookup(&self, prefix: &str) -> Lookup<'_> {
        let key = normalize_key(prefix);
        if self.excluded.contains(&key) {
            return Lookup::Excluded;
        }
        self.canonical
            .get(&key)
            .map_or(Lookup::Unknown, |c| Lookup::Canonical(c))
    }
}

/// Lowercase with `.`, `-`, `_`, `/` and whitespace removed.
fn normalize_key(prefix: &str) -> String {
    prefix
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '_' | '/') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Result of resolving one scheme of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Canonical references, one per non-empty identifier, in source order.
    Resolved(Vec<String>),
    /// The scheme is excluded; nothing is emitted and nothing is reported.
    Skipped,
    /// The scheme is unknown. `first_occurrence` is true the first time
    /// this prefix is seen in the run.
    Unresolved {
        /// Whether this is the first record using the prefix.
        first_occurrence: bool,
    },
}

/// Resolves identifiers against a [`PrefixRegistry`], tracking unknown
/// prefixes for the lifetime of a run.
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    registry: PrefixRegistry,
    unhandled: BTreeSet<String>,
}

impl IdentifierResolver {
    /// Creates a resolver with an empty unhandled set.
    #[must_use]
    pub fn new(registry: PrefixRegistry) -> Self {
        Self {
            registry,
            unhandled: BTreeSet::new(),
        }
    }

    /// Resolves the identifiers of one scheme.
    pub fn resolve(&mut self, prefix: &str, identifiers: &Identifiers) -> Resolution {
        match self.registry.lookup(prefix) {
            Lookup::Excluded => Resolution::Skipped,
            Lookup::Unknown => Resolution::Unresolved {
                first_occurrence: self.unhandled.insert(prefix.to_owned()),
            },
            Lookup::Canonical(canonical) => Resolution::Resolved(
                identifiers
                    .iter()
                    .map(strip_whitespace)
                    .filter(|id| !id.is_empty())
                    .map(|id| format!("{canonical}:{id}"))
                    .collect(),
            ),
        }
    }

    /// Unknown prefixes seen so far, sorted.
    pub fn unhandled_prefixes(&self) -> impl Iterator<Item = &str> {
        self.unhandled.iter().map(String::as_str)
    }
}

fn strip_whitespace(id: &str) -> String {
    id.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn resolver() -> IdentifierResolver {
        IdentifierResolver::new(PrefixRegistry::standard())
    }

    #[test]
    fn strips_whitespace_and_normalizes_prefix() {
        let ids = Identifiers::One("0000 0001 2345 6789".to_owned());
        assert_eq!(
            resolver().resolve("ISNI", &ids),
            Resolution::Resolved(vec!["isni:0000000123456789".to_owned()])
        );
    }

    #[test]
    fn synonyms_resolve_to_canonical_prefix() {
        let ids = Identifiers::from(vec!["501100000780"]);
        assert_eq!(
            resolver().resolve("FundRef", &ids),
            Resolution::Resolved(vec!["crossref.funder:501100000780".to_owned()])
        );
    }

    #[test]
    fn repeated_values_are_not_deduplicated() {
        let ids = Identifiers::from(vec!["Q1", "Q1"]);
        let Resolution::Resolved(curies) = resolver().resolve("Wikidata", &ids) else {
            unreachable!("Wikidata is a known prefix");
        };
        assert_eq!(curies, vec!["wikidata:Q1", "wikidata:Q1"]);
    }

    #[test]
    fn page_id_scheme_is_skipped_even_if_registered() {
        let registry = PrefixRegistry::standard().with_synonym("OrgRef", "wikipedia");
        let mut resolver = IdentifierResolver::new(registry);
        let ids = Identifiers::from(vec!["12345"]);
        assert_eq!(resolver.resolve("OrgRef", &ids), Resolution::Skipped);
        assert_eq!(resolver.unhandled_prefixes().count(), 0);
    }

    #[test]
    fn unknown_prefix_is_first_occurrence_once() {
        let mut resolver = resolver();
        let ids = Identifiers::from(vec!["X1", "X2"]);
        assert_eq!(
            resolver.resolve("FooBarBaz", &ids),
            Resolution::Unresolved {
                first_occurrence: true
            }
        );
        assert_eq!(
            resolver.resolve("FooBarBaz", &ids),
            Resolution::Unresolved {
                first_occurrence: false
            }
        );
        assert_eq!(resolver.unhandled_prefixes().collect::<Vec<_>>(), vec!["FooBarBaz"]);
    }

    #[test]
    fn lookup_ignores_case_and_punctuation() {
        let registry = PrefixRegistry::standard();
        assert_eq!(registry.lookup("crossref-funder"), Lookup::Canonical("crossref.funder"));
        assert_eq!(registry.lookup("grid"), Lookup::Canonical("grid"));
        assert_eq!(registry.lookup("orgref"), Lookup::Excluded);
        assert_eq!(registry.lookup("UKPRN"), Lookup::Unknown);
    }

    proptest! {
        #[test]
        fn resolved_ids_never_contain_whitespace(raw in "[0-9 \t]{1,24}") {
            let ids = Identifiers::One(raw.clone());
            match resolver().resolve("ISNI", &ids) {
                Resolution::Resolved(curies) => {
                    for curie in &curies {
                        prop_assert!(curie.starts_with("isni:"));
                        prop_assert!(!curie.chars().any(char::is_whitespace));
                    }
                    prop_assert_eq!(curies.len(), usize::from(raw.trim().chars().any(|c| !c.is_whitespace())));
                }
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
