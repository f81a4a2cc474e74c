//! Fixed corrections for organization and city names that the registry
//! publishes in a form unsuitable for labels.

use std::collections::HashMap;

const CORRECTIONS: &[(&str, &str)] = &[
    ("'s-Hertogenbosch", "Den Bosch"),
    ("'s Heeren Loo", "s Heeren Loo"),
    ("Institut Virion\\Serion", "Institut Virion/Serion"),
    ("Hematology\\Oncology Clinic", "Hematology/Oncology Clinic"),
];

/// Whole-name replacement table, built once per run.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    corrections: HashMap<String, String>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::standard()
    }
}

impl NameNormalizer {
    /// The built-in correction table.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            corrections: CORRECTIONS
                .iter()
                .map(|&(from, to)| (from.to_owned(), to.to_owned()))
                .collect(),
        }
    }

    /// Adds or overrides corrections.
    #[must_use]
    pub fn with_corrections<I, K, V>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.corrections
            .extend(extra.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Returns the replacement for `name`, or `name` itself.
    #[must_use]
    pub fn normalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.corrections.get(name).map_or(name, String::as_str)
    }

    /// Number of entries in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.corrections.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty()
    }
}
