//! Input records as published in the registry data dump.
//!
//! Only the fields the mapping reads are modelled; everything else in the
//! JSON is ignored. Text fields decode through [`Text`], which keeps a
//! `null` or wrongly typed value instead of failing, so that it surfaces as
//! a literal failure for that single fact and not as a decode failure for
//! the whole dump.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Record {
    /// Globally unique identifier, used verbatim as the entity IRI.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Text,
    /// Postal addresses, in source order.
    #[serde(default, deserialize_with = "nullable")]
    pub addresses: Vec<Address>,
    /// Links to other organizations.
    #[serde(default, deserialize_with = "nullable")]
    pub relationships: Vec<Relationship>,
    /// Alternative names.
    #[serde(default, deserialize_with = "nullable")]
    pub aliases: Vec<Text>,
    /// Acronyms and abbreviations.
    #[serde(default, deserialize_with = "nullable")]
    pub acronyms: Vec<Text>,
    /// Identifiers in other schemes, keyed by scheme prefix.
    #[serde(default, deserialize_with = "nullable")]
    pub external_ids: BTreeMap<String, ExternalIds>,
}

/// An address; only the nested city is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Address {
    /// GeoNames city descriptor, when the address has one.
    #[serde(default)]
    pub geonames_city: Option<City>,
}

/// A GeoNames city.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct City {
    /// GeoNames numeric identifier.
    pub id: GeonamesId,
    /// City display name.
    #[serde(default)]
    pub city: Text,
}

/// A GeoNames identifier. Older dumps carry it as a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GeonamesId {
    /// Numeric form.
    Number(u64),
    /// Textual form.
    Text(String),
}

impl fmt::Display for GeonamesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeonamesId::Number(n) => write!(f, "{n}"),
            GeonamesId::Text(s) => f.write_str(s.trim()),
        }
    }
}

/// A typed link to another organization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Relationship {
    /// Relationship label (`Related`, `Child`, `Parent`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Identifier of the target organization.
    pub id: String,
}

/// All identifiers of one external scheme.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExternalIds {
    /// Every identifier; collapses to a bare string for a single value.
    #[serde(default)]
    pub all: Identifiers,
}

/// A text field as found in the dump.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Text {
    /// A JSON string.
    String(String),
    /// Any other JSON value, `null` included.
    Other(Value),
}

impl Default for Text {
    fn default() -> Self {
        Text::Other(Value::Null)
    }
}

impl Text {
    /// The string, if the field held one.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Text::String(s) => Some(s),
            Text::Other(_) => None,
        }
    }

    /// Whether the field was `null` or absent.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Text::Other(Value::Null))
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Text::String(s) => f.write_str(s),
            Text::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text::String(s.to_owned())
    }
}

impl From<Option<&str>> for Text {
    fn from(s: Option<&str>) -> Self {
        s.map_or_else(Text::default, Text::from)
    }
}

/// One identifier or a list of them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Identifiers {
    /// A bare string.
    One(String),
    /// A list, possibly with items that are not strings.
    Many(Vec<Text>),
    /// Anything else; `null` counts as no identifiers.
    Other(Value),
}

impl Default for Identifiers {
    fn default() -> Self {
        Identifiers::Many(Vec::new())
    }
}

impl Identifiers {
    /// Iterates the string identifiers, treating a bare string as a
    /// singleton.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let one = match self {
            Identifiers::One(one) => Some(one.as_str()),
            _ => None,
        };
        one.into_iter().chain(self.items().iter().filter_map(Text::as_str))
    }

    /// Values that are not strings and therefore cannot be identifiers.
    pub fn rejected(&self) -> impl Iterator<Item = &Value> {
        let other = match self {
            Identifiers::Other(value) if !value.is_null() => Some(value),
            _ => None,
        };
        self.items()
            .iter()
            .filter_map(|item| match item {
                Text::Other(value) => Some(value),
                Text::String(_) => None,
            })
            .chain(other)
    }

    fn items(&self) -> &[Text] {
        match self {
            Identifiers::Many(many) => many.as_slice(),
            _ => &[],
        }
    }
}

impl From<Vec<&str>> for Identifiers {
    fn from(values: Vec<&str>) -> Self {
        Identifiers::Many(values.into_iter().map(Text::from).collect())
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_example_record() {
        let record: Record = serde_json::from_str(
            r#"{
                "id": "https://ror.org/0abc1def2",
                "name": "Test University",
                "status": "active",
                "addresses": [{"geonames_city": {"id": 123, "city": "Testville"}}],
                "aliases": ["TU"],
                "external_ids": {"ISNI": {"preferred": null, "all": "0000 0001 2345 6789"}}
            }"#,
        )
        .expect("decodes");
        assert_eq!(record.name.as_str(), Some("Test University"));
        let city = record.addresses[0].geonames_city.as_ref().expect("city");
        assert_eq!(city.id.to_string(), "123");
        assert!(record.relationships.is_empty());
        let isni: Vec<&str> = record.external_ids["ISNI"].all.iter().collect();
        assert_eq!(isni, vec!["0000 0001 2345 6789"]);
    }

    #[test]
    fn tolerates_nulls() {
        let record: Record = serde_json::from_str(
            r#"{"id": "https://ror.org/x", "name": null, "aliases": [null, "A"],
                "acronyms": null, "addresses": [{"geonames_city": null}]}"#,
        )
        .expect("decodes");
        assert!(record.name.is_null());
        assert_eq!(record.aliases, vec![Text::default(), Text::from("A")]);
        assert!(record.acronyms.is_empty());
        assert_eq!(record.addresses[0].geonames_city, None);
    }

    #[test]
    fn keeps_wrongly_typed_text() {
        let record: Record = serde_json::from_str(
            r#"{"id": "https://ror.org/x", "name": 7, "aliases": [42, "A"],
                "addresses": [{"geonames_city": {"id": 1, "city": ["Town"]}}]}"#,
        )
        .expect("decodes");
        assert_eq!(record.name.as_str(), None);
        assert!(!record.name.is_null());
        assert_eq!(record.name.to_string(), "7");
        assert_eq!(record.aliases[0].to_string(), "42");
        let city = record.addresses[0].geonames_city.as_ref().expect("city");
        assert_eq!(city.city.to_string(), r#"["Town"]"#);
    }

    #[test]
    fn separates_identifiers_from_rejected_values() {
        let ext: ExternalIds =
            serde_json::from_str(r#"{"all": ["Q1", null, 5, "Q2"]}"#).expect("decodes");
        assert_eq!(ext.all.iter().collect::<Vec<_>>(), vec!["Q1", "Q2"]);
        let rejected: Vec<String> = ext.all.rejected().map(Value::to_string).collect();
        assert_eq!(rejected, vec!["null", "5"]);

        let missing: ExternalIds = serde_json::from_str(r#"{"all": null}"#).expect("decodes");
        assert_eq!(missing.all.iter().count(), 0);
        assert_eq!(missing.all.rejected().count(), 0);

        let scalar: ExternalIds = serde_json::from_str(r#"{"all": 12}"#).expect("decodes");
        assert_eq!(scalar.all.rejected().map(Value::to_string).collect::<Vec<_>>(), vec!["12"]);
    }

    #[test]
    fn relationship_type_field_is_renamed() {
        let rel: Relationship =
            serde_json::from_str(r#"{"type": "Parent", "id": "https://ror.org/p", "label": "P"}"#)
                .expect("decodes");
        assert_eq!(rel.kind, "Parent");
    }
}
