//! Attributes attached to map primitives and regulatory elements.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reserved attribute names.
pub mod name {
    /// The kind of primitive, e.g. `regulatory_element`.
    pub const TYPE: &str = "type";
    /// The specific kind within a type, e.g. `bus_stop`.
    pub const SUBTYPE: &str = "subtype";
}

/// Reserved attribute values.
pub mod value {
    /// The `type` of every regulatory element.
    pub const REGULATORY_ELEMENT: &str = "regulatory_element";
}

/// A single attribute value.
///
/// Values are stored as strings, as they appear in map files,
/// and converted to typed values on access.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct AttributeValue(String);

impl AttributeValue {
    /// Creates a new attribute value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Gets the raw string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets the value as a boolean (`true`/`false`, `yes`/`no`, `1`/`0`).
    pub fn as_bool(&self) -> Option<bool> {
        match self.0.as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }

    /// Interprets the value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        self.0.parse().ok()
    }

    /// Interprets the value as a floating point number.
    pub fn as_double(&self) -> Option<f64> {
        self.0.parse().ok()
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::new(if value { "yes" } else { "no" })
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A mapping from attribute name to value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct AttributeMap(BTreeMap<String, AttributeValue>);

impl AttributeMap {
    /// Creates an empty attribute map.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets the value of an attribute.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Sets an attribute, returning the previous value if there was one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Removes an attribute, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    /// Returns true if the attribute is set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Gets the `type` attribute.
    pub fn type_(&self) -> Option<&str> {
        self.get(name::TYPE).map(AttributeValue::as_str)
    }

    /// Gets the `subtype` attribute.
    pub fn subtype(&self) -> Option<&str> {
        self.get(name::SUBTYPE).map(AttributeValue::as_str)
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the attributes in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn typed_access() {
        let attrs: AttributeMap = [("width", "2.5"), ("count", "3"), ("one_way", "yes")]
            .into_iter()
            .collect();

        assert_eq!(attrs.get("width").and_then(AttributeValue::as_double), Some(2.5));
        assert_eq!(attrs.get("count").and_then(AttributeValue::as_int), Some(3));
        assert_eq!(attrs.get("one_way").and_then(AttributeValue::as_bool), Some(true));
        assert_eq!(attrs.get("width").and_then(AttributeValue::as_bool), None);
        assert!(attrs.get("missing").is_none());
    }

    #[test]
    fn insert_overwrites() {
        let mut attrs = AttributeMap::new();
        assert!(attrs.insert(name::SUBTYPE, "stop_sign").is_none());
        let old = attrs.insert(name::SUBTYPE, "bus_stop");
        assert_eq!(old.as_ref().map(AttributeValue::as_str), Some("stop_sign"));
        assert_eq!(attrs.subtype(), Some("bus_stop"));
        assert_eq!(attrs.len(), 1);
    }
}
