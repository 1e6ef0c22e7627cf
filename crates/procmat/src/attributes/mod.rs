//! Attribute maps and material descriptors
//!
//! The generation engine reports one opaque attribute map per produced
//! element. [`AttributeMap`] is that boundary abstraction: a typed key/value
//! store with scalar, string, color, and boolean accessors (array-valued
//! lookups included). [`MaterialDescriptor`] is the canonicalized,
//! comparable form the rest of the pipeline works with.

pub mod descriptor;

pub use descriptor::MaterialDescriptor;

use std::collections::BTreeMap;

use crate::foundation::math::LinearColor;

/// A single typed attribute value reported by the generation engine
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// String value (paths, shader names, mode hints)
    String(String),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Linear color value
    Color(LinearColor),
    /// Array of strings
    StringArray(Vec<String>),
    /// Array of floats
    FloatArray(Vec<f64>),
    /// Array of booleans
    BoolArray(Vec<bool>),
}

/// Opaque per-element attribute map with typed accessors
///
/// Absent keys are never an error; every accessor returns `None` and the
/// descriptor builder substitutes defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    values: BTreeMap<String, AttributeValue>,
}

impl AttributeMap {
    /// Create an empty attribute map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an attribute
    pub fn insert(&mut self, key: impl Into<String>, value: AttributeValue) {
        self.values.insert(key.into(), value);
    }

    /// Look up a string attribute
    pub fn string(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(AttributeValue::String(value)) => Some(value),
            _ => None,
        }
    }

    /// Look up a float attribute
    pub fn float(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(AttributeValue::Float(value)) => Some(*value),
            _ => None,
        }
    }

    /// Look up a boolean attribute
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(AttributeValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    /// Look up a color attribute
    pub fn color(&self, key: &str) -> Option<LinearColor> {
        match self.values.get(key) {
            Some(AttributeValue::Color(value)) => Some(*value),
            _ => None,
        }
    }

    /// Look up a string array attribute
    pub fn string_array(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(AttributeValue::StringArray(values)) => Some(values),
            _ => None,
        }
    }

    /// Look up a float array attribute
    pub fn float_array(&self, key: &str) -> Option<&[f64]> {
        match self.values.get(key) {
            Some(AttributeValue::FloatArray(values)) => Some(values),
            _ => None,
        }
    }

    /// Look up a boolean array attribute
    pub fn bool_array(&self, key: &str) -> Option<&[bool]> {
        match self.values.get(key) {
            Some(AttributeValue::BoolArray(values)) => Some(values),
            _ => None,
        }
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of attributes in the map
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut attributes = AttributeMap::new();
        attributes.insert("opacity", AttributeValue::Float(0.5));
        attributes.insert("shader", AttributeValue::String("Custom".into()));
        attributes.insert("doubleSided", AttributeValue::Bool(true));
        attributes.insert("diffuseColor", AttributeValue::Color(LinearColor::WHITE));

        assert_eq!(attributes.float("opacity"), Some(0.5));
        assert_eq!(attributes.string("shader"), Some("Custom"));
        assert_eq!(attributes.bool("doubleSided"), Some(true));
        assert_eq!(attributes.color("diffuseColor"), Some(LinearColor::WHITE));
    }

    #[test]
    fn test_absent_and_mismatched_keys_yield_none() {
        let mut attributes = AttributeMap::new();
        attributes.insert("opacity", AttributeValue::Float(1.0));

        assert_eq!(attributes.float("missing"), None);
        // Wrong-typed access is treated the same as an absent key.
        assert_eq!(attributes.string("opacity"), None);
    }

    #[test]
    fn test_array_accessors() {
        let mut attributes = AttributeMap::new();
        attributes.insert(
            "uvScales",
            AttributeValue::FloatArray(vec![1.0, 2.0]),
        );

        assert_eq!(attributes.float_array("uvScales"), Some(&[1.0, 2.0][..]));
        assert_eq!(attributes.string_array("uvScales"), None);
    }
}
