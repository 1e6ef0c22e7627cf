//! Canonicalized material descriptors
//!
//! A [`MaterialDescriptor`] is the comparable, hashable identity of a
//! material resolved from an attribute map. Two descriptors with identical
//! parameter tables and blend-mode hint describe the same material even if
//! their display names differ, which is what lets callers deduplicate
//! material instantiation and merge instance groups.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use super::{AttributeMap, AttributeValue};
use crate::foundation::math::LinearColor;

/// Key suffix that marks a string attribute as a texture slot
/// (colorMap, normalMap, roughnessMap, metallicMap, opacityMap, ...)
const TEXTURE_SLOT_SUFFIX: &str = "Map";

/// Distinguished attribute carrying the declared blend-mode hint
const BLEND_MODE_KEY: &str = "opacityMap.mode";

/// Default blend-mode hint when the engine does not declare one
const DEFAULT_BLEND_MODE: &str = "blend";

/// Scalar slot holding the uniform opacity value
const OPACITY_KEY: &str = "opacity";

/// Canonicalized, comparable representation of a material's resolved attributes
///
/// Equality and hashing cover the four parameter tables and the blend-mode
/// hint but deliberately **ignore the display name**: the name is cosmetic
/// and must not split otherwise-identical materials into distinct GPU
/// resources.
#[derive(Debug, Clone, Default)]
pub struct MaterialDescriptor {
    /// Texture slot name -> image file path
    pub textures: BTreeMap<String, String>,
    /// Parameter name -> linear color
    pub colors: BTreeMap<String, LinearColor>,
    /// Parameter name -> scalar value
    pub scalars: BTreeMap<String, f64>,
    /// Parameter name -> string value
    pub strings: BTreeMap<String, String>,
    /// Declared blend-mode hint ("mask", "blend", or other)
    pub blend_mode: String,
    /// Display name; ignored for equality and hashing
    pub name: String,
}

impl MaterialDescriptor {
    /// Build a descriptor from a resolved attribute map
    ///
    /// Classification is by attribute type and key convention:
    /// - string entries whose key ends in `Map` become texture paths
    /// - the `opacityMap.mode` entry becomes the blend-mode hint
    /// - color entries become color parameters
    /// - float entries become scalar parameters
    /// - bool entries become scalar parameters (0.0 / 1.0)
    /// - remaining string entries become string parameters
    /// - array-valued entries are not material parameters and are skipped
    ///
    /// The `opacity` scalar defaults to 1.0 when absent. This is a pure
    /// transform: no I/O happens here and texture paths are not validated.
    pub fn from_attributes(attributes: &AttributeMap, name: impl Into<String>) -> Self {
        let mut descriptor = Self {
            blend_mode: DEFAULT_BLEND_MODE.to_string(),
            name: name.into(),
            ..Self::default()
        };

        for (key, value) in attributes.iter() {
            match value {
                AttributeValue::String(text) => {
                    if key == BLEND_MODE_KEY {
                        descriptor.blend_mode = text.clone();
                    } else if key.ends_with(TEXTURE_SLOT_SUFFIX) {
                        descriptor.textures.insert(key.to_string(), text.clone());
                    } else {
                        descriptor.strings.insert(key.to_string(), text.clone());
                    }
                }
                AttributeValue::Float(scalar) => {
                    descriptor.scalars.insert(key.to_string(), *scalar);
                }
                AttributeValue::Bool(flag) => {
                    descriptor
                        .scalars
                        .insert(key.to_string(), if *flag { 1.0 } else { 0.0 });
                }
                AttributeValue::Color(color) => {
                    descriptor.colors.insert(key.to_string(), *color);
                }
                // Array attributes drive geometry generation, not materials.
                AttributeValue::StringArray(_)
                | AttributeValue::FloatArray(_)
                | AttributeValue::BoolArray(_) => {}
            }
        }

        descriptor
            .scalars
            .entry(OPACITY_KEY.to_string())
            .or_insert(1.0);

        descriptor
    }

    /// Uniform opacity of this material (1.0 when not declared)
    pub fn opacity(&self) -> f64 {
        self.scalars.get(OPACITY_KEY).copied().unwrap_or(1.0)
    }
}

impl PartialEq for MaterialDescriptor {
    fn eq(&self, other: &Self) -> bool {
        // Display name intentionally excluded.
        self.textures == other.textures
            && self.colors == other.colors
            && self.scalars == other.scalars
            && self.strings == other.strings
            && self.blend_mode == other.blend_mode
    }
}

impl Eq for MaterialDescriptor {}

impl Hash for MaterialDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // BTreeMap iteration is key-ordered, so the hash is canonical and
        // consistent with equality. Scalars hash by bit pattern.
        self.textures.hash(state);
        self.colors.hash(state);
        for (key, value) in &self.scalars {
            key.hash(state);
            value.to_bits().hash(state);
        }
        self.strings.hash(state);
        self.blend_mode.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(descriptor: &MaterialDescriptor) -> u64 {
        let mut hasher = DefaultHasher::new();
        descriptor.hash(&mut hasher);
        hasher.finish()
    }

    fn sample_attributes() -> AttributeMap {
        let mut attributes = AttributeMap::new();
        attributes.insert("colorMap", AttributeValue::String("brick.png".into()));
        attributes.insert("normalMap", AttributeValue::String("brick_n.png".into()));
        attributes.insert("opacityMap.mode", AttributeValue::String("mask".into()));
        attributes.insert("roughness", AttributeValue::Float(0.35));
        attributes.insert("doubleSided", AttributeValue::Bool(true));
        attributes.insert(
            "diffuseColor",
            AttributeValue::Color(LinearColor::rgb(0.8, 0.2, 0.2)),
        );
        attributes.insert("shader", AttributeValue::String("Custom/Brick".into()));
        attributes.insert("uvScales", AttributeValue::FloatArray(vec![1.0, 1.0]));
        attributes
    }

    #[test]
    fn test_classification() {
        let descriptor = MaterialDescriptor::from_attributes(&sample_attributes(), "Brick");

        assert_eq!(
            descriptor.textures.get("colorMap").map(String::as_str),
            Some("brick.png")
        );
        assert_eq!(
            descriptor.textures.get("normalMap").map(String::as_str),
            Some("brick_n.png")
        );
        assert_eq!(descriptor.blend_mode, "mask");
        assert_eq!(descriptor.scalars.get("roughness"), Some(&0.35));
        assert_eq!(descriptor.scalars.get("doubleSided"), Some(&1.0));
        assert_eq!(
            descriptor.colors.get("diffuseColor"),
            Some(&LinearColor::rgb(0.8, 0.2, 0.2))
        );
        assert_eq!(
            descriptor.strings.get("shader").map(String::as_str),
            Some("Custom/Brick")
        );
        // Arrays are dropped; the mode hint does not land in any table.
        assert!(!descriptor.strings.contains_key("opacityMap.mode"));
        assert!(!descriptor.textures.contains_key("uvScales"));
    }

    #[test]
    fn test_opacity_defaults_to_one() {
        let descriptor = MaterialDescriptor::from_attributes(&AttributeMap::new(), "Empty");
        assert_eq!(descriptor.opacity(), 1.0);
        assert_eq!(descriptor.blend_mode, "blend");
    }

    #[test]
    fn test_equality_ignores_display_name() {
        let a = MaterialDescriptor::from_attributes(&sample_attributes(), "Brick");
        let b = MaterialDescriptor::from_attributes(&sample_attributes(), "BrickCopy");

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_parameter_change_breaks_equality() {
        let a = MaterialDescriptor::from_attributes(&sample_attributes(), "Brick");
        let mut attributes = sample_attributes();
        attributes.insert("roughness", AttributeValue::Float(0.9));
        let b = MaterialDescriptor::from_attributes(&attributes, "Brick");

        assert_ne!(a, b);
    }

    #[test]
    fn test_blend_mode_change_breaks_equality() {
        let a = MaterialDescriptor::from_attributes(&sample_attributes(), "Brick");
        let mut attributes = sample_attributes();
        attributes.insert("opacityMap.mode", AttributeValue::String("blend".into()));
        let b = MaterialDescriptor::from_attributes(&attributes, "Brick");

        assert_ne!(a, b);
    }
}
