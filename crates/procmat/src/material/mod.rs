//! Material templates, blend mode resolution, and instantiation
//!
//! A resolved [`MaterialDescriptor`](crate::MaterialDescriptor) becomes a
//! bound [`MaterialInstance`] in three steps: texture loads are scheduled on
//! the shared pool, the final [`BlendMode`] is inferred from the opacity
//! data (see [`blend`]), and the resolved parameters are bound onto a parent
//! template selected by shader override or blend mode (see
//! [`create_material_instance`]).

pub mod blend;
pub mod instantiate;

pub use blend::{choose_blend_mode, BlendMode};
pub use instantiate::{create_material_instance, DEFAULT_SHADER_NAME, PBR_SHADER_NAME};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::foundation::math::LinearColor;
use crate::texture::Texture2D;

/// A parent material template
///
/// Templates are caller-supplied handles; this crate never creates or loads
/// them, it only instantiates from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    /// Template name (e.g. asset path or shader name)
    pub name: String,
}

impl Material {
    /// Create a template handle with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The three built-in parent templates, one per blend mode
#[derive(Debug, Clone)]
pub struct MaterialParents {
    /// Parent for opaque materials
    pub opaque: Arc<Material>,
    /// Parent for masked (hard cutout) materials
    pub masked: Arc<Material>,
    /// Parent for translucent (alpha blended) materials
    pub translucent: Arc<Material>,
}

impl MaterialParents {
    /// Bundle the three parent templates
    pub fn new(opaque: Arc<Material>, masked: Arc<Material>, translucent: Arc<Material>) -> Self {
        Self {
            opaque,
            masked,
            translucent,
        }
    }

    /// Select the parent template for a blend mode
    pub fn for_mode(&self, mode: BlendMode) -> Arc<Material> {
        match mode {
            BlendMode::Opaque => Arc::clone(&self.opaque),
            BlendMode::Masked => Arc::clone(&self.masked),
            BlendMode::Translucent => Arc::clone(&self.translucent),
        }
    }
}

/// Resolves a user-supplied shader override name to a parent template
///
/// Returning `None` (or not supplying a resolver at all) silently falls
/// back to built-in parent selection by blend mode.
pub trait ShaderOverrideResolver {
    /// Resolve `shader` to a parent template, if one exists
    fn resolve(&self, shader: &str) -> Option<Arc<Material>>;
}

impl<F> ShaderOverrideResolver for F
where
    F: Fn(&str) -> Option<Arc<Material>>,
{
    fn resolve(&self, shader: &str) -> Option<Arc<Material>> {
        self(shader)
    }
}

/// A dynamic material instance with bound parameters
///
/// Each instance is a freshly allocated, GPU-bound object; the instantiator
/// performs no caching. Callers must deduplicate by descriptor equality
/// before instantiating.
#[derive(Debug, Clone)]
pub struct MaterialInstance {
    /// Parent template this instance was created from
    pub parent: Arc<Material>,
    /// Display name carried over from the descriptor
    pub name: String,
    /// Blend mode the instance was resolved to
    pub blend_mode: BlendMode,
    textures: BTreeMap<String, Arc<Texture2D>>,
    scalars: BTreeMap<String, f64>,
    colors: BTreeMap<String, LinearColor>,
}

impl MaterialInstance {
    /// Create an unbound instance from a parent template
    pub fn new(parent: Arc<Material>, name: impl Into<String>, blend_mode: BlendMode) -> Self {
        Self {
            parent,
            name: name.into(),
            blend_mode,
            textures: BTreeMap::new(),
            scalars: BTreeMap::new(),
            colors: BTreeMap::new(),
        }
    }

    /// Bind a texture parameter by slot name
    pub fn set_texture_parameter(&mut self, slot: impl Into<String>, texture: Arc<Texture2D>) {
        self.textures.insert(slot.into(), texture);
    }

    /// Bind a scalar parameter by name
    pub fn set_scalar_parameter(&mut self, name: impl Into<String>, value: f64) {
        self.scalars.insert(name.into(), value);
    }

    /// Bind a color parameter by name
    pub fn set_color_parameter(&mut self, name: impl Into<String>, color: LinearColor) {
        self.colors.insert(name.into(), color);
    }

    /// Look up a bound texture parameter
    pub fn texture_parameter(&self, slot: &str) -> Option<&Arc<Texture2D>> {
        self.textures.get(slot)
    }

    /// Look up a bound scalar parameter
    pub fn scalar_parameter(&self, name: &str) -> Option<f64> {
        self.scalars.get(name).copied()
    }

    /// Look up a bound color parameter
    pub fn color_parameter(&self, name: &str) -> Option<LinearColor> {
        self.colors.get(name).copied()
    }

    /// Number of bound texture parameters
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_selection_by_mode() {
        let parents = MaterialParents::new(
            Arc::new(Material::new("M_Opaque")),
            Arc::new(Material::new("M_Masked")),
            Arc::new(Material::new("M_Translucent")),
        );

        assert_eq!(parents.for_mode(BlendMode::Opaque).name, "M_Opaque");
        assert_eq!(parents.for_mode(BlendMode::Masked).name, "M_Masked");
        assert_eq!(
            parents.for_mode(BlendMode::Translucent).name,
            "M_Translucent"
        );
    }

    #[test]
    fn test_parameter_binding() {
        let parent = Arc::new(Material::new("M_Opaque"));
        let mut instance = MaterialInstance::new(parent, "Facade", BlendMode::Opaque);

        instance.set_scalar_parameter("roughness", 0.4);
        instance.set_color_parameter("diffuseColor", LinearColor::WHITE);

        assert_eq!(instance.scalar_parameter("roughness"), Some(0.4));
        assert_eq!(
            instance.color_parameter("diffuseColor"),
            Some(LinearColor::WHITE)
        );
        assert_eq!(instance.texture_count(), 0);
    }
}
