//! Material instantiation
//!
//! The orchestrating entry point of the pipeline: a descriptor goes in,
//! texture loads fan out onto the worker pool, and a bound
//! [`MaterialInstance`] comes back. Only the opacity map has a forced
//! await order (the blend mode depends on it); every other texture future
//! is awaited as it is bound.

use super::blend::{choose_blend_mode, BlendMode};
use super::{Material, MaterialInstance, MaterialParents, ShaderOverrideResolver};
use crate::attributes::MaterialDescriptor;
use crate::texture::{TextureData, TextureFuture, TexturePool};

use std::sync::Arc;

/// Reserved name of the built-in default shader; never treated as an override
pub const DEFAULT_SHADER_NAME: &str = "DefaultShader";

/// Reserved name of the built-in PBR shader; never treated as an override
pub const PBR_SHADER_NAME: &str = "PBRShader";

/// Texture slot whose content drives translucency decisions
const OPACITY_MAP_KEY: &str = "opacityMap";

/// String parameter naming a shader override
const SHADER_KEY: &str = "shader";

/// Scalar parameter telling the shader whether opacity comes from the
/// opacity map's alpha channel (1.0) or its first channel (0.0)
const OPACITY_SOURCE_KEY: &str = "opacitySource";

fn select_parent(
    descriptor: &MaterialDescriptor,
    parents: &MaterialParents,
    resolver: Option<&dyn ShaderOverrideResolver>,
    blend_mode: BlendMode,
) -> Arc<Material> {
    let shader = descriptor
        .strings
        .get(SHADER_KEY)
        .map(String::as_str)
        .unwrap_or("");

    if !shader.is_empty() && shader != DEFAULT_SHADER_NAME && shader != PBR_SHADER_NAME {
        if let Some(parent) = resolver.and_then(|resolver| resolver.resolve(shader)) {
            return parent;
        }
        // Resolution failure falls back to built-in parents, silently.
    }

    parents.for_mode(blend_mode)
}

/// Instantiate a bound material from a canonicalized descriptor
///
/// Schedules one load task per non-empty texture path, awaits the opacity
/// map first to resolve the blend mode, selects the parent template (a
/// non-reserved shader override wins when the resolver can supply it), and
/// binds every resolved texture, scalar, and color parameter.
///
/// Failed texture loads bind nothing for their slot; they never abort the
/// material. This function performs **no caching** — each call allocates a
/// fresh instance, so callers must deduplicate by descriptor equality.
pub fn create_material_instance(
    descriptor: &MaterialDescriptor,
    parents: &MaterialParents,
    resolver: Option<&dyn ShaderOverrideResolver>,
    pool: &TexturePool,
) -> MaterialInstance {
    let mut futures: Vec<TextureFuture> = descriptor
        .textures
        .iter()
        .filter(|(_, path)| !path.is_empty())
        .map(|(slot, path)| pool.load(path.as_str(), slot.as_str()))
        .collect();

    // The blend mode can depend on the opacity map, so that one future is
    // awaited before any other.
    let opacity_map = match futures
        .iter()
        .position(|future| future.slot_key() == OPACITY_MAP_KEY)
    {
        Some(index) => futures.swap_remove(index).wait(),
        None => TextureData::default(),
    };

    let opacity = descriptor.opacity();
    let use_alpha_as_opacity = opacity_map.is_loaded() && opacity_map.num_channels == 4;
    let declared = BlendMode::from_hint(&descriptor.blend_mode);
    let blend_mode = choose_blend_mode(&opacity_map, opacity, declared, use_alpha_as_opacity);

    let parent = select_parent(descriptor, parents, resolver, blend_mode);
    log::debug!(
        "Instantiating material '{}' from parent '{}' ({blend_mode:?})",
        descriptor.name,
        parent.name
    );

    let mut instance = MaterialInstance::new(parent, descriptor.name.clone(), blend_mode);
    instance.set_scalar_parameter(
        OPACITY_SOURCE_KEY,
        if use_alpha_as_opacity { 1.0 } else { 0.0 },
    );

    if let Some(texture) = opacity_map.texture {
        instance.set_texture_parameter(OPACITY_MAP_KEY, texture);
    }
    for future in futures {
        let slot = future.slot_key().to_string();
        if let Some(texture) = future.wait().texture {
            instance.set_texture_parameter(slot, texture);
        }
    }

    for (name, value) in &descriptor.scalars {
        instance.set_scalar_parameter(name.clone(), *value);
    }
    for (name, color) in &descriptor.colors {
        instance.set_color_parameter(name.clone(), *color);
    }

    instance
}
