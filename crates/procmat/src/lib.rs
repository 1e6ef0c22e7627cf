//! # procmat
//!
//! Materializes the output of a procedural-generation engine (raw geometry
//! plus a per-element attribute map) into render-ready assets:
//!
//! - **Material descriptors**: canonicalized, comparable representations of
//!   a resolved attribute map ([`MaterialDescriptor`])
//! - **Async texture loading**: image files decoded off the orchestrating
//!   thread on a shared worker pool ([`texture::TexturePool`])
//! - **Blend mode inference**: pixel-histogram analysis of opacity maps
//!   ([`material::choose_blend_mode`])
//! - **Material instantiation**: parameter binding onto parent templates
//!   ([`material::create_material_instance`])
//! - **Caches**: a first-writer-wins mesh cache and an instance grouping
//!   index that collapse redundant GPU resource creation ([`cache`])
//!
//! The generation engine itself, rule annotation parsing, and the hosting
//! component lifecycle are out of scope; this crate starts where a resolved
//! attribute map ends and stops where a scene-composition layer takes over.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use procmat::{AttributeMap, AttributeValue, MaterialDescriptor};
//! use procmat::material::{create_material_instance, Material, MaterialParents};
//! use procmat::texture::TexturePool;
//!
//! let mut attributes = AttributeMap::new();
//! attributes.insert("colorMap", AttributeValue::String("facade.png".into()));
//! attributes.insert("roughness", AttributeValue::Float(0.4));
//!
//! let descriptor = MaterialDescriptor::from_attributes(&attributes, "Facade");
//! let parents = MaterialParents::new(
//!     Arc::new(Material::new("M_Opaque")),
//!     Arc::new(Material::new("M_Masked")),
//!     Arc::new(Material::new("M_Translucent")),
//! );
//! let instance = create_material_instance(&descriptor, &parents, None, TexturePool::global());
//! ```

pub mod foundation;

pub mod attributes;
pub mod cache;
pub mod config;
pub mod material;
pub mod texture;

pub use attributes::{AttributeMap, AttributeValue, MaterialDescriptor};
pub use cache::{InstanceKey, InstanceMap, Mesh, MeshCache, Vertex};
pub use config::PipelineConfig;
pub use foundation::math::{LinearColor, Transform};
pub use material::{BlendMode, Material, MaterialInstance, MaterialParents};
pub use texture::{Texture2D, TextureData};
