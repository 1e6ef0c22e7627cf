//! Deduplication caches
//!
//! Two caches keep generation output from turning into redundant GPU
//! resources: the [`MeshCache`] deduplicates mesh construction by source
//! URI with first-writer-wins semantics, and the [`InstanceMap`] collapses
//! placements that share a prototype and material-override identity into
//! one drawable group with many transforms.

pub mod instance_cache;
pub mod mesh_cache;

pub use instance_cache::{InstanceKey, InstanceMap};
pub use mesh_cache::{Mesh, MeshCache, Vertex};
