//! Content-addressed mesh cache
//!
//! Meshes are keyed by their source identifier (typically a URI reported by
//! the generation engine) and shared by reference count. The cache is
//! first-writer-wins: concurrent first-time loads for the same identifier
//! may each construct a mesh, but only one survives — an accepted trade-off
//! of possible duplicate work for a simple, low-contention locking scheme.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::foundation::math::{Vec2, Vec3};

/// A single mesh vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: Vec3,
    /// Surface normal
    pub normal: Vec3,
    /// Texture coordinate
    pub tex_coord: Vec2,
}

impl Vertex {
    /// Create a vertex from raw components
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position: Vec3::from(position),
            normal: Vec3::from(normal),
            tex_coord: Vec2::from(tex_coord),
        }
    }
}

/// Geometry extracted from the generation engine, ready for upload
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Mesh name for debugging and asset bookkeeping
    pub name: String,
    /// Vertex data
    pub vertices: Vec<Vertex>,
    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new mesh
    pub fn new(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }
}

/// Thread-safe, content-addressed mesh store
///
/// One coarse lock guards the whole map, held only for the duration of the
/// map access itself; candidate construction always happens outside the
/// lock. Entries live for the cache's lifetime — eviction, if any, is an
/// external policy.
#[derive(Debug, Default)]
pub struct MeshCache {
    cache: Mutex<HashMap<String, Arc<Mesh>>>,
}

impl MeshCache {
    /// Create a new empty mesh cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blocking lookup by source identifier
    pub fn get(&self, uri: &str) -> Option<Arc<Mesh>> {
        let cache = self.cache.lock().expect("mesh cache lock poisoned");
        cache.get(uri).cloned()
    }

    /// Insert a candidate mesh, or return the already-cached one
    ///
    /// First-writer-wins: if an entry for `uri` already exists the candidate
    /// is discarded and every caller observes the same shared handle.
    pub fn insert_or_get(&self, uri: impl Into<String>, candidate: Arc<Mesh>) -> Arc<Mesh> {
        let mut cache = self.cache.lock().expect("mesh cache lock poisoned");
        Arc::clone(cache.entry(uri.into()).or_insert(candidate))
    }

    /// Number of cached meshes
    pub fn len(&self) -> usize {
        let cache = self.cache.lock().expect("mesh cache lock poisoned");
        cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached meshes
    pub fn clear(&self) {
        let mut cache = self.cache.lock().expect("mesh cache lock poisoned");
        cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(name: &str) -> Arc<Mesh> {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
        ];
        Arc::new(Mesh::new(name, vertices, vec![0, 1, 2, 2, 3, 0]))
    }

    #[test]
    fn test_get_on_empty_cache() {
        let cache = MeshCache::new();
        assert!(cache.get("rules://building.obj").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_first_writer_wins() {
        let cache = MeshCache::new();
        let first = quad("first");
        let second = quad("second");

        let stored = cache.insert_or_get("rules://building.obj", Arc::clone(&first));
        assert!(Arc::ptr_eq(&stored, &first));

        // The second candidate is discarded in favor of the cached entry.
        let stored = cache.insert_or_get("rules://building.obj", second);
        assert!(Arc::ptr_eq(&stored, &first));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_insert_or_get_converges() {
        let cache = MeshCache::new();
        let winners: Vec<Arc<Mesh>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|index| {
                    let cache = &cache;
                    scope.spawn(move || {
                        // Candidate construction happens outside the lock.
                        let candidate = quad(&format!("candidate-{index}"));
                        cache.insert_or_get("rules://tree.obj", candidate)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        // Every caller got the identical handle, and a later lookup agrees.
        let cached = cache.get("rules://tree.obj").unwrap();
        for winner in &winners {
            assert!(Arc::ptr_eq(winner, &cached));
        }
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = MeshCache::new();
        cache.insert_or_get("rules://a.obj", quad("a"));
        cache.insert_or_get("rules://b.obj", quad("b"));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("rules://a.obj").is_none());
    }
}
