//! Instance grouping cache
//!
//! Not an eviction cache — a deduplication index. Placements that share a
//! prototype and an identical, order-sensitive list of material-override
//! descriptors merge into one drawable group carrying many transforms, so N
//! logically-identical placements cost one prototype draw instead of N.

use std::collections::HashMap;

use crate::attributes::MaterialDescriptor;
use crate::foundation::math::Transform;

/// Grouping key: prototype plus material-override identity
///
/// Placement order of the override list matters — slot assignment is part
/// of the identity. Descriptor comparison ignores display names, so two
/// overrides that differ only by name still merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    /// Prototype identifier reported by the generation engine
    pub prototype_id: i64,
    /// Material override per slot, in slot order
    pub material_overrides: Vec<MaterialDescriptor>,
}

impl InstanceKey {
    /// Create a grouping key
    pub fn new(prototype_id: i64, material_overrides: Vec<MaterialDescriptor>) -> Self {
        Self {
            prototype_id,
            material_overrides,
        }
    }
}

/// Deduplication index from grouping key to placement transforms
///
/// Thread-confined to the orchestrator building the render payload; no
/// locking.
#[derive(Debug, Clone, Default)]
pub struct InstanceMap {
    groups: HashMap<InstanceKey, Vec<Transform>>,
}

impl InstanceMap {
    /// Create an empty instance map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one placement, merging it into its group
    pub fn add(&mut self, key: InstanceKey, transform: Transform) {
        self.groups.entry(key).or_default().push(transform);
    }

    /// Transforms recorded for a key, if any
    pub fn get(&self, key: &InstanceKey) -> Option<&[Transform]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    /// Iterate over all groups
    pub fn iter(&self) -> impl Iterator<Item = (&InstanceKey, &[Transform])> {
        self.groups
            .iter()
            .map(|(key, transforms)| (key, transforms.as_slice()))
    }

    /// Number of distinct groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of recorded placements across all groups
    pub fn instance_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Check if no placements were recorded
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
