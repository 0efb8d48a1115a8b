//! Prefab templates: owned node trees that get stamped into the scene.

use std::fmt;

use crate::geometry::{Aabb, Transform};

/// Identifier of a prefab type
///
/// Candidate recreation compares these ids, never display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrefabId(pub u64);

impl fmt::Display for PrefabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prefab:{}", self.0)
    }
}

/// One node of a prefab template
///
/// Parents own their children directly; the template has no cycles.
#[derive(Debug, Clone)]
pub struct PrefabNode {
    /// Node name
    pub name: String,
    /// Transform relative to the parent template node
    pub transform: Transform,
    /// Mesh bounds in this node's local space
    pub geometry: Option<Aabb>,
    /// Owned child nodes
    pub children: Vec<PrefabNode>,
}

impl PrefabNode {
    /// Create an empty node with no geometry
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            geometry: None,
            children: Vec::new(),
        }
    }

    /// Attach mesh bounds
    pub fn with_geometry(mut self, bounds: Aabb) -> Self {
        self.geometry = Some(bounds);
        self
    }

    /// Append a child node
    pub fn with_child(mut self, child: PrefabNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including `self`
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PrefabNode::node_count).sum::<usize>()
    }
}

/// A placeable object type
#[derive(Debug, Clone)]
pub struct Prefab {
    /// Type identity
    pub id: PrefabId,
    /// Display name, also used to name instances
    pub name: String,
    /// Category group that placed instances are filed under (e.g. "Walls")
    pub category: String,
    /// Template root
    pub root: PrefabNode,
}

impl Prefab {
    /// Create a prefab from its template tree
    pub fn new(id: PrefabId, name: impl Into<String>, category: impl Into<String>, root: PrefabNode) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            root,
        }
    }

    /// Single-box prefab: one node whose geometry is a box of `size`
    /// centered on `center` in local space
    pub fn single_box(
        id: PrefabId,
        name: impl Into<String>,
        category: impl Into<String>,
        center: cgmath::Vector3<f32>,
        size: cgmath::Vector3<f32>,
    ) -> Self {
        let name = name.into();
        let root = PrefabNode::new(name.clone(), Transform::identity())
            .with_geometry(Aabb::from_center_size(center, size));
        Self::new(id, name, category, root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_node_count() {
        let root = PrefabNode::new("wall", Transform::identity())
            .with_child(PrefabNode::new("left", Transform::identity()))
            .with_child(
                PrefabNode::new("right", Transform::identity())
                    .with_child(PrefabNode::new("trim", Transform::identity())),
            );

        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn test_single_box() {
        let prefab = Prefab::single_box(
            PrefabId(3),
            "Crate",
            "Props",
            Vector3::new(0.0, 0.5, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        );

        assert_eq!(prefab.root.name, "Crate");
        assert_eq!(prefab.root.geometry.unwrap().min, Vector3::new(-0.5, 0.0, -0.5));
        assert_eq!(prefab.id.to_string(), "prefab:3");
    }
}
