use std::fmt;

use crate::geometry::{Aabb, Transform};

use super::prefab::PrefabId;

/// Stable handle to a node in a [`Scene`](super::Scene)
///
/// Ids are never reused, so a handle to a destroyed node stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw numeric value, for logging and debugging
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the scene hierarchy
///
/// A node may carry one geometry leaf: the bounds of its mesh in the node's
/// own local space. Nodes that were the root of a prefab instantiation record
/// the prefab they came from, which makes them a rigid composite that moves
/// as a whole.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Display name
    pub name: String,
    /// Transform relative to the parent (or the world for root nodes)
    pub transform: Transform,
    /// Mesh bounds in local space, if this node has geometry
    pub geometry: Option<Aabb>,
    /// Inactive nodes and their subtrees are ignored by bounds and queries
    pub active: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) prefab: Option<PrefabId>,
}

impl SceneNode {
    /// Create a detached, active node
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            geometry: None,
            active: true,
            parent: None,
            children: Vec::new(),
            prefab: None,
        }
    }

    /// Attach mesh bounds to the node
    pub fn with_geometry(mut self, bounds: Aabb) -> Self {
        self.geometry = Some(bounds);
        self
    }

    /// Parent handle, `None` for top-level nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Prefab this node was instantiated from, set on instance roots only
    pub fn prefab(&self) -> Option<PrefabId> {
        self.prefab
    }

    /// Whether the node has a geometry leaf
    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}
