use std::collections::BTreeMap;

use cgmath::{Matrix4, Quaternion, Rotation, SquareMatrix, Vector3};
use log::debug;

use crate::error::{PlacementError, Result};
use crate::geometry::Transform;

use super::object::{NodeId, SceneNode};
use super::prefab::{Prefab, PrefabNode};

/// Scene graph holding every placed object, group and the placement candidate
///
/// Nodes are keyed by [`NodeId`] and iterate in creation order, which keeps
/// spatial query results in a stable discovery order.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` under `parent` (or at the top level) and returns its handle
    pub fn add_node(&mut self, mut node: SceneNode, parent: Option<NodeId>) -> Result<NodeId> {
        if let Some(parent_id) = parent {
            if !self.nodes.contains_key(&parent_id) {
                return Err(PlacementError::NodeNotFound(parent_id));
            }
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;

        node.parent = parent;
        node.children.clear();
        self.nodes.insert(id, node);

        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }

        Ok(id)
    }

    /// Stamps a prefab template into the scene
    ///
    /// The instance root is named after the prefab and remembers the prefab
    /// id, marking it as a rigid composite.
    pub fn instantiate(&mut self, prefab: &Prefab, parent: Option<NodeId>) -> Result<NodeId> {
        let root = self.spawn_template(&prefab.root, parent)?;
        if let Some(node) = self.nodes.get_mut(&root) {
            node.name = prefab.name.clone();
            node.prefab = Some(prefab.id);
        }
        debug!(
            "Instantiated {} ({}) as {} with {} node(s)",
            prefab.name,
            prefab.id,
            root,
            prefab.root.node_count()
        );
        Ok(root)
    }

    fn spawn_template(&mut self, template: &PrefabNode, parent: Option<NodeId>) -> Result<NodeId> {
        let mut node = SceneNode::new(template.name.clone(), template.transform);
        node.geometry = template.geometry;
        let id = self.add_node(node, parent)?;
        for child in &template.children {
            self.spawn_template(child, Some(id))?;
        }
        Ok(id)
    }

    /// Removes a node and its whole subtree
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        let parent = self.get(id)?.parent;
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.retain(|c| *c != id),
            None => self.roots.retain(|r| *r != id),
        }

        let doomed = self.subtree(id);
        for node_id in &doomed {
            self.nodes.remove(node_id);
        }
        debug!("Destroyed {} ({} node(s))", id, doomed.len());
        Ok(())
    }

    /// Returns `true` if the handle refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Gets immutable reference to a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Gets mutable reference to a node
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Like [`Scene::node`], but a missing node is an error
    pub fn get(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(&id).ok_or(PlacementError::NodeNotFound(id))
    }

    /// Like [`Scene::node_mut`], but a missing node is an error
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(&id).ok_or(PlacementError::NodeNotFound(id))
    }

    /// Total number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Walks the parent chain of `id`, nearest ancestor first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.nodes.get(&id).and_then(|n| n.parent),
        }
    }

    /// Returns `true` if `id` is `ancestor` itself or sits anywhere below it
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Topmost node of the hierarchy containing `id`
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Outermost prefab instance root containing `id`
    ///
    /// Falls back to the hierarchy root when `id` is not part of any prefab
    /// instance.
    pub fn outermost_prefab_root(&self, id: NodeId) -> NodeId {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .filter(|n| self.nodes.get(n).is_some_and(|node| node.prefab.is_some()))
            .last()
            .unwrap_or_else(|| self.root_of(id))
    }

    /// A node is active in the hierarchy only if it and all ancestors are active
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|n| self.nodes.get(&n).is_some_and(|node| node.active))
    }

    /// `id` followed by all of its descendants, depth first
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                out.push(current);
                // Reverse so children come out in insertion order
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Like [`Scene::subtree`], but skips inactive nodes together with
    /// everything below them
    pub fn active_subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.nodes.get(&current) {
                Some(node) if node.active => {
                    out.push(current);
                    stack.extend(node.children.iter().rev().copied());
                }
                _ => {}
            }
        }
        out
    }

    /// Chain from the hierarchy root down to `id` (inclusive)
    fn chain_to(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.get(id)?;
        let mut chain: Vec<NodeId> = self.ancestors(id).collect();
        chain.reverse();
        chain.push(id);
        Ok(chain)
    }

    /// World-space transform of a node
    ///
    /// Scale composes per axis, see [`Transform::then`].
    pub fn world_transform(&self, id: NodeId) -> Result<Transform> {
        let mut world = Transform::identity();
        for node_id in self.chain_to(id)? {
            world = world.then(&self.get(node_id)?.transform);
        }
        Ok(world)
    }

    /// Exact local-to-world matrix of a node
    pub fn world_matrix(&self, id: NodeId) -> Result<Matrix4<f32>> {
        let mut matrix = Matrix4::identity();
        for node_id in self.chain_to(id)? {
            matrix = matrix * self.get(node_id)?.transform.to_matrix();
        }
        Ok(matrix)
    }

    /// Matrix taking `node`'s local space into `ancestor`'s local space
    ///
    /// Identity when `node == ancestor`. If `ancestor` is not on the parent
    /// chain the product runs up to the hierarchy root, i.e. the world matrix.
    pub fn relative_matrix(&self, ancestor: NodeId, node: NodeId) -> Result<Matrix4<f32>> {
        let mut matrix = Matrix4::identity();
        let mut current = node;
        while current != ancestor {
            let scene_node = self.get(current)?;
            matrix = scene_node.transform.to_matrix() * matrix;
            match scene_node.parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        Ok(matrix)
    }

    /// World-space position of a node's origin
    pub fn world_position(&self, id: NodeId) -> Result<Vector3<f32>> {
        Ok(self.world_transform(id)?.translation)
    }

    /// Moves a node so its world position and rotation match the given values,
    /// keeping its local scale
    pub fn set_world_pose(
        &mut self,
        id: NodeId,
        position: Vector3<f32>,
        rotation: Quaternion<f32>,
    ) -> Result<()> {
        let parent_world = match self.get(id)?.parent {
            Some(parent) => self.world_transform(parent)?,
            None => Transform::identity(),
        };
        let node = self.get_mut(id)?;
        node.transform.translation = parent_world.inverse_transform_point(position);
        node.transform.rotation = parent_world.rotation.invert() * rotation;
        Ok(())
    }

    /// First direct child of `parent` (or top-level node) called `name`
    pub fn find_child(&self, parent: Option<NodeId>, name: &str) -> Option<NodeId> {
        let candidates: &[NodeId] = match parent {
            Some(p) => self.nodes.get(&p).map(|n| n.children.as_slice()).unwrap_or(&[]),
            None => &self.roots,
        };
        candidates
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    /// Group node that placed objects are parented to:
    /// `Level (<height>m)` at the top level, then one child per category.
    ///
    /// Both groups are created on first use and reused afterwards.
    pub fn placement_group(&mut self, height: f32, category: &str) -> Result<NodeId> {
        let level_name = level_group_name(height);
        let level = match self.find_child(None, &level_name) {
            Some(id) => id,
            None => self.add_node(SceneNode::new(level_name, Transform::identity()), None)?,
        };

        match self.find_child(Some(level), category) {
            Some(id) => Ok(id),
            None => self.add_node(SceneNode::new(category, Transform::identity()), Some(level)),
        }
    }
}

/// Name of the level group for a surface height, e.g. `Level (2.5m)`
///
/// Heights are printed with at most two decimals and no trailing zeros.
pub fn level_group_name(height: f32) -> String {
    let mut text = format!("{:.2}", height);
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    if text == "-0" {
        text = "0".to_string();
    }
    format!("Level ({}m)", text)
}

/// Iterator over a node's ancestors, see [`Scene::ancestors`]
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.nodes.get(&current).and_then(|n| n.parent);
        Some(current)
    }
}
