//! # Spatial Query
//!
//! Finds scene nodes whose geometry overlaps a world-space oriented box.
//!
//! The placement code only talks to the [`SpatialQuery`] trait, so a broad
//! phase (BVH, grid) can be dropped in later. [`ExactOverlapQuery`] is the
//! reference implementation: a straight scan over every active geometry leaf
//! with an AABB pre-reject followed by the exact separating axis test.

use log::trace;

use crate::geometry::OrientedBox;

use super::object::NodeId;
use super::scene::Scene;

/// Read-only overlap query over a scene
pub trait SpatialQuery {
    /// Returns every geometry-bearing node whose world-space bounds overlap
    /// `volume`, in a stable discovery order
    ///
    /// # Arguments
    /// * `scene` - Scene to search
    /// * `volume` - World-space query box
    /// * `exclude_subtree` - Nodes at or below this node are never reported
    fn overlapping(
        &self,
        scene: &Scene,
        volume: &OrientedBox,
        exclude_subtree: Option<NodeId>,
    ) -> Vec<NodeId>;
}

/// Brute-force overlap query
///
/// Nodes inactive in the hierarchy are skipped. Boxes that merely touch are
/// not reported.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExactOverlapQuery;

impl SpatialQuery for ExactOverlapQuery {
    fn overlapping(
        &self,
        scene: &Scene,
        volume: &OrientedBox,
        exclude_subtree: Option<NodeId>,
    ) -> Vec<NodeId> {
        let query_bounds = volume.to_aabb();
        let mut hits = Vec::new();

        for (id, node) in scene.iter() {
            let Some(geometry) = node.geometry else {
                continue;
            };
            if exclude_subtree.is_some_and(|root| scene.is_descendant_of(id, root)) {
                continue;
            }
            if !scene.is_active_in_hierarchy(id) {
                continue;
            }
            let Ok(world) = scene.world_matrix(id) else {
                continue;
            };

            let leaf = OrientedBox::from_local_bounds(&geometry, &world);
            if !leaf.to_aabb().overlaps(&query_bounds) {
                continue;
            }
            if leaf.intersects(volume) {
                hits.push(id);
            }
        }

        trace!("Overlap query hit {} node(s)", hits.len());
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Aabb, Transform};
    use crate::scene::SceneNode;
    use cgmath::Vector3;

    fn unit_box_at(scene: &mut Scene, name: &str, position: Vector3<f32>) -> NodeId {
        let node = SceneNode::new(name, Transform::from_translation(position)).with_geometry(
            Aabb::from_center_size(Vector3::new(0.0, 0.0, 0.0), Vector3::new(2.0, 2.0, 2.0)),
        );
        scene.add_node(node, None).unwrap()
    }

    #[test]
    fn test_finds_overlapping_nodes_in_order() {
        let mut scene = Scene::new();
        let a = unit_box_at(&mut scene, "a", Vector3::new(1.5, 0.0, 0.0));
        let _far = unit_box_at(&mut scene, "far", Vector3::new(20.0, 0.0, 0.0));
        let b = unit_box_at(&mut scene, "b", Vector3::new(-1.5, 0.0, 0.0));

        let volume = OrientedBox::axis_aligned(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        let hits = ExactOverlapQuery.overlapping(&scene, &volume, None);

        assert_eq!(hits, vec![a, b]);
    }

    #[test]
    fn test_touching_is_not_reported() {
        let mut scene = Scene::new();
        unit_box_at(&mut scene, "touching", Vector3::new(2.0, 0.0, 0.0));

        let volume = OrientedBox::axis_aligned(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        assert!(ExactOverlapQuery.overlapping(&scene, &volume, None).is_empty());
    }

    #[test]
    fn test_skips_excluded_and_inactive() {
        let mut scene = Scene::new();
        let excluded = unit_box_at(&mut scene, "candidate", Vector3::new(0.0, 0.0, 0.0));
        let hidden = unit_box_at(&mut scene, "hidden", Vector3::new(0.5, 0.0, 0.0));
        scene.get_mut(hidden).unwrap().active = false;

        let volume = OrientedBox::axis_aligned(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        assert!(ExactOverlapQuery
            .overlapping(&scene, &volume, Some(excluded))
            .is_empty());
    }
}
