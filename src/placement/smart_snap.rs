//! # Smart Snap
//!
//! Aligns the placement candidate with nearby objects by matching anchor
//! points.
//!
//! Every object exposes three anchors along its local X axis: the left edge,
//! the origin and the right edge of its bounds. The candidate's anchors are
//! paired with those of every neighbor found inside a widened detection box,
//! and the closest pair wins. The candidate is then shifted so the two anchors
//! coincide, keeping its own height.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use haggis_placement::placement::compute_snapped_position;
//! use haggis_placement::scene::{ExactOverlapQuery, Prefab, PrefabId, Scene};
//!
//! let block = Prefab::single_box(
//!     PrefabId(1),
//!     "Block",
//!     "Blocks",
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(2.0, 2.0, 2.0),
//! );
//!
//! let mut scene = Scene::new();
//! let candidate = scene.instantiate(&block, None).unwrap();
//! let neighbor = scene.instantiate(&block, None).unwrap();
//! scene.get_mut(neighbor).unwrap().transform.translation = Vector3::new(3.0, 0.0, 0.0);
//!
//! let snapped = compute_snapped_position(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9).unwrap();
//! assert_eq!(snapped, Vector3::new(1.0, 0.0, 0.0));
//! ```

use cgmath::{InnerSpace, Vector3};
use log::debug;

use crate::error::Result;
use crate::geometry::OrientedBox;
use crate::scene::{NodeId, Scene, SpatialQuery};

use super::volume::{compute_volume, local_bounds};

/// Vertical scale of the detection box, so objects stacked directly above or
/// below are not picked up as neighbors
pub const VERTICAL_TOLERANCE: f32 = 0.9;

/// Which of the three anchors of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorPosition {
    /// Half the local width along -X from the pivot
    Left,
    /// The pivot itself
    Center,
    /// Half the local width along +X from the pivot
    Right,
}

impl AnchorPosition {
    /// All anchors in evaluation order
    pub const ALL: [AnchorPosition; 3] = [AnchorPosition::Left, AnchorPosition::Center, AnchorPosition::Right];

    fn index(self) -> usize {
        match self {
            AnchorPosition::Left => 0,
            AnchorPosition::Center => 1,
            AnchorPosition::Right => 2,
        }
    }
}

/// Closest anchor pairing between the candidate and one neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorMatch {
    /// Root of the neighboring placed object
    pub neighbor: NodeId,
    /// Anchor on the candidate side of the pair
    pub candidate_anchor: AnchorPosition,
    /// Anchor on the neighbor side of the pair
    pub neighbor_anchor: AnchorPosition,
    /// World-space position of the candidate's anchor
    pub candidate_point: Vector3<f32>,
    /// World-space position of the neighbor's anchor
    pub neighbor_point: Vector3<f32>,
    /// Distance between the two anchors
    pub distance: f32,
}

/// World-space anchors of `object`, indexed like [`AnchorPosition::ALL`]
///
/// Anchors sit at `(-w, 0, 0)`, the origin and `(w, 0, 0)` in local space,
/// `w` being half the width of the object's local bounds. Objects without
/// geometry collapse all three onto their origin.
pub fn anchor_points(scene: &Scene, object: NodeId) -> Result<[Vector3<f32>; 3]> {
    let matrix = scene.world_matrix(object)?;
    let half_width = local_bounds(scene, object).map_or(0.0, |bounds| bounds.size().x * 0.5);

    let to_world = |x: f32| (matrix * Vector3::new(x, 0.0, 0.0).extend(1.0)).truncate();
    Ok([to_world(-half_width), to_world(0.0), to_world(half_width)])
}

/// The candidate volume widened by `range` on X and Z and flattened on Y
///
/// Returns `None` when the candidate has no geometry.
pub fn detection_volume(scene: &Scene, candidate: NodeId, range: f32, shrink: f32) -> Option<OrientedBox> {
    let volume = compute_volume(scene, candidate, shrink)?;
    let mut half = volume.half_extents();
    half.x += range;
    half.z += range;
    half.y *= VERTICAL_TOLERANCE;
    Some(OrientedBox::new(volume.center, half, volume.rotation))
}

/// Objects close enough to snap against, in discovery order
///
/// Every hit is resolved to the outermost prefab instance that contains it
/// (or its hierarchy root), so a multi-part object counts once.
pub fn find_neighbors<Q: SpatialQuery + ?Sized>(
    scene: &Scene,
    query: &Q,
    candidate: NodeId,
    range: f32,
    shrink: f32,
) -> Vec<NodeId> {
    let Some(detection) = detection_volume(scene, candidate, range, shrink) else {
        return Vec::new();
    };

    let mut neighbors: Vec<NodeId> = Vec::new();
    for hit in query.overlapping(scene, &detection, Some(candidate)) {
        let root = scene.outermost_prefab_root(hit);
        if root == candidate || scene.is_descendant_of(candidate, root) {
            continue;
        }
        if !scene.is_active_in_hierarchy(root) || neighbors.contains(&root) {
            continue;
        }
        neighbors.push(root);
    }
    neighbors
}

/// Finds the closest candidate/neighbor anchor pair
///
/// Ties keep the first pair found: neighbors in the given order, then
/// candidate anchors, then neighbor anchors, each left to right.
pub fn best_anchor_match(scene: &Scene, candidate: NodeId, neighbors: &[NodeId]) -> Result<Option<AnchorMatch>> {
    let candidate_anchors = anchor_points(scene, candidate)?;
    let mut best: Option<AnchorMatch> = None;

    for &neighbor in neighbors {
        let neighbor_anchors = anchor_points(scene, neighbor)?;

        for candidate_anchor in AnchorPosition::ALL {
            for neighbor_anchor in AnchorPosition::ALL {
                let candidate_point = candidate_anchors[candidate_anchor.index()];
                let neighbor_point = neighbor_anchors[neighbor_anchor.index()];
                let distance = (neighbor_point - candidate_point).magnitude();

                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(AnchorMatch {
                        neighbor,
                        candidate_anchor,
                        neighbor_anchor,
                        candidate_point,
                        neighbor_point,
                        distance,
                    });
                }
            }
        }
    }

    Ok(best)
}

/// Position that puts the candidate's closest anchor onto a neighbor's anchor
///
/// Returns the candidate's current world position when it has no geometry or
/// nothing lies within `range`. The candidate's height is always preserved.
///
/// # Arguments
/// * `scene` - Scene containing the candidate at its raw target position
/// * `query` - Spatial query used for neighbor discovery
/// * `candidate` - Root of the object being placed
/// * `range` - Horizontal detection padding
/// * `shrink` - Shrink factor for the candidate volume
pub fn compute_snapped_position<Q: SpatialQuery + ?Sized>(
    scene: &Scene,
    query: &Q,
    candidate: NodeId,
    range: f32,
    shrink: f32,
) -> Result<Vector3<f32>> {
    let position = scene.world_position(candidate)?;

    let neighbors = find_neighbors(scene, query, candidate, range, shrink);
    let Some(best) = best_anchor_match(scene, candidate, &neighbors)? else {
        return Ok(position);
    };

    let mut snapped = best.neighbor_point + (position - best.candidate_point);
    snapped.y = position.y;

    debug!(
        "Smart snap: {:?} anchor onto {:?} anchor of {} ({:.3} away)",
        best.candidate_anchor, best.neighbor_anchor, best.neighbor, best.distance
    );
    Ok(snapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Transform;
    use crate::scene::{ExactOverlapQuery, Prefab, PrefabId, PrefabNode};
    use cgmath::{Deg, Quaternion, Rotation3};

    fn block() -> Prefab {
        Prefab::single_box(
            PrefabId(1),
            "Block",
            "Blocks",
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 2.0),
        )
    }

    fn place(scene: &mut Scene, prefab: &Prefab, position: Vector3<f32>) -> NodeId {
        let id = scene.instantiate(prefab, None).unwrap();
        scene.get_mut(id).unwrap().transform.translation = position;
        id
    }

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_anchor_points_follow_rotation() {
        let mut scene = Scene::new();
        let id = place(&mut scene, &block(), Vector3::new(5.0, 0.0, 0.0));
        scene.get_mut(id).unwrap().transform.rotation = Quaternion::from_angle_y(Deg(90.0));

        let anchors = anchor_points(&scene, id).unwrap();
        assert_close(anchors[0], Vector3::new(5.0, 0.0, 1.0));
        assert_close(anchors[1], Vector3::new(5.0, 0.0, 0.0));
        assert_close(anchors[2], Vector3::new(5.0, 0.0, -1.0));
    }

    #[test]
    fn test_anchor_points_without_geometry() {
        let mut scene = Scene::new();
        let empty = scene
            .add_node(
                crate::scene::SceneNode::new("empty", Transform::from_translation(Vector3::new(1.0, 2.0, 3.0))),
                None,
            )
            .unwrap();

        let anchors = anchor_points(&scene, empty).unwrap();
        assert!(anchors.iter().all(|a| *a == Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_snaps_right_edge_to_left_edge() {
        let mut scene = Scene::new();
        let prefab = block();
        let candidate = place(&mut scene, &prefab, Vector3::new(0.0, 0.0, 0.0));
        place(&mut scene, &prefab, Vector3::new(3.0, 0.0, 0.0));

        let snapped = compute_snapped_position(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9).unwrap();
        assert_close(snapped, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_is_unchanged() {
        let mut scene = Scene::new();
        let prefab = block();
        let candidate = place(&mut scene, &prefab, Vector3::new(0.0, 0.0, 0.0));
        place(&mut scene, &prefab, Vector3::new(3.0, 0.0, 5.0));

        let snapped = compute_snapped_position(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9).unwrap();
        assert_eq!(snapped, Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_keeps_candidate_height() {
        let mut scene = Scene::new();
        let prefab = block();
        let candidate = place(&mut scene, &prefab, Vector3::new(0.0, 0.5, 0.0));
        place(&mut scene, &prefab, Vector3::new(-3.0, 0.0, 0.0));

        let snapped = compute_snapped_position(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9).unwrap();
        assert_close(snapped, Vector3::new(-1.0, 0.5, 0.0));
    }

    fn pair() -> Prefab {
        let part = |x: f32| {
            PrefabNode::new("part", Transform::from_translation(Vector3::new(x, 0.0, 0.0))).with_geometry(
                crate::geometry::Aabb::from_center_size(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)),
            )
        };
        let root = PrefabNode::new("pair", Transform::identity())
            .with_child(part(-0.5))
            .with_child(part(0.5));
        Prefab::new(PrefabId(7), "Pair", "Props", root)
    }

    #[test]
    fn test_multi_part_neighbor_counts_once() {
        let pair = pair();
        let mut scene = Scene::new();
        let candidate = place(&mut scene, &block(), Vector3::new(0.0, 0.0, 0.0));
        let neighbor = place(&mut scene, &pair, Vector3::new(2.5, 0.0, 0.0));

        let neighbors = find_neighbors(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9);
        assert_eq!(neighbors, vec![neighbor]);
    }

    #[test]
    fn test_multi_part_candidate_skips_own_parts() {
        let mut scene = Scene::new();
        let candidate = place(&mut scene, &pair(), Vector3::new(0.0, 0.0, 0.0));
        let neighbor = place(&mut scene, &block(), Vector3::new(3.0, 0.0, 0.0));

        let neighbors = find_neighbors(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9);
        assert_eq!(neighbors, vec![neighbor]);
        assert!(scene.get(candidate).unwrap().children().iter().all(|part| !neighbors.contains(part)));
    }

    #[test]
    fn test_deactivated_neighbor_is_ignored() {
        let mut scene = Scene::new();
        let candidate = place(&mut scene, &block(), Vector3::new(0.0, 0.0, 0.0));
        let hidden = place(&mut scene, &pair(), Vector3::new(2.5, 0.0, 0.0));
        let visible = place(&mut scene, &block(), Vector3::new(-3.0, 0.0, 0.0));
        scene.get_mut(hidden).unwrap().active = false;

        let neighbors = find_neighbors(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9);
        assert_eq!(neighbors, vec![visible]);
    }

    #[test]
    fn test_tie_prefers_first_neighbor() {
        let mut scene = Scene::new();
        let prefab = block();
        let candidate = place(&mut scene, &prefab, Vector3::new(0.0, 0.0, 0.0));
        let first = place(&mut scene, &prefab, Vector3::new(3.0, 0.0, 0.0));
        place(&mut scene, &prefab, Vector3::new(-3.0, 0.0, 0.0));

        let neighbors = find_neighbors(&scene, &ExactOverlapQuery, candidate, 3.0, 0.9);
        let best = best_anchor_match(&scene, candidate, &neighbors).unwrap().unwrap();
        assert_eq!(best.neighbor, first);
        assert_eq!(best.candidate_anchor, AnchorPosition::Right);
        assert_eq!(best.neighbor_anchor, AnchorPosition::Left);
    }

    #[test]
    fn test_detection_volume_shape() {
        let mut scene = Scene::new();
        let candidate = place(&mut scene, &block(), Vector3::new(0.0, 0.0, 0.0));

        let detection = detection_volume(&scene, candidate, 3.0, 0.9).unwrap();
        assert_close(detection.half_extents, Vector3::new(3.9, 0.81, 3.9));
    }
}
