//! # Geometry Aggregation
//!
//! Builds one oriented bounding volume for an object out of every geometry
//! leaf in its subtree.
//!
//! Leaves are brought into the object's own local frame, merged there, and
//! the merged box is then placed in the world with the object's rotation. The
//! result follows the object when it turns instead of growing the way a
//! world-aligned box would.

use cgmath::{ElementWise, Quaternion, Vector3};

use crate::geometry::{Aabb, OrientedBox};
use crate::scene::{NodeId, Scene};

/// Scale applied to computed volumes so objects sitting flush against each
/// other do not register as overlapping
pub const DEFAULT_SHRINK_FACTOR: f32 = 0.90;

/// World-space oriented bounding volume of an object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// World-space center
    pub center: Vector3<f32>,
    /// Full extents along the volume's own axes
    pub size: Vector3<f32>,
    /// Same as the owning object's world rotation
    pub rotation: Quaternion<f32>,
}

impl BoundingVolume {
    /// Half of `size` on each local axis
    pub fn half_extents(&self) -> Vector3<f32> {
        self.size * 0.5
    }

    /// The volume as an overlap-testable box
    pub fn to_box(&self) -> OrientedBox {
        OrientedBox::new(self.center, self.half_extents(), self.rotation)
    }
}

/// Union of all active geometry leaves under `object`, in `object`'s local
/// frame
///
/// Returns `None` if the node is missing or has no active geometry.
pub fn local_bounds(scene: &Scene, object: NodeId) -> Option<Aabb> {
    let mut merged: Option<Aabb> = None;

    for id in scene.active_subtree(object) {
        let Some(geometry) = scene.node(id).and_then(|node| node.geometry) else {
            continue;
        };
        let to_root = scene.relative_matrix(object, id).ok()?;
        let bounds = geometry.transformed(&to_root);

        match merged.as_mut() {
            Some(total) => total.encapsulate(&bounds),
            None => merged = Some(bounds),
        }
    }

    merged
}

/// Computes the oriented bounding volume of `object`
///
/// # Arguments
/// * `scene` - Scene holding the object
/// * `object` - Root of the object hierarchy
/// * `shrink` - Uniform factor applied to the final size
///
/// # Returns
/// `None` when the object has no active geometry leaves
pub fn compute_volume(scene: &Scene, object: NodeId, shrink: f32) -> Option<BoundingVolume> {
    let local = local_bounds(scene, object)?;
    let world = scene.world_transform(object).ok()?;
    let matrix = scene.world_matrix(object).ok()?;

    let scale = Vector3::new(world.scale.x.abs(), world.scale.y.abs(), world.scale.z.abs());
    let center = (matrix * local.center().extend(1.0)).truncate();
    let size = local.size().mul_element_wise(scale) * shrink;

    Some(BoundingVolume {
        center,
        size,
        rotation: world.rotation,
    })
}
