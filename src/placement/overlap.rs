//! Overlap validation for the placement candidate.

use crate::scene::{NodeId, Scene, SpatialQuery};

use super::volume::compute_volume;

/// Result of an overlap check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlapReport {
    /// Scene nodes intersecting the candidate, in query order
    pub blockers: Vec<NodeId>,
}

impl OverlapReport {
    /// Placement is valid when nothing blocks it
    pub fn is_valid(&self) -> bool {
        self.blockers.is_empty()
    }
}

/// Tests the candidate's shrunk bounding volume against the rest of the scene
///
/// The candidate and anything parented under it never count as blockers. A
/// candidate without geometry always passes.
///
/// # Arguments
/// * `scene` - Scene containing the candidate
/// * `query` - Spatial query used to find intersecting nodes
/// * `candidate` - Root of the object being placed
/// * `shrink` - Shrink factor for the candidate volume
pub fn check_overlap<Q: SpatialQuery + ?Sized>(
    scene: &Scene,
    query: &Q,
    candidate: NodeId,
    shrink: f32,
) -> OverlapReport {
    let Some(volume) = compute_volume(scene, candidate, shrink) else {
        return OverlapReport::default();
    };

    let blockers = query
        .overlapping(scene, &volume.to_box(), Some(candidate))
        .into_iter()
        .filter(|hit| !scene.is_descendant_of(*hit, candidate))
        .collect();

    OverlapReport { blockers }
}
