//! # Placement Module
//!
//! The placement pipeline that runs every editor tick while an object is
//! being positioned.
//!
//! ## Pipeline
//!
//! 1. [`volume`] - merge an object's geometry into one oriented bounding volume
//! 2. [`smart_snap`] - pull the candidate onto the nearest neighbor anchor
//! 3. [`grid`] - round to the grid when smart snap has nothing to offer
//! 4. [`overlap`] - reject positions that intersect existing content
//! 5. [`controller`] - the state machine tying the steps together
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use haggis_placement::placement::{PlacementConfig, PlacementController, PlacementInput, TickOutcome};
//! use haggis_placement::scene::{Prefab, PrefabId, Scene};
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
//! let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
//! controller.select(&mut scene, &block).unwrap();
//!
//! let tick = controller
//!     .update(&mut scene, &PlacementInput::at(Vector3::new(2.0, 0.0, 0.0)))
//!     .unwrap();
//! if let TickOutcome::Updated(state) = tick {
//!     assert!(state.is_valid);
//! }
//! ```

pub mod config;
pub mod controller;
pub mod grid;
pub mod overlap;
pub mod smart_snap;
pub mod volume;

pub use config::{PlacementConfig, PlacementInput, DEFAULT_DETECTION_RANGE, DEFAULT_ROTATION_STEP};
pub use controller::{
    ConfirmOutcome, PlacementController, PlacementEvent, PlacementPhase, PlacementState, RotationDirection,
    TickOutcome,
};
pub use grid::{snap_to_grid, GridIncrement};
pub use overlap::{check_overlap, OverlapReport};
pub use smart_snap::{
    anchor_points, best_anchor_match, compute_snapped_position, detection_volume, find_neighbors, AnchorMatch,
    AnchorPosition, VERTICAL_TOLERANCE,
};
pub use volume::{compute_volume, local_bounds, BoundingVolume, DEFAULT_SHRINK_FACTOR};
