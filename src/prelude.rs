//! # Haggis Placement Prelude
//!
//! Commonly used types for driving the placement engine from an editor.
//!
//! ## Usage
//!
//! ```rust
//! use haggis_placement::prelude::*;
//!
//! let mut scene = Scene::new();
//! let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
//!
//! let pillar = Prefab::single_box(
//!     PrefabId(4),
//!     "Pillar",
//!     "Structure",
//!     Vector3::new(0.0, 1.5, 0.0),
//!     Vector3::new(0.5, 3.0, 0.5),
//! );
//! controller.select(&mut scene, &pillar).unwrap();
//! controller.rotate(&mut scene, RotationDirection::Clockwise).unwrap();
//! assert_eq!(controller.phase(), PlacementPhase::Previewing);
//! ```

// Re-export error types
pub use crate::error::PlacementError;

// Re-export geometry primitives
pub use crate::geometry::{Aabb, OrientedBox, PlacementSurface, Ray, Transform};

// Re-export scene graph types
pub use crate::scene::{ExactOverlapQuery, NodeId, Prefab, PrefabId, PrefabNode, Scene, SceneNode, SpatialQuery};

// Re-export the placement pipeline
pub use crate::placement::{
    ConfirmOutcome, GridIncrement, PlacementConfig, PlacementController, PlacementEvent, PlacementInput,
    PlacementPhase, PlacementState, RotationDirection, TickOutcome,
};

// Re-export common external dependencies
pub use cgmath::{Deg, InnerSpace, Quaternion, Rotation3, Vector3, Zero};
