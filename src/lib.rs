// src/lib.rs
//! Haggis Placement
//!
//! Interactive placement of modular 3D objects: oriented bounding volumes,
//! overlap validation, anchor-based smart snapping and grid snapping, driven
//! by a tick-based placement controller.

pub mod error;
pub mod geometry;
pub mod placement;
pub mod prelude;
pub mod scene;

// Re-export main types for convenience
pub use error::{PlacementError, Result};
pub use placement::PlacementController;
pub use scene::Scene;
