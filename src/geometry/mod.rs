//! # Geometry Primitives
//!
//! Math building blocks shared by the scene graph and the placement code.
//!
//! ## Supported Primitives
//!
//! - **Transform**: translation / rotation / non-uniform scale (`T * R * S`)
//! - **Aabb**: axis-aligned boxes for mesh bounds and broad-phase rejects
//! - **OrientedBox**: boxes with their own frame, with an exact overlap test
//! - **Ray / PlacementSurface**: cursor rays and the horizontal build plane
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::{Deg, Quaternion, Rotation3, Vector3};
//! use haggis_placement::geometry::OrientedBox;
//!
//! let a = OrientedBox::axis_aligned(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
//! let b = OrientedBox::new(
//!     Vector3::new(1.5, 0.0, 0.0),
//!     Vector3::new(1.0, 1.0, 1.0),
//!     Quaternion::from_angle_y(Deg(30.0)),
//! );
//! assert!(a.intersects(&b));
//! ```

pub mod bounds;
pub mod oriented;
pub mod ray;
pub mod transform;

pub use bounds::Aabb;
pub use oriented::OrientedBox;
pub use ray::{PlacementSurface, Ray};
pub use transform::Transform;
