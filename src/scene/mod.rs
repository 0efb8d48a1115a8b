//! # Scene Graph Module
//!
//! Hierarchical scene storage for the placement engine: nodes with local
//! transforms and optional mesh bounds, prefab templates, and the spatial
//! query used to find overlapping content.
//!
//! ## Key Components
//!
//! - [`Scene`] - Id-keyed node arena with parent links and world transforms
//! - [`SceneNode`] - A single node (name, transform, geometry, active flag)
//! - [`Prefab`] - Owned template tree that can be stamped into the scene
//! - [`SpatialQuery`] - Overlap query seam, implemented by [`ExactOverlapQuery`]
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use haggis_placement::geometry::OrientedBox;
//! use haggis_placement::scene::{ExactOverlapQuery, Prefab, PrefabId, Scene, SpatialQuery};
//!
//! let crate_box = Prefab::single_box(
//!     PrefabId(1),
//!     "Crate",
//!     "Props",
//!     Vector3::new(0.0, 0.0, 0.0),
//!     Vector3::new(1.0, 1.0, 1.0),
//! );
//!
//! let mut scene = Scene::new();
//! let placed = scene.instantiate(&crate_box, None).unwrap();
//!
//! let probe = OrientedBox::axis_aligned(Vector3::new(0.25, 0.0, 0.0), Vector3::new(0.5, 0.5, 0.5));
//! assert_eq!(ExactOverlapQuery.overlapping(&scene, &probe, None), vec![placed]);
//! ```

pub mod object;
pub mod prefab;
pub mod query;
pub mod scene;

pub use object::{NodeId, SceneNode};
pub use prefab::{Prefab, PrefabId, PrefabNode};
pub use query::{ExactOverlapQuery, SpatialQuery};
pub use scene::{level_group_name, Ancestors, Scene};
