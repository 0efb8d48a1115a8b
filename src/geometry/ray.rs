//! # Cursor Rays and Placement Surfaces
//!
//! Turns a cursor position into a target point on the horizontal plane the
//! user is building on.
//!
//! 1. **Screen to Ray**: unproject the cursor through the inverse view-projection
//! 2. **Ray to Surface**: intersect the ray with the plane `y = height`
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use haggis_placement::geometry::ray::{PlacementSurface, Ray};
//!
//! let surface = PlacementSurface::new(0.0);
//! let ray = Ray::new(Vector3::new(0.0, 10.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
//! assert_eq!(surface.project(&ray), Some(Vector3::new(0.0, 0.0, 0.0)));
//! ```

use cgmath::{InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }

    /// Convert screen coordinates to a world-space ray
    ///
    /// # Arguments
    /// * `screen_pos` - Cursor position in pixels, origin top-left
    /// * `screen_size` - Viewport size in pixels
    /// * `view_proj` - Camera projection * view matrix
    ///
    /// Returns `None` when the matrix cannot be inverted or the viewport is empty.
    pub fn from_screen(
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        view_proj: &Matrix4<f32>,
    ) -> Option<Self> {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;
        if screen_width <= 0.0 || screen_height <= 0.0 {
            return None;
        }

        // Convert screen coordinates to normalized device coordinates (-1 to 1)
        let ndc_x = (2.0 * mouse_x) / screen_width - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height; // Flip Y axis

        let inv_view_proj = view_proj.invert()?;

        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);
        if world_near.w.abs() <= f32::EPSILON || world_far.w.abs() <= f32::EPSILON {
            return None;
        }

        // Convert from homogeneous coordinates
        let near_3d = world_near.truncate() / world_near.w;
        let far_3d = world_far.truncate() / world_far.w;

        let direction = far_3d - near_3d;
        if direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        Some(Ray::new(near_3d, direction))
    }
}

/// Horizontal construction plane that objects are placed on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSurface {
    /// World Y of the plane
    pub height: f32,
}

impl PlacementSurface {
    /// Create a surface at the given height
    pub fn new(height: f32) -> Self {
        Self { height }
    }

    /// Intersection of `ray` with the plane, or `None` if the ray is parallel
    /// to it or points away from it
    pub fn project(&self, ray: &Ray) -> Option<Vector3<f32>> {
        let denom = ray.direction.y;
        if denom.abs() <= f32::EPSILON {
            return None;
        }
        let t = (self.height - ray.origin.y) / denom;
        if t < 0.0 {
            return None;
        }
        Some(ray.point_at(t))
    }
}

impl Default for PlacementSurface {
    fn default() -> Self {
        Self::new(0.0)
    }
}
