//! Oriented boxes and the separating-axis overlap test.

use cgmath::{InnerSpace, Matrix4, Quaternion, Rotation, Vector3};

use super::bounds::Aabb;

/// Projections closer than this are treated as touching, not overlapping.
const CONTACT_TOLERANCE: f32 = 1e-5;

/// Cross products shorter than this come from (nearly) parallel edges.
const PARALLEL_EPSILON: f32 = 1e-6;

/// A box with its own orthonormal frame in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// World-space center
    pub center: Vector3<f32>,
    /// Half edge lengths along each local axis
    pub half_extents: Vector3<f32>,
    /// Local X, Y and Z axes in world space (unit length)
    pub axes: [Vector3<f32>; 3],
}

impl OrientedBox {
    /// Box at `center` rotated by `rotation`
    pub fn new(center: Vector3<f32>, half_extents: Vector3<f32>, rotation: Quaternion<f32>) -> Self {
        Self {
            center,
            half_extents,
            axes: [
                rotation.rotate_vector(Vector3::unit_x()),
                rotation.rotate_vector(Vector3::unit_y()),
                rotation.rotate_vector(Vector3::unit_z()),
            ],
        }
    }

    /// World-aligned box
    pub fn axis_aligned(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            center,
            half_extents,
            axes: [Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z()],
        }
    }

    /// Place a local-space box into world space through `matrix`.
    ///
    /// The matrix columns give the box frame; their lengths scale the
    /// half-extents. The matrix is assumed free of shear.
    pub fn from_local_bounds(bounds: &Aabb, matrix: &Matrix4<f32>) -> Self {
        let center = (*matrix * bounds.center().extend(1.0)).truncate();
        let columns = [matrix.x.truncate(), matrix.y.truncate(), matrix.z.truncate()];
        let units = [Vector3::unit_x(), Vector3::unit_y(), Vector3::unit_z()];
        let half = bounds.half_extents();
        let local_half = [half.x, half.y, half.z];

        let mut axes = units;
        let mut scaled = [0.0; 3];
        for i in 0..3 {
            let length = columns[i].magnitude();
            if length > f32::EPSILON {
                axes[i] = columns[i] / length;
            }
            scaled[i] = local_half[i] * length;
        }

        Self {
            center,
            half_extents: Vector3::new(scaled[0], scaled[1], scaled[2]),
            axes,
        }
    }

    /// The eight world-space corners
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let ex = self.axes[0] * self.half_extents.x;
        let ey = self.axes[1] * self.half_extents.y;
        let ez = self.axes[2] * self.half_extents.z;
        let c = self.center;
        [
            c - ex - ey - ez,
            c + ex - ey - ez,
            c - ex + ey - ez,
            c - ex - ey + ez,
            c + ex + ey - ez,
            c + ex - ey + ez,
            c - ex + ey + ez,
            c + ex + ey + ez,
        ]
    }

    /// Tight world-aligned bounds of this box
    pub fn to_aabb(&self) -> Aabb {
        let reach = Vector3::new(
            self.radius_along(Vector3::unit_x()),
            self.radius_along(Vector3::unit_y()),
            self.radius_along(Vector3::unit_z()),
        );
        Aabb::from_center_half_extents(self.center, reach)
    }

    /// Returns `true` if `point` is inside the box grown by `tolerance`
    pub fn contains_point(&self, point: Vector3<f32>, tolerance: f32) -> bool {
        let offset = point - self.center;
        let half = [self.half_extents.x, self.half_extents.y, self.half_extents.z];
        self.axes
            .iter()
            .zip(half)
            .all(|(axis, h)| offset.dot(*axis).abs() <= h + tolerance)
    }

    /// Half the length of this box's shadow on `axis` (unit length expected)
    fn radius_along(&self, axis: Vector3<f32>) -> f32 {
        self.axes[0].dot(axis).abs() * self.half_extents.x
            + self.axes[1].dot(axis).abs() * self.half_extents.y
            + self.axes[2].dot(axis).abs() * self.half_extents.z
    }

    /// True if the interiors of the two boxes overlap.
    ///
    /// Separating axis test over both face normal sets and the nine edge
    /// cross products. Touching faces or edges are NOT counted as overlap.
    pub fn intersects(&self, other: &OrientedBox) -> bool {
        let delta = other.center - self.center;

        let separated_on = |axis: Vector3<f32>| -> bool {
            let distance = delta.dot(axis).abs();
            distance >= self.radius_along(axis) + other.radius_along(axis) - CONTACT_TOLERANCE
        };

        for axis in self.axes.iter().chain(other.axes.iter()) {
            if separated_on(*axis) {
                return false;
            }
        }

        for a in &self.axes {
            for b in &other.axes {
                let cross = a.cross(*b);
                let length = cross.magnitude();
                if length < PARALLEL_EPSILON {
                    continue;
                }
                if separated_on(cross / length) {
                    return false;
                }
            }
        }

        true
    }
}
