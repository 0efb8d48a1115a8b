use cgmath::{ElementWise, Matrix4, One, Quaternion, Rotation, Vector3};

/// Translation / rotation / non-uniform scale of a scene node.
///
/// Matrices are built as `T * R * S` (scale first, then rotation, then
/// translation), the same order the renderer uses for object transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in parent space
    pub translation: Vector3<f32>,
    /// Unit quaternion rotation
    pub rotation: Quaternion<f32>,
    /// Per-axis scale, applied before rotation
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transform (no translation, no rotation, unit scale)
    pub fn identity() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Create a transform from all three components
    pub fn new(translation: Vector3<f32>, rotation: Quaternion<f32>, scale: Vector3<f32>) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Pure translation
    pub fn from_translation(translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..Self::identity()
        }
    }

    /// Replace the rotation
    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale
    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    /// Column-major 4x4 matrix for this transform
    pub fn to_matrix(&self) -> Matrix4<f32> {
        let t = Matrix4::from_translation(self.translation);
        let r = Matrix4::from(self.rotation);
        let s = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        t * r * s // Order matters: T * R * S
    }

    /// Map a point from this transform's local space into its parent space
    pub fn transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        self.translation + self.rotation.rotate_vector(point.mul_element_wise(self.scale))
    }

    /// Map a point from parent space back into local space
    ///
    /// Zero scale components collapse that axis to 0 instead of producing NaN.
    pub fn inverse_transform_point(&self, point: Vector3<f32>) -> Vector3<f32> {
        let unrotated = self.rotation.invert().rotate_vector(point - self.translation);
        Vector3::new(
            safe_div(unrotated.x, self.scale.x),
            safe_div(unrotated.y, self.scale.y),
            safe_div(unrotated.z, self.scale.z),
        )
    }

    /// Compose `self` (parent) with `child` (expressed in parent space).
    ///
    /// Translation and rotation compose exactly; scale composes per axis, which
    /// is exact unless a rotated child sits under a non-uniformly scaled parent.
    pub fn then(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: self.rotation * child.rotation,
            scale: self.scale.mul_element_wise(child.scale),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

fn safe_div(value: f32, divisor: f32) -> f32 {
    if divisor.abs() <= f32::EPSILON {
        0.0
    } else {
        value / divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, InnerSpace, Rotation3};

    fn close(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_matrix_matches_point_transform() {
        let transform = Transform::new(
            Vector3::new(1.0, 2.0, 3.0),
            Quaternion::from_angle_y(Deg(30.0)),
            Vector3::new(2.0, 1.0, 0.5),
        );
        let point = Vector3::new(0.5, -1.0, 4.0);
        let via_matrix = (transform.to_matrix() * point.extend(1.0)).truncate();

        assert!(close(via_matrix, transform.transform_point(point)));
    }

    #[test]
    fn test_inverse_round_trip() {
        let transform = Transform::new(
            Vector3::new(-4.0, 0.5, 9.0),
            Quaternion::from_angle_y(Deg(-75.0)),
            Vector3::new(1.5, 3.0, 0.25),
        );
        let point = Vector3::new(3.0, 1.0, -2.0);
        let local = transform.inverse_transform_point(point);

        assert!(close(transform.transform_point(local), point));
    }

    #[test]
    fn test_compose_rotated_parent() {
        let parent = Transform::from_translation(Vector3::new(10.0, 0.0, 0.0))
            .with_rotation(Quaternion::from_angle_y(Deg(90.0)));
        let child = Transform::from_translation(Vector3::new(1.0, 0.0, 0.0));
        let world = parent.then(&child);

        // +X in the child's parent rotates onto -Z
        assert!(close(world.translation, Vector3::new(10.0, 0.0, -1.0)));
        assert!(close(
            world.transform_point(Vector3::new(0.0, 0.0, 0.0)),
            parent.transform_point(child.translation)
        ));
    }
}
