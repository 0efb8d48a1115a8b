//! Uniform grid snapping.

use cgmath::Vector3;

use crate::error::{PlacementError, Result};

/// Per-axis grid step, always finite and strictly positive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridIncrement(Vector3<f32>);

impl GridIncrement {
    /// Validates and wraps a per-axis step
    pub fn new(step: Vector3<f32>) -> Result<Self> {
        for (axis, value) in [('x', step.x), ('y', step.y), ('z', step.z)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlacementError::InvalidGridIncrement { axis, value });
            }
        }
        Ok(Self(step))
    }

    /// Same step on every axis
    pub fn uniform(step: f32) -> Result<Self> {
        Self::new(Vector3::new(step, step, step))
    }

    /// Per-axis step, every component positive
    pub fn step(&self) -> Vector3<f32> {
        self.0
    }
}

impl Default for GridIncrement {
    fn default() -> Self {
        Self(Vector3::new(1.0, 1.0, 1.0))
    }
}

/// Rounds each axis of `position` to the nearest multiple of its step
///
/// Halfway values round to the even multiple.
///
/// ```rust
/// use cgmath::Vector3;
/// use haggis_placement::placement::{snap_to_grid, GridIncrement};
///
/// let snapped = snap_to_grid(Vector3::new(1.46, 0.2, 2.51), &GridIncrement::default());
/// assert_eq!(snapped, Vector3::new(1.0, 0.0, 3.0));
/// ```
pub fn snap_to_grid(position: Vector3<f32>, increment: &GridIncrement) -> Vector3<f32> {
    let step = increment.0;
    Vector3::new(
        snap_axis(position.x, step.x),
        snap_axis(position.y, step.y),
        snap_axis(position.z, step.z),
    )
}

fn snap_axis(value: f32, step: f32) -> f32 {
    (value / step).round_ties_even() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_unit_grid() {
        let snapped = snap_to_grid(Vector3::new(1.46, 0.2, 2.51), &GridIncrement::default());
        assert_eq!(snapped, Vector3::new(1.0, 0.0, 3.0));
    }

    #[test]
    fn test_snap_mixed_steps() {
        let increment = GridIncrement::new(Vector3::new(0.5, 2.0, 0.25)).unwrap();
        let snapped = snap_to_grid(Vector3::new(1.3, 2.9, -0.3), &increment);
        assert_eq!(snapped, Vector3::new(1.5, 2.0, -0.25));
    }

    #[test]
    fn test_halfway_rounds_to_even() {
        let snapped = snap_to_grid(Vector3::new(0.5, 1.5, -2.5), &GridIncrement::default());
        assert_eq!(snapped, Vector3::new(0.0, 2.0, -2.0));
    }

    #[test]
    fn test_rejects_bad_increment() {
        assert_eq!(
            GridIncrement::new(Vector3::new(1.0, 0.0, 1.0)),
            Err(PlacementError::InvalidGridIncrement { axis: 'y', value: 0.0 })
        );
        assert!(GridIncrement::uniform(-1.0).is_err());
        assert!(GridIncrement::new(Vector3::new(1.0, 1.0, f32::NAN)).is_err());
    }
}
