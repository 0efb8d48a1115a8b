//! Placement tuning values and per-tick input signals.

use cgmath::Vector3;

use crate::error::{PlacementError, Result};

use super::grid::GridIncrement;
use super::volume::DEFAULT_SHRINK_FACTOR;

/// Default reach of the smart-snap neighbor search, in world units
pub const DEFAULT_DETECTION_RANGE: f32 = 3.0;

/// Default rotation applied per rotate command, in degrees
pub const DEFAULT_ROTATION_STEP: f32 = 15.0;

/// Long-lived placement settings
///
/// ```rust
/// use haggis_placement::placement::PlacementConfig;
///
/// let config = PlacementConfig::default()
///     .with_detection_range(2.0)
///     .with_surface_height(2.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Factor applied to bounding volumes so flush neighbors do not collide
    pub shrink_factor: f32,
    /// Horizontal padding of the smart-snap detection box
    pub detection_range: f32,
    /// Degrees turned per rotate command
    pub rotation_step_degrees: f32,
    /// Height of the build surface; selects the level group for placed objects
    pub surface_height: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            shrink_factor: DEFAULT_SHRINK_FACTOR,
            detection_range: DEFAULT_DETECTION_RANGE,
            rotation_step_degrees: DEFAULT_ROTATION_STEP,
            surface_height: 0.0,
        }
    }
}

impl PlacementConfig {
    /// Scale applied to the candidate volume before overlap tests
    pub fn with_shrink_factor(mut self, shrink_factor: f32) -> Self {
        self.shrink_factor = shrink_factor;
        self
    }

    /// Horizontal reach of the neighbor search, in world units
    pub fn with_detection_range(mut self, range: f32) -> Self {
        self.detection_range = range;
        self
    }

    /// Yaw applied per rotate command, in degrees
    pub fn with_rotation_step(mut self, degrees: f32) -> Self {
        self.rotation_step_degrees = degrees;
        self
    }

    /// Height of the build surface and of the level group placements land in
    pub fn with_surface_height(mut self, height: f32) -> Self {
        self.surface_height = height;
        self
    }

    /// Checks every value is finite and in range
    pub fn validate(&self) -> Result<()> {
        if !self.shrink_factor.is_finite() || self.shrink_factor <= 0.0 || self.shrink_factor > 1.0 {
            return Err(PlacementError::InvalidConfig(format!(
                "shrink factor must be in (0, 1], got {}",
                self.shrink_factor
            )));
        }
        if !self.detection_range.is_finite() || self.detection_range < 0.0 {
            return Err(PlacementError::InvalidConfig(format!(
                "detection range must be non-negative, got {}",
                self.detection_range
            )));
        }
        if !self.rotation_step_degrees.is_finite() {
            return Err(PlacementError::InvalidConfig(format!(
                "rotation step must be finite, got {}",
                self.rotation_step_degrees
            )));
        }
        if !self.surface_height.is_finite() {
            return Err(PlacementError::InvalidConfig(format!(
                "surface height must be finite, got {}",
                self.surface_height
            )));
        }
        Ok(())
    }
}

/// Signals sampled from the editor every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementInput {
    /// World-space point under the cursor, `None` when nothing is hit
    pub target: Option<Vector3<f32>>,
    /// Snap to the grid when smart snap is off or finds nothing
    pub grid_snap: bool,
    /// Grid step per axis
    pub grid_increment: GridIncrement,
    /// Align with nearby objects
    pub smart_snap: bool,
    /// Collision override modifier currently held
    pub collision_override: bool,
}

impl Default for PlacementInput {
    fn default() -> Self {
        Self {
            target: None,
            grid_snap: false,
            grid_increment: GridIncrement::default(),
            smart_snap: true,
            collision_override: false,
        }
    }
}

impl PlacementInput {
    /// Default signals aimed at `target`
    pub fn at(target: Vector3<f32>) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    /// Turns grid snapping on with the given increment
    pub fn with_grid(mut self, increment: GridIncrement) -> Self {
        self.grid_snap = true;
        self.grid_increment = increment;
        self
    }

    /// Enables or disables anchor snapping for this tick
    pub fn with_smart_snap(mut self, enabled: bool) -> Self {
        self.smart_snap = enabled;
        self
    }

    /// Holds the override modifier, latched for the next confirm
    pub fn with_collision_override(mut self, enabled: bool) -> Self {
        self.collision_override = enabled;
        self
    }
}
