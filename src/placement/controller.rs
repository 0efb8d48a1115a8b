//! # Placement Controller
//!
//! Drives the preview candidate through its lifecycle:
//!
//! - **Idle**: nothing selected
//! - **Previewing**: a candidate follows the cursor every tick, snapping and
//!   validating as it goes
//!
//! Confirming a valid (or overridden) preview stamps a permanent copy into
//! the scene and keeps previewing, so the same object can be placed again
//! right away.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use haggis_placement::placement::{ConfirmOutcome, PlacementConfig, PlacementController, PlacementInput};
//! use haggis_placement::scene::{Prefab, PrefabId, Scene};
//!
//! let wall = Prefab::single_box(
//!     PrefabId(1),
//!     "Wall",
//!     "Walls",
//!     Vector3::new(0.0, 1.0, 0.0),
//!     Vector3::new(2.0, 2.0, 0.2),
//! );
//!
//! let mut scene = Scene::new();
//! let mut controller = PlacementController::new(PlacementConfig::default()).unwrap();
//!
//! controller.select(&mut scene, &wall).unwrap();
//! controller
//!     .update(&mut scene, &PlacementInput::at(Vector3::new(4.0, 0.0, 0.0)))
//!     .unwrap();
//!
//! let outcome = controller.confirm(&mut scene, false).unwrap();
//! assert!(matches!(outcome, ConfirmOutcome::Placed(_)));
//! ```

use cgmath::{Deg, One, Quaternion, Rotation3, Vector3};
use log::{debug, info, warn};

use crate::error::Result;
use crate::geometry::OrientedBox;
use crate::scene::{ExactOverlapQuery, NodeId, Prefab, PrefabId, Scene, SpatialQuery};

use super::config::{PlacementConfig, PlacementInput};
use super::grid::snap_to_grid;
use super::overlap::check_overlap;
use super::smart_snap::{compute_snapped_position, detection_volume};
use super::volume::compute_volume;

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPhase {
    /// No prefab selected
    Idle,
    /// A candidate follows the cursor
    Previewing,
}

/// Snapshot of the candidate after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementState {
    /// Final (snapped) world position
    pub position: Vector3<f32>,
    /// Accumulated user rotation
    pub rotation: Quaternion<f32>,
    /// Whether the candidate may be placed here without an override
    pub is_valid: bool,
}

/// Result of [`PlacementController::update`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Nothing is selected
    Idle,
    /// No target this tick; the candidate keeps its last pose
    Held,
    /// The candidate moved and was revalidated
    Updated(PlacementState),
}

/// Result of [`PlacementController::confirm`]
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    /// Nothing is selected
    NoSelection,
    /// The candidate has not been moved to a target since it was selected
    Unpositioned,
    /// A permanent instance was created
    Placed(NodeId),
    /// The candidate overlaps these nodes and no override was given
    Rejected { blockers: Vec<NodeId> },
}

/// Notifications for the host editor, collected until drained
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    /// A permanent instance of `prefab` was created as `node`
    Placed { node: NodeId, prefab: PrefabId },
    /// The candidate was removed and the controller went idle
    SelectionCleared,
    /// A confirm was refused because of `blockers`
    Rejected { blockers: Vec<NodeId> },
}

/// Turn direction around the world up axis, as seen from above
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    CounterClockwise,
    Clockwise,
}

impl RotationDirection {
    fn sign(self) -> f32 {
        match self {
            RotationDirection::CounterClockwise => 1.0,
            RotationDirection::Clockwise => -1.0,
        }
    }
}

#[derive(Debug)]
struct Candidate {
    node: NodeId,
    prefab: Prefab,
}

/// Interactive placement state machine
///
/// Owns the only handle to the preview candidate. All scene access goes
/// through the `&mut Scene` passed to each call.
#[derive(Debug)]
pub struct PlacementController<Q: SpatialQuery = ExactOverlapQuery> {
    config: PlacementConfig,
    query: Q,
    candidate: Option<Candidate>,
    rotation: Quaternion<f32>,
    state: Option<PlacementState>,
    blockers: Vec<NodeId>,
    override_held: bool,
    events: Vec<PlacementEvent>,
}

impl PlacementController<ExactOverlapQuery> {
    /// Controller using the exact scan query
    pub fn new(config: PlacementConfig) -> Result<Self> {
        Self::with_query(config, ExactOverlapQuery)
    }
}

impl<Q: SpatialQuery> PlacementController<Q> {
    /// Controller using a custom spatial query
    pub fn with_query(config: PlacementConfig, query: Q) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            query,
            candidate: None,
            rotation: Quaternion::one(),
            state: None,
            blockers: Vec::new(),
            override_held: false,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// Replaces the configuration after validating it
    pub fn set_config(&mut self, config: PlacementConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn phase(&self) -> PlacementPhase {
        if self.candidate.is_some() {
            PlacementPhase::Previewing
        } else {
            PlacementPhase::Idle
        }
    }

    /// State from the most recent tick, if any
    pub fn state(&self) -> Option<&PlacementState> {
        self.state.as_ref()
    }

    /// Handle of the preview candidate
    pub fn candidate(&self) -> Option<NodeId> {
        self.candidate.as_ref().map(|c| c.node)
    }

    pub fn selected_prefab(&self) -> Option<PrefabId> {
        self.candidate.as_ref().map(|c| c.prefab.id)
    }

    /// Accumulated user rotation
    pub fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    /// Nodes that blocked the candidate on the last validation
    pub fn last_blockers(&self) -> &[NodeId] {
        &self.blockers
    }

    /// Takes all pending events, oldest first
    pub fn drain_events(&mut self) -> Vec<PlacementEvent> {
        std::mem::take(&mut self.events)
    }

    /// Selects a prefab for placement
    ///
    /// Selecting the prefab that is already active keeps the candidate and
    /// its rotation. Any other prefab replaces the candidate and resets the
    /// rotation. A candidate removed from the scene behind the controller's
    /// back is rebuilt, even for the same prefab.
    pub fn select(&mut self, scene: &mut Scene, prefab: &Prefab) -> Result<()> {
        let same_prefab = self.selected_prefab() == Some(prefab.id);
        if same_prefab {
            match self.candidate() {
                Some(node) if scene.contains(node) => return Ok(()),
                Some(node) => warn!("Candidate {} for {} is gone from the scene, rebuilding", node, prefab.name),
                None => {}
            }
        }

        self.destroy_candidate(scene)?;
        let node = scene.instantiate(prefab, None)?;
        self.candidate = Some(Candidate {
            node,
            prefab: prefab.clone(),
        });
        if !same_prefab {
            self.rotation = Quaternion::one();
        }
        self.state = None;
        self.blockers.clear();

        info!("Selected {} for placement", prefab.name);
        Ok(())
    }

    /// Moves the candidate to this tick's target, snaps it and revalidates
    ///
    /// Smart snap runs first; the grid is used when smart snap is off or does
    /// not move the candidate. The collision override signal is latched for
    /// the next [`confirm`](Self::confirm).
    pub fn update(&mut self, scene: &mut Scene, input: &PlacementInput) -> Result<TickOutcome> {
        let Some(node) = self.candidate() else {
            return Ok(TickOutcome::Idle);
        };
        self.override_held = input.collision_override;
        let Some(target) = input.target else {
            return Ok(TickOutcome::Held);
        };

        scene.set_world_pose(node, target, self.rotation)?;

        let mut position = target;
        if input.smart_snap {
            let raw = scene.world_position(node)?;
            let snapped = compute_snapped_position(
                scene,
                &self.query,
                node,
                self.config.detection_range,
                self.config.shrink_factor,
            )?;
            if snapped != raw {
                position = snapped;
            }
        }
        if position == target && input.grid_snap {
            position = snap_to_grid(target, &input.grid_increment);
        }
        if position != target {
            scene.set_world_pose(node, position, self.rotation)?;
        }

        let is_valid = self.revalidate(scene, node);
        let state = PlacementState {
            position,
            rotation: self.rotation,
            is_valid,
        };
        self.state = Some(state);

        debug!("Preview at {:?}, valid: {}", position, is_valid);
        Ok(TickOutcome::Updated(state))
    }

    /// Turns the candidate one rotation step about the up axis
    ///
    /// The rotation accumulates until a different prefab is selected.
    pub fn rotate(&mut self, scene: &mut Scene, direction: RotationDirection) -> Result<()> {
        let Some(node) = self.candidate() else {
            return Ok(());
        };

        let step = Quaternion::from_angle_y(Deg(self.config.rotation_step_degrees * direction.sign()));
        self.rotation = self.rotation * step;

        let position = scene.world_position(node)?;
        scene.set_world_pose(node, position, self.rotation)?;
        let is_valid = self.revalidate(scene, node);

        if let Some(state) = self.state.as_mut() {
            state.rotation = self.rotation;
            state.is_valid = is_valid;
        }
        Ok(())
    }

    /// Places a permanent copy of the candidate at its current pose
    ///
    /// # Arguments
    /// * `scene` - Scene to place into
    /// * `override_collisions` - Place even if the candidate overlaps something.
    ///   The override held in the latest tick's [`PlacementInput`] counts too.
    ///
    /// # Returns
    /// The new instance, or the blockers that prevented placement
    pub fn confirm(&mut self, scene: &mut Scene, override_collisions: bool) -> Result<ConfirmOutcome> {
        let Some(node) = self.candidate() else {
            return Ok(ConfirmOutcome::NoSelection);
        };
        if self.state.is_none() {
            return Ok(ConfirmOutcome::Unpositioned);
        }

        let forced = override_collisions || self.override_held;
        let is_valid = self.revalidate(scene, node);
        if !is_valid && !forced {
            let blockers = self.blockers.clone();
            self.events.push(PlacementEvent::Rejected {
                blockers: blockers.clone(),
            });
            return Ok(ConfirmOutcome::Rejected { blockers });
        }

        let Some(candidate) = self.candidate.as_ref() else {
            return Ok(ConfirmOutcome::NoSelection);
        };
        let prefab = &candidate.prefab;

        let position = scene.world_position(node)?;
        let group = scene.placement_group(self.config.surface_height, &prefab.category)?;
        let placed = scene.instantiate(prefab, Some(group))?;
        scene.set_world_pose(placed, position, self.rotation)?;

        if !is_valid {
            info!("Placed {} at {:?} despite collisions", prefab.name, position);
        } else {
            info!("Placed {} at {:?}", prefab.name, position);
        }
        self.events.push(PlacementEvent::Placed {
            node: placed,
            prefab: prefab.id,
        });
        Ok(ConfirmOutcome::Placed(placed))
    }

    /// Abandons the current preview
    pub fn cancel(&mut self, scene: &mut Scene) -> Result<()> {
        self.clear_selection(scene)
    }

    /// Destroys the candidate and returns to idle
    pub fn clear_selection(&mut self, scene: &mut Scene) -> Result<()> {
        if self.candidate.is_none() {
            return Ok(());
        }

        self.destroy_candidate(scene)?;
        self.state = None;
        self.blockers.clear();
        self.override_held = false;
        self.events.push(PlacementEvent::SelectionCleared);
        info!("Selection cleared");
        Ok(())
    }

    /// The candidate's shrunk bounding volume, as used for validation
    pub fn overlap_volume(&self, scene: &Scene) -> Option<OrientedBox> {
        let node = self.candidate()?;
        compute_volume(scene, node, self.config.shrink_factor).map(|v| v.to_box())
    }

    /// The widened box used to look for smart-snap neighbors
    pub fn detection_volume(&self, scene: &Scene) -> Option<OrientedBox> {
        let node = self.candidate()?;
        detection_volume(scene, node, self.config.detection_range, self.config.shrink_factor)
    }

    fn destroy_candidate(&mut self, scene: &mut Scene) -> Result<()> {
        if let Some(candidate) = self.candidate.take() {
            if scene.contains(candidate.node) {
                scene.destroy(candidate.node)?;
            }
        }
        Ok(())
    }

    /// Runs the overlap check, stores the blockers and logs new ones
    fn revalidate(&mut self, scene: &Scene, node: NodeId) -> bool {
        let report = check_overlap(scene, &self.query, node, self.config.shrink_factor);

        if !report.is_valid() && report.blockers != self.blockers {
            let names: Vec<&str> = report
                .blockers
                .iter()
                .filter_map(|id| scene.node(*id).map(|n| n.name.as_str()))
                .collect();
            warn!(
                "Invalid placement: overlaps with {} object(s): {}",
                report.blockers.len(),
                names.join(", ")
            );
        }

        let is_valid = report.is_valid();
        self.blockers = report.blockers;
        is_valid
    }
}
