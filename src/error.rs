//! Error type shared by the scene graph and the placement controller.
//!
//! Degenerate geometry (no leaves, no neighbours, no cursor hit) is never an
//! error; it degrades to a no-op. These variants cover integration mistakes
//! such as stale node handles or bad configuration values.

use thiserror::Error;

use crate::scene::NodeId;

/// Errors raised by scene and placement operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlacementError {
    /// A handle refers to a node that was destroyed or never existed
    #[error("scene node {0} does not exist")]
    NodeNotFound(NodeId),

    /// Grid steps must be finite and strictly positive
    #[error("grid increment on the {axis} axis must be positive, got {value}")]
    InvalidGridIncrement {
        /// Axis name (`x`, `y` or `z`)
        axis: char,
        /// Rejected step
        value: f32,
    },

    /// A configuration value is out of range
    #[error("invalid placement config: {0}")]
    InvalidConfig(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, PlacementError>;
