//! Planar positions and nearest access point selection.

use serde::{Deserialize, Serialize};

use crate::domain::NodeId;
use crate::error::{ControlError, ControlResult};

/// A node position on the floor plan, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Return the id of the access point closest to `station`.
///
/// Linear scan over `candidates` in the given order. Ties keep the first
/// candidate seen, so the result is deterministic for a fixed input order.
///
/// # Errors
///
/// [`ControlError::NoAccessPoints`] when `candidates` is empty.
pub fn nearest(candidates: &[(NodeId, Position)], station: Position) -> ControlResult<NodeId> {
    let mut best: Option<(NodeId, f64)> = None;
    for (id, pos) in candidates {
        let d = pos.distance_to(&station);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((*id, d)),
        }
    }
    best.map(|(id, _)| id).ok_or(ControlError::NoAccessPoints)
}
