//! Where a robot is and where it is going.

use std::collections::VecDeque;

use hexbots_logic::hex::Hex;
use hexbots_logic::ids::BodyId;
use serde::{Deserialize, Serialize};

/// Current position: a grid cell, an orbit, or somewhere in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Location {
    Cell(Hex),
    Orbit(BodyId),
    InTransit { from: BodyId, to: BodyId },
}

impl Location {
    pub fn cell(&self) -> Option<Hex> {
        match self {
            Location::Cell(hex) => Some(*hex),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Location::Orbit(body) => Some(body),
            _ => None,
        }
    }
}

/// Remaining motion. Present only while a robot has somewhere to go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Route {
    /// Cells still to step through, next first.
    Walk {
        steps: VecDeque<Hex>,
        /// Fraction of the next step already covered.
        progress: f32,
    },
    /// Interplanetary leg.
    Flight { to: BodyId, remaining_hours: f32 },
}

impl Route {
    pub fn walk(path: Vec<Hex>) -> Self {
        Route::Walk {
            steps: path.into(),
            progress: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        match self {
            Route::Walk { steps, .. } => steps.is_empty(),
            Route::Flight { remaining_hours, .. } => *remaining_hours <= 0.0,
        }
    }

    /// Waypoints left (flights count as one).
    pub fn len(&self) -> usize {
        match self {
            Route::Walk { steps, .. } => steps.len(),
            Route::Flight { .. } => usize::from(!self.is_finished()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
