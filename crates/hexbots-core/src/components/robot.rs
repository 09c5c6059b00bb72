//! Robot identity and behavior state.

use std::collections::BTreeSet;

use hexbots_logic::ids::{AgentId, BodyId, WorkId};
use hexbots_logic::needs::NeedKind;
use serde::{Deserialize, Serialize};

/// Marker + identity for robot entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Robot {
    pub id: AgentId,
    pub name: String,
}

/// State entered when a `Moving` route runs out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AfterMove {
    Idle,
    Working,
    Recovering(NeedKind),
    /// Enter orbit around a body.
    Arrive(BodyId),
}

/// Behavior state machine states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentState {
    Idle,
    Moving { then: AfterMove },
    Working,
    /// Refilling one need at a station.
    Recovering(NeedKind),
    /// Lifting off towards a body.
    Launching { to: BodyId },
    /// Entering orbit around a body.
    Arriving(BodyId),
}

impl AgentState {
    pub fn name(&self) -> &'static str {
        match self {
            AgentState::Idle => "idle",
            AgentState::Moving { .. } => "moving",
            AgentState::Working => "working",
            AgentState::Recovering(need) => need.activity(),
            AgentState::Launching { .. } => "launching",
            AgentState::Arriving(_) => "arriving",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, AgentState::Idle)
    }

    pub fn is_working(&self) -> bool {
        matches!(self, AgentState::Working)
    }
}

/// Per-robot state machine data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    pub state: AgentState,
    /// Real seconds until the next wander step.
    pub wander_timer: f32,
    /// Sim minutes left in the current work or recovery session.
    pub timer: f32,
    /// Launch progress, 0..1.
    pub launch_progress: f32,
    /// Work item this robot holds (assigned, travelling or working).
    pub work: Option<WorkId>,
}

impl Behavior {
    pub fn idle(wander_timer: f32) -> Self {
        Self {
            state: AgentState::Idle,
            wander_timer,
            timer: 0.0,
            launch_progress: 0.0,
            work: None,
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::idle(0.0)
    }
}

/// Bodies a probe has been to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visited(pub BTreeSet<BodyId>);
