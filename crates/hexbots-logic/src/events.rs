//! Outbound simulation events.
//!
//! Components never publish to a global bus. Every operation that has
//! something to report takes an explicit [`EventSink`]; the engine passes
//! its per-tick outbox and the host drains it. Delivery is synchronous and
//! fire-and-forget: nothing in the simulation reads these back.

use serde::{Deserialize, Serialize};

use crate::catalog::WorkTarget;
use crate::ids::{AgentId, BodyId, WorkId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    ItemAdded {
        id: WorkId,
        kind: String,
        target: WorkTarget,
        priority: i32,
    },
    ItemAssigned {
        id: WorkId,
        agent: AgentId,
    },
    ItemCompleted {
        id: WorkId,
        kind: String,
        agent: Option<AgentId>,
    },
    StageAdvanced {
        stage: u32,
        name: String,
    },
    StationBuilt {
        body: BodyId,
    },
    TargetVisited {
        agent: AgentId,
        body: BodyId,
    },
    /// Presentation hook: fired on every agent state transition.
    StateChanged {
        agent: AgentId,
        from: String,
        to: String,
    },
}

/// Receiver for outbound events.
pub trait EventSink {
    fn emit(&mut self, event: SimEvent);
}

impl EventSink for Vec<SimEvent> {
    fn emit(&mut self, event: SimEvent) {
        self.push(event);
    }
}

/// Discards everything.
impl EventSink for () {
    fn emit(&mut self, _event: SimEvent) {}
}
