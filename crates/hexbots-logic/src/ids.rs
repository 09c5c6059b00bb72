//! Identifier newtypes shared across the queue, tracker and engine.

use serde::{Deserialize, Serialize};

/// Unique, monotonically assigned work item id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkId(pub u64);

impl std::fmt::Display for WorkId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Robot id; also the fixed processing order within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// Orbital body id, e.g. `"earth"`, `"moon"`.
pub type BodyId = String;

/// Room/zone id, e.g. `"kitchen"`.
pub type ZoneId = String;
