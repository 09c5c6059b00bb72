//! Error types for contract violations and bad content data.
//!
//! Routine absence (no cell, no path, no pending work) is never an error;
//! those queries return `Option`.

use thiserror::Error;

use crate::hex::Hex;
use crate::ids::WorkId;

/// A work item was moved through the queue out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("work item {0} is not pending")]
    NotPending(WorkId),
    #[error("work item {0} is not active")]
    NotActive(WorkId),
    #[error("work item {0} does not exist")]
    UnknownItem(WorkId),
}

/// Content tables that fail to load or reference each other inconsistently.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schedule references unknown work kind `{0}`")]
    UnknownKind(String),
    #[error("random interval for `{kind}` is empty ({min}..{max})")]
    EmptyInterval { kind: String, min: f32, max: f32 },
    #[error("stage {stage} references unknown body `{body}`")]
    UnknownBody { stage: u32, body: String },
    #[error("catalog defines `{0}` twice")]
    Duplicate(String),
    #[error("stage at position {expected} has id {found}")]
    StageOrder { expected: u32, found: u32 },
    #[error("{need} threshold {threshold} is not below the satisfied level {satisfied}")]
    ThresholdNotBelowSatisfied {
        need: &'static str,
        threshold: f32,
        satisfied: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("no cell at {0}")]
    NoCell(Hex),
    #[error("cell {0} is a wall")]
    Wall(Hex),
}
