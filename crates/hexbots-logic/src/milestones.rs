//! Progression - cumulative statistics and the stage ladder.
//!
//! Stage 1 is where every run starts. Only the stage directly after the
//! current one is ever evaluated, so a check advances at most one step, and
//! stages never regress.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::CompletionEffect;
use crate::error::CatalogError;
use crate::events::{EventSink, SimEvent};
use crate::ids::BodyId;
use crate::work_queue::WorkItem;

/// What a stage needs before it is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageRequirement {
    /// Total completed work items.
    MissionsCompleted { count: u32 },
    /// At least one base on a specific body.
    BaseBuilt { target: BodyId },
    /// Bases on this many distinct bodies.
    BasesCount { count: usize },
    /// This many distinct bodies visited, home included.
    PlanetsVisited { count: usize },
    /// Colonies on this many distinct bodies.
    ColoniesCount { count: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDef {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub requirement: StageRequirement,
    /// Bodies that become mission targets once this stage is reached.
    #[serde(default)]
    pub unlocks: Vec<BodyId>,
}

/// Ordered stage definitions, ids `1..=n`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageLadder {
    pub stages: Vec<StageDef>,
}

impl StageLadder {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let ladder: StageLadder = serde_json::from_str(json)?;
        for (i, stage) in ladder.stages.iter().enumerate() {
            let expected = i as u32 + 1;
            if stage.id != expected {
                return Err(CatalogError::StageOrder {
                    expected,
                    found: stage.id,
                });
            }
        }
        Ok(ladder)
    }

    /// Every body referenced by the ladder must exist.
    pub fn check_bodies(&self, known: &[BodyId]) -> Result<(), CatalogError> {
        for stage in &self.stages {
            let mut bodies: Vec<&BodyId> = stage.unlocks.iter().collect();
            if let StageRequirement::BaseBuilt { target } = &stage.requirement {
                bodies.push(target);
            }
            if let Some(missing) = bodies.into_iter().find(|b| !known.contains(b)) {
                return Err(CatalogError::UnknownBody {
                    stage: stage.id,
                    body: missing.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&StageDef> {
        self.stages.get(id.checked_sub(1)? as usize)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Cumulative statistics feeding the ladder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: u32,
    pub visited: BTreeSet<BodyId>,
    /// Base count per body.
    pub bases: BTreeMap<BodyId, u32>,
    pub colonies: BTreeSet<BodyId>,
}

impl Progress {
    fn meets(&self, requirement: &StageRequirement) -> bool {
        match requirement {
            StageRequirement::MissionsCompleted { count } => self.completed >= *count,
            StageRequirement::BaseBuilt { target } => {
                self.bases.get(target).copied().unwrap_or(0) > 0
            }
            StageRequirement::BasesCount { count } => self.bases.len() >= *count,
            StageRequirement::PlanetsVisited { count } => self.visited.len() >= *count,
            StageRequirement::ColoniesCount { count } => self.colonies.len() >= *count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MilestoneTracker {
    ladder: StageLadder,
    stage: u32,
    home: BodyId,
    progress: Progress,
}

impl MilestoneTracker {
    /// Start at stage 1 with `home` already visited.
    pub fn new(ladder: StageLadder, home: impl Into<BodyId>) -> Self {
        let home = home.into();
        let mut progress = Progress::default();
        progress.visited.insert(home.clone());
        Self {
            ladder,
            stage: 1,
            home,
            progress,
        }
    }

    pub fn current_stage(&self) -> u32 {
        self.stage
    }

    pub fn current_def(&self) -> Option<&StageDef> {
        self.ladder.get(self.stage)
    }

    pub fn next_def(&self) -> Option<&StageDef> {
        self.ladder.get(self.stage + 1)
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn ladder(&self) -> &StageLadder {
        &self.ladder
    }

    /// Count a completed work item and apply its effect.
    ///
    /// Returns the new stage if this advanced it.
    pub fn record_completion(
        &mut self,
        item: &WorkItem,
        effect: CompletionEffect,
        sink: &mut impl EventSink,
    ) -> Option<u32> {
        self.progress.completed += 1;
        match (effect, item.target.body()) {
            (CompletionEffect::BuildBase, Some(body)) => self.add_base(body, sink),
            (CompletionEffect::EstablishColony, Some(body)) => {
                self.progress.colonies.insert(body.to_string());
            }
            _ => {}
        }
        self.check_advancement(sink)
    }

    fn add_base(&mut self, body: &str, sink: &mut impl EventSink) {
        *self.progress.bases.entry(body.to_string()).or_insert(0) += 1;
        sink.emit(SimEvent::StationBuilt { body: body.to_string() });
    }

    pub fn record_visit(&mut self, body: &str, sink: &mut impl EventSink) -> Option<u32> {
        self.progress.visited.insert(body.to_string());
        self.check_advancement(sink)
    }

    /// Advance one stage if the next stage's requirement is met.
    pub fn check_advancement(&mut self, sink: &mut impl EventSink) -> Option<u32> {
        let next = self.ladder.get(self.stage + 1)?;
        if !self.progress.meets(&next.requirement) {
            return None;
        }
        self.stage = next.id;
        log::info!("stage {} reached: {}", next.id, next.name);
        sink.emit(SimEvent::StageAdvanced {
            stage: next.id,
            name: next.name.clone(),
        });
        Some(self.stage)
    }

    /// Home plus every body unlocked by a reached stage, without repeats.
    pub fn unlocked_targets(&self) -> Vec<BodyId> {
        let mut unlocked = vec![self.home.clone()];
        for stage in self.ladder.stages.iter().take(self.stage as usize) {
            for body in &stage.unlocks {
                if !unlocked.contains(body) {
                    unlocked.push(body.clone());
                }
            }
        }
        unlocked
    }
}
