//! Work queue - pending/active/completed work items and auto-spawning.
//!
//! `pending` is kept sorted by descending priority with insertion order
//! preserved among equal priorities, so the head is always the next item to
//! hand out. `completed` is a bounded history; the oldest entry is evicted
//! first.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, TargetChoice, Trigger, WorkDef, WorkTarget};
use crate::constants::queue::COMPLETED_CAPACITY;
use crate::error::QueueError;
use crate::events::{EventSink, SimEvent};
use crate::ids::{AgentId, BodyId};

pub use crate::ids::WorkId;

/// Lifecycle of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkState {
    Pending,
    Active,
    Completed,
}

/// A unit of schedulable labor (a task in the house, a mission in space).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: WorkId,
    pub kind: String,
    pub label: String,
    /// Higher is more urgent.
    pub priority: i32,
    pub target: WorkTarget,
    /// Work time in sim minutes.
    pub duration_minutes: f32,
    pub assignee: Option<AgentId>,
    pub state: WorkState,
    /// Sim hour the item was created at
    pub created_at: f64,
}

/// Stage information the scheduler needs to pick mission kinds and bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnContext<'a> {
    pub stage: u32,
    pub unlocked: &'a [BodyId],
}

/// Priority queue of work items plus the auto-spawn schedule.
#[derive(Debug, Clone)]
pub struct WorkQueue {
    catalog: Catalog,
    pending: Vec<WorkItem>,
    active: Vec<WorkItem>,
    completed: VecDeque<WorkItem>,
    capacity: usize,
    next_id: u64,
    now: f64,
    last_spawn_hour: Option<i64>,
    /// Countdown per schedule entry (random-interval entries only).
    random_timers: Vec<Option<f32>>,
}

impl WorkQueue {
    pub fn new(catalog: Catalog) -> Self {
        Self::with_capacity(catalog, COMPLETED_CAPACITY)
    }

    /// Queue remembering at most `capacity` completed items.
    pub fn with_capacity(catalog: Catalog, capacity: usize) -> Self {
        let random_timers = vec![None; catalog.schedule.len()];
        Self {
            catalog,
            pending: Vec::new(),
            active: Vec::new(),
            completed: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_id: 1,
            now: 0.0,
            last_spawn_hour: None,
            random_timers,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Create a work item of `kind` at `target`.
    ///
    /// Returns `None` without side effects if the kind is unknown or an
    /// identical (kind, target) item is already pending.
    pub fn add_item(
        &mut self,
        kind: &str,
        target: WorkTarget,
        sink: &mut impl EventSink,
    ) -> Option<WorkId> {
        let Some(def) = self.catalog.def(kind) else {
            log::warn!("ignoring request for unknown work kind `{}`", kind);
            return None;
        };
        if self
            .pending
            .iter()
            .any(|i| i.kind == kind && i.target == target)
        {
            return None;
        }

        let item = WorkItem {
            id: WorkId(self.next_id),
            kind: def.kind.clone(),
            label: def.label.clone(),
            priority: def.priority,
            target,
            duration_minutes: def.duration_minutes,
            assignee: None,
            state: WorkState::Pending,
            created_at: self.now,
        };
        self.next_id += 1;

        // After every item of equal or higher priority
        let at = self
            .pending
            .iter()
            .position(|i| i.priority < item.priority)
            .unwrap_or(self.pending.len());

        log::debug!("work {} added: {} at {}", item.id, item.kind, item.target);
        sink.emit(SimEvent::ItemAdded {
            id: item.id,
            kind: item.kind.clone(),
            target: item.target.clone(),
            priority: item.priority,
        });
        let id = item.id;
        self.pending.insert(at, item);
        Some(id)
    }

    /// Run the spawn schedule.
    ///
    /// `clock_hour` is the total simulated hours; `elapsed_hours` is the time
    /// since the previous call. Hour triggers are evaluated once for every
    /// integer hour boundary crossed; random-interval triggers count down
    /// continuously. Returns the ids of spawned items.
    pub fn schedule_tick(
        &mut self,
        clock_hour: f64,
        elapsed_hours: f32,
        ctx: SpawnContext<'_>,
        rng: &mut impl Rng,
        sink: &mut impl EventSink,
    ) -> Vec<WorkId> {
        self.now = clock_hour;
        let mut spawned = Vec::new();
        let hour = clock_hour.floor() as i64;

        let first = match self.last_spawn_hour {
            None => Some(hour),
            Some(last) if hour > last => Some((last + 1).max(hour - 23)),
            Some(_) => None,
        };
        if let Some(first) = first {
            self.last_spawn_hour = Some(hour);
            for h in first..=hour {
                let hour_of_day = h.rem_euclid(24) as u32;
                for idx in 0..self.catalog.schedule.len() {
                    let fires = match &self.catalog.schedule[idx].trigger {
                        Trigger::AtHours { hours } => hours.contains(&hour_of_day),
                        Trigger::Every { every } => *every > 0 && hour_of_day % every == 0,
                        Trigger::RandomInterval { .. } => false,
                    };
                    if fires {
                        spawned.extend(self.fire(idx, ctx, rng, sink));
                    }
                }
            }
        }

        for idx in 0..self.catalog.schedule.len() {
            let Trigger::RandomInterval { min, max } = self.catalog.schedule[idx].trigger else {
                continue;
            };
            let remaining = self.random_timers[idx]
                .unwrap_or_else(|| roll_interval(rng, min, max))
                - elapsed_hours.max(0.0);
            if remaining <= 0.0 {
                spawned.extend(self.fire(idx, ctx, rng, sink));
                self.random_timers[idx] = Some(roll_interval(rng, min, max));
            } else {
                self.random_timers[idx] = Some(remaining);
            }
        }

        spawned
    }

    fn fire(
        &mut self,
        idx: usize,
        ctx: SpawnContext<'_>,
        rng: &mut impl Rng,
        sink: &mut impl EventSink,
    ) -> Option<WorkId> {
        let entry = &self.catalog.schedule[idx];
        let kind = match &entry.kind {
            Some(kind) => kind.clone(),
            None => {
                let available = self.catalog.available_at(ctx.stage);
                available.choose(rng).map(|d: &&WorkDef| d.kind.clone())?
            }
        };
        let target = match &entry.target {
            TargetChoice::Default => match self.catalog.default_target(&kind) {
                Some(target) => target,
                None => WorkTarget::Body(ctx.unlocked.choose(rng)?.clone()),
            },
            TargetChoice::RandomZone { zones } => WorkTarget::Zone(Some(zones.choose(rng)?.clone())),
            TargetChoice::RandomUnlockedBody => WorkTarget::Body(ctx.unlocked.choose(rng)?.clone()),
        };
        self.add_item(&kind, target, sink)
    }

    /// Highest-priority pending item nobody has claimed.
    pub fn next_unassigned(&self) -> Option<&WorkItem> {
        self.pending.iter().find(|i| i.assignee.is_none())
    }

    /// Move a pending item to active under `agent`.
    pub fn assign(
        &mut self,
        id: WorkId,
        agent: AgentId,
        sink: &mut impl EventSink,
    ) -> Result<&WorkItem, QueueError> {
        let Some(idx) = self.pending.iter().position(|i| i.id == id) else {
            return Err(self.misplaced(id, QueueError::NotPending(id)));
        };
        let mut item = self.pending.remove(idx);
        item.assignee = Some(agent);
        item.state = WorkState::Active;

        log::debug!("work {} ({}) assigned to {}", item.id, item.kind, agent);
        sink.emit(SimEvent::ItemAssigned { id, agent });
        self.active.push(item);
        Ok(&self.active[self.active.len() - 1])
    }

    /// Move an active item to the completed history and return a copy.
    pub fn complete(&mut self, id: WorkId, sink: &mut impl EventSink) -> Result<WorkItem, QueueError> {
        let Some(idx) = self.active.iter().position(|i| i.id == id) else {
            return Err(self.misplaced(id, QueueError::NotActive(id)));
        };
        let mut item = self.active.swap_remove(idx);
        item.state = WorkState::Completed;

        log::debug!("work {} ({}) completed", item.id, item.kind);
        sink.emit(SimEvent::ItemCompleted {
            id,
            kind: item.kind.clone(),
            agent: item.assignee,
        });
        self.completed.push_back(item.clone());
        while self.completed.len() > self.capacity {
            self.completed.pop_front();
        }
        Ok(item)
    }

    fn misplaced(&self, id: WorkId, err: QueueError) -> QueueError {
        if self.get(id).is_some() {
            err
        } else {
            QueueError::UnknownItem(id)
        }
    }

    /// Look up an item in any of the three collections.
    pub fn get(&self, id: WorkId) -> Option<&WorkItem> {
        self.pending
            .iter()
            .chain(self.active.iter())
            .chain(self.completed.iter())
            .find(|i| i.id == id)
    }

    pub fn pending(&self) -> &[WorkItem] {
        &self.pending
    }

    pub fn active(&self) -> &[WorkItem] {
        &self.active
    }

    /// Oldest first.
    pub fn completed(&self) -> impl Iterator<Item = &WorkItem> {
        self.completed.iter()
    }

    pub fn completed_len(&self) -> usize {
        self.completed.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Pending and active items, pending first.
    pub fn open_items(&self) -> impl Iterator<Item = &WorkItem> {
        self.pending.iter().chain(self.active.iter())
    }
}

fn roll_interval(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
