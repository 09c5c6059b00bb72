//! Work catalog - the kinds of work items and when they spawn.
//!
//! Catalogs are static content loaded from JSON. A catalog is validated
//! once at load time so the queue can trust every kind it references.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::grid::{Cell, StationKind};
use crate::ids::{BodyId, ZoneId};

/// Where a work kind is performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetSpec {
    /// At the nearest station of this kind.
    Station { station: StationKind },
    /// Next to any station inside a room (`None` = any room).
    Zone {
        #[serde(default)]
        zone: Option<ZoneId>,
    },
    /// At an orbital body chosen when the item is created.
    Body,
}

/// Side effects of completing a work kind, beyond the completion itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionEffect {
    #[default]
    None,
    /// Counts as a base built on the target body.
    BuildBase,
    /// Counts as a colony on the target body.
    EstablishColony,
}

/// Definition of one work kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkDef {
    pub kind: String,
    pub label: String,
    /// Higher is more urgent.
    pub priority: i32,
    /// Work time in sim minutes.
    pub duration_minutes: f32,
    pub target: TargetSpec,
    /// Lowest progression stage at which this kind may auto-spawn.
    #[serde(default)]
    pub stage: u32,
    #[serde(default)]
    pub effect: CompletionEffect,
}

/// The concrete target of a work item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum WorkTarget {
    Station(StationKind),
    Zone(Option<ZoneId>),
    Body(BodyId),
}

impl WorkTarget {
    /// Does a grid cell serve as the station for this target?
    ///
    /// Body targets never match a cell.
    pub fn matches_cell(&self, cell: &Cell) -> bool {
        match self {
            WorkTarget::Station(kind) => cell.station == Some(*kind),
            WorkTarget::Zone(zone) => {
                cell.station.is_some()
                    && zone.as_deref().map_or(true, |z| cell.in_zone(z))
            }
            WorkTarget::Body(_) => false,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            WorkTarget::Body(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkTarget::Station(kind) => write!(f, "{}", kind.label()),
            WorkTarget::Zone(Some(zone)) => write!(f, "{}", zone),
            WorkTarget::Zone(None) => write!(f, "any room"),
            WorkTarget::Body(id) => write!(f, "{}", id),
        }
    }
}

/// When a scheduled entry fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// At each listed hour of the day.
    AtHours { hours: Vec<u32> },
    /// Whenever `hour % every == 0`.
    Every { every: u32 },
    /// After a random delay in `[min, max)` sim hours, re-armed after firing.
    RandomInterval { min: f32, max: f32 },
}

/// How a scheduled entry picks the target of the item it spawns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetChoice {
    /// The work kind's own target.
    #[default]
    Default,
    /// A random room from the list.
    RandomZone { zones: Vec<ZoneId> },
    /// A random body unlocked at the current stage.
    RandomUnlockedBody,
}

/// One auto-spawn rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Work kind to spawn; `None` picks any kind allowed by the stage.
    #[serde(default)]
    pub kind: Option<String>,
    pub trigger: Trigger,
    #[serde(default)]
    pub target: TargetChoice,
}

/// A validated set of work kinds and spawn rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub work: Vec<WorkDef>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

impl Catalog {
    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for def in &self.work {
            if !seen.insert(def.kind.as_str()) {
                return Err(CatalogError::Duplicate(def.kind.clone()));
            }
        }
        for entry in &self.schedule {
            if let Some(kind) = &entry.kind {
                if !seen.contains(kind.as_str()) {
                    return Err(CatalogError::UnknownKind(kind.clone()));
                }
            }
            if let Trigger::RandomInterval { min, max } = entry.trigger {
                if !(min > 0.0 && max >= min) {
                    return Err(CatalogError::EmptyInterval {
                        kind: entry.kind.clone().unwrap_or_else(|| "*".into()),
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn def(&self, kind: &str) -> Option<&WorkDef> {
        self.work.iter().find(|d| d.kind == kind)
    }

    /// Kinds that may auto-spawn at `stage`, in catalog order.
    pub fn available_at(&self, stage: u32) -> Vec<&WorkDef> {
        self.work.iter().filter(|d| d.stage <= stage).collect()
    }

    /// The target a kind uses when none is chosen explicitly.
    /// Body kinds have no default.
    pub fn default_target(&self, kind: &str) -> Option<WorkTarget> {
        match &self.def(kind)?.target {
            TargetSpec::Station { station } => Some(WorkTarget::Station(*station)),
            TargetSpec::Zone { zone } => Some(WorkTarget::Zone(zone.clone())),
            TargetSpec::Body => None,
        }
    }
}
