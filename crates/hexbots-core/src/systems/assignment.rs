//! Assignment - matching idle robots to stations and work.
//!
//! Every plan is validated before anything is committed: a work item is
//! only moved to active once a path to its station exists, so an item that
//! cannot be served stays pending for the next attempt.

use hexbots_logic::bodies::SolarLayout;
use hexbots_logic::catalog::WorkTarget;
use hexbots_logic::events::EventSink;
use hexbots_logic::grid::HexGrid;
use hexbots_logic::hex::Hex;
use hexbots_logic::ids::{AgentId, WorkId};
use hexbots_logic::needs::{NeedKind, NeedsConfig};
use hexbots_logic::pathfinding::{approach_path, find_nearest};
use hexbots_logic::work_queue::WorkQueue;

/// Path from `at` to a reachable cell next to the nearest station serving
/// `need`.
pub fn plan_recovery(
    grid: &HexGrid,
    at: Hex,
    need: NeedKind,
    config: &NeedsConfig,
) -> Option<Vec<Hex>> {
    let recovery = config.recovery(need);
    let station = find_nearest(grid, at, |c| c.station.is_some_and(|s| recovery.serves(s)))?;
    approach_path(grid, station.hex, at)
}

/// Path from `at` to a reachable cell next to the nearest station matching
/// `target`.
pub fn plan_route_to(grid: &HexGrid, at: Hex, target: &WorkTarget) -> Option<Vec<Hex>> {
    let station = find_nearest(grid, at, |c| target.matches_cell(c))?;
    approach_path(grid, station.hex, at)
}

/// Hand the highest-priority pending task to a robot standing at `at`.
///
/// Returns the item and the path to its station, or `None` (leaving the
/// queue untouched) if there is no work or its station cannot be reached.
pub fn assign_task(
    grid: &HexGrid,
    queue: &mut WorkQueue,
    agent: AgentId,
    at: Hex,
    sink: &mut impl EventSink,
) -> Option<(WorkId, Vec<Hex>)> {
    let item = queue.next_unassigned()?;
    let id = item.id;
    let Some(path) = plan_route_to(grid, at, &item.target) else {
        log::debug!("{} cannot reach {} for work {}", agent, item.target, id);
        return None;
    };

    match queue.assign(id, agent, sink) {
        Ok(_) => Some((id, path)),
        Err(err) => {
            log::error!("assigning work {} to {}: {}", id, agent, err);
            debug_assert!(false, "{}", err);
            None
        }
    }
}

/// How a probe gets to its mission.
#[derive(Debug, Clone, PartialEq)]
pub enum MissionPlan {
    /// The mission is at the body the probe is orbiting.
    Here(WorkId),
    Fly {
        work: WorkId,
        to: String,
        hours: f32,
    },
}

/// Hand the highest-priority pending mission to a probe orbiting `at`.
pub fn assign_mission(
    bodies: &SolarLayout,
    queue: &mut WorkQueue,
    agent: AgentId,
    at: &str,
    flight_speed: f32,
    sink: &mut impl EventSink,
) -> Option<MissionPlan> {
    let item = queue.next_unassigned()?;
    let id = item.id;
    let Some(to) = item.target.body().map(str::to_string) else {
        log::debug!("work {} has no body target", id);
        return None;
    };
    let hours = bodies.transit_hours(at, &to, flight_speed)?;

    if let Err(err) = queue.assign(id, agent, sink) {
        log::error!("assigning mission {} to {}: {}", id, agent, err);
        debug_assert!(false, "{}", err);
        return None;
    }
    if to == at {
        Some(MissionPlan::Here(id))
    } else {
        Some(MissionPlan::Fly { work: id, to, hours })
    }
}
