//! Solar generation - bodies, the stage ladder and the probe fleet.

use std::collections::BTreeSet;

use hecs::{Entity, World};
use hexbots_logic::bodies::SolarLayout;
use hexbots_logic::constants::robots::NAMES;
use hexbots_logic::ids::AgentId;
use hexbots_logic::milestones::StageLadder;

use crate::components::{Behavior, Location, Robot, Visited};
use crate::error::SimError;

pub const SOLAR_BODIES_JSON: &str = include_str!("../../../../data/solar_bodies.json");
pub const STAGES_JSON: &str = include_str!("../../../../data/stages.json");
pub const MISSIONS_JSON: &str = include_str!("../../../../data/missions.json");

/// Every probe starts here, and it counts as visited.
pub const HOME_BODY: &str = "earth";

/// Load the bodies and a ladder whose every body exists.
pub fn load_solar(bodies_json: &str, stages_json: &str) -> Result<(SolarLayout, StageLadder), SimError> {
    let bodies = SolarLayout::from_json(bodies_json)?;
    let ladder = StageLadder::from_json(stages_json)?;
    ladder.check_bodies(&bodies.ids())?;
    if bodies.get(HOME_BODY).is_none() {
        return Err(SimError::UnknownHome(HOME_BODY.to_string()));
    }
    Ok((bodies, ladder))
}

/// Spawn the probe fleet in orbit around the home body.
pub fn spawn_probes(world: &mut World, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| {
            let name = NAMES
                .get(i)
                .map_or_else(|| format!("HEX-{:02}", i + 1), |n| n.to_string());
            world.spawn((
                Robot {
                    id: AgentId(i as u32 + 1),
                    name,
                },
                Location::Orbit(HOME_BODY.to_string()),
                Behavior::default(),
                Visited(BTreeSet::from([HOME_BODY.to_string()])),
            ))
        })
        .collect()
}
