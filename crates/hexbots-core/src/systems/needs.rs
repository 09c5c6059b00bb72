//! Needs system - decays robot needs over time.

use hecs::World;
use hexbots_logic::needs::{NeedKind, NeedsConfig};

use crate::components::{Behavior, Needs, Robot};

/// Decay every robot's needs by `delta_hours`. Working robots burn energy
/// at the working rate.
pub fn needs_system(world: &mut World, delta_hours: f32, config: &NeedsConfig) {
    for (_, (_, behavior, needs)) in world.query_mut::<(&Robot, &Behavior, &mut Needs)>() {
        needs.decay(delta_hours, behavior.state.is_working(), config);
    }
}

/// Robots with a need below its threshold, and which one.
pub fn find_urgent_needs(world: &World, config: &NeedsConfig) -> Vec<(hecs::Entity, NeedKind)> {
    let mut urgent = Vec::new();

    for (entity, (_, needs)) in world.query::<(&Robot, &Needs)>().iter() {
        if let Some(need) = needs.most_urgent(config) {
            urgent.push((entity, need));
        }
    }

    urgent
}
