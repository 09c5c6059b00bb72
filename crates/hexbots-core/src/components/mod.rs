//! Component definitions for the ECS simulation.
//!
//! Components are pure data structs attached to robot entities.
//! They have no behavior - that lives in systems.

mod motion;
mod robot;

pub use motion::*;
pub use robot::*;

pub use hexbots_logic::needs::Needs;
