//! HexBots Core - Robot Scheduling Simulation Engine
//!
//! An ECS-based simulation of a small robot fleet. In the house deployment
//! robots walk a hex-grid home, keep their needs topped up at furniture and
//! work through a prioritized chore queue. In the solar deployment probes
//! fly between orbital bodies on missions that unlock new stages.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Robots
//! - **Components**: Pure data attached to entities (Location, Needs, Behavior, etc.)
//! - **Systems**: Logic that queries and updates components
//!
//! Grid, pathfinding, needs, the work queue and milestones are plain data
//! structures from `hexbots-logic`; this crate wires them to the ECS world.
//!
//! # Example
//!
//! ```rust,no_run
//! use hexbots_core::prelude::*;
//!
//! let mut engine = SimulationEngine::house(42).unwrap();
//!
//! // Run simulation
//! loop {
//!     engine.tick(1.0 / 60.0); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

pub mod components;
pub mod engine;
pub mod error;
pub mod generation;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{AgentSnapshot, Deployment, SimulationEngine};
    pub use crate::error::SimError;
    pub use hexbots_logic::catalog::WorkTarget;
    pub use hexbots_logic::events::SimEvent;
    pub use hexbots_logic::ids::{AgentId, WorkId};
}
