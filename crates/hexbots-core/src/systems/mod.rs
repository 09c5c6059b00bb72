//! Systems - logic that operates on components

mod agents;
mod assignment;
mod behavior;
mod movement;
mod needs;

pub use agents::*;
pub use assignment::*;
pub use behavior::*;
pub use movement::*;
pub use needs::*;
