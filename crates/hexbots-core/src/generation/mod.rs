//! Generation - building worlds and robots from layout data.

mod house;
mod solar;

pub use house::*;
pub use solar::*;
