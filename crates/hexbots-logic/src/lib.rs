//! Pure scheduling and navigation logic for HexBots.
//!
//! This crate contains everything about robot scheduling that does not need
//! an ECS world: hex geometry, the grid and its searches, needs, the work
//! queue and the progression ladder. Functions take plain data and return
//! results, so every rule here is unit-testable on its own.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`bodies`] | Orbital bodies and transit times |
//! | [`catalog`] | Work kinds, targets and spawn triggers (JSON content) |
//! | [`clock`] | Simulated time from real seconds |
//! | [`config`] | Runtime tuning with defaults |
//! | [`constants`] | Default tunables |
//! | [`error`] | Queue contract violations and content errors |
//! | [`events`] | Outbound events and the sinks that receive them |
//! | [`grid`] | Hex cells, walkability, station placement |
//! | [`hex`] | Axial coordinates, distance, neighbors, world transforms |
//! | [`ids`] | Work item and agent identifiers |
//! | [`milestones`] | Stage ladder fed by completions, bases and visits |
//! | [`needs`] | Decaying needs, urgency, recovery table |
//! | [`pathfinding`] | A* paths and breadth-first nearest-station search |
//! | [`work_queue`] | Priority work queue with auto-spawn and bounded history |

pub mod bodies;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod grid;
pub mod hex;
pub mod ids;
pub mod milestones;
pub mod needs;
pub mod pathfinding;
pub mod work_queue;
