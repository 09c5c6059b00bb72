//! Simulation constants - grid geometry, timing, needs tuning.
//!
//! These are the defaults behind [`crate::config::SimConfig`]; hosts that
//! want different tuning deserialize a config instead of editing these.

/// Hex circumradius in world units.
pub const HEX_SIZE: f32 = 0.5;

pub mod timing {
    /// Simulated minutes per real second at speed 1 (a full day in ~12 min).
    pub const SIM_MINUTES_PER_REAL_SECOND: f32 = 2.0;
    /// Needs are decayed at most this often (simulated hours).
    pub const NEEDS_INTERVAL_HOURS: f64 = 10.0 / 60.0;
}

pub mod robots {
    pub const COUNT: usize = 5;
    pub const NAMES: [&str; COUNT] = ["HEX-01", "HEX-02", "HEX-03", "HEX-04", "HEX-05"];
    /// Walking speed, tiles per real second.
    pub const WALK_SPEED: f32 = 2.5;
    /// First wander delay after entering idle (real seconds).
    pub const WANDER_FIRST: (f32, f32) = (2.0, 5.0);
    /// Wander delay after each wander step (real seconds).
    pub const WANDER_REPEAT: (f32, f32) = (3.0, 6.0);
    /// Fallback work duration when an item is missing (sim minutes).
    pub const DEFAULT_WORK_MINUTES: f32 = 20.0;
}

pub mod flight {
    /// Launch progress per real second; the launch phase ends at 1.0.
    pub const LAUNCH_RATE: f32 = 0.8;
    /// Orbit-radius units covered per simulated hour in transit.
    pub const SPEED: f32 = 4.0;
    /// Shortest possible transit leg (sim hours).
    pub const MIN_LEG_HOURS: f32 = 2.0;
}

pub mod needs {
    /// Decay per simulated hour: energy, hunger, social, hygiene.
    pub const DECAY: [f32; 4] = [4.0, 5.0, 3.0, 2.0];
    /// Energy decay per simulated hour while working.
    pub const WORKING_ENERGY_DECAY: f32 = 8.0;
    /// Below these values a need becomes urgent.
    pub const THRESHOLDS: [f32; 4] = [20.0, 30.0, 25.0, 20.0];
    /// Initial value ranges (inclusive-exclusive).
    pub const INITIAL: [(f32, f32); 4] = [(80.0, 100.0), (70.0, 100.0), (60.0, 100.0), (70.0, 100.0)];
    /// A recovering robot stops once the need reaches this level.
    pub const SATISFIED: f32 = 90.0;
    pub const MAX: f32 = 100.0;
}

pub mod queue {
    /// How many completed items are remembered.
    pub const COMPLETED_CAPACITY: usize = 20;
}
