//! Runtime tuning. Every field has a default from [`crate::constants`], so a
//! JSON config only needs to name the values it changes.

use serde::{Deserialize, Serialize};

use crate::constants::{flight, queue, robots, timing};
use crate::error::CatalogError;
use crate::needs::NeedsConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Tiles per real second.
    pub walk_speed: f32,
    /// Simulated minutes per real second at speed 1.
    pub minutes_per_second: f32,
    /// Hour of day 1 the clock starts at.
    pub start_hour: f64,
    pub needs: NeedsConfig,
    /// Needs are decayed in batches at most this often (sim hours).
    pub needs_interval_hours: f64,
    /// Idle delay before the first wander step (real seconds).
    pub wander_first: (f32, f32),
    /// Delay between wander steps (real seconds).
    pub wander_repeat: (f32, f32),
    pub completed_capacity: usize,
    /// Launch progress per real second.
    pub launch_rate: f32,
    /// Orbit-radius units per simulated hour.
    pub flight_speed: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            walk_speed: robots::WALK_SPEED,
            minutes_per_second: timing::SIM_MINUTES_PER_REAL_SECOND,
            start_hour: 0.0,
            needs: NeedsConfig::default(),
            needs_interval_hours: timing::NEEDS_INTERVAL_HOURS,
            wander_first: robots::WANDER_FIRST,
            wander_repeat: robots::WANDER_REPEAT,
            completed_capacity: queue::COMPLETED_CAPACITY,
            launch_rate: flight::LAUNCH_RATE,
            flight_speed: flight::SPEED,
        }
    }
}

impl SimConfig {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        self.needs.validate()
    }
}
