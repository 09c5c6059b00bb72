//! Simulation clock - real seconds in, simulated hours out.

use serde::{Deserialize, Serialize};

use crate::constants::timing::SIM_MINUTES_PER_REAL_SECOND;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Simulated minutes since the start of day 1.
    pub total_minutes: f64,
    /// Simulated minutes per real second at speed 1.
    pub minutes_per_second: f32,
    speed: f32,
    paused: bool,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(SIM_MINUTES_PER_REAL_SECOND)
    }
}

impl SimClock {
    pub fn new(minutes_per_second: f32) -> Self {
        Self {
            total_minutes: 0.0,
            minutes_per_second: minutes_per_second.max(0.0),
            speed: 1.0,
            paused: false,
        }
    }

    /// Start the clock at a given hour of day 1.
    pub fn starting_at(mut self, hour: f64) -> Self {
        self.total_minutes = hour.max(0.0) * 60.0;
        self
    }

    /// Advance by `real_seconds` and return the simulated hours that passed.
    /// A paused clock returns zero.
    pub fn advance(&mut self, real_seconds: f32) -> f32 {
        if self.paused || real_seconds <= 0.0 {
            return 0.0;
        }
        let minutes = real_seconds * self.minutes_per_second * self.speed;
        self.total_minutes += minutes as f64;
        minutes / 60.0
    }

    pub fn total_hours(&self) -> f64 {
        self.total_minutes / 60.0
    }

    /// 0..24
    pub fn hour_of_day(&self) -> u32 {
        (self.total_hours().floor() as i64).rem_euclid(24) as u32
    }

    pub fn minute_of_hour(&self) -> u32 {
        (self.total_minutes.floor() as i64).rem_euclid(60) as u32
    }

    /// 1-based day number.
    pub fn day(&self) -> u32 {
        (self.total_hours() / 24.0).floor() as u32 + 1
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Negative speeds are treated as zero.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// `"Day N, HH:MM"`
    pub fn label(&self) -> String {
        format!(
            "Day {}, {:02}:{:02}",
            self.day(),
            self.hour_of_day(),
            self.minute_of_hour()
        )
    }
}
