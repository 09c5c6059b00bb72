//! Robot needs - decaying scalars in `[0, 100]` and urgency ranking.
//!
//! Unlike crew comfort meters, 100 means fully satisfied and 0 means
//! desperate. A need is *urgent* once it falls below its threshold.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::needs as defaults;
use crate::error::CatalogError;
use crate::grid::StationKind;

/// Need attributes, in the fixed order used for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeedKind {
    Energy,
    Hunger,
    Social,
    Hygiene,
}

impl NeedKind {
    pub const ALL: [NeedKind; 4] = [
        NeedKind::Energy,
        NeedKind::Hunger,
        NeedKind::Social,
        NeedKind::Hygiene,
    ];

    pub const fn index(&self) -> usize {
        match self {
            NeedKind::Energy => 0,
            NeedKind::Hunger => 1,
            NeedKind::Social => 2,
            NeedKind::Hygiene => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NeedKind::Energy => "energy",
            NeedKind::Hunger => "hunger",
            NeedKind::Social => "social",
            NeedKind::Hygiene => "hygiene",
        }
    }

    /// Name of the recovery activity that refills this need.
    pub fn activity(&self) -> &'static str {
        match self {
            NeedKind::Energy => "resting",
            NeedKind::Hunger => "eating",
            NeedKind::Social => "socializing",
            NeedKind::Hygiene => "washing",
        }
    }
}

/// Per-attribute tuning, indexed by [`NeedKind::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeedsConfig {
    pub decay_per_hour: [f32; 4],
    pub working_energy_decay: f32,
    pub thresholds: [f32; 4],
    /// A recovering robot stops once the need reaches this level. Must sit
    /// above every threshold.
    pub satisfied: f32,
    pub initial: [(f32, f32); 4],
    pub recovery: [Recovery; 4],
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            decay_per_hour: defaults::DECAY,
            working_energy_decay: defaults::WORKING_ENERGY_DECAY,
            thresholds: defaults::THRESHOLDS,
            satisfied: defaults::SATISFIED,
            initial: defaults::INITIAL,
            recovery: [
                Recovery {
                    stations: vec![StationKind::Bed],
                    regen_per_hour: 15.0,
                    minutes: (480.0, 480.0),
                },
                Recovery {
                    stations: vec![StationKind::Table, StationKind::Stove],
                    regen_per_hour: 40.0,
                    minutes: (15.0, 15.0),
                },
                Recovery {
                    stations: vec![StationKind::Couch],
                    regen_per_hour: 20.0,
                    minutes: (30.0, 60.0),
                },
                Recovery {
                    stations: vec![StationKind::Toilet, StationKind::BathroomSink],
                    regen_per_hour: 30.0,
                    minutes: (20.0, 20.0),
                },
            ],
        }
    }
}

impl NeedsConfig {
    pub fn threshold(&self, need: NeedKind) -> f32 {
        self.thresholds[need.index()]
    }

    pub fn recovery(&self, need: NeedKind) -> &Recovery {
        &self.recovery[need.index()]
    }

    /// A threshold at or above the satisfied level would end every recovery
    /// on the tick it starts and restart it on the next.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for need in NeedKind::ALL {
            let threshold = self.threshold(need);
            if threshold >= self.satisfied {
                return Err(CatalogError::ThresholdNotBelowSatisfied {
                    need: need.name(),
                    threshold,
                    satisfied: self.satisfied,
                });
            }
        }
        Ok(())
    }
}

/// How a need is refilled: where, how fast, and for how long at most.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recovery {
    pub stations: Vec<StationKind>,
    pub regen_per_hour: f32,
    /// Session length range in sim minutes.
    pub minutes: (f32, f32),
}

impl Recovery {
    pub fn serves(&self, station: StationKind) -> bool {
        self.stations.contains(&station)
    }

    pub fn roll_minutes(&self, rng: &mut impl Rng) -> f32 {
        let (min, max) = self.minutes;
        if max > min {
            rng.gen_range(min..max)
        } else {
            min
        }
    }
}

/// A robot's needs, each clamped to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Needs {
    values: [f32; 4],
}

impl Default for Needs {
    fn default() -> Self {
        Self::full()
    }
}

impl Needs {
    pub fn full() -> Self {
        Self {
            values: [defaults::MAX; 4],
        }
    }

    /// Build from explicit values (clamped).
    pub fn new(energy: f32, hunger: f32, social: f32, hygiene: f32) -> Self {
        Self {
            values: [energy, hunger, social, hygiene].map(clamp),
        }
    }

    /// Randomize every attribute within its configured initial range.
    pub fn random(rng: &mut impl Rng, config: &NeedsConfig) -> Self {
        let mut values = [0.0; 4];
        for need in NeedKind::ALL {
            let (min, max) = config.initial[need.index()];
            values[need.index()] = if max > min {
                clamp(rng.gen_range(min..max))
            } else {
                clamp(min)
            };
        }
        Self { values }
    }

    pub fn get(&self, need: NeedKind) -> f32 {
        self.values[need.index()]
    }

    pub fn set(&mut self, need: NeedKind, value: f32) {
        self.values[need.index()] = clamp(value);
    }

    /// Apply `hours` of decay. Energy drains at the working rate while
    /// `working` is set.
    pub fn decay(&mut self, hours: f32, working: bool, config: &NeedsConfig) {
        let hours = hours.max(0.0);
        for need in NeedKind::ALL {
            let rate = if need == NeedKind::Energy && working {
                config.working_energy_decay
            } else {
                config.decay_per_hour[need.index()]
            };
            let i = need.index();
            self.values[i] = clamp(self.values[i] - rate * hours);
        }
    }

    /// Lowest need below its threshold; ties go to the earlier attribute in
    /// [`NeedKind::ALL`]. `None` if nothing is urgent.
    pub fn most_urgent(&self, config: &NeedsConfig) -> Option<NeedKind> {
        let mut worst: Option<(NeedKind, f32)> = None;
        for need in NeedKind::ALL {
            let value = self.get(need);
            if value >= config.threshold(need) {
                continue;
            }
            if worst.map_or(true, |(_, v)| value < v) {
                worst = Some((need, value));
            }
        }
        worst.map(|(need, _)| need)
    }

    /// Add `amount` to a need (clamped).
    pub fn replenish(&mut self, need: NeedKind, amount: f32) {
        let i = need.index();
        self.values[i] = clamp(self.values[i] + amount);
    }

    pub fn is_satisfied(&self, need: NeedKind, config: &NeedsConfig) -> bool {
        self.get(need) >= config.satisfied
    }

    pub fn iter(&self) -> impl Iterator<Item = (NeedKind, f32)> + '_ {
        NeedKind::ALL.into_iter().map(|n| (n, self.get(n)))
    }
}

fn clamp(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, defaults::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_decay_rates() {
        let config = NeedsConfig::default();
        let mut needs = Needs::full();
        needs.decay(2.0, false, &config);
        assert_eq!(needs.get(NeedKind::Energy), 92.0);
        assert_eq!(needs.get(NeedKind::Hunger), 90.0);
        assert_eq!(needs.get(NeedKind::Social), 94.0);
        assert_eq!(needs.get(NeedKind::Hygiene), 96.0);
    }

    #[test]
    fn test_working_drains_energy_faster() {
        let config = NeedsConfig::default();
        let mut needs = Needs::full();
        needs.decay(2.0, true, &config);
        assert_eq!(needs.get(NeedKind::Energy), 84.0);
        assert_eq!(needs.get(NeedKind::Hunger), 90.0);
    }

    #[test]
    fn test_decay_clamps_at_zero() {
        let config = NeedsConfig::default();
        let mut needs = Needs::full();
        needs.decay(1000.0, true, &config);
        for (_, value) in needs.iter() {
            assert_eq!(value, 0.0);
        }
    }

    #[test]
    fn test_most_urgent_none_above_threshold() {
        let config = NeedsConfig::default();
        assert_eq!(Needs::new(50.0, 50.0, 50.0, 50.0).most_urgent(&config), None);
        // Exactly at threshold is not urgent.
        assert_eq!(Needs::new(20.0, 30.0, 25.0, 20.0).most_urgent(&config), None);
    }

    #[test]
    fn test_most_urgent_picks_lowest() {
        let config = NeedsConfig::default();
        let needs = Needs::new(15.0, 10.0, 80.0, 80.0);
        assert_eq!(needs.most_urgent(&config), Some(NeedKind::Hunger));
    }

    #[test]
    fn test_most_urgent_tie_goes_to_first() {
        let config = NeedsConfig::default();
        let needs = Needs::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(needs.most_urgent(&config), Some(NeedKind::Energy));
        let needs = Needs::new(90.0, 90.0, 5.0, 5.0);
        assert_eq!(needs.most_urgent(&config), Some(NeedKind::Social));
    }

    #[test]
    fn test_replenish_clamps() {
        let mut needs = Needs::new(95.0, 0.0, 0.0, 0.0);
        needs.replenish(NeedKind::Energy, 50.0);
        assert_eq!(needs.get(NeedKind::Energy), 100.0);
        needs.replenish(NeedKind::Hunger, -10.0);
        assert_eq!(needs.get(NeedKind::Hunger), 0.0);
    }

    #[test]
    fn test_zero_decay_after_refill_is_noop() {
        let config = NeedsConfig::default();
        let mut needs = Needs::new(40.0, 40.0, 40.0, 40.0);
        needs.replenish(NeedKind::Energy, 100.0);
        let before = needs;
        needs.decay(0.0, false, &config);
        assert_eq!(needs, before);
        assert_eq!(needs.get(NeedKind::Energy), 100.0);
    }

    #[test]
    fn test_random_within_ranges() {
        let config = NeedsConfig::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let needs = Needs::random(&mut rng, &config);
            for need in NeedKind::ALL {
                let (min, max) = config.initial[need.index()];
                let v = needs.get(need);
                assert!(v >= min && v <= max, "{} = {}", need.name(), v);
            }
        }
    }

    #[test]
    fn test_satisfied_level_is_configurable() {
        let mut config = NeedsConfig::default();
        let needs = Needs::new(85.0, 100.0, 100.0, 100.0);
        assert!(!needs.is_satisfied(NeedKind::Energy, &config));
        config.satisfied = 80.0;
        assert!(needs.is_satisfied(NeedKind::Energy, &config));
    }

    #[test]
    fn test_threshold_must_sit_below_satisfied() {
        let mut config = NeedsConfig::default();
        assert!(config.validate().is_ok());

        config.thresholds[NeedKind::Social.index()] = 95.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::ThresholdNotBelowSatisfied { need: "social", .. }
        ));

        config.thresholds[NeedKind::Social.index()] = 90.0;
        assert!(config.validate().is_err());
        config.satisfied = 96.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_recovery_table() {
        let config = NeedsConfig::default();
        assert!(config.recovery(NeedKind::Energy).serves(StationKind::Bed));
        assert!(config.recovery(NeedKind::Hunger).serves(StationKind::Stove));
        assert!(!config.recovery(NeedKind::Social).serves(StationKind::Bed));
    }
}
