//! Orbital bodies - the target set of the solar deployment.
//!
//! Bodies are placed on circular orbits. Transit time only depends on the
//! radial gap between two orbits, so it is stable regardless of where the
//! bodies are in their orbit.

use serde::{Deserialize, Serialize};

use crate::constants::flight;
use crate::error::CatalogError;
use crate::ids::BodyId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    /// Orbit radius around the sun, or around `parent` for moons.
    pub orbit_radius: f32,
    #[serde(default)]
    pub parent: Option<BodyId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolarLayout {
    pub bodies: Vec<Body>,
}

impl SolarLayout {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let layout: SolarLayout = serde_json::from_str(json)?;
        for (i, body) in layout.bodies.iter().enumerate() {
            if layout.bodies[..i].iter().any(|b| b.id == body.id) {
                return Err(CatalogError::Duplicate(body.id.clone()));
            }
        }
        for body in &layout.bodies {
            if let Some(parent) = &body.parent {
                if layout.get(parent).is_none() {
                    return Err(CatalogError::UnknownBody {
                        stage: 0,
                        body: parent.clone(),
                    });
                }
            }
        }
        Ok(layout)
    }

    pub fn get(&self, id: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.bodies.iter().map(|b| b.id.clone()).collect()
    }

    /// Distance from the sun. Moons share their parent's orbit.
    pub fn solar_radius(&self, id: &str) -> Option<f32> {
        let body = self.get(id)?;
        match &body.parent {
            Some(parent) => self.get(parent).map(|p| p.orbit_radius),
            None => Some(body.orbit_radius),
        }
    }

    /// Simulated hours to fly from one body to another at `speed` radius
    /// units per hour, never shorter than the minimum leg.
    pub fn transit_hours(&self, from: &str, to: &str, speed: f32) -> Option<f32> {
        let gap = (self.solar_radius(from)? - self.solar_radius(to)?).abs();
        let hours = if speed > 0.0 { gap / speed } else { 0.0 };
        Some(hours.max(flight::MIN_LEG_HOURS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: &str = r#"{ "bodies": [
        { "id": "earth", "name": "Earth", "orbit_radius": 16 },
        { "id": "moon", "name": "Moon", "orbit_radius": 1.5, "parent": "earth" },
        { "id": "mars", "name": "Mars", "orbit_radius": 22 },
        { "id": "neptune", "name": "Neptune", "orbit_radius": 70 }
    ] }"#;

    #[test]
    fn test_moon_uses_parent_orbit() {
        let layout = SolarLayout::from_json(LAYOUT).unwrap();
        assert_eq!(layout.solar_radius("moon"), Some(16.0));
        assert_eq!(layout.solar_radius("pluto"), None);
    }

    #[test]
    fn test_transit_hours() {
        let layout = SolarLayout::from_json(LAYOUT).unwrap();
        assert_eq!(layout.transit_hours("earth", "neptune", 4.0), Some(13.5));
        assert_eq!(layout.transit_hours("neptune", "earth", 4.0), Some(13.5));
        // Short hops are clamped to the minimum leg.
        assert_eq!(layout.transit_hours("earth", "moon", 4.0), Some(flight::MIN_LEG_HOURS));
        assert_eq!(layout.transit_hours("earth", "pluto", 4.0), None);
    }

    #[test]
    fn test_rejects_orphan_moon() {
        let json = r#"{ "bodies": [ { "id": "io", "name": "Io", "orbit_radius": 1, "parent": "jupiter" } ] }"#;
        assert!(matches!(
            SolarLayout::from_json(json),
            Err(CatalogError::UnknownBody { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicates() {
        let json = r#"{ "bodies": [
            { "id": "mars", "name": "Mars", "orbit_radius": 22 },
            { "id": "mars", "name": "Mars", "orbit_radius": 23 }
        ] }"#;
        assert!(matches!(SolarLayout::from_json(json), Err(CatalogError::Duplicate(_))));
    }
}
