//! House generation - rooms, walls, furniture and the robot crew.

use std::collections::HashSet;

use hecs::{Entity, World};
use hexbots_logic::config::SimConfig;
use hexbots_logic::constants::robots::{COUNT, NAMES};
use hexbots_logic::grid::{CellKind, HexGrid, StationKind};
use hexbots_logic::hex::{hex_range, Hex};
use hexbots_logic::ids::{AgentId, ZoneId};
use hexbots_logic::needs::Needs;
use rand::Rng;
use serde::Deserialize;

use crate::components::{Behavior, Location, Robot};
use crate::error::SimError;

pub const HOUSE_LAYOUT_JSON: &str = include_str!("../../../../data/house_layout.json");
pub const HOUSE_TASKS_JSON: &str = include_str!("../../../../data/house_tasks.json");

#[derive(Debug, Clone, Deserialize)]
pub struct HouseLayout {
    pub rooms: Vec<RoomDef>,
    #[serde(default)]
    pub doors: Vec<DoorDef>,
}

/// An axial rectangle of cells, inclusive on both ends.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomDef {
    pub id: ZoneId,
    pub kind: CellKind,
    pub q: (i32, i32),
    pub r: (i32, i32),
    #[serde(default)]
    pub furniture: Vec<FurnitureDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FurnitureDef {
    pub station: StationKind,
    pub q: i32,
    pub r: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DoorDef {
    pub q: i32,
    pub r: i32,
    #[serde(default)]
    pub connects: Vec<ZoneId>,
}

impl HouseLayout {
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Build the house grid.
///
/// Room cells first (door cells become `Door`), then a wall on every
/// missing neighbor of an indoor cell, skipping door cells, then furniture.
pub fn build_house(layout: &HouseLayout) -> Result<HexGrid, SimError> {
    let doors: HashSet<Hex> = layout.doors.iter().map(|d| Hex::new(d.q, d.r)).collect();
    let mut grid = HexGrid::new();

    for room in &layout.rooms {
        for hex in hex_range(room.q.0, room.q.1, room.r.0, room.r.1) {
            let kind = if doors.contains(&hex) && room.kind == CellKind::Floor {
                CellKind::Door
            } else {
                room.kind
            };
            grid.add_cell(hex, kind, Some(room.id.clone()));
        }
    }

    let mut walls: Vec<Hex> = grid
        .cells()
        .filter(|c| c.kind == CellKind::Floor)
        .flat_map(|c| c.hex.neighbors())
        .filter(|n| !grid.contains(*n))
        .collect();
    walls.sort();
    walls.dedup();
    for hex in walls {
        grid.add_cell(hex, CellKind::Wall, None);
    }

    for room in &layout.rooms {
        for item in &room.furniture {
            grid.place_station(Hex::new(item.q, item.r), item.station)?;
        }
    }

    log::info!(
        "house built: {} cells, {} stations",
        grid.len(),
        grid.stations().len()
    );
    Ok(grid)
}

/// Spawn the robot crew spread evenly over the walkable cells.
pub fn spawn_house_robots(
    world: &mut World,
    grid: &HexGrid,
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Result<Vec<Entity>, SimError> {
    let cells = grid.walkable_cells();
    if cells.is_empty() {
        return Err(SimError::NoSpawnCells);
    }

    let mut robots = Vec::with_capacity(COUNT);
    for (i, name) in NAMES.iter().enumerate() {
        let at = cells[i * cells.len() / COUNT];
        let (min, max) = config.wander_first;
        let wander = if max > min { rng.gen_range(min..max) } else { min };
        let entity = world.spawn((
            Robot {
                id: AgentId(i as u32 + 1),
                name: name.to_string(),
            },
            Location::Cell(at),
            Behavior::idle(wander),
            Needs::random(rng, &config.needs),
        ));
        robots.push(entity);
    }
    Ok(robots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexbots_logic::pathfinding::find_path;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn house() -> HexGrid {
        build_house(&HouseLayout::from_json(HOUSE_LAYOUT_JSON).unwrap()).unwrap()
    }

    #[test]
    fn test_house_stations() {
        let grid = house();
        let stations = grid.stations();
        assert_eq!(stations.len(), 14);
        let beds = stations.iter().filter(|(_, s)| *s == StationKind::Bed).count();
        assert_eq!(beds, 2);
        assert!(!grid.is_walkable(Hex::new(-5, -4)));
        assert_eq!(grid.cell(Hex::new(-5, -4)).unwrap().station, Some(StationKind::Stove));
    }

    #[test]
    fn test_doors_and_walls() {
        let grid = house();
        assert_eq!(grid.cell(Hex::new(-3, -1)).unwrap().kind, CellKind::Door);
        assert!(grid.is_walkable(Hex::new(-3, -1)));
        // Outside the bedroom's far edge
        assert_eq!(grid.cell(Hex::new(4, 5)).unwrap().kind, CellKind::Wall);
        // The garden is unwalled
        assert!(!grid.contains(Hex::new(-7, -6)));
    }

    #[test]
    fn test_every_room_connected() {
        let grid = house();
        let start = Hex::new(0, 0);
        for zone in ["kitchen", "living_room", "hallway", "bathroom", "bedroom", "garden"] {
            let cells = grid.walkable_cells_in_zone(zone);
            assert!(!cells.is_empty(), "{} has no walkable cells", zone);
            assert!(find_path(&grid, start, cells[0]).is_some(), "{} unreachable", zone);
        }
    }

    #[test]
    fn test_spawn_robots() {
        let grid = house();
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(1);
        let robots = spawn_house_robots(&mut world, &grid, &SimConfig::default(), &mut rng).unwrap();
        assert_eq!(robots.len(), 5);
        for entity in robots {
            let location = world.get::<&Location>(entity).unwrap();
            assert!(grid.is_walkable(location.cell().unwrap()));
        }
    }
}
