//! Hex grid - cell storage, walkability and station occupancy.
//!
//! The grid is built once (cells, then stations) and is read-mostly
//! afterwards. There is no interior locking; the engine is the only writer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::hex::Hex;
use crate::ids::ZoneId;

/// What a cell is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    Floor,
    Wall,
    Door,
    Garden,
}

impl CellKind {
    pub fn is_walkable(&self) -> bool {
        !matches!(self, CellKind::Wall)
    }
}

/// Furniture that robots work or recover at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationKind {
    Stove,
    Table,
    Sink,
    Couch,
    Shelf,
    Desk,
    Toilet,
    BathroomSink,
    Bed,
    Nightstand,
    Plant,
}

impl StationKind {
    pub fn label(&self) -> &'static str {
        match self {
            StationKind::Stove => "stove",
            StationKind::Table => "table",
            StationKind::Sink => "sink",
            StationKind::Couch => "couch",
            StationKind::Shelf => "shelf",
            StationKind::Desk => "desk",
            StationKind::Toilet => "toilet",
            StationKind::BathroomSink => "bathroom sink",
            StationKind::Bed => "bed",
            StationKind::Nightstand => "nightstand",
            StationKind::Plant => "plant",
        }
    }
}

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub hex: Hex,
    pub kind: CellKind,
    pub zone: Option<ZoneId>,
    /// Derived from `kind`, cleared when a station is placed.
    pub walkable: bool,
    /// True while a station sits on the cell.
    pub occupied: bool,
    pub station: Option<StationKind>,
}

impl Cell {
    pub fn new(hex: Hex, kind: CellKind, zone: Option<ZoneId>) -> Self {
        Self {
            hex,
            kind,
            zone,
            walkable: kind.is_walkable(),
            occupied: false,
            station: None,
        }
    }

    /// A robot may stand here.
    pub fn is_passable(&self) -> bool {
        self.walkable && !self.occupied
    }

    pub fn in_zone(&self, zone: &str) -> bool {
        self.zone.as_deref() == Some(zone)
    }
}

/// Mapping from coordinate to cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexGrid {
    cells: HashMap<Hex, Cell>,
}

impl HexGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell. Adding an existing coordinate is a no-op and returns the
    /// cell already stored there.
    pub fn add_cell(&mut self, hex: Hex, kind: CellKind, zone: Option<ZoneId>) -> &Cell {
        self.cells
            .entry(hex)
            .or_insert_with(|| Cell::new(hex, kind, zone))
    }

    pub fn cell(&self, hex: Hex) -> Option<&Cell> {
        self.cells.get(&hex)
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.cells.contains_key(&hex)
    }

    /// True iff the cell exists, is walkable and is not occupied.
    pub fn is_walkable(&self, hex: Hex) -> bool {
        self.cells.get(&hex).is_some_and(Cell::is_passable)
    }

    /// Adjacent coordinates that exist and can be stood on, in
    /// [`crate::hex::DIRECTIONS`] order.
    pub fn walkable_neighbors(&self, hex: Hex) -> Vec<Hex> {
        hex.neighbors()
            .into_iter()
            .filter(|n| self.is_walkable(*n))
            .collect()
    }

    /// Put a station on a cell: it becomes occupied and stops being walkable.
    pub fn place_station(&mut self, hex: Hex, station: StationKind) -> Result<(), GridError> {
        let cell = self.cells.get_mut(&hex).ok_or(GridError::NoCell(hex))?;
        if cell.kind == CellKind::Wall {
            return Err(GridError::Wall(hex));
        }
        cell.occupied = true;
        cell.walkable = false;
        cell.station = Some(station);
        Ok(())
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn cells_in_zone<'a>(&'a self, zone: &'a str) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.values().filter(move |c| c.in_zone(zone))
    }

    /// Sorted so that random picks from it are reproducible under a seed.
    pub fn walkable_cells_in_zone(&self, zone: &str) -> Vec<Hex> {
        let mut cells: Vec<Hex> = self
            .cells_in_zone(zone)
            .filter(|c| c.is_passable())
            .map(|c| c.hex)
            .collect();
        cells.sort();
        cells
    }

    /// All standable cells, sorted.
    pub fn walkable_cells(&self) -> Vec<Hex> {
        let mut cells: Vec<Hex> = self
            .cells
            .values()
            .filter(|c| c.is_passable())
            .map(|c| c.hex)
            .collect();
        cells.sort();
        cells
    }

    /// Cells carrying a station, sorted by coordinate.
    pub fn stations(&self) -> Vec<(Hex, StationKind)> {
        let mut stations: Vec<(Hex, StationKind)> = self
            .cells
            .values()
            .filter_map(|c| c.station.map(|s| (c.hex, s)))
            .collect();
        stations.sort();
        stations
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> HexGrid {
        let mut grid = HexGrid::new();
        for hex in crate::hex::hex_range(0, 2, 0, 2) {
            grid.add_cell(hex, CellKind::Floor, Some("kitchen".into()));
        }
        grid
    }

    #[test]
    fn test_add_cell_is_idempotent() {
        let mut grid = HexGrid::new();
        grid.add_cell(Hex::new(0, 0), CellKind::Floor, Some("a".into()));
        let cell = grid.add_cell(Hex::new(0, 0), CellKind::Wall, None);
        assert_eq!(cell.kind, CellKind::Floor);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_walls_not_walkable() {
        let mut grid = HexGrid::new();
        grid.add_cell(Hex::new(0, 0), CellKind::Floor, None);
        grid.add_cell(Hex::new(1, 0), CellKind::Wall, None);
        grid.add_cell(Hex::new(2, 0), CellKind::Door, None);
        assert!(grid.is_walkable(Hex::new(0, 0)));
        assert!(!grid.is_walkable(Hex::new(1, 0)));
        assert!(grid.is_walkable(Hex::new(2, 0)));
        assert!(!grid.is_walkable(Hex::new(9, 9)));
    }

    #[test]
    fn test_place_station_occupies_cell() {
        let mut grid = small_grid();
        grid.place_station(Hex::new(1, 1), StationKind::Stove).unwrap();

        let cell = grid.cell(Hex::new(1, 1)).unwrap();
        assert!(cell.occupied);
        assert_eq!(cell.station, Some(StationKind::Stove));
        assert!(!grid.is_walkable(Hex::new(1, 1)));
        assert_eq!(grid.stations(), vec![(Hex::new(1, 1), StationKind::Stove)]);
    }

    #[test]
    fn test_place_station_errors() {
        let mut grid = small_grid();
        grid.add_cell(Hex::new(5, 5), CellKind::Wall, None);
        assert_eq!(
            grid.place_station(Hex::new(9, 9), StationKind::Bed),
            Err(GridError::NoCell(Hex::new(9, 9)))
        );
        assert_eq!(
            grid.place_station(Hex::new(5, 5), StationKind::Bed),
            Err(GridError::Wall(Hex::new(5, 5)))
        );
    }

    #[test]
    fn test_walkable_neighbors_order() {
        let mut grid = small_grid();
        grid.place_station(Hex::new(2, 1), StationKind::Sink).unwrap();
        // (1,1): +q is the sink, the rest follow direction order.
        let neighbors = grid.walkable_neighbors(Hex::new(1, 1));
        assert_eq!(
            neighbors,
            vec![
                Hex::new(2, 0),
                Hex::new(1, 0),
                Hex::new(0, 1),
                Hex::new(0, 2),
                Hex::new(1, 2),
            ]
        );
    }

    #[test]
    fn test_zone_queries() {
        let mut grid = small_grid();
        grid.add_cell(Hex::new(5, 0), CellKind::Floor, Some("hallway".into()));
        grid.place_station(Hex::new(0, 0), StationKind::Table).unwrap();
        assert_eq!(grid.cells_in_zone("kitchen").count(), 9);
        assert_eq!(grid.walkable_cells_in_zone("kitchen").len(), 8);
        assert_eq!(grid.walkable_cells_in_zone("hallway"), vec![Hex::new(5, 0)]);
        assert_eq!(grid.walkable_cells().len(), 9);
    }
}
