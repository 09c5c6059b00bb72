//! Axial hex coordinates (flat-top layout).
//!
//! Cells are addressed by `(q, r)`; the implicit third cube coordinate is
//! `s = -q - r`. Distances are measured in the cube space, which makes the
//! hex distance an exact count of steps between two cells.

use serde::{Deserialize, Serialize};

use crate::constants::HEX_SIZE;

const SQRT3: f32 = 1.732_050_8;

/// Neighbor offsets in enumeration order: +q, +q-r, -r, -q, -q+r, +r.
pub const DIRECTIONS: [Hex; 6] = [
    Hex { q: 1, r: 0 },
    Hex { q: 1, r: -1 },
    Hex { q: 0, r: -1 },
    Hex { q: -1, r: 0 },
    Hex { q: -1, r: 1 },
    Hex { q: 0, r: 1 },
];

/// An axial hex coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Self = Self { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implicit third cube coordinate.
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Cube coordinates `(q, r, s)`.
    pub const fn to_cube(&self) -> (i32, i32, i32) {
        (self.q, self.r, self.s())
    }

    /// Step count between two cells on an unobstructed grid.
    pub fn distance(&self, other: &Hex) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    /// The six adjacent coordinates, in [`DIRECTIONS`] order.
    /// Existence on any particular grid is not implied.
    pub fn neighbors(&self) -> [Hex; 6] {
        DIRECTIONS.map(|d| Hex::new(self.q + d.q, self.r + d.r))
    }

    pub fn is_adjacent(&self, other: &Hex) -> bool {
        self.distance(other) == 1
    }

    /// Center of the cell in world units (x, z).
    pub fn to_world(&self) -> (f32, f32) {
        let q = self.q as f32;
        let r = self.r as f32;
        let x = HEX_SIZE * 1.5 * q;
        let z = HEX_SIZE * (SQRT3 / 2.0 * q + SQRT3 * r);
        (x, z)
    }

    /// Cell containing a world position.
    pub fn from_world(x: f32, z: f32) -> Hex {
        let q = (2.0 / 3.0) * x / HEX_SIZE;
        let r = (-1.0 / 3.0 * x + SQRT3 / 3.0 * z) / HEX_SIZE;
        axial_round(q, r)
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}

impl std::ops::Add for Hex {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.q + other.q, self.r + other.r)
    }
}

/// Round a fractional axial coordinate to the nearest cell.
///
/// Rounds all three cube components and then recomputes the one with the
/// largest rounding error so that `q + r + s == 0` still holds.
pub fn axial_round(qf: f32, rf: f32) -> Hex {
    let sf = -qf - rf;
    let mut q = qf.round();
    let mut r = rf.round();
    let s = sf.round();

    let dq = (q - qf).abs();
    let dr = (r - rf).abs();
    let ds = (s - sf).abs();

    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr > ds {
        r = -q - s;
    }
    Hex::new(q as i32, r as i32)
}

/// All cells of the axial rectangle `q_min..=q_max` × `r_min..=r_max`.
pub fn hex_range(q_min: i32, q_max: i32, r_min: i32, r_max: i32) -> Vec<Hex> {
    let mut cells = Vec::new();
    for q in q_min..=q_max {
        for r in r_min..=r_max {
            cells.push(Hex::new(q, r));
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance() {
        let a = Hex::new(0, 0);
        assert_eq!(a.distance(&Hex::new(1, 0)), 1);
        assert_eq!(a.distance(&Hex::new(2, -1)), 2);
        assert_eq!(a.distance(&Hex::new(-3, 3)), 3);
        assert_eq!(a.distance(&Hex::new(3, 3)), 6);
        assert_eq!(a.distance(&a), 0);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let center = Hex::new(2, -5);
        let neighbors = center.neighbors();
        assert_eq!(neighbors[0], Hex::new(3, -5));
        assert_eq!(neighbors[5], Hex::new(2, -4));
        for n in neighbors {
            assert!(center.is_adjacent(&n));
        }
    }

    #[test]
    fn test_cube_sums_to_zero() {
        let (q, r, s) = Hex::new(4, -7).to_cube();
        assert_eq!(q + r + s, 0);
    }

    #[test]
    fn test_world_roundtrip() {
        for hex in hex_range(-4, 4, -4, 4) {
            let (x, z) = hex.to_world();
            assert_eq!(Hex::from_world(x, z), hex);
        }
    }

    #[test]
    fn test_from_world_near_center() {
        let (x, z) = Hex::new(1, 1).to_world();
        assert_eq!(Hex::from_world(x + 0.05, z - 0.05), Hex::new(1, 1));
    }

    #[test]
    fn test_hex_range() {
        let cells = hex_range(-1, 1, 0, 1);
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&Hex::new(-1, 1)));
    }
}
