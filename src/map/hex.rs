//! Hex coordinate system (offset coordinates, "odd-q" vertical layout)
//!
//! Columns run along x. Odd columns sit half a hex lower than even ones, so
//! the row offset of the diagonal neighbors depends on column parity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset hex coordinate on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    /// "No location". Far enough from any board that its neighbors never
    /// wrap and never land on a real map.
    pub const NULL: Location = Location {
        x: i32::MIN / 2,
        y: i32::MIN / 2,
    };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    fn is_odd_column(&self) -> bool {
        self.x & 1 == 1
    }

    /// Cube coordinates (x, y, z) with x + y + z == 0
    pub fn to_cube(&self) -> (i32, i32, i32) {
        let cx = self.x;
        let cz = self.y - (self.x - (self.x & 1)) / 2;
        (cx, -cx - cz, cz)
    }

    /// Number of steps between two hexes
    pub fn distance(&self, other: &Self) -> u32 {
        let (ax, ay, az) = self.to_cube();
        let (bx, by, bz) = other.to_cube();
        let d = (ax - bx).abs().max((ay - by).abs()).max((az - bz).abs());
        d as u32
    }

    /// The adjacent hex in the given direction
    pub fn neighbor(&self, dir: Direction) -> Self {
        let odd = self.is_odd_column();
        let (dx, dy) = match dir {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, if odd { 0 } else { -1 }),
            Direction::SouthEast => (1, if odd { 1 } else { 0 }),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, if odd { 1 } else { 0 }),
            Direction::NorthWest => (-1, if odd { 0 } else { -1 }),
        };
        Self::new(self.x + dx, self.y + dy)
    }

    /// All 6 adjacent hexes, clockwise from north
    pub fn neighbors(&self) -> [Location; 6] {
        Direction::all().map(|dir| self.neighbor(dir))
    }

    pub fn is_adjacent(&self, other: &Self) -> bool {
        self.neighbors().contains(other)
    }

    /// Direction from self to an adjacent hex
    pub fn direction_to(&self, other: &Self) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|dir| self.neighbor(*dir) == *other)
    }

    /// All hexes within `radius` steps, sorted by coordinate
    pub fn tiles_in_radius(&self, radius: u32) -> Vec<Location> {
        let r = radius as i32;
        let mut results = Vec::new();
        for x in self.x - r..=self.x + r {
            for y in self.y - r - 1..=self.y + r + 1 {
                let loc = Location::new(x, y);
                if self.distance(&loc) <= radius {
                    results.push(loc);
                }
            }
        }
        results
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "(null)")
        } else {
            write!(f, "({},{})", self.x, self.y)
        }
    }
}

/// Neighbor directions, in clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthEast => Direction::NorthWest,
            Direction::South => Direction::North,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    /// All directions
    pub fn all() -> [Direction; 6] {
        [
            Direction::North,
            Direction::NorthEast,
            Direction::SouthEast,
            Direction::South,
            Direction::SouthWest,
            Direction::NorthWest,
        ]
    }
}

/// Six neighbors of `loc`; some may be off the board
pub fn neighbors(loc: Location) -> [Location; 6] {
    loc.neighbors()
}

pub fn are_adjacent(a: Location, b: Location) -> bool {
    a.is_adjacent(&b)
}

/// Lower bound on the movement points needed to get from `a` to `b`.
///
/// Every step costs at least one point, so the hex distance never
/// overestimates.
pub fn heuristic(a: Location, b: Location) -> f64 {
    f64::from(a.distance(&b))
}
