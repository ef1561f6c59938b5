//! What the searches need to know about units: who stands where, who is an
//! enemy of whom, and the abilities of the unit being moved.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::map::hex::Location;
use crate::terrain::ProfileId;

/// A team / player number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Side(pub u32);

/// A unit standing on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupant {
    pub side: Side,
    /// Claims the six surrounding hexes as its zone of control
    pub exerts_zoc: bool,
}

/// Snapshot of who stands where. Built fresh for each batch of queries.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    units: AHashMap<Location, Occupant>,
    alliances: Vec<Vec<Side>>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place(&mut self, loc: Location, side: Side, exerts_zoc: bool) {
        self.units.insert(loc, Occupant { side, exerts_zoc });
    }

    pub fn remove(&mut self, loc: Location) -> Option<Occupant> {
        self.units.remove(&loc)
    }

    /// Declare a group of sides that do not fight each other
    pub fn add_alliance(&mut self, sides: &[Side]) {
        self.alliances.push(sides.to_vec());
    }

    pub fn occupant(&self, loc: Location) -> Option<Occupant> {
        self.units.get(&loc).copied()
    }

    pub fn is_occupied(&self, loc: Location) -> bool {
        self.units.contains_key(&loc)
    }

    pub fn is_enemy(&self, a: Side, b: Side) -> bool {
        a != b
            && !self
                .alliances
                .iter()
                .any(|group| group.contains(&a) && group.contains(&b))
    }

    /// An enemy of `side` stands on `loc`
    pub fn enemy_at(&self, loc: Location, side: Side) -> bool {
        self.occupant(loc)
            .is_some_and(|o| self.is_enemy(side, o.side))
    }

    /// A non-enemy unit of any side stands on `loc`
    pub fn friend_at(&self, loc: Location, side: Side) -> bool {
        self.occupant(loc)
            .is_some_and(|o| !self.is_enemy(side, o.side))
    }

    /// `loc` is adjacent to an enemy of `side` that exerts a zone of control
    pub fn in_enemy_zoc(&self, loc: Location, side: Side) -> bool {
        loc.neighbors().into_iter().any(|n| {
            self.occupant(n)
                .is_some_and(|o| o.exerts_zoc && self.is_enemy(side, o.side))
        })
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// The unit being moved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingUnit {
    pub profile: ProfileId,
    pub side: Side,
    /// Movement points available this turn
    pub moves: i32,
    pub ignores_zoc: bool,
    pub can_teleport: bool,
}

impl MovingUnit {
    pub fn new(profile: ProfileId, side: Side, moves: i32) -> Self {
        Self {
            profile,
            side,
            moves,
            ignores_zoc: false,
            can_teleport: false,
        }
    }

    pub fn with_ignores_zoc(mut self, ignores_zoc: bool) -> Self {
        self.ignores_zoc = ignores_zoc;
        self
    }

    pub fn with_teleport(mut self, can_teleport: bool) -> Self {
        self.can_teleport = can_teleport;
        self
    }
}

/// Hexes linked to each other by teleportation (e.g. a side's villages)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportNetwork {
    hexes: BTreeSet<Location>,
}

impl TeleportNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, loc: Location) {
        self.hexes.insert(loc);
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.hexes.contains(&loc)
    }

    /// Network hexes in coordinate order
    pub fn iter(&self) -> impl Iterator<Item = Location> + '_ {
        self.hexes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.hexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hexes.is_empty()
    }
}

impl FromIterator<Location> for TeleportNetwork {
    fn from_iter<I: IntoIterator<Item = Location>>(iter: I) -> Self {
        Self {
            hexes: iter.into_iter().collect(),
        }
    }
}
