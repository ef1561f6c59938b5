//! Hexmove - movement planning on hex grids
//!
//! Terrain cost resolution with aliases and inherited movement types, A*
//! routes between two hexes, and the set of hexes a unit can reach this
//! turn under zone of control, occupancy and teleport rules.

pub mod core;
pub mod map;
pub mod pathfind;
pub mod scenario;
pub mod terrain;

pub use crate::core::config::{PathfindConfig, ZocPolicy, IMPASSABLE, UNREACHABLE};
pub use crate::core::error::{HexMoveError, Result};
pub use map::{GameMap, HexMap, Location};
pub use pathfind::{find_route, reachable_set, reachable_sets, MoveContext, ReachableSet, Route};
pub use scenario::Scenario;
pub use terrain::{TerrainCode, TerrainCostResolver};
