//! Hex geometry and board access

pub mod board;
pub mod hex;

pub use board::{GameMap, HexMap};
pub use hex::{are_adjacent, heuristic, neighbors, Direction, Location};
