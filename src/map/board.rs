//! Board access used by the searches
//!
//! The searches only need terrain per hex and which hexes exist. Anything
//! that can answer those two questions can be searched.

use serde::{Deserialize, Serialize};

use crate::core::error::{HexMoveError, Result};
use crate::map::hex::Location;
use crate::terrain::TerrainCode;

/// Map collaborator consumed by the pathfinding core
pub trait GameMap {
    /// Is this hex part of the playable board?
    fn on_board(&self, loc: Location) -> bool;

    /// Terrain of an on-board hex
    fn terrain_at(&self, loc: Location) -> Option<TerrainCode>;

    /// Append the on-board neighbors of `loc` into `buf`.
    /// The caller clears `buf` before calling.
    fn neighbors_on_map(&self, loc: Location, buf: &mut Vec<Location>) {
        buf.extend(loc.neighbors().into_iter().filter(|n| self.on_board(*n)));
    }
}

/// Rectangular board stored row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexMap {
    width: u32,
    height: u32,
    tiles: Vec<TerrainCode>,
}

impl HexMap {
    /// Create a board filled with one terrain
    pub fn new(width: u32, height: u32, fill: TerrainCode) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; (width * height) as usize],
        }
    }

    /// Build a board from rows of whitespace-separated terrain codes
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let mut tiles = Vec::new();
        let mut width = None;

        for (y, row) in rows.iter().enumerate() {
            let codes = row
                .as_ref()
                .split_whitespace()
                .map(TerrainCode::new)
                .collect::<Result<Vec<_>>>()?;

            match width {
                None => width = Some(codes.len()),
                Some(w) if w != codes.len() => {
                    return Err(HexMoveError::Board(format!(
                        "row {} has {} tiles, expected {}",
                        y,
                        codes.len(),
                        w
                    )));
                }
                Some(_) => {}
            }
            tiles.extend(codes);
        }

        let width = width.unwrap_or(0);
        if width == 0 {
            return Err(HexMoveError::Board("board has no tiles".into()));
        }

        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            tiles,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.x >= 0 && loc.y >= 0 && loc.x < self.width as i32 && loc.y < self.height as i32
    }

    fn index(&self, loc: Location) -> Option<usize> {
        self.in_bounds(loc)
            .then(|| loc.y as usize * self.width as usize + loc.x as usize)
    }

    /// Set terrain at a coordinate; ignored off the board
    pub fn set_terrain(&mut self, loc: Location, terrain: TerrainCode) {
        if let Some(i) = self.index(loc) {
            self.tiles[i] = terrain;
        }
    }

    /// Every on-board location, row by row
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Location::new(x, y)))
    }
}

impl GameMap for HexMap {
    fn on_board(&self, loc: Location) -> bool {
        self.in_bounds(loc)
    }

    fn terrain_at(&self, loc: Location) -> Option<TerrainCode> {
        self.index(loc).map(|i| self.tiles[i])
    }
}
