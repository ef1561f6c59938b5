//! Self-contained movement scenarios loaded from TOML
//!
//! A scenario bundles rules, terrain data, a board, a teleport network and
//! the units on it. Used by the `route_probe` tool and the integration tests.
//!
//! ```toml
//! allies = [[1, 3]]
//! teleport = [[1, 1], [6, 4]]
//!
//! [rules]
//! zoc_policy = "end_movement"
//!
//! [data.movetype.smallfoot.movement_costs]
//! Gt = 1
//!
//! [board]
//! rows = ["Gt Gt Gt", "Gt Gt Gt"]
//!
//! [[units]]
//! name = "Spearman"
//! side = 1
//! x = 0
//! y = 0
//! movetype = "smallfoot"
//! moves = 5
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::config::PathfindConfig;
use crate::core::error::{HexMoveError, Result};
use crate::map::board::{GameMap, HexMap};
use crate::map::hex::Location;
use crate::pathfind::calculator::MoveContext;
use crate::pathfind::units::{MovingUnit, Occupancy, Side, TeleportNetwork};
use crate::terrain::loader::GameDataDef;
use crate::terrain::TerrainCostResolver;

#[derive(Debug, Clone, Deserialize)]
struct ScenarioDef {
    #[serde(default)]
    rules: PathfindConfig,
    #[serde(default)]
    data: GameDataDef,
    board: BoardDef,
    #[serde(default)]
    teleport: Vec<(i32, i32)>,
    #[serde(default)]
    units: Vec<UnitDef>,
    #[serde(default)]
    allies: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, Deserialize)]
struct BoardDef {
    rows: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct UnitDef {
    name: String,
    side: u32,
    x: i32,
    y: i32,
    movetype: String,
    moves: i32,
    #[serde(default)]
    ignores_zoc: bool,
    #[serde(default)]
    can_teleport: bool,
    #[serde(default = "default_exerts_zoc")]
    exerts_zoc: bool,
}

fn default_exerts_zoc() -> bool {
    true
}

/// A unit placed on the scenario board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedUnit {
    pub name: String,
    pub location: Location,
    pub unit: MovingUnit,
}

/// A loaded, validated scenario
#[derive(Debug)]
pub struct Scenario {
    pub config: PathfindConfig,
    pub map: HexMap,
    pub resolver: TerrainCostResolver,
    pub occupancy: Occupancy,
    pub teleports: TeleportNetwork,
    pub units: Vec<PlacedUnit>,
}

impl Scenario {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let def: ScenarioDef = toml::from_str(content)?;
        Self::build(def)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn build(def: ScenarioDef) -> Result<Self> {
        def.rules.validate()?;

        let map = HexMap::from_rows(&def.board.rows)?;
        let data = def.data.build()?;
        let resolver = data.into_resolver(&def.rules);

        let mut teleports = TeleportNetwork::new();
        for (x, y) in def.teleport {
            let loc = Location::new(x, y);
            if !map.on_board(loc) {
                return Err(HexMoveError::Board(format!(
                    "teleport hex {} is off the board",
                    loc
                )));
            }
            teleports.insert(loc);
        }

        let mut occupancy = Occupancy::new();
        for group in &def.allies {
            let sides: Vec<Side> = group.iter().copied().map(Side).collect();
            occupancy.add_alliance(&sides);
        }

        let mut units = Vec::with_capacity(def.units.len());
        for u in def.units {
            let location = Location::new(u.x, u.y);
            if !map.on_board(location) {
                return Err(HexMoveError::Board(format!(
                    "unit {} stands off the board at {}",
                    u.name, location
                )));
            }
            if occupancy.is_occupied(location) {
                return Err(HexMoveError::Board(format!(
                    "unit {} shares {} with another unit",
                    u.name, location
                )));
            }
            let profile = resolver
                .profile_id(&u.movetype)
                .ok_or_else(|| HexMoveError::UnknownMovetype(u.movetype.clone()))?;

            occupancy.place(location, Side(u.side), u.exerts_zoc);
            units.push(PlacedUnit {
                name: u.name,
                location,
                unit: MovingUnit::new(profile, Side(u.side), u.moves)
                    .with_ignores_zoc(u.ignores_zoc)
                    .with_teleport(u.can_teleport),
            });
        }

        tracing::info!(
            "Scenario loaded: {}x{} board, {} units, {} teleport hexes",
            map.width(),
            map.height(),
            units.len(),
            teleports.len()
        );

        Ok(Self {
            config: def.rules,
            map,
            resolver,
            occupancy,
            teleports,
            units,
        })
    }

    /// Movement context over the whole scenario
    pub fn context(&self) -> MoveContext<'_, HexMap> {
        MoveContext::new(&self.map, &self.resolver, &self.occupancy)
            .with_config(&self.config)
            .with_teleports(&self.teleports)
    }

    pub fn unit(&self, name: &str) -> Option<&PlacedUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Every unit as a `(start, unit)` pair, ready for batch planning
    pub fn placements(&self) -> Vec<(Location, MovingUnit)> {
        self.units.iter().map(|u| (u.location, u.unit)).collect()
    }
}
