//! Per-unit movement costs
//!
//! [`MoveContext`] bundles everything that stays fixed while many units are
//! evaluated against the same board: map, terrain data, occupancy and rules.
//! The A* search only sees a [`CostCalculator`].

use crate::core::config::{self, PathfindConfig, ZocPolicy, IMPASSABLE};
use crate::map::board::GameMap;
use crate::map::hex::Location;
use crate::pathfind::units::{MovingUnit, Occupancy, TeleportNetwork};
use crate::terrain::TerrainCostResolver;

/// Cost oracle consulted by the A* search for every step
pub trait CostCalculator {
    /// Cost of entering `loc` after `so_far` points have been spent.
    /// Anything at or above [`IMPASSABLE`] means the hex cannot be entered.
    /// Must not be negative or NaN.
    fn cost(&self, loc: Location, so_far: f64) -> f64;

    /// Movement ends on entering `loc`; the search never expands past it.
    fn is_terminal(&self, _loc: Location) -> bool {
        false
    }

    /// A route may finish on `loc`. Hexes that fail this can still be
    /// crossed.
    fn can_end_on(&self, _loc: Location) -> bool {
        true
    }
}

/// Shared, read-only inputs of a movement query
pub struct MoveContext<'a, M: GameMap> {
    pub map: &'a M,
    pub resolver: &'a TerrainCostResolver,
    pub occupancy: &'a Occupancy,
    pub teleports: Option<&'a TeleportNetwork>,
    pub config: &'a PathfindConfig,
}

impl<'a, M: GameMap> MoveContext<'a, M> {
    pub fn new(map: &'a M, resolver: &'a TerrainCostResolver, occupancy: &'a Occupancy) -> Self {
        Self {
            map,
            resolver,
            occupancy,
            teleports: None,
            config: config::config(),
        }
    }

    pub fn with_config(mut self, config: &'a PathfindConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_teleports(mut self, teleports: &'a TeleportNetwork) -> Self {
        self.teleports = Some(teleports);
        self
    }

    /// Terrain cost for `unit` to enter `loc`; off-board and
    /// enemy-occupied hexes are impassable.
    pub fn terrain_cost(&self, unit: &MovingUnit, loc: Location) -> i32 {
        if self.occupancy.enemy_at(loc, unit.side) {
            return IMPASSABLE;
        }
        match self.map.terrain_at(loc) {
            Some(terrain) => self.resolver.movement_cost(unit.profile, terrain),
            None => IMPASSABLE,
        }
    }

    /// Entering `loc` ends `unit`'s movement
    pub fn stops_in_zoc(&self, unit: &MovingUnit, loc: Location) -> bool {
        self.config.zoc_policy == ZocPolicy::EndMovement
            && !unit.ignores_zoc
            && self.occupancy.in_enemy_zoc(loc, unit.side)
    }

    /// Standard cost oracle for point-to-point searches
    pub fn calculator<'c>(&'c self, unit: &'c MovingUnit) -> UnitCostCalculator<'c, 'a, M> {
        UnitCostCalculator { ctx: self, unit }
    }
}

/// Cost oracle for one unit.
///
/// Charges the terrain cost, except:
/// - a zone of control hex charges everything the unit has left this turn;
/// - with `partial_step_entry`, a hex costing more than what is left (but
///   with at least 1 point left) charges exactly what is left.
///
/// Either way the charge is what the step takes from the allowance, so
/// [`find_route`](crate::pathfind::find_route) and
/// [`reachable_set`](crate::pathfind::reachable_set) agree on `move_cost`.
pub struct UnitCostCalculator<'c, 'a, M: GameMap> {
    ctx: &'c MoveContext<'a, M>,
    unit: &'c MovingUnit,
}

impl<M: GameMap> CostCalculator for UnitCostCalculator<'_, '_, M> {
    fn cost(&self, loc: Location, so_far: f64) -> f64 {
        let terrain = self.ctx.terrain_cost(self.unit, loc);
        if terrain >= IMPASSABLE {
            return f64::from(IMPASSABLE);
        }

        let terrain = f64::from(terrain);
        let remaining = f64::from(self.unit.moves) - so_far;
        if terrain > remaining {
            if self.ctx.config.partial_step_entry && remaining >= 1.0 {
                remaining
            } else {
                terrain
            }
        } else if self.ctx.stops_in_zoc(self.unit, loc) {
            remaining
        } else {
            terrain
        }
    }

    fn is_terminal(&self, loc: Location) -> bool {
        self.ctx.stops_in_zoc(self.unit, loc)
    }

    fn can_end_on(&self, loc: Location) -> bool {
        !self.ctx.occupancy.friend_at(loc, self.unit.side)
    }
}
