//! Reachable sets for many units at once
//!
//! Queries only read the shared context, so each unit is evaluated
//! independently. Above `parallel_threshold` units the work is spread over
//! the rayon pool; results keep the input order either way.

use rayon::prelude::*;

use crate::map::board::GameMap;
use crate::map::hex::Location;
use crate::pathfind::calculator::MoveContext;
use crate::pathfind::reachable::reachable_set;
use crate::pathfind::route::ReachableSet;
use crate::pathfind::units::MovingUnit;

/// One reachable set per `(start, unit)` pair, in input order
pub fn reachable_sets<M: GameMap + Sync>(
    ctx: &MoveContext<'_, M>,
    units: &[(Location, MovingUnit)],
) -> Vec<ReachableSet> {
    if units.len() >= ctx.config.parallel_threshold {
        // PARALLEL: the resolver memo is the only shared mutable state
        units
            .par_iter()
            .map(|(start, unit)| reachable_set(ctx, unit, *start))
            .collect()
    } else {
        units
            .iter()
            .map(|(start, unit)| reachable_set(ctx, unit, *start))
            .collect()
    }
}
