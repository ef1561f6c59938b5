//! All hexes a unit can reach this turn
//!
//! Uniform-cost expansion from the start hex, keyed on movement spent. A hex
//! is final once popped; its route is rebuilt from parent indices at the end.
//!
//! Movement rules applied on every step:
//! - enemy-occupied hexes are never entered;
//! - allied hexes can be crossed but are not listed as destinations;
//! - entering an enemy zone of control sets movement left to 0
//!   (unless the unit ignores zones of control or the policy is disabled);
//! - a step costing more than the movement left is refused, unless
//!   `partial_step_entry` is set and the unit has at least 1 point left,
//!   in which case it may enter and ends with 0;
//! - a route's `move_cost` is what the unit was charged, so it always
//!   equals the allowance minus `movement_left`;
//! - teleport-capable units with at least 1 point left on a network hex
//!   may jump to any vacant network hex for free.

use ahash::AHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::config::IMPASSABLE;
use crate::map::board::GameMap;
use crate::map::hex::Location;
use crate::pathfind::calculator::MoveContext;
use crate::pathfind::route::{ReachableSet, Route};
use crate::pathfind::units::MovingUnit;

#[derive(Debug, Clone)]
struct Node {
    loc: Location,
    parent: Option<usize>,
    moves_left: i32,
    /// Movement points charged so far; always allowance minus `moves_left`
    spent: i32,
    done: bool,
    seq: u64,
}

/// Every hex `unit` can reach from `start` with its current moves.
///
/// The start hex is always present with a zero-cost route, even with no
/// movement left.
pub fn reachable_set<M: GameMap>(
    ctx: &MoveContext<'_, M>,
    unit: &MovingUnit,
    start: Location,
) -> ReachableSet {
    let allowance = unit.moves.max(0);
    let mut result = ReachableSet::new(start);
    if start.is_null() {
        return result;
    }

    let mut nodes: Vec<Node> = vec![Node {
        loc: start,
        parent: None,
        moves_left: allowance,
        spent: 0,
        done: false,
        seq: 0,
    }];
    let mut index: AHashMap<Location, usize> = AHashMap::new();
    index.insert(start, 0);

    // (movement spent, insertion sequence, node index)
    let mut frontier: BinaryHeap<Reverse<(i32, u64, usize)>> = BinaryHeap::new();
    frontier.push(Reverse((0, 0, 0)));
    let mut seq: u64 = 0;

    let mut buf = Vec::with_capacity(8);

    while let Some(Reverse((_, entry_seq, ci))) = frontier.pop() {
        if nodes[ci].done || nodes[ci].seq != entry_seq {
            continue;
        }
        nodes[ci].done = true;

        let current = nodes[ci].loc;
        let moves_left = nodes[ci].moves_left;
        let spent = nodes[ci].spent;
        if moves_left <= 0 {
            continue;
        }

        buf.clear();
        ctx.map.neighbors_on_map(current, &mut buf);
        let adjacent = buf.len();
        if unit.can_teleport {
            if let Some(network) = ctx.teleports.filter(|n| n.contains(current)) {
                buf.extend(
                    network
                        .iter()
                        .filter(|t| *t != current && !ctx.occupancy.is_occupied(*t)),
                );
            }
        }

        for (i, &next) in buf.iter().enumerate() {
            let cost = if i < adjacent {
                ctx.terrain_cost(unit, next)
            } else {
                0
            };
            if cost >= IMPASSABLE {
                continue;
            }

            let left = if cost <= moves_left {
                moves_left - cost
            } else if ctx.config.partial_step_entry {
                0
            } else {
                continue;
            };
            let left = if ctx.stops_in_zoc(unit, next) { 0 } else { left };
            // Points actually taken from the allowance by this step
            let charged = moves_left - left;

            seq += 1;
            match index.get(&next) {
                // Final, or reached with at least as much left; keep it.
                Some(&ni) if nodes[ni].done || nodes[ni].moves_left >= left => continue,
                Some(&ni) => {
                    let node = &mut nodes[ni];
                    node.parent = Some(ci);
                    node.moves_left = left;
                    node.spent = spent + charged;
                    node.seq = seq;
                    frontier.push(Reverse((allowance - left, seq, ni)));
                }
                None => {
                    let ni = nodes.len();
                    nodes.push(Node {
                        loc: next,
                        parent: Some(ci),
                        moves_left: left,
                        spent: spent + charged,
                        done: false,
                        seq,
                    });
                    index.insert(next, ni);
                    frontier.push(Reverse((allowance - left, seq, ni)));
                }
            }
        }
    }

    for (i, node) in nodes.iter().enumerate() {
        if i != 0 && ctx.occupancy.is_occupied(node.loc) {
            continue;
        }
        result.insert(Route {
            steps: path_to(&nodes, i),
            move_cost: node.spent,
            movement_left: node.moves_left,
        });
    }

    tracing::debug!(
        "Reachable set from {}: {} of {} visited hexes",
        start,
        result.len(),
        nodes.len()
    );
    result
}

fn path_to(nodes: &[Node], last: usize) -> Vec<Location> {
    let mut steps = Vec::new();
    let mut ci = Some(last);
    while let Some(i) = ci {
        steps.push(nodes[i].loc);
        ci = nodes[i].parent;
    }
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{PathfindConfig, ZocPolicy};
    use crate::map::board::HexMap;
    use crate::pathfind::units::{Occupancy, Side, TeleportNetwork};
    use crate::terrain::{
        MovementProfile, MovementProfiles, ProfileId, TerrainAliases, TerrainCode,
        TerrainCostResolver,
    };

    fn code(s: &str) -> TerrainCode {
        TerrainCode::new(s).unwrap()
    }

    fn resolver() -> (TerrainCostResolver, ProfileId) {
        let mut profiles = MovementProfiles::new();
        let foot = profiles.add(
            MovementProfile::new("foot")
                .with_cost(code("Gt"), 1)
                .with_cost(code("Hh"), 2)
                .with_cost(code("Mm"), 3),
        );
        let resolver = TerrainCostResolver::with_config(
            profiles,
            TerrainAliases::new(),
            &PathfindConfig::default(),
        );
        (resolver, foot)
    }

    #[test]
    fn test_open_board_radius() {
        let map = HexMap::new(5, 5, code("Gt"));
        let (resolver, foot) = resolver();
        let occupancy = Occupancy::new();
        let config = PathfindConfig::default();
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);
        let center = Location::new(2, 2);

        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 3), center);
        // every hex of the 5x5 board is within 3 steps of the center
        assert_eq!(set.len(), 25);
        for (loc, route) in set.iter() {
            assert_eq!(route.movement_left, 3 - center.distance(&loc) as i32);
            assert_eq!(route.moves(), center.distance(&loc) as usize);
            assert!(route.is_contiguous());
        }

        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 2), center);
        assert_eq!(set.len(), 1 + 6 + 12);
    }

    #[test]
    fn test_zero_moves_keeps_start() {
        let map = HexMap::new(5, 5, code("Gt"));
        let (resolver, foot) = resolver();
        let occupancy = Occupancy::new();
        let config = PathfindConfig::default();
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);
        let start = Location::new(1, 1);

        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 0), start);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(start), Some(&Route::stay(start, 0)));
    }

    #[test]
    fn test_expensive_terrain_is_refused() {
        let mut map = HexMap::new(3, 1, code("Gt"));
        map.set_terrain(Location::new(1, 0), code("Mm"));
        let (resolver, foot) = resolver();
        let occupancy = Occupancy::new();
        let config = PathfindConfig::default();
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);

        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 2), Location::new(0, 0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_partial_step_entry() {
        let mut map = HexMap::new(3, 1, code("Gt"));
        map.set_terrain(Location::new(1, 0), code("Mm"));
        let (resolver, foot) = resolver();
        let occupancy = Occupancy::new();
        let config = PathfindConfig {
            partial_step_entry: true,
            ..PathfindConfig::default()
        };
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);

        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 2), Location::new(0, 0));
        let mountain = set.get(Location::new(1, 0)).unwrap();
        assert_eq!(mountain.movement_left, 0);
        // charged the 2 points left, not the full listed cost
        assert_eq!(mountain.move_cost, 2);
        // the step used up everything, nothing beyond it
        assert!(!set.contains(Location::new(2, 0)));
    }

    #[test]
    fn test_enemy_zoc_stops_movement() {
        let map = HexMap::new(7, 7, code("Gt"));
        let (resolver, foot) = resolver();
        let mut occupancy = Occupancy::new();
        let enemy = Location::new(3, 3);
        occupancy.place(enemy, Side(2), true);
        let config = PathfindConfig::default();
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);

        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 5), Location::new(3, 0));
        assert!(!set.contains(enemy));
        let front = set.get(Location::new(3, 2)).unwrap();
        assert_eq!(front.movement_left, 0);
        // stopping in the zone costs everything that was left
        assert_eq!(front.move_cost, 5);
        // (3,4) lies behind the enemy; walking around the zone takes 6
        assert!(!set.contains(Location::new(3, 4)));
    }

    #[test]
    fn test_charges_agree_with_route_search() {
        let mut map = HexMap::new(7, 7, code("Gt"));
        map.set_terrain(Location::new(5, 1), code("Mm"));
        let (resolver, foot) = resolver();
        let mut occupancy = Occupancy::new();
        occupancy.place(Location::new(3, 3), Side(2), true);
        let unit = MovingUnit::new(foot, Side(1), 5);
        let start = Location::new(3, 0);

        for partial_step_entry in [false, true] {
            let config = PathfindConfig {
                partial_step_entry,
                ..PathfindConfig::default()
            };
            let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);
            let calc = ctx.calculator(&unit);
            let set = reachable_set(&ctx, &unit, start);

            for (loc, planned) in set.iter() {
                assert_eq!(planned.movement_left, unit.moves - planned.move_cost, "at {}", loc);
                let searched = crate::pathfind::astar::find_route(start, loc, unit.moves, &calc);
                assert_eq!(searched.move_cost, planned.move_cost, "at {}", loc);
                assert_eq!(searched.movement_left, planned.movement_left, "at {}", loc);
            }
            assert_eq!(set.get(Location::new(3, 2)).map(|r| r.move_cost), Some(5));
        }
    }

    #[test]
    fn test_zoc_ignored_by_skirmisher() {
        let map = HexMap::new(7, 7, code("Gt"));
        let (resolver, foot) = resolver();
        let mut occupancy = Occupancy::new();
        occupancy.place(Location::new(3, 3), Side(2), true);
        let config = PathfindConfig::default();
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);

        let unit = MovingUnit::new(foot, Side(1), 5).with_ignores_zoc(true);
        let set = reachable_set(&ctx, &unit, Location::new(3, 0));
        assert_eq!(set.get(Location::new(3, 2)).unwrap().movement_left, 3);
        assert!(set.contains(Location::new(3, 4)));

        let disabled = PathfindConfig {
            zoc_policy: ZocPolicy::Disabled,
            ..PathfindConfig::default()
        };
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&disabled);
        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 5), Location::new(3, 0));
        assert_eq!(set.get(Location::new(3, 2)).unwrap().movement_left, 3);
    }

    #[test]
    fn test_allies_are_crossed_not_stopped_on() {
        let map = HexMap::new(1, 4, code("Gt"));
        let (resolver, foot) = resolver();
        let mut occupancy = Occupancy::new();
        occupancy.place(Location::new(0, 1), Side(1), true);
        let config = PathfindConfig::default();
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);

        let set = reachable_set(&ctx, &MovingUnit::new(foot, Side(1), 3), Location::new(0, 0));
        assert!(!set.contains(Location::new(0, 1)));
        let beyond = set.get(Location::new(0, 2)).unwrap();
        assert_eq!(beyond.steps[1], Location::new(0, 1));
        assert_eq!(beyond.movement_left, 1);
    }

    #[test]
    fn test_teleport_between_villages() {
        let map = HexMap::new(10, 1, code("Gt"));
        let (resolver, foot) = resolver();
        let occupancy = Occupancy::new();
        let config = PathfindConfig::default();
        let network: TeleportNetwork = [Location::new(1, 0), Location::new(8, 0)]
            .into_iter()
            .collect();
        let ctx = MoveContext::new(&map, &resolver, &occupancy)
            .with_config(&config)
            .with_teleports(&network);

        let walker = MovingUnit::new(foot, Side(1), 2);
        let set = reachable_set(&ctx, &walker, Location::new(0, 0));
        assert!(!set.contains(Location::new(8, 0)));

        let teleporter = walker.with_teleport(true);
        let set = reachable_set(&ctx, &teleporter, Location::new(0, 0));
        let far = set.get(Location::new(8, 0)).unwrap();
        assert_eq!(far.steps, vec![Location::new(0, 0), Location::new(1, 0), Location::new(8, 0)]);
        assert_eq!(far.movement_left, 1);
        assert_eq!(set.get(Location::new(9, 0)).unwrap().movement_left, 0);
    }

    #[test]
    fn test_deterministic_output() {
        let mut map = HexMap::new(8, 8, code("Gt"));
        map.set_terrain(Location::new(3, 3), code("Hh"));
        map.set_terrain(Location::new(4, 2), code("Mm"));
        let (resolver, foot) = resolver();
        let occupancy = Occupancy::new();
        let config = PathfindConfig::default();
        let ctx = MoveContext::new(&map, &resolver, &occupancy).with_config(&config);
        let unit = MovingUnit::new(foot, Side(1), 5);

        let a = reachable_set(&ctx, &unit, Location::new(1, 1));
        let b = reachable_set(&ctx, &unit, Location::new(1, 1));
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
