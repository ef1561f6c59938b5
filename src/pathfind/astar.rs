//! A* route search between two hexes
//!
//! Nodes live in an arena and refer to their parent by index; the arena and
//! the open heap are owned by the call and dropped with it.
//!
//! Open-set ties are broken by lower f, then lower h (closer to the goal),
//! then earlier insertion, so identical inputs always give identical routes.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::core::config::IMPASSABLE;
use crate::map::hex::{heuristic, Location};
use crate::pathfind::calculator::CostCalculator;
use crate::pathfind::route::Route;

#[derive(Debug, Clone)]
struct Node {
    loc: Location,
    parent: Option<usize>,
    g: f64,
    open: bool,
    /// Sequence number of the newest heap entry for this node
    seq: u64,
}

/// (f, h, insertion sequence, node index); min-heap through `Reverse`
type OpenEntry = Reverse<(OrderedFloat<f64>, OrderedFloat<f64>, u64, usize)>;

/// Find the cheapest route from `source` to `destination`.
///
/// The search stops as soon as the cheapest open node costs more than
/// `stop_at`. A missing route is not an error: the result is
/// [`Route::unreachable`], as it is for a destination the calculator says
/// cannot be ended on (an allied unit's hex). On success `movement_left` is
/// `stop_at` minus the route cost, truncated toward zero; a negative
/// `stop_at` counts as 0.
pub fn find_route<C: CostCalculator>(
    source: Location,
    destination: Location,
    stop_at: i32,
    calc: &C,
) -> Route {
    if source.is_null() || destination.is_null() {
        return Route::unreachable();
    }
    if source == destination {
        return Route::stay(source, stop_at.max(0));
    }
    if !calc.can_end_on(destination) {
        tracing::debug!("Route {} -> {}: destination cannot be stopped on", source, destination);
        return Route::unreachable();
    }

    let budget = f64::from(stop_at);
    let mut nodes: Vec<Node> = Vec::new();
    let mut index: AHashMap<Location, usize> = AHashMap::new();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut seq: u64 = 0;

    let h0 = heuristic(source, destination);
    nodes.push(Node {
        loc: source,
        parent: None,
        g: 0.0,
        open: true,
        seq,
    });
    index.insert(source, 0);
    open.push(Reverse((OrderedFloat(h0), OrderedFloat(h0), seq, 0)));

    let mut expanded = 0usize;

    while let Some(Reverse((f, _, entry_seq, ci))) = open.pop() {
        // Skip stale entries.
        if !nodes[ci].open || nodes[ci].seq != entry_seq {
            continue;
        }
        if f.0 > budget {
            break;
        }

        nodes[ci].open = false;
        expanded += 1;

        let current = nodes[ci].loc;
        let current_g = nodes[ci].g;
        if ci != 0 && calc.is_terminal(current) {
            continue;
        }

        for next in current.neighbors() {
            let step = step_cost(calc, next, current_g);
            if step >= f64::from(IMPASSABLE) {
                continue;
            }
            let g = current_g + step;

            if next == destination {
                if g <= budget {
                    tracing::debug!(
                        "Route {} -> {} found, cost {}, {} nodes expanded",
                        source,
                        destination,
                        g,
                        expanded
                    );
                    return build_route(&nodes, ci, destination, g, budget);
                }
                continue;
            }

            let h = heuristic(next, destination);
            if g + h > budget {
                continue;
            }

            seq += 1;
            match index.get(&next) {
                // Equal or cheaper entry already known; keep it.
                Some(&ni) if nodes[ni].g <= g => continue,
                Some(&ni) => {
                    let node = &mut nodes[ni];
                    node.g = g;
                    node.parent = Some(ci);
                    node.open = true;
                    node.seq = seq;
                    open.push(Reverse((OrderedFloat(g + h), OrderedFloat(h), seq, ni)));
                }
                None => {
                    let ni = nodes.len();
                    nodes.push(Node {
                        loc: next,
                        parent: Some(ci),
                        g,
                        open: true,
                        seq,
                    });
                    index.insert(next, ni);
                    open.push(Reverse((OrderedFloat(g + h), OrderedFloat(h), seq, ni)));
                }
            }
        }
    }

    tracing::debug!(
        "No route {} -> {} within {}, {} nodes expanded",
        source,
        destination,
        stop_at,
        expanded
    );
    Route::unreachable()
}

/// Query the oracle, treating a broken answer as impassable
fn step_cost<C: CostCalculator>(calc: &C, loc: Location, so_far: f64) -> f64 {
    let cost = calc.cost(loc, so_far);
    debug_assert!(
        !cost.is_nan() && cost >= 0.0,
        "cost oracle returned {} for {}",
        cost,
        loc
    );
    if cost.is_nan() || cost < 0.0 {
        f64::from(IMPASSABLE)
    } else {
        cost
    }
}

fn build_route(nodes: &[Node], last: usize, destination: Location, g: f64, budget: f64) -> Route {
    let mut steps = vec![destination];
    let mut ci = Some(last);
    while let Some(i) = ci {
        steps.push(nodes[i].loc);
        ci = nodes[i].parent;
    }
    steps.reverse();

    Route {
        steps,
        move_cost: g.trunc() as i32,
        movement_left: (budget - g).trunc() as i32,
    }
}
