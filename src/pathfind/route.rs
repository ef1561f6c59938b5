//! Search results

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::config::{IMPASSABLE, UNREACHABLE};
use crate::map::hex::Location;

/// Ordered path from source to destination, both inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub steps: Vec<Location>,
    /// Movement points charged along the path
    pub move_cost: i32,
    /// Allowance remaining at the destination, or [`UNREACHABLE`]
    pub movement_left: i32,
}

impl Route {
    /// The "cannot move there" result
    pub fn unreachable() -> Self {
        Self {
            steps: Vec::new(),
            move_cost: IMPASSABLE,
            movement_left: UNREACHABLE,
        }
    }

    /// Trivial route of a unit that stays put
    pub fn stay(at: Location, movement_left: i32) -> Self {
        Self {
            steps: vec![at],
            move_cost: 0,
            movement_left,
        }
    }

    pub fn is_reachable(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn source(&self) -> Option<Location> {
        self.steps.first().copied()
    }

    pub fn destination(&self) -> Option<Location> {
        self.steps.last().copied()
    }

    /// Number of hexes entered
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Every consecutive pair of steps is adjacent
    pub fn is_contiguous(&self) -> bool {
        self.steps.windows(2).all(|w| w[0].is_adjacent(&w[1]))
    }
}

/// Every hex a unit can reach this turn, with its cheapest route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReachableSet {
    origin: Location,
    #[serde(serialize_with = "serialize_routes")]
    routes: BTreeMap<Location, Route>,
}

impl ReachableSet {
    pub(crate) fn new(origin: Location) -> Self {
        Self {
            origin,
            routes: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, route: Route) {
        if let Some(dest) = route.destination() {
            self.routes.insert(dest, route);
        }
    }

    pub fn origin(&self) -> Location {
        self.origin
    }

    pub fn get(&self, loc: Location) -> Option<&Route> {
        self.routes.get(&loc)
    }

    /// Route to `loc`, or the unreachable route
    pub fn route_to(&self, loc: Location) -> Route {
        self.get(loc).cloned().unwrap_or_else(Route::unreachable)
    }

    pub fn contains(&self, loc: Location) -> bool {
        self.routes.contains_key(&loc)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Reachable hexes in coordinate order
    pub fn destinations(&self) -> impl Iterator<Item = Location> + '_ {
        self.routes.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Location, &Route)> {
        self.routes.iter().map(|(loc, route)| (*loc, route))
    }
}

// JSON object keys must be strings, so routes are written as a list; each
// route carries its destination as its last step.
fn serialize_routes<S>(routes: &BTreeMap<Location, Route>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(routes.values())
}
