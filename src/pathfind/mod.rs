//! Movement planning: point-to-point routes and per-turn reachable sets

pub mod astar;
pub mod batch;
pub mod calculator;
pub mod reachable;
pub mod route;
pub mod units;

pub use astar::find_route;
pub use batch::reachable_sets;
pub use calculator::{CostCalculator, MoveContext, UnitCostCalculator};
pub use reachable::reachable_set;
pub use route::{ReachableSet, Route};
pub use units::{MovingUnit, Occupancy, Occupant, Side, TeleportNetwork};
