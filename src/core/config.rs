//! Pathfinding configuration with documented constants
//!
//! Sentinels that appear in cost arithmetic are compile-time constants.
//! Everything a scenario may want to tune lives in [`PathfindConfig`].

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::core::error::{HexMoveError, Result};

/// Cost of terrain a unit cannot enter at all.
///
/// Large enough to exceed any real allowance, small enough that adding a
/// handful of them never overflows an `i32`.
pub const IMPASSABLE: i32 = 10_000_000;

/// Movement left reported on a route that was not found.
pub const UNREACHABLE: i32 = IMPASSABLE;

/// How enemy zones of control interact with movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZocPolicy {
    /// Entering a hex adjacent to a controlling enemy ends the move there.
    #[default]
    EndMovement,
    /// Zones of control have no effect.
    Disabled,
}

/// Configuration for terrain resolution and movement searches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindConfig {
    // === TERRAIN RESOLUTION ===
    /// Maximum alias nesting followed before giving up
    ///
    /// Real terrain data nests two or three levels deep. Anything deeper is
    /// a cycle in the alias table; the lookup resolves to impassable.
    pub max_alias_depth: u32,

    /// Maximum number of parent hops followed for a movement type
    ///
    /// The loader rejects parent cycles, so this only guards hand-built
    /// registries.
    pub max_parent_depth: u32,

    /// Defense (chance to be hit, percent) when nothing resolves
    pub default_defense: i32,

    /// Resistance (percent) when nothing resolves
    pub default_resistance: i32,

    // === MOVEMENT RULES ===
    /// Zone of control handling
    pub zoc_policy: ZocPolicy,

    /// Allow entering a hex that costs more than the movement left
    ///
    /// When set, a unit with at least one movement point may always take one
    /// more step into passable terrain; its movement left becomes 0 there.
    pub partial_step_entry: bool,

    // === PARALLELIZATION ===
    /// Minimum number of units in a batch before using rayon
    ///
    /// A reachable set on a typical map takes tens of microseconds, so small
    /// batches are cheaper on the calling thread.
    pub parallel_threshold: usize,
}

impl Default for PathfindConfig {
    fn default() -> Self {
        Self {
            max_alias_depth: 100,
            max_parent_depth: 64,
            default_defense: 50,
            default_resistance: 0,
            zoc_policy: ZocPolicy::EndMovement,
            partial_step_entry: false,
            parallel_threshold: 8,
        }
    }
}

impl PathfindConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_alias_depth == 0 {
            return Err(HexMoveError::InvalidConfig(
                "max_alias_depth must be at least 1".into(),
            ));
        }

        if self.max_parent_depth == 0 {
            return Err(HexMoveError::InvalidConfig(
                "max_parent_depth must be at least 1".into(),
            ));
        }

        if !(0..=100).contains(&self.default_defense) {
            return Err(HexMoveError::InvalidConfig(format!(
                "default_defense ({}) must be within 0..=100",
                self.default_defense
            )));
        }

        if self.parallel_threshold == 0 {
            return Err(HexMoveError::InvalidConfig(
                "parallel_threshold must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

static CONFIG: OnceLock<PathfindConfig> = OnceLock::new();

/// Get the global pathfinding config (initializes with defaults if not set)
pub fn config() -> &'static PathfindConfig {
    CONFIG.get_or_init(PathfindConfig::default)
}

/// Set the global pathfinding config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: PathfindConfig) -> std::result::Result<(), PathfindConfig> {
    CONFIG.set(config)
}
