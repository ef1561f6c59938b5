//! Terrain cost resolution
//!
//! Resolves (movement type, terrain) to a movement cost or defense value:
//!
//! 1. alias terrain expands to its underlying codes, each resolved in turn
//!    and combined by the alias operators;
//! 2. a plain code is looked up in the movement type's own table, then in
//!    its parents;
//! 3. if nothing matches the result is [`IMPASSABLE`] (cost) or the
//!    configured default (defense).
//!
//! Results are memoized per (movement type, terrain). The memo tables sit
//! behind `RwLock`s so a resolver can be shared across threads; they are
//! only ever cleared wholesale through `&mut self`.

use ahash::AHashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::core::config::{self, PathfindConfig, IMPASSABLE};
use crate::terrain::alias::TerrainAliases;
use crate::terrain::code::TerrainCode;
use crate::terrain::profile::{MovementProfile, MovementProfiles, ProfileId};

type MemoTable = RwLock<AHashMap<(ProfileId, TerrainCode), i32>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Cost,
    Defense,
}

/// Per-lookup state for alias expansion
#[derive(Default)]
struct AliasWalk {
    stack: Vec<TerrainCode>,
    settled: AHashMap<TerrainCode, i32>,
}

pub struct TerrainCostResolver {
    profiles: MovementProfiles,
    aliases: TerrainAliases,
    max_alias_depth: u32,
    max_parent_depth: u32,
    default_defense: i32,
    default_resistance: i32,
    cost_cache: MemoTable,
    defense_cache: MemoTable,
}

impl fmt::Debug for TerrainCostResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerrainCostResolver")
            .field("profiles", &self.profiles.len())
            .field("aliases", &self.aliases.len())
            .field("cached_entries", &self.cached_entries())
            .finish_non_exhaustive()
    }
}

impl TerrainCostResolver {
    /// Create a resolver using the global config
    pub fn new(profiles: MovementProfiles, aliases: TerrainAliases) -> Self {
        Self::with_config(profiles, aliases, config::config())
    }

    pub fn with_config(
        profiles: MovementProfiles,
        aliases: TerrainAliases,
        config: &PathfindConfig,
    ) -> Self {
        Self {
            profiles,
            aliases,
            max_alias_depth: config.max_alias_depth,
            max_parent_depth: config.max_parent_depth,
            default_defense: config.default_defense,
            default_resistance: config.default_resistance,
            cost_cache: RwLock::new(AHashMap::new()),
            defense_cache: RwLock::new(AHashMap::new()),
        }
    }

    pub fn profiles(&self) -> &MovementProfiles {
        &self.profiles
    }

    pub fn aliases(&self) -> &TerrainAliases {
        &self.aliases
    }

    pub fn profile(&self, id: ProfileId) -> Option<&MovementProfile> {
        self.profiles.get(id)
    }

    pub fn profile_id(&self, name: &str) -> Option<ProfileId> {
        self.profiles.id(name)
    }

    /// Movement points needed to enter `terrain`, or [`IMPASSABLE`]
    pub fn movement_cost(&self, profile: ProfileId, terrain: TerrainCode) -> i32 {
        self.memoized(&self.cost_cache, profile, terrain, Table::Cost)
    }

    /// Chance to be hit on `terrain`, in percent (lower is better)
    pub fn defense_modifier(&self, profile: ProfileId, terrain: TerrainCode) -> i32 {
        self.memoized(&self.defense_cache, profile, terrain, Table::Defense)
    }

    /// Resistance to a damage type, in percent
    pub fn resistance(&self, profile: ProfileId, damage_type: &str) -> i32 {
        self.profiles
            .chain(profile, self.max_parent_depth)
            .find_map(|p| p.own_resistance(damage_type))
            .unwrap_or(self.default_resistance)
    }

    /// Drop all memoized results
    pub fn invalidate(&mut self) {
        clear(&mut self.cost_cache);
        clear(&mut self.defense_cache);
        tracing::debug!("Terrain cost caches invalidated");
    }

    /// Swap in reloaded game data and rebuild from scratch
    pub fn replace_data(&mut self, profiles: MovementProfiles, aliases: TerrainAliases) {
        self.profiles = profiles;
        self.aliases = aliases;
        self.invalidate();
    }

    /// Number of memoized (movement type, terrain) results
    pub fn cached_entries(&self) -> usize {
        let costs = self.cost_cache.read().unwrap_or_else(PoisonError::into_inner).len();
        let defense = self.defense_cache.read().unwrap_or_else(PoisonError::into_inner).len();
        costs + defense
    }

    fn memoized(
        &self,
        cache: &MemoTable,
        profile: ProfileId,
        terrain: TerrainCode,
        table: Table,
    ) -> i32 {
        let key = (profile, terrain);
        if let Some(value) = cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return *value;
        }

        let (value, _) = self.resolve(profile, terrain, table, &mut AliasWalk::default());
        cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, value);
        value
    }

    /// Returns the value and whether it was cut short by an alias cycle.
    /// Cut-short values depend on where the walk entered the cycle, so
    /// they are never settled for reuse within the walk.
    fn resolve(
        &self,
        profile: ProfileId,
        terrain: TerrainCode,
        table: Table,
        walk: &mut AliasWalk,
    ) -> (i32, bool) {
        let Some(alias) = self.aliases.get(terrain) else {
            return (self.direct(profile, terrain, table), false);
        };

        if let Some(value) = walk.settled.get(&terrain) {
            return (*value, false);
        }

        if walk.stack.contains(&terrain) || walk.stack.len() >= self.max_alias_depth as usize {
            tracing::warn!(
                "Terrain alias {} loops or nests deeper than {} (movement type {:?}); treating as {}",
                terrain,
                self.max_alias_depth,
                self.profiles.get(profile).map(|p| p.name()),
                match table {
                    Table::Cost => "impassable",
                    Table::Defense => "default defense",
                }
            );
            return (self.fallback(table), true);
        }

        walk.stack.push(terrain);
        let mut cut_short = false;
        let value = alias
            .combine(|code| {
                let (value, cycle) = self.resolve(profile, code, table, walk);
                cut_short |= cycle;
                value
            })
            .unwrap_or_else(|| self.fallback(table));
        walk.stack.pop();

        if !cut_short {
            walk.settled.insert(terrain, value);
        }
        (value, cut_short)
    }

    fn direct(&self, profile: ProfileId, terrain: TerrainCode, table: Table) -> i32 {
        self.profiles
            .chain(profile, self.max_parent_depth)
            .find_map(|p| match table {
                Table::Cost => p.own_cost(terrain),
                Table::Defense => p.own_defense(terrain),
            })
            .unwrap_or_else(|| self.fallback(table))
    }

    fn fallback(&self, table: Table) -> i32 {
        match table {
            Table::Cost => IMPASSABLE,
            Table::Defense => self.default_defense,
        }
    }
}

fn clear(cache: &mut MemoTable) {
    cache
        .get_mut()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> TerrainCode {
        TerrainCode::new(s).unwrap()
    }

    fn resolver() -> (TerrainCostResolver, ProfileId, ProfileId) {
        let mut profiles = MovementProfiles::new();
        let foot = profiles.add(
            MovementProfile::new("smallfoot")
                .with_cost(code("Gt"), 1)
                .with_cost(code("Wst"), 1)
                .with_cost(code("Ss"), 3)
                .with_cost(code("Hh"), 2)
                .with_cost(code("Ds"), 2)
                .with_defense(code("Gt"), 60)
                .with_defense(code("Hh"), 50)
                .with_defense(code("Ss"), 80)
                .with_resistance("blade", 0)
                .with_resistance("fire", 10),
        );
        let elusive = profiles.add(
            MovementProfile::new("elusivefoot")
                .with_parent(foot)
                .with_cost(code("Ss"), 2)
                .with_defense(code("Gt"), 40)
                .with_resistance("blade", -30),
        );

        let mut aliases = TerrainAliases::new();
        aliases.define("Wsw", "Wst, Ss").unwrap();
        aliases.define("Hhd", "-, Hh, Ds, Ss").unwrap();
        aliases.define("Wwf", "Gt, Wst").unwrap();
        aliases.define("Nest", "Wsw, Hhd").unwrap();

        let resolver =
            TerrainCostResolver::with_config(profiles, aliases, &PathfindConfig::default());
        (resolver, foot, elusive)
    }

    #[test]
    fn test_direct_cost() {
        let (r, foot, _) = resolver();
        assert_eq!(r.movement_cost(foot, code("Gt")), 1);
        assert_eq!(r.movement_cost(foot, code("Ss")), 3);
    }

    #[test]
    fn test_alias_takes_cheapest() {
        // shallow water or swamp, whichever is cheaper
        let (r, foot, _) = resolver();
        assert_eq!(r.movement_cost(foot, code("Wsw")), 1);
    }

    #[test]
    fn test_alias_takes_worst() {
        let (r, foot, _) = resolver();
        assert_eq!(r.movement_cost(foot, code("Hhd")), 3);
        assert_eq!(r.defense_modifier(foot, code("Hhd")), 80);
    }

    #[test]
    fn test_nested_alias() {
        let (r, foot, _) = resolver();
        // best(best(Wst, Ss), worst(Hh, Ds, Ss)) = best(1, 3)
        assert_eq!(r.movement_cost(foot, code("Nest")), 1);
    }

    #[test]
    fn test_parent_fallback() {
        let (r, _, elusive) = resolver();
        // own entry wins
        assert_eq!(r.movement_cost(elusive, code("Ss")), 2);
        // missing entry comes from the parent
        assert_eq!(r.movement_cost(elusive, code("Hh")), 2);
        assert_eq!(r.defense_modifier(elusive, code("Hh")), 50);
        assert_eq!(r.defense_modifier(elusive, code("Gt")), 40);
    }

    #[test]
    fn test_alias_resolves_through_parent() {
        let (r, _, elusive) = resolver();
        assert_eq!(r.movement_cost(elusive, code("Wsw")), 1);
        assert_eq!(r.movement_cost(elusive, code("Hhd")), 2);
    }

    #[test]
    fn test_unknown_terrain_is_impassable() {
        let (r, foot, elusive) = resolver();
        assert_eq!(r.movement_cost(foot, code("Xu")), IMPASSABLE);
        assert_eq!(r.movement_cost(elusive, code("Xu")), IMPASSABLE);
        assert_eq!(r.defense_modifier(foot, code("Xu")), 50);
    }

    #[test]
    fn test_unknown_profile_is_impassable() {
        let (r, _, _) = resolver();
        assert_eq!(r.movement_cost(ProfileId(99), code("Gt")), IMPASSABLE);
    }

    #[test]
    fn test_resistance_chain() {
        let (r, foot, elusive) = resolver();
        assert_eq!(r.resistance(elusive, "blade"), -30);
        assert_eq!(r.resistance(elusive, "fire"), 10);
        assert_eq!(r.resistance(foot, "arcane"), 0);
    }

    #[test]
    fn test_alias_cycle_is_impassable_not_fatal() {
        let mut aliases = TerrainAliases::new();
        aliases.define("Aa", "Bb").unwrap();
        aliases.define("Bb", "Aa").unwrap();
        aliases.define("Cc", "Aa, Gt").unwrap();
        let mut profiles = MovementProfiles::new();
        let foot = profiles.add(MovementProfile::new("foot").with_cost(code("Gt"), 1));
        let r = TerrainCostResolver::with_config(profiles, aliases, &PathfindConfig::default());

        assert_eq!(r.movement_cost(foot, code("Aa")), IMPASSABLE);
        assert_eq!(r.movement_cost(foot, code("Bb")), IMPASSABLE);
        // a cycle inside a best-of does not hide the usable branch
        assert_eq!(r.movement_cost(foot, code("Cc")), 1);
        assert_eq!(r.defense_modifier(foot, code("Aa")), 50);
    }

    #[test]
    fn test_wide_alias_diamond_terminates() {
        // each level doubles the fan-out; settled sub-results keep it linear
        let mut aliases = TerrainAliases::new();
        for i in 0..60 {
            aliases
                .define(&format!("L{}", i), &format!("L{}, L{}", i + 1, i + 1))
                .unwrap();
        }
        aliases.define("L60", "Gt").unwrap();
        let mut profiles = MovementProfiles::new();
        let foot = profiles.add(MovementProfile::new("foot").with_cost(code("Gt"), 1));
        let r = TerrainCostResolver::with_config(profiles, aliases, &PathfindConfig::default());
        assert_eq!(r.movement_cost(foot, code("L0")), 1);
    }

    #[test]
    fn test_depth_cap() {
        let config = PathfindConfig {
            max_alias_depth: 3,
            ..PathfindConfig::default()
        };
        let mut aliases = TerrainAliases::new();
        aliases.define("D1", "D2").unwrap();
        aliases.define("D2", "D3").unwrap();
        aliases.define("D3", "D4").unwrap();
        aliases.define("D4", "Gt").unwrap();
        let mut profiles = MovementProfiles::new();
        let foot = profiles.add(MovementProfile::new("foot").with_cost(code("Gt"), 1));
        let r = TerrainCostResolver::with_config(profiles, aliases, &config);
        assert_eq!(r.movement_cost(foot, code("D2")), 1);
        assert_eq!(r.movement_cost(foot, code("D1")), IMPASSABLE);
    }

    #[test]
    fn test_cache_is_transparent() {
        let (r, foot, _) = resolver();
        let first = r.movement_cost(foot, code("Hhd"));
        assert_eq!(r.cached_entries(), 1);
        assert_eq!(r.movement_cost(foot, code("Hhd")), first);
        assert_eq!(r.cached_entries(), 1);
    }

    #[test]
    fn test_replace_data_invalidates() {
        let (mut r, foot, _) = resolver();
        assert_eq!(r.movement_cost(foot, code("Gt")), 1);

        let mut profiles = MovementProfiles::new();
        profiles.add(MovementProfile::new("smallfoot").with_cost(code("Gt"), 2));
        r.replace_data(profiles, TerrainAliases::new());

        assert_eq!(r.cached_entries(), 0);
        assert_eq!(r.movement_cost(foot, code("Gt")), 2);
    }

    #[test]
    fn test_resolver_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<TerrainCostResolver>();
    }
}
