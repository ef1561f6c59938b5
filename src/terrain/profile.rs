//! Movement types
//!
//! A movement type describes how a class of units moves: cost to enter each
//! terrain, defense on it, and resistances. Lookups that miss fall back to
//! the parent movement type, if any.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::config::IMPASSABLE;
use crate::terrain::code::TerrainCode;

/// Index of a movement type in a [`MovementProfiles`] registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub u32);

#[derive(Debug, Clone, PartialEq)]
pub struct MovementProfile {
    name: String,
    costs: AHashMap<TerrainCode, i32>,
    defense: AHashMap<TerrainCode, i32>,
    resistance: AHashMap<String, i32>,
    flying: bool,
    parent: Option<ProfileId>,
}

impl MovementProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            costs: AHashMap::new(),
            defense: AHashMap::new(),
            resistance: AHashMap::new(),
            flying: false,
            parent: None,
        }
    }

    /// Costs at or above [`IMPASSABLE`] are stored as `IMPASSABLE`.
    pub fn with_cost(mut self, terrain: TerrainCode, cost: i32) -> Self {
        self.costs.insert(terrain, cost.min(IMPASSABLE));
        self
    }

    pub fn with_defense(mut self, terrain: TerrainCode, chance_to_hit: i32) -> Self {
        self.defense.insert(terrain, chance_to_hit);
        self
    }

    pub fn with_resistance(mut self, damage_type: impl Into<String>, percent: i32) -> Self {
        self.resistance.insert(damage_type.into(), percent);
        self
    }

    pub fn with_flying(mut self, flying: bool) -> Self {
        self.flying = flying;
        self
    }

    pub fn with_parent(mut self, parent: ProfileId) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    pub fn parent(&self) -> Option<ProfileId> {
        self.parent
    }

    pub fn own_cost(&self, terrain: TerrainCode) -> Option<i32> {
        self.costs.get(&terrain).copied()
    }

    pub fn own_defense(&self, terrain: TerrainCode) -> Option<i32> {
        self.defense.get(&terrain).copied()
    }

    pub fn own_resistance(&self, damage_type: &str) -> Option<i32> {
        self.resistance.get(damage_type).copied()
    }
}

/// All movement types known to the game, loaded once and shared by units
#[derive(Debug, Clone, Default)]
pub struct MovementProfiles {
    profiles: Vec<MovementProfile>,
    by_name: AHashMap<String, ProfileId>,
}

impl MovementProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a movement type. A later profile with the same name
    /// replaces the earlier one in name lookups.
    pub fn add(&mut self, profile: MovementProfile) -> ProfileId {
        let id = ProfileId(self.profiles.len() as u32);
        self.by_name.insert(profile.name.clone(), id);
        self.profiles.push(profile);
        id
    }

    pub fn get(&self, id: ProfileId) -> Option<&MovementProfile> {
        self.profiles.get(id.0 as usize)
    }

    pub fn id(&self, name: &str) -> Option<ProfileId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&MovementProfile> {
        self.id(name).and_then(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProfileId, &MovementProfile)> {
        self.profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (ProfileId(i as u32), p))
    }

    /// The profile followed by its ancestors, at most `max_hops` parents deep
    pub fn chain(&self, id: ProfileId, max_hops: u32) -> ProfileChain<'_> {
        ProfileChain {
            profiles: self,
            next: Some(id),
            hops_left: max_hops,
        }
    }
}

/// Iterator over a movement type and its parents
pub struct ProfileChain<'a> {
    profiles: &'a MovementProfiles,
    next: Option<ProfileId>,
    hops_left: u32,
}

impl<'a> Iterator for ProfileChain<'a> {
    type Item = &'a MovementProfile;

    fn next(&mut self) -> Option<Self::Item> {
        let profile = self.profiles.get(self.next?)?;
        self.next = match profile.parent {
            Some(parent) if self.hops_left > 0 => {
                self.hops_left -= 1;
                Some(parent)
            }
            Some(_) => {
                tracing::warn!(
                    "Parent chain of movement type {} truncated; parents are nested too deep",
                    profile.name
                );
                None
            }
            None => None,
        };
        Some(profile)
    }
}
