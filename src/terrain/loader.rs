//! Load movement types and terrain aliases from TOML

use ahash::AHashSet;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::core::config::{PathfindConfig, IMPASSABLE};
use crate::core::error::{HexMoveError, Result};
use crate::terrain::alias::{Alias, TerrainAliases};
use crate::terrain::code::TerrainCode;
use crate::terrain::profile::{MovementProfile, MovementProfiles, ProfileId};
use crate::terrain::resolver::TerrainCostResolver;

/// Raw game data as written in TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GameDataDef {
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub movetype: BTreeMap<String, MovetypeDef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovetypeDef {
    #[serde(default)]
    pub flying: bool,
    pub parent: Option<String>,
    #[serde(default)]
    pub movement_costs: BTreeMap<String, i64>,
    #[serde(default)]
    pub defense: BTreeMap<String, i64>,
    #[serde(default)]
    pub resistance: BTreeMap<String, i64>,
}

/// Validated game data, ready to build a resolver from
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub profiles: MovementProfiles,
    pub aliases: TerrainAliases,
}

impl GameData {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let def: GameDataDef = toml::from_str(content)?;
        def.build()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn into_resolver(self, config: &PathfindConfig) -> TerrainCostResolver {
        TerrainCostResolver::with_config(self.profiles, self.aliases, config)
    }
}

impl GameDataDef {
    pub fn build(self) -> Result<GameData> {
        let mut aliases = TerrainAliases::new();
        for (code, expr) in &self.aliases {
            let code = TerrainCode::new(code)?;
            aliases.insert(code, Alias::parse(code, expr)?);
        }

        check_parents(&self.movetype)?;

        // BTreeMap order fixes the ids, so they are stable across loads
        let ids: BTreeMap<&str, ProfileId> = self
            .movetype
            .keys()
            .enumerate()
            .map(|(i, name)| (name.as_str(), ProfileId(i as u32)))
            .collect();

        let mut profiles = MovementProfiles::new();
        for (name, def) in &self.movetype {
            let profile = build_profile(name, def, &ids)?;
            let id = profiles.add(profile);
            debug_assert_eq!(Some(&id), ids.get(name.as_str()));
        }

        tracing::debug!(
            "Loaded {} movement types and {} terrain aliases",
            profiles.len(),
            aliases.len()
        );

        Ok(GameData { profiles, aliases })
    }
}

fn check_parents(movetypes: &BTreeMap<String, MovetypeDef>) -> Result<()> {
    for (name, def) in movetypes {
        let mut seen = AHashSet::new();
        seen.insert(name.as_str());
        let mut parent = def.parent.as_deref();

        while let Some(p) = parent {
            let Some(parent_def) = movetypes.get(p) else {
                return Err(HexMoveError::UnknownParent {
                    movetype: name.clone(),
                    parent: p.to_string(),
                });
            };
            if !seen.insert(p) {
                return Err(HexMoveError::ParentCycle(name.clone()));
            }
            parent = parent_def.parent.as_deref();
        }
    }
    Ok(())
}

fn build_profile(
    name: &str,
    def: &MovetypeDef,
    ids: &BTreeMap<&str, ProfileId>,
) -> Result<MovementProfile> {
    let mut profile = MovementProfile::new(name).with_flying(def.flying);

    if let Some(parent) = &def.parent {
        let id = ids
            .get(parent.as_str())
            .ok_or_else(|| HexMoveError::UnknownParent {
                movetype: name.to_string(),
                parent: parent.clone(),
            })?;
        profile = profile.with_parent(*id);
    }

    for (code, cost) in &def.movement_costs {
        if *cost < 1 {
            return Err(invalid(name, "movement_costs", code, *cost));
        }
        let cost = (*cost).min(i64::from(IMPASSABLE)) as i32;
        profile = profile.with_cost(TerrainCode::new(code)?, cost);
    }

    for (code, defense) in &def.defense {
        if !(0..=100).contains(defense) {
            return Err(invalid(name, "defense", code, *defense));
        }
        profile = profile.with_defense(TerrainCode::new(code)?, *defense as i32);
    }

    for (damage_type, percent) in &def.resistance {
        let percent =
            i32::try_from(*percent).map_err(|_| invalid(name, "resistance", damage_type, *percent))?;
        profile = profile.with_resistance(damage_type.clone(), percent);
    }

    Ok(profile)
}

fn invalid(movetype: &str, table: &'static str, key: &str, value: i64) -> HexMoveError {
    HexMoveError::InvalidValue {
        movetype: movetype.to_string(),
        table,
        key: key.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"
[aliases]
Wwf = "Gt, Wst"
Hhd = "-, Hh, Ds"

[movetype.smallfoot]
[movetype.smallfoot.movement_costs]
Gt = 1
Wst = 3
Hh = 2
Ds = 2
Xu = 99999999
[movetype.smallfoot.defense]
Gt = 60
[movetype.smallfoot.resistance]
blade = 0

[movetype.elusivefoot]
parent = "smallfoot"
[movetype.elusivefoot.defense]
Gt = 40

[movetype.fly]
flying = true
[movetype.fly.movement_costs]
Gt = 1
Wst = 1
"#;

    fn code(s: &str) -> TerrainCode {
        TerrainCode::new(s).unwrap()
    }

    #[test]
    fn test_load_game_data() {
        let data = GameData::from_toml_str(DATA).unwrap();
        assert_eq!(data.profiles.len(), 3);
        assert_eq!(data.aliases.len(), 2);

        let fly = data.profiles.by_name("fly").unwrap();
        assert!(fly.is_flying());

        let foot = data.profiles.by_name("smallfoot").unwrap();
        assert_eq!(foot.own_cost(code("Xu")), Some(IMPASSABLE));
    }

    #[test]
    fn test_ids_follow_name_order() {
        let data = GameData::from_toml_str(DATA).unwrap();
        assert_eq!(data.profiles.id("elusivefoot"), Some(ProfileId(0)));
        assert_eq!(data.profiles.id("fly"), Some(ProfileId(1)));
        assert_eq!(data.profiles.id("smallfoot"), Some(ProfileId(2)));
    }

    #[test]
    fn test_loaded_resolver() {
        let data = GameData::from_toml_str(DATA).unwrap();
        let elusive = data.profiles.id("elusivefoot").unwrap();
        let resolver = data.into_resolver(&PathfindConfig::default());
        assert_eq!(resolver.movement_cost(elusive, code("Wwf")), 1);
        assert_eq!(resolver.movement_cost(elusive, code("Hhd")), 2);
        assert_eq!(resolver.defense_modifier(elusive, code("Gt")), 40);
    }

    #[test]
    fn test_unknown_parent() {
        let err = GameData::from_toml_str("[movetype.a]\nparent = \"nope\"").unwrap_err();
        assert!(matches!(err, HexMoveError::UnknownParent { .. }));
    }

    #[test]
    fn test_parent_cycle() {
        let toml = "[movetype.a]\nparent = \"b\"\n[movetype.b]\nparent = \"a\"";
        let err = GameData::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, HexMoveError::ParentCycle(_)));
    }

    #[test]
    fn test_zero_cost_rejected() {
        let toml = "[movetype.a.movement_costs]\nGt = 0";
        let err = GameData::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, HexMoveError::InvalidValue { table: "movement_costs", .. }));
    }

    #[test]
    fn test_defense_out_of_range_rejected() {
        let toml = "[movetype.a.defense]\nGt = 101";
        assert!(GameData::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_bad_alias_rejected() {
        let toml = "[aliases]\nWwf = \"Gt;Wst\"";
        let err = GameData::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, HexMoveError::InvalidAlias { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = GameData::from_toml_str("[movetype").unwrap_err();
        assert!(matches!(err, HexMoveError::TomlError(_)));
    }
}
