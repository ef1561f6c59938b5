//! Terrain codes, movement types and the terrain cost resolver

pub mod alias;
pub mod code;
pub mod loader;
pub mod profile;
pub mod resolver;

pub use alias::{Alias, AliasToken, TerrainAliases};
pub use code::TerrainCode;
pub use loader::{GameData, GameDataDef, MovetypeDef};
pub use profile::{MovementProfile, MovementProfiles, ProfileChain, ProfileId};
pub use resolver::TerrainCostResolver;
