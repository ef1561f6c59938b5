use thiserror::Error;

#[derive(Error, Debug)]
pub enum HexMoveError {
    #[error("Invalid terrain code: {0:?}")]
    InvalidTerrainCode(String),

    #[error("Malformed alias for {code}: {reason}")]
    InvalidAlias { code: String, reason: String },

    #[error("Movement type {movetype} has invalid {table} value {value} for {key}")]
    InvalidValue {
        movetype: String,
        table: &'static str,
        key: String,
        value: i64,
    },

    #[error("Movement type {movetype} names unknown parent {parent}")]
    UnknownParent { movetype: String, parent: String },

    #[error("Movement type parent chain loops through {0}")]
    ParentCycle(String),

    #[error("Unknown movement type: {0}")]
    UnknownMovetype(String),

    #[error("Board error: {0}")]
    Board(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HexMoveError>;
