pub mod config;
pub mod error;

pub use config::{config, set_config, PathfindConfig, ZocPolicy, IMPASSABLE, UNREACHABLE};
pub use error::{HexMoveError, Result};
