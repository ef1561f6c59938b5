//! Compact terrain codes ("Gg", "Wwf", "Hh")

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{HexMoveError, Result};

/// A terrain code of 1 to 8 ASCII characters, stored inline so it is `Copy`
/// and cheap to hash.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TerrainCode([u8; TerrainCode::MAX_LEN]);

impl TerrainCode {
    pub const MAX_LEN: usize = 8;

    pub fn new(code: &str) -> Result<Self> {
        if code.is_empty() || code.len() > Self::MAX_LEN || !code.bytes().all(is_code_byte) {
            return Err(HexMoveError::InvalidTerrainCode(code.to_string()));
        }
        let mut bytes = [0u8; Self::MAX_LEN];
        bytes[..code.len()].copy_from_slice(code.as_bytes());
        Ok(Self(bytes))
    }

    pub fn as_str(&self) -> &str {
        let len = self.0.iter().position(|b| *b == 0).unwrap_or(Self::MAX_LEN);
        std::str::from_utf8(&self.0[..len]).unwrap_or_default()
    }
}

pub(crate) fn is_code_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

impl TryFrom<String> for TerrainCode {
    type Error = HexMoveError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<TerrainCode> for String {
    fn from(code: TerrainCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Display for TerrainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TerrainCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TerrainCode({})", self.as_str())
    }
}
