//! Terrain aliases
//!
//! An alias terrain has no table entries of its own. It is defined as a list
//! of underlying codes, optionally interleaved with `+` (take the best of
//! what follows) and `-` (take the worst). The default is take-best.
//!
//! ```text
//! Wwf = "Gt, Wst"      ford: grass or shallow water, whichever is better
//! Hhd = "-, Hh, Ds"    dunes: hills or sand, whichever is worse
//! ```

use ahash::AHashMap;
use nom::branch::alt;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, map, map_res, value};
use nom::multi::separated_list1;
use nom::sequence::delimited;
use nom::{IResult, Parser};

use crate::core::error::{HexMoveError, Result};
use crate::terrain::code::{is_code_byte, TerrainCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasToken {
    /// Following terms combine by taking the better value
    Best,
    /// Following terms combine by taking the worse value
    Worst,
    Terrain(TerrainCode),
}

/// Parsed alias definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    tokens: Vec<AliasToken>,
}

impl Alias {
    /// Parse an alias expression such as `"-, Hh, Ds"`
    pub fn parse(code: TerrainCode, expr: &str) -> Result<Self> {
        let (_, tokens) = alias_expr(expr).map_err(|e| HexMoveError::InvalidAlias {
            code: code.to_string(),
            reason: e.to_string(),
        })?;

        if !tokens.iter().any(|t| matches!(t, AliasToken::Terrain(_))) {
            return Err(HexMoveError::InvalidAlias {
                code: code.to_string(),
                reason: "no underlying terrain".into(),
            });
        }

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[AliasToken] {
        &self.tokens
    }

    /// Underlying terrain codes, operators stripped
    pub fn underlying(&self) -> impl Iterator<Item = TerrainCode> + '_ {
        self.tokens.iter().filter_map(|t| match t {
            AliasToken::Terrain(code) => Some(*code),
            _ => None,
        })
    }

    /// Fold the resolved value of each underlying code.
    ///
    /// Lower values are better (movement cost, chance to be hit), so "best"
    /// keeps the minimum and "worst" the maximum. Returns None only for an
    /// alias without terrain terms, which `parse` never produces.
    pub fn combine(&self, mut resolve: impl FnMut(TerrainCode) -> i32) -> Option<i32> {
        let mut prefer_worst = false;
        let mut result: Option<i32> = None;

        for token in &self.tokens {
            match *token {
                AliasToken::Best => prefer_worst = false,
                AliasToken::Worst => prefer_worst = true,
                AliasToken::Terrain(code) => {
                    let value = resolve(code);
                    result = Some(match result {
                        None => value,
                        Some(acc) if prefer_worst => acc.max(value),
                        Some(acc) => acc.min(value),
                    });
                }
            }
        }

        result
    }
}

fn token(input: &str) -> IResult<&str, AliasToken> {
    delimited(
        multispace0,
        alt((
            value(AliasToken::Best, char('+')),
            value(AliasToken::Worst, char('-')),
            map(
                map_res(
                    take_while_m_n(1, TerrainCode::MAX_LEN, |c: char| {
                        c.is_ascii() && is_code_byte(c as u8)
                    }),
                    TerrainCode::new,
                ),
                AliasToken::Terrain,
            ),
        )),
        multispace0,
    )
    .parse(input)
}

fn alias_expr(input: &str) -> IResult<&str, Vec<AliasToken>> {
    all_consuming(separated_list1(char(','), token)).parse(input)
}

/// Global alias table, read-only after load
#[derive(Debug, Clone, Default)]
pub struct TerrainAliases {
    table: AHashMap<TerrainCode, Alias>,
}

impl TerrainAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: TerrainCode, alias: Alias) {
        self.table.insert(code, alias);
    }

    /// Parse and insert `code = expr`
    pub fn define(&mut self, code: &str, expr: &str) -> Result<()> {
        let code = TerrainCode::new(code)?;
        let alias = Alias::parse(code, expr)?;
        self.insert(code, alias);
        Ok(())
    }

    pub fn get(&self, code: TerrainCode) -> Option<&Alias> {
        self.table.get(&code)
    }

    pub fn is_alias(&self, code: TerrainCode) -> bool {
        self.table.contains_key(&code)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
