use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of leading hex `'0'` characters a mined block hash must carry.
///
/// Only values in `MIN..=MAX` are representable. `Block::mine` itself has no
/// upper bound; this type is where the chain's policy range lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Difficulty(u32);

impl Difficulty {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 4;
    pub const DEFAULT: Difficulty = Difficulty(2);

    pub fn new(value: u32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ChainError::OutOfRangeDifficulty(value))
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Required prefix length, as consumed by `Block::mine`.
    pub fn leading_zeros(self) -> usize {
        self.0 as usize
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for Difficulty {
    type Error = ChainError;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Difficulty> for u32 {
    fn from(d: Difficulty) -> u32 {
        d.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
