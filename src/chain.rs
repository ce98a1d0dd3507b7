use crate::block::{Block, MiningResult};
use crate::difficulty::Difficulty;
use crate::error::{ChainError, Result};
use crate::hash::{BlockHash, GENESIS_PREVIOUS_HASH};
use crate::validation::{check_block, BlockValidation, ValidationReport};
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const GENESIS_DATA: &str = "Genesis Block";

/// Construction options for a [`Chain`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Leading zeros required when mining. `None` means the default (2).
    #[serde(default)]
    pub difficulty: Option<u32>,
}

impl ChainConfig {
    pub fn with_difficulty(difficulty: u32) -> Self {
        Self {
            difficulty: Some(difficulty),
        }
    }
}

/// In-memory, append-only sequence of hash-linked blocks.
///
/// Block `i` always sits at position `i`. The genesis block is created
/// unmined and is trusted by every validation routine.
///
/// There is no internal locking: mutations against one chain must be
/// serialised by the owner (see [`crate::session::ChainHandle`]).
#[derive(Debug, Clone)]
pub struct Chain {
    blocks: Vec<Block>,
    difficulty: Difficulty,
}

/// Derived chain summary, computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainStats {
    pub length: usize,
    pub difficulty: Difficulty,
    pub is_valid: bool,
    pub latest_hash: BlockHash,
}

impl Chain {
    pub fn new(config: ChainConfig) -> Result<Self> {
        let difficulty = match config.difficulty {
            Some(n) => Difficulty::new(n)?,
            None => Difficulty::default(),
        };
        Ok(Self {
            blocks: vec![Self::genesis()],
            difficulty,
        })
    }

    fn genesis() -> Block {
        Block::new(0, now_millis(), GENESIS_DATA, GENESIS_PREVIOUS_HASH)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false once constructed; the genesis block is never removed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Result<&Block> {
        self.blocks.get(index).ok_or(ChainError::InvalidBlockIndex {
            index,
            len: self.blocks.len(),
        })
    }

    pub fn latest(&self) -> Result<&Block> {
        self.blocks.last().ok_or(ChainError::EmptyChain)
    }

    /// Mine a new block carrying `data` onto the end of the chain.
    pub fn append(&mut self, data: impl Into<String>) -> Result<MiningResult> {
        let previous_hash = self.latest()?.hash().to_string();
        let mut block = Block::new(self.blocks.len() as u64, now_millis(), data, previous_hash);
        let result = block.mine(self.difficulty.leading_zeros());
        self.blocks.push(block);
        Ok(result)
    }

    /// Check blocks `1..len` in order, stopping at the first failure.
    pub fn validate_detailed(&self) -> ValidationReport {
        for (i, pair) in self.blocks.windows(2).enumerate() {
            if let Err(reason) = check_block(&pair[1], &pair[0]) {
                let index = i + 1;
                debug!("Block {} failed validation: {}", index, reason);
                return ValidationReport::Invalid { index, reason };
            }
        }
        ValidationReport::Valid
    }

    pub fn is_valid(&self) -> bool {
        self.validate_detailed().is_valid()
    }

    /// Status of every block. Genesis is reported valid unconditionally.
    pub fn per_block_status(&self) -> Vec<BlockValidation> {
        let mut statuses = Vec::with_capacity(self.blocks.len());
        if !self.blocks.is_empty() {
            statuses.push(BlockValidation::valid(0));
        }
        for (i, pair) in self.blocks.windows(2).enumerate() {
            let index = i + 1;
            statuses.push(match check_block(&pair[1], &pair[0]) {
                Ok(()) => BlockValidation::valid(index),
                Err(reason) => BlockValidation::invalid(index, reason),
            });
        }
        statuses
    }

    /// Change the difficulty used by future mining. Existing blocks are not
    /// re-checked. On error the previous difficulty is kept.
    pub fn set_difficulty(&mut self, n: u32) -> Result<()> {
        self.difficulty = Difficulty::new(n)?;
        info!("Difficulty set to {}", self.difficulty);
        Ok(())
    }

    pub fn stats(&self) -> Result<ChainStats> {
        Ok(ChainStats {
            length: self.blocks.len(),
            difficulty: self.difficulty,
            is_valid: self.is_valid(),
            latest_hash: self.latest()?.hash().to_string(),
        })
    }

    /// Overwrite a block's payload without touching any hash.
    ///
    /// Only that block's own hash-integrity check starts failing; successors
    /// still link to its stored (now stale) hash.
    pub fn tamper(&mut self, index: usize, data: impl Into<String>) -> Result<()> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(ChainError::InvalidBlockIndex { index, len })?;
        block.overwrite_data(data.into());
        warn!("Block {} data overwritten without re-hashing", index);
        Ok(())
    }

    /// Re-mine the block at `index`, then relink and re-mine every later
    /// block in order. Returns one result per re-mined block.
    ///
    /// The genesis block is never mined, so `index == 0` is a no-op.
    pub fn fix_forward(&mut self, index: usize) -> Result<Vec<MiningResult>> {
        if index >= self.blocks.len() {
            return Err(ChainError::InvalidBlockIndex {
                index,
                len: self.blocks.len(),
            });
        }
        if index == 0 {
            warn!("Genesis block cannot be re-mined; nothing to fix");
            return Ok(Vec::new());
        }

        let zeros = self.difficulty.leading_zeros();
        let mut results = Vec::with_capacity(self.blocks.len() - index);

        let block = &mut self.blocks[index];
        block.commit_hash();
        results.push(block.mine(zeros));

        for i in index + 1..self.blocks.len() {
            let previous_hash = self.blocks[i - 1].hash().to_string();
            let block = &mut self.blocks[i];
            block.relink(previous_hash);
            block.commit_hash();
            results.push(block.mine(zeros));
        }

        info!(
            "Re-mined {} block(s) from #{} at difficulty {}",
            results.len(),
            index,
            self.difficulty
        );
        Ok(results)
    }

    /// Drop every block and start again from a fresh genesis block.
    pub fn reset(&mut self) {
        self.blocks = vec![Self::genesis()];
        info!("Chain reset to genesis");
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self {
            blocks: vec![Self::genesis()],
            difficulty: Difficulty::default(),
        }
    }
}

impl fmt::Display for ChainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Length:      {}", self.length)?;
        writeln!(f, "Difficulty:  {}", self.difficulty)?;
        writeln!(f, "Valid:       {}", self.is_valid)?;
        writeln!(f, "Latest hash: {}", self.latest_hash)?;
        Ok(())
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
