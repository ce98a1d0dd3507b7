use crate::block::{BlockRecord, MiningResult};
use crate::chain::{Chain, ChainConfig, ChainStats};
use crate::error::{ChainError, Result};
use crate::validation::{BlockValidation, ValidationReport};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Everything a front end needs to render the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub blocks: Vec<BlockRecord>,
    pub per_block_status: Vec<BlockValidation>,
    pub is_valid: bool,
    pub difficulty: u32,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Shareable owner of one [`Chain`].
///
/// Mutations are single-flight: while one append, fix or other mutation is
/// running, a second one fails with [`ChainError::ConcurrentMutation`]
/// instead of queueing. Reads wait for the running mutation to finish.
///
/// `ChainHandle` is `Send + Sync`, so callers can mine on a worker thread.
#[derive(Debug)]
pub struct ChainHandle {
    chain: Mutex<Chain>,
    last_mining: Mutex<Option<MiningResult>>,
    busy: AtomicBool,
}

/// Clears the busy flag when dropped.
struct MutationGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Create a chain with the given difficulty and wrap it in a handle.
pub fn create_chain(difficulty: u32) -> Result<ChainHandle> {
    ChainHandle::new(ChainConfig::with_difficulty(difficulty))
}

impl ChainHandle {
    pub fn new(config: ChainConfig) -> Result<Self> {
        Ok(Self::from_chain(Chain::new(config)?))
    }

    pub fn from_chain(chain: Chain) -> Self {
        Self {
            chain: Mutex::new(chain),
            last_mining: Mutex::new(None),
            busy: AtomicBool::new(false),
        }
    }

    /// Mine and append a block. Blocks for the duration of the search.
    pub fn append(&self, data: &str) -> Result<MiningResult> {
        let _guard = self.begin_mutation()?;
        let result = self.lock_chain().append(data)?;
        *self.lock_last_mining() = Some(result.clone());
        Ok(result)
    }

    /// Overwrite a block's payload without re-hashing.
    pub fn tamper(&self, index: usize, new_data: &str) -> Result<()> {
        let _guard = self.begin_mutation()?;
        self.lock_chain().tamper(index, new_data)
    }

    /// Re-mine the block at `index` and cascade to every later block.
    pub fn fix_forward(&self, index: usize) -> Result<Vec<MiningResult>> {
        let _guard = self.begin_mutation()?;
        self.lock_chain().fix_forward(index)
    }

    pub fn set_difficulty(&self, n: u32) -> Result<()> {
        let _guard = self.begin_mutation()?;
        self.lock_chain().set_difficulty(n)
    }

    /// Discard all blocks and start again from genesis.
    pub fn reset(&self) -> Result<()> {
        let _guard = self.begin_mutation()?;
        self.lock_chain().reset();
        *self.lock_last_mining() = None;
        Ok(())
    }

    /// Freshly computed view of blocks and validation state.
    pub fn snapshot(&self) -> Snapshot {
        let chain = self.lock_chain();
        Snapshot {
            blocks: chain.blocks().iter().map(BlockRecord::from).collect(),
            per_block_status: chain.per_block_status(),
            is_valid: chain.is_valid(),
            difficulty: chain.difficulty().get(),
        }
    }

    pub fn stats(&self) -> Result<ChainStats> {
        self.lock_chain().stats()
    }

    /// First failing block and why, or `Valid`.
    pub fn validate_detailed(&self) -> ValidationReport {
        self.lock_chain().validate_detailed()
    }

    /// Result of the most recent append, if any since creation or reset.
    pub fn last_mining_result(&self) -> Option<MiningResult> {
        self.lock_last_mining().clone()
    }

    pub fn block_validation(&self, index: usize) -> Option<BlockValidation> {
        self.lock_chain()
            .per_block_status()
            .into_iter()
            .find(|v| v.index == index)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    fn begin_mutation(&self) -> Result<MutationGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Rejected mutation: another one is in flight");
            return Err(ChainError::ConcurrentMutation);
        }
        Ok(MutationGuard { busy: &self.busy })
    }

    // A panic mid-mutation leaves a usable chain: validation reports any damage.
    fn lock_chain(&self) -> MutexGuard<'_, Chain> {
        self.chain.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_last_mining(&self) -> MutexGuard<'_, Option<MiningResult>> {
        self.last_mining.lock().unwrap_or_else(|e| e.into_inner())
    }
}
