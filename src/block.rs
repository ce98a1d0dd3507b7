use crate::hash::{self, BlockHash};
use chrono::{DateTime, TimeZone, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A single chain entry: payload, link to its predecessor, and proof of work.
///
/// `hash` is stored next to the fields it is derived from. It is only
/// refreshed through [`Block::commit_hash`] (or mining, which calls it), so a
/// payload overwrite that skips that call leaves the block detectably stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    index: u64,
    timestamp: i64,
    data: String,
    previous_hash: BlockHash,
    nonce: u64,
    hash: BlockHash,
}

/// Outcome of one proof-of-work search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningResult {
    pub hash: BlockHash,
    pub nonce: u64,
    /// Hash computations performed, including the initial check.
    pub attempts: u64,
    pub duration_ms: u64,
}

/// Plain snapshot of every block field, for display and transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    pub index: u64,
    pub timestamp: i64,
    pub data: String,
    pub previous_hash: BlockHash,
    pub nonce: u64,
    pub hash: BlockHash,
}

impl Block {
    /// Create an unmined block (`nonce = 0`); the hash is computed immediately.
    pub fn new(
        index: u64,
        timestamp: i64,
        data: impl Into<String>,
        previous_hash: impl Into<String>,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp,
            data: data.into(),
            previous_hash: previous_hash.into(),
            nonce: 0,
            hash: BlockHash::new(),
        };
        block.commit_hash();
        block
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The stored hash, which may be stale after a tamper.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Recompute the digest from the current fields without storing it.
    pub fn compute_hash(&self) -> BlockHash {
        hash::compute_hash(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.data,
            self.nonce,
        )
    }

    /// Store the freshly computed digest as this block's hash.
    pub fn commit_hash(&mut self) -> &str {
        self.hash = self.compute_hash();
        &self.hash
    }

    /// Whether the stored hash still matches the block's fields.
    pub fn verify(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Proof-of-work search.
    ///
    /// Checks the stored hash first and only bumps `nonce` (re-committing the
    /// hash) while it lacks `difficulty` leading zeros. Callers that changed
    /// a field must `commit_hash` before mining, otherwise a stale hash that
    /// already satisfies the target ends the search immediately.
    ///
    /// No upper bound is placed on `difficulty`; keeping it small is up to
    /// the caller.
    pub fn mine(&mut self, difficulty: usize) -> MiningResult {
        let started = Instant::now();
        let mut attempts = 1u64;

        while !hash::meets_difficulty(&self.hash, difficulty) {
            self.nonce += 1;
            self.commit_hash();
            attempts += 1;
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Block #{} mined: {} ({} attempts in {}ms)",
            self.index, self.hash, attempts, duration_ms
        );

        MiningResult {
            hash: self.hash.clone(),
            nonce: self.nonce,
            attempts,
            duration_ms,
        }
    }

    pub fn serialize(&self) -> BlockRecord {
        BlockRecord::from(self)
    }

    /// Overwrite the payload and leave `hash` untouched.
    pub(crate) fn overwrite_data(&mut self, data: String) {
        self.data = data;
    }

    /// Relink to a new predecessor; the caller re-commits the hash.
    pub(crate) fn relink(&mut self, previous_hash: BlockHash) {
        self.previous_hash = previous_hash;
    }
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index,
            timestamp: block.timestamp,
            data: block.data.clone(),
            previous_hash: block.previous_hash.clone(),
            nonce: block.nonce,
            hash: block.hash.clone(),
        }
    }
}
