use crate::block::Block;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a block failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Stored hash no longer matches the block's fields.
    HashMismatch,
    /// `previous_hash` differs from the predecessor's stored hash.
    BrokenLink,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::HashMismatch => write!(f, "Hash mismatch - block was tampered"),
            InvalidReason::BrokenLink => write!(f, "Previous hash doesn't match chain"),
        }
    }
}

/// Status of one block, as used to shade individual entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockValidation {
    pub index: usize,
    pub is_valid: bool,
    pub reason: Option<InvalidReason>,
}

impl BlockValidation {
    pub fn valid(index: usize) -> Self {
        Self {
            index,
            is_valid: true,
            reason: None,
        }
    }

    pub fn invalid(index: usize, reason: InvalidReason) -> Self {
        Self {
            index,
            is_valid: false,
            reason: Some(reason),
        }
    }
}

/// Whole-chain verdict: valid, or the first failing block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationReport {
    Valid,
    Invalid { index: usize, reason: InvalidReason },
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationReport::Valid)
    }

    pub fn invalid_index(&self) -> Option<usize> {
        match self {
            ValidationReport::Valid => None,
            ValidationReport::Invalid { index, .. } => Some(*index),
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReport::Valid => write!(f, "Chain is valid"),
            ValidationReport::Invalid {
                index,
                reason: InvalidReason::HashMismatch,
            } => write!(f, "Block {}: Hash mismatch (data was tampered)", index),
            ValidationReport::Invalid {
                index,
                reason: InvalidReason::BrokenLink,
            } => write!(
                f,
                "Block {}: Previous hash doesn't match Block {}",
                index,
                index.saturating_sub(1)
            ),
        }
    }
}

/// Two-rule check of `block` against its predecessor.
///
/// Hash integrity is checked before link integrity, so a block failing both
/// always reports `HashMismatch`.
pub fn check_block(block: &Block, previous: &Block) -> Result<(), InvalidReason> {
    if block.hash() != block.compute_hash() {
        return Err(InvalidReason::HashMismatch);
    }
    if block.previous_hash() != previous.hash() {
        return Err(InvalidReason::BrokenLink);
    }
    Ok(())
}
