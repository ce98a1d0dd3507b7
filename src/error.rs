use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Difficulty out of range: {0} (expected 1..=4)")]
    OutOfRangeDifficulty(u32),

    #[error("Invalid block index: {index} (chain length {len})")]
    InvalidBlockIndex { index: usize, len: usize },

    #[error("Another mining operation is already in progress")]
    ConcurrentMutation,

    #[error("Empty chain: no genesis block")]
    EmptyChain,

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChainError>;
