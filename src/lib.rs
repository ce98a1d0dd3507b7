//! A toy blockchain for teaching hashing, linking and tamper detection.
//!
//! Blocks are SHA-256 hashed over `index ++ previous_hash ++ timestamp ++
//! data ++ nonce`, mined until the hex digest has `difficulty` leading
//! zeros, and linked through `previous_hash`. A [`chain::Chain`] validates
//! hash integrity and link integrity for every block after genesis.
//!
//! ```
//! use toychain::chain::{Chain, ChainConfig};
//!
//! let mut chain = Chain::new(ChainConfig::with_difficulty(1)).unwrap();
//! chain.append("Alice pays Bob 10").unwrap();
//! assert!(chain.is_valid());
//!
//! chain.tamper(1, "Alice pays Bob 9999").unwrap();
//! assert!(!chain.is_valid());
//!
//! chain.fix_forward(1).unwrap();
//! assert!(chain.is_valid());
//! ```

pub mod block;
pub mod chain;
pub mod difficulty;
pub mod error;
pub mod format;
pub mod hash;
pub mod session;
pub mod validation;

pub use block::{Block, BlockRecord, MiningResult};
pub use chain::{Chain, ChainConfig, ChainStats};
pub use difficulty::Difficulty;
pub use error::{ChainError, Result};
pub use session::{create_chain, ChainHandle, Snapshot};
pub use validation::{BlockValidation, InvalidReason, ValidationReport};
