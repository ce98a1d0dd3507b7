use sha2::{Digest, Sha256};

/// SHA-256 hash as lowercase hex string (64 chars).
pub type BlockHash = String;

/// `previous_hash` sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Compute the SHA-256 hex digest of a block's fields.
///
/// Fields are rendered in decimal / as-is and concatenated with no separator,
/// in the fixed order `index ++ previous_hash ++ timestamp ++ data ++ nonce`.
/// Recorded hashes depend on this exact layout.
pub fn compute_hash(
    index: u64,
    previous_hash: &str,
    timestamp: i64,
    data: &str,
    nonce: u64,
) -> BlockHash {
    let mut hasher = Sha256::new();
    hasher.update(index.to_string());
    hasher.update(previous_hash);
    hasher.update(timestamp.to_string());
    hasher.update(data);
    hasher.update(nonce.to_string());
    format!("{:x}", hasher.finalize())
}

/// Whether `hash` starts with at least `difficulty` `'0'` characters.
pub fn meets_difficulty(hash: &str, difficulty: usize) -> bool {
    hash.len() >= difficulty && hash.bytes().take(difficulty).all(|b| b == b'0')
}
