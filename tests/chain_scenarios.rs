//! End-to-end scenarios driven through the public handle API.

use proptest::prelude::*;
use toychain::hash::meets_difficulty;
use toychain::{create_chain, Block, Chain, ChainConfig, ChainError, InvalidReason};

#[test]
fn tamper_and_fix_scenario() {
    let handle = create_chain(2).unwrap();
    let a = handle.append("A").unwrap();
    let b = handle.append("B").unwrap();
    assert!(a.hash.starts_with("00"));
    assert!(b.hash.starts_with("00"));
    assert!(handle.snapshot().is_valid);

    handle.tamper(1, "X").unwrap();
    let snap = handle.snapshot();
    assert!(!snap.is_valid);
    assert_eq!(snap.per_block_status[1].reason, Some(InvalidReason::HashMismatch));
    assert!(snap.per_block_status[0].is_valid);
    assert!(snap.per_block_status[2].is_valid);
    // Stored hash and successor link are untouched by the tamper.
    assert_eq!(snap.blocks[1].hash, a.hash);
    assert_eq!(snap.blocks[2].previous_hash, a.hash);

    handle.fix_forward(1).unwrap();
    let fixed = handle.snapshot();
    assert!(fixed.is_valid);
    assert!(fixed.per_block_status.iter().all(|s| s.is_valid));
    assert_ne!(fixed.blocks[1].hash, a.hash);
    assert_ne!(fixed.blocks[2].hash, b.hash);
    assert_eq!(fixed.blocks[2].previous_hash, fixed.blocks[1].hash);
    assert_eq!(fixed.blocks[1].data, "X");
}

#[test]
fn difficulty_errors_leave_state_alone() {
    let handle = create_chain(3).unwrap();
    assert!(matches!(
        handle.set_difficulty(0),
        Err(ChainError::OutOfRangeDifficulty(0))
    ));
    assert!(matches!(
        handle.set_difficulty(5),
        Err(ChainError::OutOfRangeDifficulty(5))
    ));
    assert_eq!(handle.snapshot().difficulty, 3);
}

#[test]
fn indexes_outside_chain_are_rejected() {
    let handle = create_chain(1).unwrap();
    assert!(matches!(
        handle.tamper(1, "x"),
        Err(ChainError::InvalidBlockIndex { index: 1, len: 1 })
    ));
    assert!(matches!(
        handle.fix_forward(3),
        Err(ChainError::InvalidBlockIndex { index: 3, len: 1 })
    ));
}

#[test]
fn each_difficulty_level_mines() {
    let mut chain = Chain::new(ChainConfig::with_difficulty(1)).unwrap();
    for d in 1..=4 {
        chain.set_difficulty(d).unwrap();
        let result = chain.append(format!("level {}", d)).unwrap();
        assert!(meets_difficulty(&result.hash, d as usize));
        assert!(result.attempts >= 1);
    }
    assert!(chain.is_valid());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn mined_hash_has_required_prefix(
        data in ".{0,40}",
        timestamp in 0i64..4_000_000_000_000,
        difficulty in 1usize..=3,
    ) {
        let mut block = Block::new(1, timestamp, data, "prev");
        let result = block.mine(difficulty);
        prop_assert!(result.hash.bytes().take(difficulty).all(|b| b == b'0'));
        prop_assert!(result.attempts >= 1);
        prop_assert_eq!(result.attempts, result.nonce + 1);
        prop_assert!(block.verify());
    }

    #[test]
    fn untampered_blocks_verify(
        index in 0u64..1000,
        data in ".{0,40}",
        previous in "[0-9a-f]{64}",
        timestamp in 0i64..4_000_000_000_000,
    ) {
        let block = Block::new(index, timestamp, data, previous);
        prop_assert_eq!(block.hash(), block.compute_hash());
    }

    #[test]
    fn tamper_never_cascades(
        payloads in prop::collection::vec("[a-z]{1,8}", 2..6),
        pick in any::<prop::sample::Index>(),
        evil in "[A-Z]{1,8}",
    ) {
        let mut chain = Chain::new(ChainConfig::with_difficulty(1)).unwrap();
        for p in &payloads {
            chain.append(p.as_str()).unwrap();
        }
        let k = 1 + pick.index(payloads.len());
        chain.tamper(k, evil).unwrap();

        for status in chain.per_block_status() {
            prop_assert_eq!(status.is_valid, status.index != k);
        }
    }
}
