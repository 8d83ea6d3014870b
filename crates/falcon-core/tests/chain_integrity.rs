use falcon_core::chain::{Chain, ChainFault};
use falcon_core::constants::GENESIS_HASH;
use falcon_core::Block;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;

fn demo_chain(difficulty: u32) -> Chain {
    let mut chain = Chain::with_difficulty(difficulty);
    chain.append(Block::new(1, "01/01/2018", json!({ "amount": 4 })));
    chain.append(Block::new(2, "10/01/2018", json!({ "amount": 10 })));
    chain
}

#[test]
fn end_to_end_scenario() {
    let mut chain = demo_chain(2);
    assert_eq!(chain.len(), 3);
    assert!(chain.is_valid());

    // Flip an amount without rehashing: the recomputed digest no longer
    // matches the stored one.
    chain.blocks_mut()[1].data = json!({ "amount": 999 });
    assert!(!chain.is_valid());
    assert_eq!(chain.check(), Err(ChainFault::DigestMismatch { position: 1 }));
}

#[test]
fn fresh_chain_links_are_intact() {
    let chain = demo_chain(1);
    assert_eq!(chain.blocks()[1].previous_hash, GENESIS_HASH);
    for i in 1..chain.len() {
        assert_eq!(chain.blocks()[i].previous_hash, chain.blocks()[i - 1].hash);
        assert_eq!(chain.blocks()[i].hash, chain.blocks()[i].compute_hash());
    }
    assert!(chain.is_valid());
}

#[test]
fn tampered_timestamp_is_detected() {
    let mut chain = demo_chain(1);
    chain.blocks_mut()[1].timestamp = "02/01/2018".to_string();
    assert!(!chain.is_valid());
}

#[test]
fn link_splice_is_detected() {
    let mut chain = demo_chain(1);
    // An arbitrary wrong previous-hash breaks the digest as well as the
    // link, since the previous-hash is part of the preimage.
    chain.blocks_mut()[2].previous_hash = "deadbeef".to_string();
    assert!(!chain.is_valid());
}

#[test]
fn self_consistent_forgery_breaks_the_link() {
    let mut chain = demo_chain(1);
    // Forge a replacement tip whose own hash is consistent but whose
    // previous-hash points somewhere else entirely.
    let mut forged = Block::with_previous(2, "10/01/2018", json!({ "amount": 10 }), "deadbeef");
    forged.mine(1);
    chain.blocks_mut()[2] = forged;
    assert_eq!(chain.check(), Err(ChainFault::BrokenLink { position: 2 }));
}

#[test]
fn append_does_not_police_index_or_timestamp() {
    // The hash chain is the only trust anchor; a nonsensical index is
    // accepted and the chain still validates.
    let mut chain = Chain::with_difficulty(1);
    chain.append(Block::new(7, "not even a date", json!(null)));
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.blocks()[1].index, 7);
    assert!(chain.is_valid());
}

#[test]
fn random_payloads_validate() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut chain = Chain::with_difficulty(1);
    for i in 1..=8u64 {
        let amount: u64 = rng.gen_range(1..1_000);
        chain.append(Block::new(i, format!("ts-{i}"), json!({ "amount": amount })));
    }
    assert_eq!(chain.len(), 9);
    assert!(chain.is_valid());
}

#[test]
fn parallel_append_extends_a_valid_chain() {
    let mut chain = Chain::with_difficulty(2);
    chain.append_parallel(Block::new(1, "01/01/2018", json!({ "amount": 4 })));
    assert_eq!(chain.len(), 2);
    assert!(chain.blocks()[1].hash.starts_with("00"));
    assert!(chain.is_valid());
}

#[test]
fn difficulty_change_affects_future_blocks_only() {
    let mut chain = Chain::with_difficulty(0);
    chain.append(Block::new(1, "01/01/2018", json!({ "amount": 4 })));
    chain.set_difficulty(2);
    chain.append(Block::new(2, "10/01/2018", json!({ "amount": 10 })));
    assert!(chain.blocks()[2].hash.starts_with("00"));
    assert!(chain.is_valid());
}
