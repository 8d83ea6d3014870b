use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::info;

pub mod constants;
pub mod mine;

pub use mine::mine_block_parallel;

use constants::{GENESIS_DATA, GENESIS_PREVIOUS_HASH, GENESIS_TIMESTAMP};

/// A single block of the ledger. Finalized once mined; thereafter any
/// mutation is tampering and will be caught by `Chain::check`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: String,
    pub data: Value,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
}

impl Block {
    /// New candidate block with the reserved previous-hash sentinel.
    /// `Chain::append` overwrites the sentinel with the tip's hash.
    pub fn new(index: u64, timestamp: impl Into<String>, data: Value) -> Self {
        Self::with_previous(index, timestamp, data, GENESIS_PREVIOUS_HASH)
    }

    pub fn with_previous(
        index: u64,
        timestamp: impl Into<String>,
        data: Value,
        previous_hash: impl Into<String>,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp: timestamp.into(),
            data,
            previous_hash: previous_hash.into(),
            hash: String::new(),
            nonce: 0,
        };
        block.hash = block.compute_hash();
        block
    }

    /// The fixed first block every chain starts from.
    pub fn genesis() -> Self {
        Self::new(
            constants::GENESIS_INDEX,
            GENESIS_TIMESTAMP,
            Value::String(GENESIS_DATA.to_string()),
        )
    }

    /// Preimage bytes shared by every nonce attempt: the decimal index,
    /// previous hash, timestamp and canonical JSON payload, in that order.
    pub(crate) fn preimage_prefix(&self) -> String {
        format!(
            "{}{}{}{}",
            self.index,
            self.previous_hash,
            self.timestamp,
            canonical_payload(&self.data)
        )
    }

    /// SHA-256 over `(index, previous_hash, timestamp, payload, nonce)`,
    /// rendered as lowercase hex. Pure: identical fields give identical
    /// output on every call.
    pub fn compute_hash(&self) -> String {
        let digest = Sha256::digest(format!("{}{}", self.preimage_prefix(), self.nonce));
        hex::encode(digest)
    }

    /// Search nonces until the digest has at least `difficulty` leading
    /// zero hex digits. Unbounded; termination is probabilistic with
    /// expected work around 16^difficulty attempts. At difficulty 0 the
    /// nonce is left untouched.
    pub fn mine(&mut self, difficulty: u32) {
        let prefix = self.preimage_prefix();
        loop {
            let digest = Sha256::digest(format!("{prefix}{}", self.nonce));
            if pow::count_leading_zero_nibbles(&digest) >= difficulty {
                self.hash = hex::encode(digest);
                break;
            }
            self.nonce = self.nonce.wrapping_add(1);
        }
        info!(
            "mined block {} with nonce {} and hash {}",
            self.index, self.nonce, self.hash
        );
    }
}

/// Canonical JSON rendering of a payload. serde_json keeps object keys in
/// a sorted map, so the same value always serializes to the same bytes.
pub fn canonical_payload(data: &Value) -> String {
    serde_json::to_string(data).expect("JSON value serialization is infallible")
}

pub mod pow {
    /// Count leading zero hex digits of a raw digest. The difficulty
    /// condition is checked on bytes so the mining loop never allocates
    /// a hex string per attempt.
    pub fn count_leading_zero_nibbles(digest: &[u8]) -> u32 {
        let mut total = 0u32;
        for b in digest {
            if *b == 0 {
                total += 2;
            } else {
                if *b >> 4 == 0 {
                    total += 1;
                }
                break;
            }
        }
        total
    }
}

pub mod chain {
    use super::*;
    use crate::constants::DEFAULT_DIFFICULTY;
    use thiserror::Error;

    /// First structural fault found while walking a chain. Positions are
    /// offsets into the sequence, not the (untrusted) stored indices.
    #[derive(Debug, Error, PartialEq, Eq)]
    pub enum ChainFault {
        #[error("block {position}: stored hash does not match its recomputed digest")]
        DigestMismatch { position: u64 },
        #[error("block {position}: previous-hash does not match the predecessor's digest")]
        BrokenLink { position: u64 },
    }

    /// In-memory append-only chain with a proof-of-work gate on admission.
    /// Always non-empty: seeded with the genesis block at construction.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct Chain {
        blocks: Vec<Block>,
        difficulty: u32,
    }

    impl Default for Chain {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Chain {
        pub fn new() -> Self {
            Self::with_difficulty(DEFAULT_DIFFICULTY)
        }

        pub fn with_difficulty(difficulty: u32) -> Self {
            Self {
                blocks: vec![Block::genesis()],
                difficulty,
            }
        }

        /// The tip of the chain. Total: the chain is never empty.
        pub fn latest(&self) -> &Block {
            self.blocks.last().expect("chain is seeded with genesis")
        }

        /// Bind `candidate` to the current tip, mine it at the chain's
        /// difficulty, and push it. Takes the candidate by value so no
        /// partially mined block is ever observable. The candidate's
        /// index and timestamp are accepted as-is; only the hash chain
        /// carries trust weight.
        pub fn append(&mut self, mut candidate: Block) -> &Block {
            candidate.previous_hash = self.latest().hash.clone();
            candidate.mine(self.difficulty);
            self.blocks.push(candidate);
            self.latest()
        }

        /// Like `append`, but searches nonces across all cores.
        pub fn append_parallel(&mut self, mut candidate: Block) -> &Block {
            candidate.previous_hash = self.latest().hash.clone();
            let mined = mine_block_parallel(candidate, self.difficulty);
            self.blocks.push(mined);
            self.latest()
        }

        /// Walk positions 1..len recomputing each digest and comparing
        /// each previous-hash link. Genesis is trusted unconditionally.
        /// Reports tampering as data, never as a panic, so a caller can
        /// still inspect an invalid chain.
        pub fn check(&self) -> Result<(), ChainFault> {
            for i in 1..self.blocks.len() {
                let current = &self.blocks[i];
                let previous = &self.blocks[i - 1];
                if current.hash != current.compute_hash() {
                    return Err(ChainFault::DigestMismatch { position: i as u64 });
                }
                if current.previous_hash != previous.hash {
                    return Err(ChainFault::BrokenLink { position: i as u64 });
                }
            }
            Ok(())
        }

        pub fn is_valid(&self) -> bool {
            self.check().is_ok()
        }

        pub fn blocks(&self) -> &[Block] {
            &self.blocks
        }

        /// Mutable view of the blocks. The slice cannot grow or shrink,
        /// so the sequence itself stays append-only.
        pub fn blocks_mut(&mut self) -> &mut [Block] {
            &mut self.blocks
        }

        pub fn len(&self) -> usize {
            self.blocks.len()
        }

        pub fn is_empty(&self) -> bool {
            self.blocks.is_empty()
        }

        pub fn difficulty(&self) -> u32 {
            self.difficulty
        }

        /// Changing difficulty affects future blocks only.
        pub fn set_difficulty(&mut self, difficulty: u32) {
            self.difficulty = difficulty;
        }
    }
}
