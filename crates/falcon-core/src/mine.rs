use crate::{pow::count_leading_zero_nibbles, Block};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::info;

/// Mines a block by searching nonces in parallel until its digest has at
/// least `difficulty` leading zero hex digits. Each attempt is the same
/// pure `(nonce) -> hash` transition the sequential loop performs, so the
/// winning block is indistinguishable from a sequentially mined one apart
/// from which satisfying nonce was found first.
pub fn mine_block_parallel(mut block: Block, difficulty: u32) -> Block {
    let prefix = block.preimage_prefix();

    // Rayon splits the nonce range across threads.
    let found = (0u64..u64::MAX)
        .into_par_iter()
        .find_any(|nonce| {
            let mut hasher = Sha256::new();
            hasher.update(prefix.as_bytes());
            hasher.update(nonce.to_string().as_bytes());
            count_leading_zero_nibbles(&hasher.finalize()) >= difficulty
        })
        .expect("nonce space exhausted (practically impossible)");

    block.nonce = found;
    block.hash = block.compute_hash();

    info!(
        "mined block {} with nonce {} and hash {}",
        block.index, block.nonce, block.hash
    );

    block
}
