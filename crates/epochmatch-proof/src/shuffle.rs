//! Seeded shuffle of an epoch's orders.
//!
//! The matcher consumes the epoch seed through [`shuffle_order_ids`]: the
//! input IDs are first put in ascending order, then permuted by a
//! Fisher-Yates pass whose randomness is a hash chain over the seed. Every
//! node with the same seed and the same ID set gets the same permutation.

use epochmatch_types::{OrderId, constants::DIGEST_SIZE, hash256};

/// Deterministic stream of `u64`s derived from a seed.
///
/// Block `n` is `hash256(seed || n_le)`; each block yields four words.
pub struct SeedStream {
    seed: [u8; DIGEST_SIZE],
    counter: u64,
    block: [u8; DIGEST_SIZE],
    offset: usize,
}

impl SeedStream {
    #[must_use]
    pub fn new(seed: [u8; DIGEST_SIZE]) -> Self {
        Self {
            seed,
            counter: 0,
            block: [0u8; DIGEST_SIZE],
            offset: DIGEST_SIZE,
        }
    }

    fn refill(&mut self) {
        let mut input = [0u8; DIGEST_SIZE + 8];
        input[..DIGEST_SIZE].copy_from_slice(&self.seed);
        input[DIGEST_SIZE..].copy_from_slice(&self.counter.to_le_bytes());
        self.block = hash256(&input);
        self.counter += 1;
        self.offset = 0;
    }

    pub fn next_u64(&mut self) -> u64 {
        if self.offset + 8 > DIGEST_SIZE {
            self.refill();
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.block[self.offset..self.offset + 8]);
        self.offset += 8;
        u64::from_le_bytes(word)
    }

    /// Uniform value in `0..bound` by rejection sampling. `bound` must be non-zero.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        debug_assert!(bound > 0);
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let v = self.next_u64();
            if v < zone {
                return v % bound;
            }
        }
    }
}

/// Permute `ids` deterministically from `seed`.
///
/// The result depends only on the seed and the *set* of IDs, never on the
/// order in which they were supplied.
#[must_use]
pub fn shuffle_order_ids(seed: &[u8; DIGEST_SIZE], ids: &[OrderId]) -> Vec<OrderId> {
    let mut out = ids.to_vec();
    out.sort_unstable();

    let mut stream = SeedStream::new(*seed);
    for i in (1..out.len()).rev() {
        let j = usize::try_from(stream.next_below(i as u64 + 1)).unwrap_or(i);
        out.swap(i, j);
    }
    out
}
