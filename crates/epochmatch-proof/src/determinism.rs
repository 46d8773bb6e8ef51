//! Seed and commitment-checksum derivation.
//!
//! The two outputs deliberately use different sort keys: the seed orders
//! preimages by their order ID, the checksum orders commitments by their own
//! value. Both orderings are fixed before any preimage is revealed.

use epochmatch_types::{
    Commitment, OrderId, Preimage, constants::DIGEST_SIZE, constants::PREIMAGE_SIZE, hash256,
};

/// Derive the epoch seed from `(order, preimage)` pairs.
///
/// Sorts `pairs` in place ascending by raw order-ID bytes, concatenates the
/// preimages in that order, and hashes the buffer.
#[must_use]
pub fn compute_seed(pairs: &mut [(OrderId, Preimage)]) -> [u8; DIGEST_SIZE] {
    pairs.sort_unstable_by(|a, b| a.0.cmp(&b.0));

    let mut buf = Vec::with_capacity(pairs.len() * PREIMAGE_SIZE);
    for (_, pimg) in pairs.iter() {
        buf.extend_from_slice(pimg.as_bytes());
    }
    hash256(&buf)
}

/// Derive the commitment checksum.
///
/// Sorts `commitments` in place ascending by raw bytes, concatenates, and
/// hashes. Any two holders of the same commitment set agree on the result.
#[must_use]
pub fn compute_commitment_checksum(commitments: &mut [Commitment]) -> [u8; DIGEST_SIZE] {
    commitments.sort_unstable();

    let mut buf = Vec::with_capacity(commitments.len() * DIGEST_SIZE);
    for commit in commitments.iter() {
        buf.extend_from_slice(commit.as_bytes());
    }
    hash256(&buf)
}

/// Recompute the seed and compare with `expected`.
#[must_use]
pub fn verify_seed(pairs: &mut [(OrderId, Preimage)], expected: &[u8; DIGEST_SIZE]) -> bool {
    compute_seed(pairs) == *expected
}

/// Recompute the checksum and compare with `expected`.
#[must_use]
pub fn verify_commitment_checksum(
    commitments: &mut [Commitment],
    expected: &[u8; DIGEST_SIZE],
) -> bool {
    compute_commitment_checksum(commitments) == *expected
}
