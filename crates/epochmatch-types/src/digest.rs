//! The single 256-bit hash function shared by commitments, seeds, and
//! checksums.
//!
//! Server and client must agree on this function byte-for-byte, so every
//! derivation in the workspace goes through [`hash256`].
//!
//! This is SHA-256. Deployments that commit with BLAKE-256 produce
//! different commitments, seeds, and checksums, so a client built on this
//! crate cannot audit proofs from such a server (or vice versa).

use sha2::{Digest, Sha256};

use crate::constants::DIGEST_SIZE;

/// SHA-256 of `data`.
#[must_use]
pub fn hash256(data: &[u8]) -> [u8; DIGEST_SIZE] {
    let result = Sha256::digest(data);
    let mut out = [0u8; DIGEST_SIZE];
    out.copy_from_slice(&result);
    out
}
