//! # epochmatch-proof
//!
//! **Pure deterministic match-proof derivations.**
//!
//! Everything here is a function of its inputs only (no locks, no clocks,
//! no logging), so server and client produce byte-identical output:
//!
//! - **Seed**: hash of revealed preimages concatenated in ascending order-ID order
//! - **Commitment checksum**: hash of commitments sorted by their own bytes
//! - **Seeded shuffle**: the permutation the matcher applies to an epoch's orders

pub mod determinism;
pub mod shuffle;

pub use determinism::{
    compute_commitment_checksum, compute_seed, verify_commitment_checksum, verify_seed,
};
pub use epochmatch_types::hash256 as hash;
pub use shuffle::{SeedStream, shuffle_order_ids};
