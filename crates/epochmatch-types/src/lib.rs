//! # epochmatch-types
//!
//! Shared types, errors, and configuration for the **EpochMatch** ordering core.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Digests & identifiers**: [`OrderId`], [`Commitment`], [`Preimage`], [`MarketId`], [`EpochId`]
//! - **Inbound notes**: [`EpochOrderNote`], [`WireEpochOrderNote`], [`RevealNote`], [`OrderSide`]
//! - **Proof model**: [`MatchProof`]
//! - **Epoch model**: [`EpochPhase`], [`EpochConfig`]
//! - **Configuration**: [`MarketConfig`], [`UnresolvedPolicy`]
//! - **Errors**: [`EpochmatchError`] with `EM_ERR_` prefix codes
//! - **Constants**: digest sizes, timing defaults, and limits

pub mod config;
pub mod constants;
pub mod digest;
pub mod epoch;
pub mod error;
pub mod ids;
pub mod note;
pub mod proof;

// Re-export all primary types at crate root for ergonomic imports:
//   use epochmatch_types::{OrderId, Commitment, Preimage, EpochOrderNote, ...};

pub use config::*;
pub use digest::hash256;
pub use epoch::*;
pub use error::*;
pub use ids::*;
pub use note::*;
pub use proof::*;

// Constants are accessed via `epochmatch_types::constants::FOO`
// (not re-exported to avoid name collisions).
