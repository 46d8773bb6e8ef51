//! # epochmatch-queue
//!
//! **Commit-reveal epoch plane**: per-epoch order commitments, reveal
//! collection, and match-proof generation. Server and client run the same
//! [`EpochQueue`] so either side can audit the other.
//!
//! ## Architecture
//!
//! 1. **EpochQueue**: thread-safe `OrderId → Commitment` set for one epoch;
//!    derives the `(seed, checksum)` match proof
//! 2. **MarketQueues**: one queue per market, looked up by [`MarketId`](epochmatch_types::MarketId)
//! 3. **RevealBook**: validates preimage reveals against the queue
//! 4. **EpochCoordinator**: phase gate (COLLECT → REVEAL → MATCH), miss
//!    handling policy, and lifecycle logging
//!
//! ## Epoch Flow
//!
//! ```text
//! note → EpochCoordinator.submit() → EpochQueue.enqueue()
//!      → close_collection() → reveal() → RevealBook.record()
//!      → finalize(misses) → EpochQueue.generate_match_proof() → MatchProof
//! ```

pub mod coordinator;
pub mod epoch_queue;
pub mod market_queues;
pub mod reveal;

pub use coordinator::EpochCoordinator;
pub use epoch_queue::{EpochQueue, ProofDigests};
pub use market_queues::MarketQueues;
pub use reveal::RevealBook;
