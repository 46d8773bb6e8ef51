//! # epochmatch-audit
//!
//! **Verification plane**: lets a client confirm that the server's published
//! match proof is the one its own mirror of the epoch produces.
//!
//! The auditor runs the exact same [`EpochQueue`](epochmatch_queue::EpochQueue)
//! algorithm as the server, so agreement on `seed` and `checksum` means:
//! 1. No order the client saw was hidden or replaced
//! 2. No unseen order was added
//! 3. The seed commits to every surviving preimage in public order

pub mod auditor;

pub use auditor::{AuditReport, ProofAuditor};
