//! The per-market, per-epoch queue of order commitments.
//!
//! Orders are recorded as `OrderId → Commitment` while the epoch is open.
//! When it closes, [`EpochQueue::generate_match_proof`] prunes misses,
//! pairs every remaining order with its revealed preimage, and derives the
//! `(seed, checksum)` pair.
//!
//! Every operation serializes through one mutex owned by the queue. The
//! queue never logs; callers own observability.

use std::collections::HashMap;

use epochmatch_proof::{compute_commitment_checksum, compute_seed};
use epochmatch_types::{
    Commitment, EpochOrderNote, EpochmatchError, OrderId, Preimage, Result,
    constants::DIGEST_SIZE,
};
use parking_lot::Mutex;

/// Seed and commitment checksum, in that order.
pub type ProofDigests = ([u8; DIGEST_SIZE], [u8; DIGEST_SIZE]);

#[derive(Default)]
struct QueueState {
    orders: HashMap<OrderId, Commitment>,
    /// Reverse index; one order per commitment within an epoch.
    by_commitment: HashMap<Commitment, OrderId>,
}

impl QueueState {
    fn remove(&mut self, oid: &OrderId) -> Option<Commitment> {
        let commit = self.orders.remove(oid)?;
        self.by_commitment.remove(&commit);
        Some(commit)
    }

    fn insert(&mut self, oid: OrderId, commit: Commitment) -> Result<()> {
        if let Some(existing) = self.by_commitment.get(&commit) {
            if *existing == oid {
                return Ok(());
            }
            return Err(EpochmatchError::DuplicateCommitment {
                commitment: commit,
                existing: *existing,
            });
        }
        // Retransmission with a new commitment: last write wins.
        if let Some(old) = self.orders.insert(oid, commit) {
            self.by_commitment.remove(&old);
        }
        self.by_commitment.insert(commit, oid);
        Ok(())
    }
}

/// Thread-safe set of order commitments observed for the current epoch.
///
/// Shared between execution contexts via `Arc`; all methods take `&self`.
#[derive(Default)]
pub struct EpochQueue {
    state: Mutex<QueueState>,
}

impl EpochQueue {
    /// Create an empty epoch queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the queue. Call when a new epoch begins.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.orders.clear();
        state.by_commitment.clear();
    }

    /// Record the note's `(order_id, commitment)`.
    ///
    /// Re-enqueueing a known order ID overwrites its commitment.
    ///
    /// # Errors
    /// `DuplicateCommitment` if another order already holds this commitment;
    /// the queue is left unchanged.
    pub fn enqueue(&self, note: &EpochOrderNote) -> Result<()> {
        self.state.lock().insert(note.order_id, note.commitment)
    }

    /// Like [`enqueue`](Self::enqueue), but refuses a new order once `limit`
    /// orders are queued. Overwrites of a queued order are always accepted.
    ///
    /// # Errors
    /// `EpochFull` at the limit, or `DuplicateCommitment`.
    pub fn enqueue_with_limit(&self, note: &EpochOrderNote, limit: usize) -> Result<()> {
        let mut state = self.state.lock();
        if state.orders.len() >= limit && !state.orders.contains_key(&note.order_id) {
            return Err(EpochmatchError::EpochFull { limit });
        }
        state.insert(note.order_id, note.commitment)
    }

    /// Number of queued orders.
    pub fn size(&self) -> usize {
        self.state.lock().orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().orders.is_empty()
    }

    /// Whether the order is queued.
    pub fn exists(&self, oid: &OrderId) -> bool {
        self.state.lock().orders.contains_key(oid)
    }

    /// The commitment recorded for `oid`, if queued.
    pub fn commitment_of(&self, oid: &OrderId) -> Option<Commitment> {
        self.state.lock().orders.get(oid).copied()
    }

    /// Queued order IDs, ascending.
    pub fn order_ids(&self) -> Vec<OrderId> {
        let mut ids: Vec<OrderId> = self.state.lock().orders.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Queued `(order, commitment)` pairs, ascending by order ID.
    pub fn snapshot(&self) -> Vec<(OrderId, Commitment)> {
        let mut entries: Vec<(OrderId, Commitment)> = self
            .state
            .lock()
            .orders
            .iter()
            .map(|(oid, commit)| (*oid, *commit))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Derive the epoch's sorting seed and commitment checksum.
    ///
    /// 1. Remove every order in `misses`.
    /// 2. Pair each preimage with the queued order whose commitment is its
    ///    hash. Preimages that open no queued commitment are ignored.
    /// 3. Every remaining order must be paired.
    /// 4. `seed = hash(preimages in ascending order-ID order)`.
    /// 5. `checksum = hash(commitments in ascending commitment order)`.
    ///
    /// The lock is held for the whole computation. Misses stay removed even
    /// when the call fails.
    ///
    /// # Errors
    /// `UnresolvedOrders` if any remaining order has no matching preimage.
    pub fn generate_match_proof(
        &self,
        preimages: &[Preimage],
        misses: &[OrderId],
    ) -> Result<ProofDigests> {
        let mut state = self.state.lock();

        for oid in misses {
            state.remove(oid);
        }

        let mut matched: HashMap<OrderId, Preimage> = HashMap::with_capacity(preimages.len());
        for pimg in preimages {
            if let Some(oid) = state.by_commitment.get(&pimg.commit()) {
                matched.insert(*oid, *pimg);
            }
        }

        if matched.len() != state.orders.len() {
            let mut unresolved: Vec<OrderId> = state
                .orders
                .keys()
                .filter(|oid| !matched.contains_key(oid))
                .copied()
                .collect();
            unresolved.sort_unstable();
            return Err(EpochmatchError::UnresolvedOrders {
                matched: matched.len(),
                queued: state.orders.len(),
                unresolved,
            });
        }

        let mut pairs: Vec<(OrderId, Preimage)> = matched.into_iter().collect();
        let seed = compute_seed(&mut pairs);

        let mut commits: Vec<Commitment> = state.orders.values().copied().collect();
        let checksum = compute_commitment_checksum(&mut commits);

        Ok((seed, checksum))
    }
}
