//! Reveal collection for one epoch.
//!
//! After COLLECT ends, originators disclose the preimages behind their
//! commitments. The [`RevealBook`] checks each reveal against the epoch
//! queue before accepting it, so by the time the proof is generated every
//! recorded preimage is known to open a queued commitment.

use std::collections::HashMap;

use epochmatch_types::{EpochmatchError, OrderId, Preimage, Result, RevealNote};

use crate::EpochQueue;

/// Validated preimage reveals keyed by order ID.
#[derive(Debug, Default)]
pub struct RevealBook {
    reveals: HashMap<OrderId, Preimage>,
}

impl RevealBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a reveal for an order in `queue`.
    ///
    /// Returns `true` if newly recorded, `false` for an identical re-send.
    ///
    /// # Errors
    /// - `OrderNotQueued` if the order is not in the queue
    /// - `PreimageMismatch` if the preimage does not hash to its commitment
    pub fn record(&mut self, queue: &EpochQueue, reveal: RevealNote) -> Result<bool> {
        let commit = queue
            .commitment_of(&reveal.order_id)
            .ok_or(EpochmatchError::OrderNotQueued(reveal.order_id))?;
        if !commit.matches(&reveal.preimage) {
            return Err(EpochmatchError::PreimageMismatch(reveal.order_id));
        }
        Ok(self
            .reveals
            .insert(reveal.order_id, reveal.preimage)
            .is_none())
    }

    pub fn is_revealed(&self, oid: &OrderId) -> bool {
        self.reveals.contains_key(oid)
    }

    pub fn len(&self) -> usize {
        self.reveals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reveals.is_empty()
    }

    /// All recorded preimages, ascending by order ID.
    pub fn preimages(&self) -> Vec<Preimage> {
        let mut entries: Vec<(&OrderId, &Preimage)> = self.reveals.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, p)| *p).collect()
    }

    /// Queued orders that have not revealed, ascending.
    pub fn unrevealed(&self, queue: &EpochQueue) -> Vec<OrderId> {
        queue
            .order_ids()
            .into_iter()
            .filter(|oid| !self.reveals.contains_key(oid))
            .collect()
    }

    pub fn clear(&mut self) {
        self.reveals.clear();
    }
}
