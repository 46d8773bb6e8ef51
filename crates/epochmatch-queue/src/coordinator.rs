//! Epoch coordinator: drives one market through COLLECT → REVEAL → MATCH.
//!
//! The coordinator is the admission boundary the epoch queue relies on:
//! notes are only enqueued while the phase is COLLECT, and the phase lock is
//! held for writing while the proof is generated, so no note can slip into
//! an epoch after it closed.
//!
//! It also owns the policy for unresolved orders (see [`UnresolvedPolicy`])
//! and all logging around the epoch lifecycle.

use std::sync::Arc;

use chrono::Utc;
use epochmatch_types::{
    EpochId, EpochOrderNote, EpochPhase, EpochmatchError, MarketConfig, MarketId, MatchProof,
    OrderId, Result, RevealNote, UnresolvedPolicy,
};
use parking_lot::{Mutex, RwLock};

use crate::{EpochQueue, RevealBook};

struct EpochState {
    epoch: EpochId,
    phase: EpochPhase,
}

/// Per-market epoch lifecycle around a shared [`EpochQueue`].
pub struct EpochCoordinator {
    config: MarketConfig,
    queue: Arc<EpochQueue>,
    state: RwLock<EpochState>,
    reveals: Mutex<RevealBook>,
}

impl EpochCoordinator {
    /// Create a coordinator whose first epoch is `first_epoch`, in COLLECT.
    ///
    /// # Errors
    /// `Configuration` if `config` is invalid.
    pub fn new(config: MarketConfig, first_epoch: EpochId) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            queue: Arc::new(EpochQueue::new()),
            state: RwLock::new(EpochState {
                epoch: first_epoch,
                phase: EpochPhase::Collect,
            }),
            reveals: Mutex::new(RevealBook::new()),
        })
    }

    pub fn market_id(&self) -> &MarketId {
        &self.config.market_id
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn epoch(&self) -> EpochId {
        self.state.read().epoch
    }

    pub fn phase(&self) -> EpochPhase {
        self.state.read().phase
    }

    /// The underlying queue, for read-only inspection.
    pub fn queue(&self) -> &Arc<EpochQueue> {
        &self.queue
    }

    fn expect_phase(actual: EpochPhase, expected: EpochPhase) -> Result<()> {
        if actual == expected {
            Ok(())
        } else {
            Err(EpochmatchError::WrongEpochPhase { expected, actual })
        }
    }

    /// Admit an order note into the open epoch.
    ///
    /// # Errors
    /// - `WrongEpochPhase` outside COLLECT
    /// - `UnknownMarket` if the note is for another market
    /// - `EpochMismatch` if the note names a different epoch
    /// - `EpochFull` / `DuplicateCommitment` from the queue
    pub fn submit(&self, note: &EpochOrderNote) -> Result<()> {
        let state = self.state.read();
        Self::expect_phase(state.phase, EpochPhase::Collect)?;
        if note.market_id != self.config.market_id {
            return Err(EpochmatchError::UnknownMarket(note.market_id.clone()));
        }
        if note.epoch != state.epoch {
            return Err(EpochmatchError::EpochMismatch {
                expected: state.epoch,
                actual: note.epoch,
            });
        }

        if let Err(err) = self
            .queue
            .enqueue_with_limit(note, self.config.epoch.max_orders_per_epoch)
        {
            tracing::warn!(
                market = %self.config.market_id,
                epoch = state.epoch.0,
                order = %note.order_id.short(),
                error = %err,
                "Order note rejected"
            );
            return Err(err);
        }

        tracing::debug!(
            market = %self.config.market_id,
            epoch = state.epoch.0,
            order = %note.order_id.short(),
            side = %note.side,
            rate = note.rate,
            qty = note.quantity,
            "Order note queued"
        );
        Ok(())
    }

    /// End COLLECT and open the reveal window. Returns the number of queued
    /// orders awaiting reveal.
    pub fn close_collection(&self) -> Result<usize> {
        let mut state = self.state.write();
        Self::expect_phase(state.phase, EpochPhase::Collect)?;
        state.phase = EpochPhase::Reveal;

        let queued = self.queue.size();
        tracing::info!(
            market = %self.config.market_id,
            epoch = state.epoch.0,
            orders = queued,
            reveal_timeout_ms = u64::try_from(self.config.epoch.reveal_timeout.as_millis())
                .unwrap_or(u64::MAX),
            "Epoch collection closed"
        );
        Ok(queued)
    }

    /// Accept a preimage reveal. Returns `false` for an identical re-send.
    ///
    /// # Errors
    /// `WrongEpochPhase` outside REVEAL, or `OrderNotQueued` /
    /// `PreimageMismatch` from the reveal book.
    pub fn reveal(&self, reveal: RevealNote) -> Result<bool> {
        let state = self.state.read();
        Self::expect_phase(state.phase, EpochPhase::Reveal)?;

        let recorded = self.reveals.lock().record(&self.queue, reveal);
        if let Err(err) = &recorded {
            tracing::warn!(
                market = %self.config.market_id,
                epoch = state.epoch.0,
                order = %reveal.order_id.short(),
                error = %err,
                "Reveal rejected"
            );
        }
        recorded
    }

    /// Queued orders that have not revealed yet, ascending.
    pub fn pending_reveals(&self) -> Vec<OrderId> {
        self.reveals.lock().unrevealed(&self.queue)
    }

    /// Close the reveal window and derive the epoch's match proof.
    ///
    /// `misses` are the orders the transport layer reports as having failed
    /// to reveal before the deadline; IDs not in the queue are dropped. If
    /// orders are still unresolved, the market's [`UnresolvedPolicy`]
    /// decides between failing and treating them as misses.
    ///
    /// On success the queue and reveals are reset and the next epoch opens
    /// in COLLECT. On failure the coordinator stays in MATCH until
    /// [`abort_epoch`](Self::abort_epoch) is called.
    pub fn finalize(&self, misses: &[OrderId]) -> Result<MatchProof> {
        let mut state = self.state.write();
        Self::expect_phase(state.phase, EpochPhase::Reveal)?;
        state.phase = EpochPhase::Match;

        let preimages = self.reveals.lock().preimages();
        let mut misses: Vec<OrderId> = misses
            .iter()
            .filter(|oid| self.queue.exists(oid))
            .copied()
            .collect();

        let (seed, checksum) = match self.queue.generate_match_proof(&preimages, &misses) {
            Ok(digests) => digests,
            Err(EpochmatchError::UnresolvedOrders {
                matched,
                queued,
                unresolved,
            }) if self.config.unresolved_policy == UnresolvedPolicy::TreatAsMiss => {
                tracing::warn!(
                    market = %self.config.market_id,
                    epoch = state.epoch.0,
                    matched,
                    queued,
                    unresolved = unresolved.len(),
                    "Unresolved orders treated as misses"
                );
                let digests = self.queue.generate_match_proof(&preimages, &unresolved)?;
                misses.extend(unresolved);
                digests
            }
            Err(err) => {
                tracing::error!(
                    market = %self.config.market_id,
                    epoch = state.epoch.0,
                    error = %err,
                    "Match proof generation failed"
                );
                return Err(err);
            }
        };

        misses.sort_unstable();
        misses.dedup();

        let proof = MatchProof {
            epoch: state.epoch,
            seed,
            checksum,
            order_count: self.queue.size(),
            misses,
            generated_at: Utc::now(),
        };

        tracing::info!(
            market = %self.config.market_id,
            epoch = state.epoch.0,
            orders = proof.order_count,
            misses = proof.misses.len(),
            seed = %hex::encode(proof.seed),
            checksum = %hex::encode(proof.checksum),
            "Match proof generated"
        );

        self.start_next(&mut state);
        Ok(proof)
    }

    /// Discard the current epoch, whatever its phase, and open the next.
    pub fn abort_epoch(&self) -> EpochId {
        let mut state = self.state.write();
        tracing::warn!(
            market = %self.config.market_id,
            epoch = state.epoch.0,
            phase = %state.phase,
            orders = self.queue.size(),
            "Epoch aborted"
        );
        self.start_next(&mut state);
        state.epoch
    }

    fn start_next(&self, state: &mut EpochState) {
        self.queue.reset();
        self.reveals.lock().clear();
        state.epoch = state.epoch.next();
        state.phase = EpochPhase::Collect;
    }
}

#[cfg(test)]
mod tests {
    use epochmatch_proof::{compute_commitment_checksum, compute_seed};
    use epochmatch_types::{Commitment, Preimage};

    use super::*;

    fn coordinator(policy: UnresolvedPolicy) -> EpochCoordinator {
        EpochCoordinator::new(MarketConfig::new("dcr_btc").with_policy(policy), EpochId(1))
            .unwrap()
    }

    fn note(id: u8, epoch: EpochId) -> (EpochOrderNote, Preimage) {
        let pimg = Preimage([id.wrapping_add(100); 32]);
        let mut note = EpochOrderNote::dummy(OrderId([id; 32]), pimg.commit());
        note.epoch = epoch;
        (note, pimg)
    }

    fn reveal(oid: OrderId, preimage: Preimage) -> RevealNote {
        RevealNote {
            order_id: oid,
            preimage,
        }
    }

    #[test]
    fn full_epoch_cycle() {
        let c = coordinator(UnresolvedPolicy::Abort);
        let notes: Vec<_> = (1..=3).map(|i| note(i, EpochId(1))).collect();
        for (n, _) in &notes {
            c.submit(n).unwrap();
        }
        assert_eq!(c.close_collection().unwrap(), 3);
        for (n, p) in &notes {
            assert!(c.reveal(reveal(n.order_id, *p)).unwrap());
        }
        assert!(c.pending_reveals().is_empty());

        let proof = c.finalize(&[]).unwrap();
        assert_eq!(proof.epoch, EpochId(1));
        assert_eq!(proof.order_count, 3);
        assert!(proof.misses.is_empty());

        let mut pairs: Vec<(OrderId, Preimage)> =
            notes.iter().map(|(n, p)| (n.order_id, *p)).collect();
        let mut commits: Vec<Commitment> = notes.iter().map(|(n, _)| n.commitment).collect();
        assert_eq!(proof.seed, compute_seed(&mut pairs));
        assert_eq!(proof.checksum, compute_commitment_checksum(&mut commits));

        assert_eq!(c.epoch(), EpochId(2));
        assert_eq!(c.phase(), EpochPhase::Collect);
        assert!(c.queue().is_empty());
    }

    #[test]
    fn submit_outside_collect_rejected() {
        let c = coordinator(UnresolvedPolicy::Abort);
        c.close_collection().unwrap();
        let (n, _) = note(1, EpochId(1));
        let err = c.submit(&n).unwrap_err();
        assert!(matches!(
            err,
            EpochmatchError::WrongEpochPhase {
                expected: EpochPhase::Collect,
                actual: EpochPhase::Reveal
            }
        ));
    }

    #[test]
    fn reveal_outside_reveal_phase_rejected() {
        let c = coordinator(UnresolvedPolicy::Abort);
        let (n, p) = note(1, EpochId(1));
        c.submit(&n).unwrap();
        assert!(matches!(
            c.reveal(reveal(n.order_id, p)),
            Err(EpochmatchError::WrongEpochPhase { .. })
        ));
    }

    #[test]
    fn wrong_epoch_and_market_rejected() {
        let c = coordinator(UnresolvedPolicy::Abort);
        let (n, _) = note(1, EpochId(7));
        assert!(matches!(
            c.submit(&n),
            Err(EpochmatchError::EpochMismatch {
                expected: EpochId(1),
                actual: EpochId(7)
            })
        ));

        let (mut n, _) = note(1, EpochId(1));
        n.market_id = MarketId::new("ltc_btc");
        assert!(matches!(
            c.submit(&n),
            Err(EpochmatchError::UnknownMarket(_))
        ));
    }

    #[test]
    fn admission_cap_enforced() {
        let mut cfg = MarketConfig::new("dcr_btc");
        cfg.epoch.max_orders_per_epoch = 2;
        let c = EpochCoordinator::new(cfg, EpochId(1)).unwrap();
        c.submit(&note(1, EpochId(1)).0).unwrap();
        c.submit(&note(2, EpochId(1)).0).unwrap();
        assert!(matches!(
            c.submit(&note(3, EpochId(1)).0),
            Err(EpochmatchError::EpochFull { limit: 2 })
        ));
    }

    #[test]
    fn reported_misses_excluded() {
        let c = coordinator(UnresolvedPolicy::Abort);
        let notes: Vec<_> = (1..=3).map(|i| note(i, EpochId(1))).collect();
        for (n, _) in &notes {
            c.submit(n).unwrap();
        }
        c.close_collection().unwrap();
        c.reveal(reveal(notes[0].0.order_id, notes[0].1)).unwrap();
        c.reveal(reveal(notes[2].0.order_id, notes[2].1)).unwrap();
        let missed = c.pending_reveals();
        assert_eq!(missed, vec![notes[1].0.order_id]);

        // An unknown ID in the miss report is dropped from the proof.
        let proof = c.finalize(&[missed[0], OrderId([0xFF; 32])]).unwrap();
        assert_eq!(proof.order_count, 2);
        assert_eq!(proof.misses, missed);
    }

    #[test]
    fn abort_policy_surfaces_error_and_holds_epoch() {
        let c = coordinator(UnresolvedPolicy::Abort);
        let (n1, p1) = note(1, EpochId(1));
        let (n2, _) = note(2, EpochId(1));
        c.submit(&n1).unwrap();
        c.submit(&n2).unwrap();
        c.close_collection().unwrap();
        c.reveal(reveal(n1.order_id, p1)).unwrap();

        let err = c.finalize(&[]).unwrap_err();
        assert!(matches!(
            err,
            EpochmatchError::UnresolvedOrders { ref unresolved, .. } if unresolved == &vec![n2.order_id]
        ));
        assert_eq!(c.phase(), EpochPhase::Match);
        assert_eq!(c.epoch(), EpochId(1));

        assert_eq!(c.abort_epoch(), EpochId(2));
        assert_eq!(c.phase(), EpochPhase::Collect);
        assert!(c.queue().is_empty());
    }

    #[test]
    fn treat_as_miss_policy_retries() {
        let c = coordinator(UnresolvedPolicy::TreatAsMiss);
        let (n1, p1) = note(1, EpochId(1));
        let (n2, _) = note(2, EpochId(1));
        c.submit(&n1).unwrap();
        c.submit(&n2).unwrap();
        c.close_collection().unwrap();
        c.reveal(reveal(n1.order_id, p1)).unwrap();

        let proof = c.finalize(&[]).unwrap();
        assert_eq!(proof.order_count, 1);
        assert_eq!(proof.misses, vec![n2.order_id]);
        assert_eq!(proof.seed, compute_seed(&mut [(n1.order_id, p1)]));
        assert_eq!(c.epoch(), EpochId(2));
    }

    #[test]
    fn empty_epoch_produces_proof() {
        let c = coordinator(UnresolvedPolicy::Abort);
        c.close_collection().unwrap();
        let proof = c.finalize(&[]).unwrap();
        assert_eq!(proof.order_count, 0);
        assert_eq!(proof.seed, epochmatch_types::hash256(&[]));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = MarketConfig::new("dcr_btc");
        cfg.epoch.max_orders_per_epoch = 0;
        assert!(EpochCoordinator::new(cfg, EpochId(0)).is_err());
    }

    #[test]
    fn concurrent_submitters() {
        let c = Arc::new(coordinator(UnresolvedPolicy::Abort));
        let handles: Vec<_> = (0u8..4)
            .map(|t| {
                let c = Arc::clone(&c);
                std::thread::spawn(move || {
                    for i in 0u8..25 {
                        let (n, _) = note(t * 25 + i, EpochId(1));
                        c.submit(&n).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(c.close_collection().unwrap(), 100);
    }
}
