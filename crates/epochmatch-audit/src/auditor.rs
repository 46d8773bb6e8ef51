//! Client-side proof auditor.
//!
//! A client mirrors every epoch order note it is sent into its own epoch
//! queue, one per `(market, epoch)`. Notes for a later epoch can arrive
//! before the previous epoch's proof does, so each epoch keeps its own
//! mirror. When the server publishes a [`MatchProof`] together with the
//! revealed preimages, the auditor regenerates the proof from the mirror of
//! `proof.epoch` using the published misses and compares. A disagreement
//! means the server added, dropped, or substituted orders, biased the seed,
//! or labelled the proof with the wrong epoch.

use std::collections::{BTreeMap, btree_map::Entry};

use epochmatch_proof::shuffle_order_ids;
use epochmatch_queue::MarketQueues;
use epochmatch_types::{
    EpochId, EpochOrderNote, EpochmatchError, MarketId, MatchProof, OrderId, Preimage, Result,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Outcome of a successful audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub market: MarketId,
    pub epoch: EpochId,
    pub order_count: usize,
    /// The matching order implied by the verified seed.
    pub match_order: Vec<OrderId>,
}

/// Mirrors epoch queues for a set of markets and checks published proofs.
pub struct ProofAuditor {
    followed: Vec<MarketId>,
    epochs: RwLock<BTreeMap<EpochId, MarketQueues>>,
}

impl ProofAuditor {
    /// Create an auditor following `markets`.
    ///
    /// # Errors
    /// `MarketExists` if a market is listed twice.
    pub fn new(markets: impl IntoIterator<Item = MarketId>) -> Result<Self> {
        let auditor = Self {
            followed: markets.into_iter().collect(),
            epochs: RwLock::new(BTreeMap::new()),
        };
        auditor.fresh_mirror()?;
        Ok(auditor)
    }

    fn fresh_mirror(&self) -> Result<MarketQueues> {
        let mirror = MarketQueues::new();
        for market in &self.followed {
            mirror.add_market(market.clone())?;
        }
        Ok(mirror)
    }

    fn ensure_followed(&self, market: &MarketId) -> Result<()> {
        if self.followed.contains(market) {
            Ok(())
        } else {
            Err(EpochmatchError::UnknownMarket(market.clone()))
        }
    }

    /// Mirror an epoch order note into the queue of its market and epoch.
    ///
    /// # Errors
    /// `UnknownMarket` if the market is not followed, or the queue's
    /// `DuplicateCommitment`.
    pub fn observe(&self, note: &EpochOrderNote) -> Result<()> {
        self.ensure_followed(&note.market_id)?;
        let mut epochs = self.epochs.write();
        let mirror = match epochs.entry(note.epoch) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                tracing::debug!(epoch = note.epoch.0, "Epoch mirror opened");
                entry.insert(self.fresh_mirror()?)
            }
        };
        mirror.route(note)
    }

    /// Number of orders mirrored for `market` in `epoch`.
    pub fn mirrored(&self, market: &MarketId, epoch: EpochId) -> Result<usize> {
        self.ensure_followed(market)?;
        match self.epochs.read().get(&epoch) {
            Some(mirror) => Ok(mirror.queue(market)?.size()),
            None => Ok(0),
        }
    }

    /// Epochs with a mirror still awaiting audit, ascending.
    pub fn pending_epochs(&self) -> Vec<EpochId> {
        self.epochs.read().keys().copied().collect()
    }

    /// Check `proof` for `market` against the mirror of `proof.epoch`.
    ///
    /// An epoch the auditor saw no notes for is checked against an empty
    /// mirror, so a proof relabelled onto another epoch fails. Only the
    /// audited `(market, epoch)` mirror is reset afterwards, whatever the
    /// outcome; other epochs are left untouched.
    ///
    /// # Errors
    /// - `UnknownMarket` if the market is not followed
    /// - `UnresolvedOrders` if the published preimages do not cover the mirror
    /// - `ProofMismatch` if order count, seed, or checksum disagree
    pub fn audit(
        &self,
        market: &MarketId,
        proof: &MatchProof,
        preimages: &[Preimage],
    ) -> Result<AuditReport> {
        self.ensure_followed(market)?;
        let queue = self
            .epochs
            .read()
            .get(&proof.epoch)
            .map(|mirror| mirror.queue(market))
            .transpose()?
            .unwrap_or_default();

        let outcome = queue
            .generate_match_proof(preimages, &proof.misses)
            .and_then(|(seed, checksum)| {
                let order_count = queue.size();
                check_field(
                    "order_count",
                    &proof.order_count.to_string(),
                    &order_count.to_string(),
                )?;
                check_field("seed", &hex::encode(proof.seed), &hex::encode(seed))?;
                check_field(
                    "checksum",
                    &hex::encode(proof.checksum),
                    &hex::encode(checksum),
                )?;
                Ok(AuditReport {
                    market: market.clone(),
                    epoch: proof.epoch,
                    order_count,
                    match_order: shuffle_order_ids(&seed, &queue.order_ids()),
                })
            });
        queue.reset();
        self.prune(proof.epoch);

        match &outcome {
            Ok(report) => tracing::info!(
                market = %market,
                epoch = proof.epoch.0,
                orders = report.order_count,
                "Match proof verified"
            ),
            Err(err) => tracing::warn!(
                market = %market,
                epoch = proof.epoch.0,
                error = %err,
                "Match proof audit failed"
            ),
        }
        outcome
    }

    /// Drop `epoch`'s mirror once every market in it has been audited.
    fn prune(&self, epoch: EpochId) {
        let mut epochs = self.epochs.write();
        let drained = epochs.get(&epoch).is_some_and(|mirror| {
            mirror
                .markets()
                .iter()
                .all(|m| mirror.queue(m).is_ok_and(|q| q.is_empty()))
        });
        if drained {
            epochs.remove(&epoch);
        }
    }
}

fn check_field(field: &'static str, published: &str, recomputed: &str) -> Result<()> {
    if published == recomputed {
        Ok(())
    } else {
        Err(EpochmatchError::ProofMismatch {
            field,
            expected: recomputed.to_string(),
            actual: published.to_string(),
        })
    }
}
