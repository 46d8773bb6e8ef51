//! One epoch queue per market.
//!
//! Each market's queue has its own mutex, so notes for different markets
//! never contend. The registry lock is only taken to look a queue up.

use std::{collections::HashMap, sync::Arc};

use epochmatch_types::{EpochOrderNote, EpochmatchError, MarketId, Result};
use parking_lot::RwLock;

use crate::EpochQueue;

/// Registry of per-market epoch queues.
#[derive(Default)]
pub struct MarketQueues {
    queues: RwLock<HashMap<MarketId, Arc<EpochQueue>>>,
}

impl MarketQueues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty queue for `market`.
    ///
    /// # Errors
    /// `MarketExists` if the market already has a queue.
    pub fn add_market(&self, market: MarketId) -> Result<Arc<EpochQueue>> {
        let mut queues = self.queues.write();
        if queues.contains_key(&market) {
            return Err(EpochmatchError::MarketExists(market));
        }
        let queue = Arc::new(EpochQueue::new());
        queues.insert(market, Arc::clone(&queue));
        Ok(queue)
    }

    /// The queue for `market`.
    ///
    /// # Errors
    /// `UnknownMarket` if no queue is registered.
    pub fn queue(&self, market: &MarketId) -> Result<Arc<EpochQueue>> {
        self.queues
            .read()
            .get(market)
            .cloned()
            .ok_or_else(|| EpochmatchError::UnknownMarket(market.clone()))
    }

    /// Enqueue `note` into its market's queue.
    pub fn route(&self, note: &EpochOrderNote) -> Result<()> {
        self.queue(&note.market_id)?.enqueue(note)
    }

    /// Reset every market's queue.
    pub fn reset_all(&self) {
        for queue in self.queues.read().values() {
            queue.reset();
        }
    }

    /// Registered markets, sorted.
    pub fn markets(&self) -> Vec<MarketId> {
        let mut markets: Vec<MarketId> = self.queues.read().keys().cloned().collect();
        markets.sort();
        markets
    }
}

#[cfg(test)]
mod tests {
    use epochmatch_types::{OrderId, Preimage};

    use super::*;

    fn note_for(market: &str, id: u8) -> EpochOrderNote {
        let mut note = EpochOrderNote::dummy(OrderId([id; 32]), Preimage([id; 32]).commit());
        note.market_id = MarketId::new(market);
        note
    }

    #[test]
    fn routes_by_market() {
        let reg = MarketQueues::new();
        let dcr = reg.add_market(MarketId::new("dcr_btc")).unwrap();
        let ltc = reg.add_market(MarketId::new("ltc_btc")).unwrap();

        reg.route(&note_for("dcr_btc", 1)).unwrap();
        reg.route(&note_for("dcr_btc", 2)).unwrap();
        reg.route(&note_for("ltc_btc", 3)).unwrap();

        assert_eq!(dcr.size(), 2);
        assert_eq!(ltc.size(), 1);
        assert!(!dcr.exists(&OrderId([3; 32])));
    }

    #[test]
    fn same_commitment_allowed_across_markets() {
        let reg = MarketQueues::new();
        reg.add_market(MarketId::new("a")).unwrap();
        reg.add_market(MarketId::new("b")).unwrap();
        let mut second = note_for("b", 1);
        second.order_id = OrderId([2; 32]);
        reg.route(&note_for("a", 1)).unwrap();
        reg.route(&second).unwrap();
    }

    #[test]
    fn unknown_and_duplicate_markets() {
        let reg = MarketQueues::new();
        reg.add_market(MarketId::new("dcr_btc")).unwrap();
        assert!(matches!(
            reg.add_market(MarketId::new("dcr_btc")),
            Err(EpochmatchError::MarketExists(_))
        ));
        assert!(matches!(
            reg.route(&note_for("eth_btc", 1)),
            Err(EpochmatchError::UnknownMarket(_))
        ));
    }

    #[test]
    fn reset_all_and_markets() {
        let reg = MarketQueues::new();
        reg.add_market(MarketId::new("z")).unwrap();
        reg.add_market(MarketId::new("a")).unwrap();
        reg.route(&note_for("z", 1)).unwrap();
        reg.route(&note_for("a", 2)).unwrap();
        reg.reset_all();
        assert!(reg.queue(&MarketId::new("z")).unwrap().is_empty());
        assert!(reg.queue(&MarketId::new("a")).unwrap().is_empty());
        assert_eq!(reg.markets(), vec![MarketId::new("a"), MarketId::new("z")]);
    }
}
