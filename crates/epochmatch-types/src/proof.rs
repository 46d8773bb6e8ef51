//! The match proof published when an epoch closes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EpochId, OrderId, constants::DIGEST_SIZE};

/// Seed and commitment checksum derived for one epoch.
///
/// `seed` drives the matcher's deterministic shuffle; `checksum` fingerprints
/// exactly which commitments survived to matching. Any participant holding
/// the same epoch's notes, preimages, and `misses` recomputes both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchProof {
    pub epoch: EpochId,
    pub seed: [u8; DIGEST_SIZE],
    pub checksum: [u8; DIGEST_SIZE],
    /// Orders that contributed to the proof (queued minus misses).
    pub order_count: usize,
    /// Orders excluded for failing to reveal, sorted ascending.
    pub misses: Vec<OrderId>,
    pub generated_at: DateTime<Utc>,
}

impl MatchProof {
    /// Whether two proofs attest to the same result, ignoring timestamps.
    #[must_use]
    pub fn same_result(&self, other: &Self) -> bool {
        self.seed == other.seed
            && self.checksum == other.checksum
            && self.order_count == other.order_count
    }

    #[must_use]
    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed)
    }

    #[must_use]
    pub fn checksum_hex(&self) -> String {
        hex::encode(self.checksum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proof(seed: u8) -> MatchProof {
        MatchProof {
            epoch: EpochId(1),
            seed: [seed; 32],
            checksum: [0xCC; 32],
            order_count: 3,
            misses: vec![],
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn same_result_ignores_timestamp() {
        let a = proof(1);
        let mut b = a.clone();
        b.generated_at = a.generated_at + chrono::Duration::seconds(5);
        assert!(a.same_result(&b));
        assert!(!a.same_result(&proof(2)));
    }

    #[test]
    fn serde_roundtrip() {
        let p = proof(9);
        let json = serde_json::to_string(&p).unwrap();
        let back: MatchProof = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
        assert_eq!(back.seed_hex().len(), 64);
    }
}
