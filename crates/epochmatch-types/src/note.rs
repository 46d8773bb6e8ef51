//! Inbound notes handed to the core by the transport layer.
//!
//! [`WireEpochOrderNote`] is the JSON shape received from the network. It is
//! converted into a typed [`EpochOrderNote`] before touching any queue, and
//! that conversion is the only place byte lengths are checked.

use serde::{Deserialize, Serialize};

use crate::{
    Commitment, EpochId, EpochmatchError, MarketId, OrderId, Preimage, Result, constants,
};

/// Which side of the book this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Numeric encoding used on the wire.
    #[must_use]
    pub fn wire_num(self) -> u8 {
        match self {
            Self::Buy => constants::BUY_ORDER_NUM,
            Self::Sell => constants::SELL_ORDER_NUM,
        }
    }
}

impl TryFrom<u8> for OrderSide {
    type Error = EpochmatchError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            constants::BUY_ORDER_NUM => Ok(Self::Buy),
            constants::SELL_ORDER_NUM => Ok(Self::Sell),
            other => Err(EpochmatchError::MalformedNote {
                reason: format!("unknown order side {other}"),
            }),
        }
    }
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// Announces that an order, committed to `commitment`, entered `epoch`.
///
/// Only `order_id` and `commitment` are stored by the epoch queue; the trade
/// parameters travel with the note for the downstream matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochOrderNote {
    pub market_id: MarketId,
    pub order_id: OrderId,
    pub commitment: Commitment,
    pub side: OrderSide,
    pub rate: u64,
    pub quantity: u64,
    pub epoch: EpochId,
}

/// Wire form of an [`EpochOrderNote`]: hex byte strings and a numeric side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEpochOrderNote {
    pub market_id: String,
    pub order_id: String,
    pub commitment: String,
    pub side: u8,
    pub rate: u64,
    pub quantity: u64,
    pub epoch: u64,
}

impl WireEpochOrderNote {
    /// Parse a JSON payload straight into a validated note.
    pub fn parse_json(payload: &str) -> Result<EpochOrderNote> {
        let wire: Self = serde_json::from_str(payload)?;
        wire.try_into()
    }
}

impl TryFrom<WireEpochOrderNote> for EpochOrderNote {
    type Error = EpochmatchError;

    fn try_from(wire: WireEpochOrderNote) -> Result<Self> {
        if wire.market_id.is_empty() {
            return Err(EpochmatchError::MalformedNote {
                reason: "empty market id".to_string(),
            });
        }
        Ok(Self {
            market_id: MarketId(wire.market_id),
            order_id: OrderId::from_hex(&wire.order_id)?,
            commitment: Commitment::from_hex(&wire.commitment)?,
            side: OrderSide::try_from(wire.side)?,
            rate: wire.rate,
            quantity: wire.quantity,
            epoch: EpochId(wire.epoch),
        })
    }
}

impl From<&EpochOrderNote> for WireEpochOrderNote {
    fn from(note: &EpochOrderNote) -> Self {
        Self {
            market_id: note.market_id.0.clone(),
            order_id: note.order_id.to_hex(),
            commitment: note.commitment.to_hex(),
            side: note.side.wire_num(),
            rate: note.rate,
            quantity: note.quantity,
            epoch: note.epoch.0,
        }
    }
}

/// A preimage revealed for a previously announced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealNote {
    pub order_id: OrderId,
    pub preimage: Preimage,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl EpochOrderNote {
    /// A buy note in `dcr_btc` for epoch 0.
    pub fn dummy(order_id: OrderId, commitment: Commitment) -> Self {
        Self {
            market_id: MarketId::new("dcr_btc"),
            order_id,
            commitment,
            side: OrderSide::Buy,
            rate: 1,
            quantity: 1,
            epoch: EpochId(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_wire() -> WireEpochOrderNote {
        WireEpochOrderNote {
            market_id: "dcr_btc".to_string(),
            order_id: hex::encode([b'a'; 32]),
            commitment: hex::encode(Preimage([b'1'; 32]).commit().0),
            side: constants::SELL_ORDER_NUM,
            rate: 4_000_000,
            quantity: 100_000_000,
            epoch: 7,
        }
    }

    #[test]
    fn wire_note_converts() {
        let note = EpochOrderNote::try_from(sample_wire()).unwrap();
        assert_eq!(note.order_id, OrderId([b'a'; 32]));
        assert_eq!(note.side, OrderSide::Sell);
        assert_eq!(note.epoch, EpochId(7));
        assert!(note.commitment.matches(&Preimage([b'1'; 32])));
    }

    #[test]
    fn short_order_id_rejected() {
        let mut wire = sample_wire();
        wire.order_id = hex::encode([b'a'; 20]);
        let err = EpochOrderNote::try_from(wire).unwrap_err();
        assert!(matches!(err, EpochmatchError::InvalidLength { actual: 20, .. }));
    }

    #[test]
    fn unknown_side_rejected() {
        let mut wire = sample_wire();
        wire.side = 9;
        assert!(matches!(
            EpochOrderNote::try_from(wire),
            Err(EpochmatchError::MalformedNote { .. })
        ));
    }

    #[test]
    fn empty_market_rejected() {
        let mut wire = sample_wire();
        wire.market_id.clear();
        assert!(EpochOrderNote::try_from(wire).is_err());
    }

    #[test]
    fn parse_json_camel_case() {
        let payload = serde_json::to_string(&sample_wire()).unwrap();
        assert!(payload.contains("\"marketId\""));
        let note = WireEpochOrderNote::parse_json(&payload).unwrap();
        assert_eq!(WireEpochOrderNote::from(&note), sample_wire());
    }

    #[test]
    fn parse_json_garbage_is_serialization_error() {
        assert!(matches!(
            WireEpochOrderNote::parse_json("{not json"),
            Err(EpochmatchError::Serialization(_))
        ));
    }

    #[test]
    fn order_side_wire_numbers() {
        assert_eq!(OrderSide::Buy.wire_num(), 1);
        assert_eq!(OrderSide::Sell.wire_num(), 2);
        assert_eq!(format!("{}", OrderSide::Buy), "BUY");
    }
}
