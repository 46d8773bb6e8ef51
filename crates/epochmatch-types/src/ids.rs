//! Fixed-size digests and identifiers used throughout EpochMatch.
//!
//! [`OrderId`], [`Commitment`], and [`Preimage`] are all 32-byte values whose
//! `Ord` is raw byte (lexicographic) order. Both the seed and the checksum
//! derivations depend on that ordering, so it must never be customised.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EpochmatchError, Result, constants::DIGEST_SIZE, hash256};

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub [u8; DIGEST_SIZE]);

        impl $name {
            #[must_use]
            pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
                Self(bytes)
            }

            /// Copy from a byte slice that must be exactly 32 bytes long.
            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                let arr: [u8; DIGEST_SIZE] =
                    bytes
                        .try_into()
                        .map_err(|_| EpochmatchError::InvalidLength {
                            kind: $kind,
                            expected: DIGEST_SIZE,
                            actual: bytes.len(),
                        })?;
                Ok(Self(arr))
            }

            /// Decode from a hex string of exactly 64 characters.
            pub fn from_hex(s: &str) -> Result<Self> {
                let bytes = hex::decode(s).map_err(|e| EpochmatchError::MalformedNote {
                    reason: format!("{} is not valid hex: {e}", $kind),
                })?;
                Self::from_slice(&bytes)
            }

            #[must_use]
            pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
                &self.0
            }

            #[must_use]
            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }

            /// First four bytes in hex, for log lines.
            #[must_use]
            pub fn short(&self) -> String {
                hex::encode(&self.0[..4])
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", hex::encode(self.0))
            }
        }
    };
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

digest_type!(
    /// Globally unique order identifier, assigned at order construction.
    OrderId,
    "order id"
);

// ---------------------------------------------------------------------------
// Commitment
// ---------------------------------------------------------------------------

digest_type!(
    /// Published with the order at submission: `Commitment = hash256(Preimage)`.
    Commitment,
    "commitment"
);

impl Commitment {
    /// Whether `preimage` opens this commitment.
    #[must_use]
    pub fn matches(&self, preimage: &Preimage) -> bool {
        preimage.commit() == *self
    }
}

// ---------------------------------------------------------------------------
// Preimage
// ---------------------------------------------------------------------------

digest_type!(
    /// Secret chosen by the order's originator and revealed after epoch close.
    Preimage,
    "preimage"
);

impl Preimage {
    /// The commitment published for this preimage.
    #[must_use]
    pub fn commit(&self) -> Commitment {
        Commitment(hash256(&self.0))
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Preimage {
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; DIGEST_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl OrderId {
    pub fn random() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; DIGEST_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// MarketId
// ---------------------------------------------------------------------------

/// Market identifier as carried on the wire (e.g. `"dcr_btc"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct MarketId(pub String);

impl MarketId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// EpochId
// ---------------------------------------------------------------------------

/// Monotonically increasing identifier for an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EpochId(pub u64);

impl EpochId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for EpochId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "epoch:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commitment_is_hash_of_preimage() {
        let pimg = Preimage([b'1'; 32]);
        let commit = pimg.commit();
        assert_eq!(commit.0, hash256(&pimg.0));
        assert!(commit.matches(&pimg));
        assert!(!commit.matches(&Preimage([b'2'; 32])));
    }

    #[test]
    fn ordering_is_raw_byte_order() {
        let mut lo = [0u8; 32];
        lo[0] = 0x01;
        lo[31] = 0xFF;
        let mut hi = [0u8; 32];
        hi[0] = 0x02;
        assert!(OrderId(lo) < OrderId(hi));
        assert!(Commitment(lo) < Commitment(hi));
    }

    #[test]
    fn from_slice_rejects_wrong_length() {
        let err = OrderId::from_slice(&[0u8; 31]).unwrap_err();
        assert!(matches!(
            err,
            EpochmatchError::InvalidLength {
                expected: 32,
                actual: 31,
                ..
            }
        ));
        assert!(Commitment::from_slice(&[0u8; 33]).is_err());
        assert!(Preimage::from_slice(&[7u8; 32]).is_ok());
    }

    #[test]
    fn hex_roundtrip() {
        let oid = OrderId::random();
        assert_eq!(OrderId::from_hex(&oid.to_hex()).unwrap(), oid);
        assert!(OrderId::from_hex("zz").is_err());
    }

    #[test]
    fn short_is_four_bytes() {
        let oid = OrderId([0xAB; 32]);
        assert_eq!(oid.short(), "abababab");
    }

    #[test]
    fn random_preimages_differ() {
        assert_ne!(Preimage::random(), Preimage::random());
    }

    #[test]
    fn epoch_id_next() {
        assert_eq!(EpochId(5).next(), EpochId(6));
        assert_eq!(format!("{}", EpochId(3)), "epoch:3");
    }

    #[test]
    fn market_id_display() {
        assert_eq!(MarketId::new("dcr_btc").to_string(), "dcr_btc");
    }
}
