//! Error types for the EpochMatch ordering core.
//!
//! All errors use the `EM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Note / input errors
//! - 2xx: Reveal errors
//! - 4xx: Epoch & market errors
//! - 5xx: Proof errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Commitment, EpochId, EpochPhase, MarketId, OrderId};

/// Central error enum for all EpochMatch operations.
#[derive(Debug, Error)]
pub enum EpochmatchError {
    // =================================================================
    // Note / Input Errors (1xx)
    // =================================================================
    /// A wire note could not be turned into a typed note.
    #[error("EM_ERR_100: Malformed note: {reason}")]
    MalformedNote { reason: String },

    /// A fixed-size byte field had the wrong length.
    #[error("EM_ERR_101: Invalid {kind} length: expected {expected}, got {actual}")]
    InvalidLength {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The commitment is already recorded for a different order this epoch.
    #[error("EM_ERR_102: Commitment {commitment} already queued for order {existing}")]
    DuplicateCommitment {
        commitment: Commitment,
        existing: OrderId,
    },

    // =================================================================
    // Reveal Errors (2xx)
    // =================================================================
    /// A reveal referenced an order that is not in the epoch queue.
    #[error("EM_ERR_200: Order not queued: {0}")]
    OrderNotQueued(OrderId),

    /// The revealed preimage does not hash to the order's commitment.
    #[error("EM_ERR_201: Preimage does not open commitment for order {0}")]
    PreimageMismatch(OrderId),

    // =================================================================
    // Epoch & Market Errors (4xx)
    // =================================================================
    /// An operation was attempted in the wrong epoch phase.
    #[error("EM_ERR_400: Wrong epoch phase: expected {expected}, got {actual}")]
    WrongEpochPhase {
        expected: EpochPhase,
        actual: EpochPhase,
    },

    /// A note was addressed to an epoch other than the open one.
    #[error("EM_ERR_401: Epoch mismatch: expected {expected}, got {actual}")]
    EpochMismatch { expected: EpochId, actual: EpochId },

    /// The epoch queue reached its admission cap.
    #[error("EM_ERR_402: Epoch full: {limit} orders")]
    EpochFull { limit: usize },

    /// No queue is registered for this market.
    #[error("EM_ERR_403: Unknown market: {0}")]
    UnknownMarket(MarketId),

    /// A queue is already registered for this market.
    #[error("EM_ERR_404: Market already registered: {0}")]
    MarketExists(MarketId),

    // =================================================================
    // Proof Errors (5xx)
    // =================================================================
    /// Queued orders remain without a matching preimage after misses were
    /// pruned. No partial proof is produced.
    #[error(
        "EM_ERR_500: Unresolved orders: {matched} of {queued} remaining epoch orders matched to a preimage"
    )]
    UnresolvedOrders {
        matched: usize,
        queued: usize,
        /// The offending order IDs, sorted ascending.
        unresolved: Vec<OrderId>,
    },

    /// A recomputed proof field disagrees with the published one.
    #[error("EM_ERR_501: Proof mismatch on {field}: expected {expected}, got {actual}")]
    ProofMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("EM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("EM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config, missing fields, etc.).
    #[error("EM_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EpochmatchError>;

impl From<serde_json::Error> for EpochmatchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
