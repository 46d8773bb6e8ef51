//! System-wide constants for the EpochMatch ordering core.

/// Size in bytes of every digest produced by [`crate::hash256`].
pub const DIGEST_SIZE: usize = 32;

/// Size in bytes of an order identifier.
pub const ORDER_ID_SIZE: usize = DIGEST_SIZE;

/// Size in bytes of an order commitment.
pub const COMMITMENT_SIZE: usize = DIGEST_SIZE;

/// Size in bytes of an order preimage.
pub const PREIMAGE_SIZE: usize = DIGEST_SIZE;

/// Wire number for a buy order.
pub const BUY_ORDER_NUM: u8 = 1;

/// Wire number for a sell order.
pub const SELL_ORDER_NUM: u8 = 2;

/// Default epoch (order collection window) duration in milliseconds.
pub const DEFAULT_EPOCH_DURATION_MS: u64 = 10_000;

/// Default window for preimage reveals after an epoch closes, in milliseconds.
pub const DEFAULT_REVEAL_TIMEOUT_MS: u64 = 20_000;

/// Maximum orders admitted to a single epoch queue (default).
pub const DEFAULT_MAX_ORDERS_PER_EPOCH: usize = 100_000;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "EpochMatch";
