//! Epoch lifecycle types for the commit-reveal protocol.
//!
//! Each epoch cycles through three non-overlapping phases:
//! **COLLECT → REVEAL → MATCH**
//!
//! During COLLECT, order notes flow into the epoch queue.
//! During REVEAL, originators disclose the preimages of their commitments.
//! During MATCH, misses are pruned and the match proof is derived, after
//! which the queue is reset and the next epoch starts collecting.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{EpochmatchError, Result, constants};

/// The three non-overlapping phases of an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpochPhase {
    /// Accepting new order notes into the epoch queue.
    Collect,
    /// Queue closed; accepting preimage reveals.
    Reveal,
    /// Reveals closed; generating the match proof.
    Match,
}

impl fmt::Display for EpochPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collect => write!(f, "COLLECT"),
            Self::Reveal => write!(f, "REVEAL"),
            Self::Match => write!(f, "MATCH"),
        }
    }
}

impl EpochPhase {
    /// Return the next phase in the cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Collect => Self::Reveal,
            Self::Reveal => Self::Match,
            Self::Match => Self::Collect,
        }
    }
}

/// Configuration for epoch timing and admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochConfig {
    /// Duration of the COLLECT window.
    pub epoch_duration: Duration,
    /// How long originators have to reveal after COLLECT ends.
    pub reveal_timeout: Duration,
    /// Admission cap for a single epoch queue.
    pub max_orders_per_epoch: usize,
}

impl Default for EpochConfig {
    fn default() -> Self {
        Self {
            epoch_duration: Duration::from_millis(constants::DEFAULT_EPOCH_DURATION_MS),
            reveal_timeout: Duration::from_millis(constants::DEFAULT_REVEAL_TIMEOUT_MS),
            max_orders_per_epoch: constants::DEFAULT_MAX_ORDERS_PER_EPOCH,
        }
    }
}

impl EpochConfig {
    /// Wall-clock span from epoch open until the proof deadline.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.epoch_duration + self.reveal_timeout
    }

    pub fn validate(&self) -> Result<()> {
        if self.epoch_duration.is_zero() {
            return Err(EpochmatchError::Configuration(
                "epoch_duration must be non-zero".into(),
            ));
        }
        if self.reveal_timeout.is_zero() {
            return Err(EpochmatchError::Configuration(
                "reveal_timeout must be non-zero".into(),
            ));
        }
        if self.max_orders_per_epoch == 0 {
            return Err(EpochmatchError::Configuration(
                "max_orders_per_epoch must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
