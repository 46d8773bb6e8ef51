//! Configuration types for EpochMatch markets.

use serde::{Deserialize, Serialize};

use crate::{EpochConfig, EpochmatchError, MarketId, Result};

/// What the epoch coordinator does when orders remain unresolved after the
/// reveal window (queued, not listed as misses, and no valid preimage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Fail the epoch; no proof is produced.
    #[default]
    Abort,
    /// Treat unresolved orders as implicit misses and regenerate the proof once.
    TreatAsMiss,
}

/// Per-market configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    pub market_id: MarketId,
    /// Epoch timing and admission limits.
    #[serde(default)]
    pub epoch: EpochConfig,
    #[serde(default)]
    pub unresolved_policy: UnresolvedPolicy,
}

impl MarketConfig {
    /// A market with default epoch settings.
    #[must_use]
    pub fn new(market_id: impl Into<String>) -> Self {
        Self {
            market_id: MarketId::new(market_id),
            epoch: EpochConfig::default(),
            unresolved_policy: UnresolvedPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: UnresolvedPolicy) -> Self {
        self.unresolved_policy = policy;
        self
    }

    /// Parse and validate a JSON market config.
    pub fn from_json(payload: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(payload)
            .map_err(|e| EpochmatchError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.market_id.as_str().is_empty() {
            return Err(EpochmatchError::Configuration(
                "market_id must not be empty".into(),
            ));
        }
        self.epoch.validate()
    }
}
