use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// Configuration for a [`Ledger`](crate::Ledger).
///
/// The defaults reproduce the standard contract terms exactly; a TOML file
/// only needs to name the values it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Payout condition evaluated after every weather update.
    pub trigger: TriggerConfig,
    /// Key receiving the decimal seed on `init`.
    pub init_seed_key: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            trigger: TriggerConfig::default(),
            init_seed_key: "abc".into(),
        }
    }
}

impl LedgerConfig {
    /// Parse a (possibly partial) TOML document, filling gaps with defaults.
    pub fn from_toml_str(raw: &str) -> LedgerResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| LedgerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.trigger.window == 0 {
            return Err(LedgerError::Config("trigger.window must be at least 1".into()));
        }
        if self.trigger.threshold == 0 {
            return Err(LedgerError::Config("trigger.threshold must be at least 1".into()));
        }
        if self.init_seed_key.is_empty() {
            return Err(LedgerError::Config("init_seed_key must not be empty".into()));
        }
        Ok(())
    }
}

/// Terms of the trailing-window weather condition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Number of most recent readings scanned; shorter histories never trigger.
    pub window: usize,
    /// Minimum bad count at the end of the scan for the condition to hold.
    pub threshold: u32,
    /// Label that increments the bad count.
    pub bad_label: String,
    /// Label that resets the bad count to zero.
    pub reset_label: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            window: 3,
            threshold: 3,
            bad_label: "rainy".into(),
            reset_label: "sunny".into(),
        }
    }
}
