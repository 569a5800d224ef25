//! Ledger configuration

use crate::account::TransferLogging;
use crate::error::ConfigError;
use crate::interest::SAVINGS_RATE;
use crate::logging::LogLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable ledger parameters. Every field has a default, so an empty JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Rate bound to newly opened savings accounts
    pub savings_interest_rate: Decimal,
    /// Share of clients counted as premium, in (0, 1]
    pub premium_fraction: Decimal,
    /// Client balance above which a client is in the Plus tier
    pub plus_tier_threshold: Decimal,
    /// Client balance above which a client is in the Premium tier
    pub premium_tier_threshold: Decimal,
    /// Prefix of generated account numbers, e.g. `CTA-0001`
    pub account_number_prefix: String,
    pub transfer_logging: TransferLogging,
    pub log_level: LogLevel,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            savings_interest_rate: SAVINGS_RATE,
            premium_fraction: Decimal::new(2, 1),
            plus_tier_threshold: Decimal::new(5000, 0),
            premium_tier_threshold: Decimal::new(10000, 0),
            account_number_prefix: "CTA".to_string(),
            transfer_logging: TransferLogging::default(),
            log_level: LogLevel::Info,
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json_str(&contents)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Check the cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.savings_interest_rate < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                field: "savings_interest_rate",
                reason: format!("must not be negative, got {}", self.savings_interest_rate),
            });
        }
        if self.premium_fraction <= Decimal::ZERO || self.premium_fraction > Decimal::ONE {
            return Err(ConfigError::Invalid {
                field: "premium_fraction",
                reason: format!("must be in (0, 1], got {}", self.premium_fraction),
            });
        }
        if self.plus_tier_threshold > self.premium_tier_threshold {
            return Err(ConfigError::Invalid {
                field: "plus_tier_threshold",
                reason: format!(
                    "{} exceeds premium_tier_threshold {}",
                    self.plus_tier_threshold, self.premium_tier_threshold
                ),
            });
        }
        if self.account_number_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "account_number_prefix",
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
