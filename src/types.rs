//! Shared value types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Blake3 hash of a client snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotHash(pub [u8; 32]);

impl fmt::Display for SnapshotHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Headline figures of a report snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub client_count: usize,
    pub account_count: usize,
    pub total_capital: Decimal,
    pub average_balance_per_client: Decimal,
    pub premium_client_count: usize,
    pub clients_without_accounts: usize,
    pub snapshot_hash: SnapshotHash,
}
