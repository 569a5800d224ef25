//! Portfolio reports over an immutable client snapshot

use crate::client::Client;
use crate::config::LedgerConfig;
use crate::error::SerializationError;
use crate::fingerprint::SnapshotHasher;
use crate::registry::ClientRegistry;
use crate::types::{PortfolioSummary, SnapshotHash};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Balance band of a single client
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientTier {
    Standard,
    Plus,
    Premium,
}

/// Stateless aggregations over a copy of the clients taken at construction.
///
/// Later registry changes do not affect an existing service; use
/// [`ReportService::is_current`] to find out whether the copy is stale.
#[derive(Debug, Clone)]
pub struct ReportService {
    clients: Vec<Client>,
    premium_fraction: Decimal,
    plus_tier_threshold: Decimal,
    premium_tier_threshold: Decimal,
}

impl ReportService {
    /// Copy `clients` and report on them with the default parameters
    pub fn new(clients: &[Client]) -> Self {
        Self::with_config(clients, &LedgerConfig::default())
    }

    pub fn with_config(clients: &[Client], config: &LedgerConfig) -> Self {
        Self {
            clients: clients.to_vec(),
            premium_fraction: config.premium_fraction,
            plus_tier_threshold: config.plus_tier_threshold,
            premium_tier_threshold: config.premium_tier_threshold,
        }
    }

    pub fn from_registry(registry: &ClientRegistry) -> Self {
        Self::new(registry.all())
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Sum of every client's balance, saturating at `Decimal::MAX`
    pub fn total_capital(&self) -> Decimal {
        self.clients
            .iter()
            .map(Client::total_balance)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Zero when there are no clients
    pub fn average_balance_per_client(&self) -> Decimal {
        if self.clients.is_empty() {
            return Decimal::ZERO;
        }
        self.total_capital() / Decimal::from(self.clients.len())
    }

    pub fn clients_above_threshold(&self, threshold: Decimal) -> Vec<&Client> {
        self.filter(|c| c.total_balance() > threshold)
    }

    pub fn clients_below_threshold(&self, threshold: Decimal) -> Vec<&Client> {
        self.filter(|c| c.total_balance() < threshold)
    }

    pub fn clients_without_accounts(&self) -> Vec<&Client> {
        self.filter(|c| c.accounts().is_empty())
    }

    pub fn clients_with_multiple_accounts(&self) -> Vec<&Client> {
        self.filter(|c| c.account_count() > 1)
    }

    /// Top share of clients by balance, ties at the cut-off included
    pub fn premium_clients(&self) -> Vec<&Client> {
        self.premium_clients_with_fraction(self.premium_fraction)
    }

    /// Clients whose balance is at least the k-th largest balance, where
    /// `k = max(1, ceil(fraction * N))` capped at `N`.
    ///
    /// Empty only when there are no clients.
    pub fn premium_clients_with_fraction(&self, fraction: Decimal) -> Vec<&Client> {
        match self.premium_threshold(fraction) {
            Some(threshold) => self.filter(|c| c.total_balance() >= threshold),
            None => Vec::new(),
        }
    }

    /// The balance a client needs to reach to count as premium
    pub fn premium_threshold(&self, fraction: Decimal) -> Option<Decimal> {
        if self.clients.is_empty() {
            return None;
        }

        let mut balances: Vec<Decimal> = self.clients.iter().map(Client::total_balance).collect();
        balances.sort_unstable_by(|a, b| b.cmp(a));

        let k = top_count(balances.len(), fraction);
        Some(balances[k - 1])
    }

    pub fn tier_of(&self, client: &Client) -> ClientTier {
        let balance = client.total_balance();
        if balance > self.premium_tier_threshold {
            ClientTier::Premium
        } else if balance > self.plus_tier_threshold {
            ClientTier::Plus
        } else {
            ClientTier::Standard
        }
    }

    pub fn clients_in_tier(&self, tier: ClientTier) -> Vec<&Client> {
        self.filter(|c| self.tier_of(c) == tier)
    }

    /// Hash of the snapshot this service reports on
    pub fn fingerprint(&self) -> Result<SnapshotHash, SerializationError> {
        SnapshotHasher::new().hash(&self.clients)
    }

    /// Whether the registry still holds exactly the snapshot taken here
    pub fn is_current(&self, registry: &ClientRegistry) -> Result<bool, SerializationError> {
        let hasher = SnapshotHasher::new();
        Ok(hasher.hash(&self.clients)? == hasher.hash(registry.all())?)
    }

    pub fn summary(&self) -> Result<PortfolioSummary, SerializationError> {
        Ok(PortfolioSummary {
            client_count: self.clients.len(),
            account_count: self.clients.iter().map(Client::account_count).sum(),
            total_capital: self.total_capital(),
            average_balance_per_client: self.average_balance_per_client(),
            premium_client_count: self.premium_clients().len(),
            clients_without_accounts: self.clients_without_accounts().len(),
            snapshot_hash: self.fingerprint()?,
        })
    }

    fn filter<P>(&self, predicate: P) -> Vec<&Client>
    where
        P: Fn(&Client) -> bool,
    {
        self.clients.iter().filter(|&c| predicate(c)).collect()
    }
}

/// `max(1, ceil(fraction * n))`, never more than `n`
fn top_count(n: usize, fraction: Decimal) -> usize {
    let count = Decimal::from(n);
    let raw = match fraction.checked_mul(count) {
        Some(product) => product.ceil(),
        None if fraction.is_sign_negative() => Decimal::ONE,
        None => count,
    };
    raw.max(Decimal::ONE).min(count).to_usize().unwrap_or(n)
}
