//! Interest policies

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rate paid by savings accounts unless configured otherwise (2%)
pub const SAVINGS_RATE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);

/// Maps a balance to the interest it earns.
///
/// Implementations must be stateless: the same balance always yields the
/// same interest.
pub trait InterestPolicy {
    fn calculate(&self, balance: Decimal) -> Decimal;
}

/// Flat percentage of the balance, saturating at the `Decimal` bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedRatePolicy {
    rate: Decimal,
}

impl FixedRatePolicy {
    pub fn new(rate: Decimal) -> Self {
        Self { rate }
    }

    /// The policy bound to savings accounts
    pub fn savings() -> Self {
        Self::new(SAVINGS_RATE)
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

impl Default for FixedRatePolicy {
    fn default() -> Self {
        Self::savings()
    }
}

impl InterestPolicy for FixedRatePolicy {
    fn calculate(&self, balance: Decimal) -> Decimal {
        balance.saturating_mul(self.rate)
    }
}

impl<F> InterestPolicy for F
where
    F: Fn(Decimal) -> Decimal,
{
    fn calculate(&self, balance: Decimal) -> Decimal {
        self(balance)
    }
}
