//! Immutable transaction records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Kind of balance-affecting operation recorded in an account history
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    /// Recorded on the source account only; the destination records a Deposit
    TransferOut,
}

/// A single history entry.
///
/// Fields are private so a record cannot change after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    kind: TransactionKind,
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn new(kind: TransactionKind, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            amount,
            timestamp,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_kind(&self, kind: TransactionKind) -> bool {
        self.kind == kind
    }
}

/// Totals over an account history. Each total saturates at `Decimal::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub total_deposited: Decimal,
    pub total_withdrawn: Decimal,
    pub total_transferred_out: Decimal,
    pub transaction_count: usize,
}

impl HistorySummary {
    pub fn from_history(history: &[Transaction]) -> Self {
        history.iter().fold(Self::default(), |mut summary, tx| {
            let total = match tx.kind {
                TransactionKind::Deposit => &mut summary.total_deposited,
                TransactionKind::Withdrawal => &mut summary.total_withdrawn,
                TransactionKind::TransferOut => &mut summary.total_transferred_out,
            };
            *total = total.saturating_add(tx.amount);
            summary.transaction_count += 1;
            summary
        })
    }
}
