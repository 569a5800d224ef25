//! Accounts: a balance plus its append-only history

use crate::error::ValidationError;
use crate::interest::{FixedRatePolicy, InterestPolicy};
use crate::transaction::{HistorySummary, Transaction, TransactionKind};
use crate::validator;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Account variants, each carrying the interest policy bound at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    Savings(FixedRatePolicy),
}

impl AccountKind {
    pub fn savings() -> Self {
        AccountKind::Savings(FixedRatePolicy::savings())
    }

    pub fn savings_with_rate(rate: Decimal) -> Self {
        AccountKind::Savings(FixedRatePolicy::new(rate))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AccountKind::Savings(_) => "SAVINGS",
        }
    }

    pub fn policy(&self) -> &dyn InterestPolicy {
        match self {
            AccountKind::Savings(policy) => policy,
        }
    }

    pub fn interest_rate(&self) -> Decimal {
        match self {
            AccountKind::Savings(policy) => policy.rate(),
        }
    }
}

/// How a successful transfer is written to the source account history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferLogging {
    /// A Withdrawal followed by a TransferOut entry
    #[default]
    WithdrawalAndTransferOut,
    /// A single TransferOut entry
    TransferOutOnly,
}

/// A bank account.
///
/// Balance and history only change together, through the operations below.
/// Two accounts are equal when their numbers match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    number: String,
    balance: Decimal,
    history: Vec<Transaction>,
    kind: AccountKind,
}

impl Account {
    /// Open an account with a zero balance
    pub fn new(number: &str, kind: AccountKind) -> Result<Self, ValidationError> {
        let number = number.trim();
        if number.is_empty() {
            return Err(ValidationError::InvalidNumber);
        }

        Ok(Self {
            number: number.to_string(),
            balance: Decimal::ZERO,
            history: Vec::new(),
            kind,
        })
    }

    /// Open a savings account at the standard rate
    pub fn savings(number: &str) -> Result<Self, ValidationError> {
        Self::new(number, AccountKind::savings())
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn kind(&self) -> AccountKind {
        self.kind
    }

    /// Read-only view of the history, oldest first
    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    pub fn transaction_count(&self) -> usize {
        self.history.len()
    }

    pub fn transactions_of_kind(&self, kind: TransactionKind) -> Vec<Transaction> {
        self.history
            .iter()
            .filter(|tx| tx.is_kind(kind))
            .cloned()
            .collect()
    }

    pub fn history_summary(&self) -> HistorySummary {
        HistorySummary::from_history(&self.history)
    }

    pub fn deposit(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        self.deposit_at(amount, Utc::now())
    }

    pub fn deposit_at(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), ValidationError> {
        validator::validate_deposit(amount)?;
        let balance = validator::checked_credit(self.balance, amount)?;
        self.credit(TransactionKind::Deposit, balance, amount, at);
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        self.withdraw_at(amount, Utc::now())
    }

    pub fn withdraw_at(&mut self, amount: Decimal, at: DateTime<Utc>) -> Result<(), ValidationError> {
        validator::validate_withdrawal(self.balance, amount)?;
        self.debit(Some(TransactionKind::Withdrawal), amount, at);
        Ok(())
    }

    /// Move `amount` into `destination`, recording both legs.
    ///
    /// Uses the default history layout (a Withdrawal and a TransferOut on
    /// this account, a Deposit on the destination).
    pub fn transfer(
        &mut self,
        destination: Option<&mut Account>,
        amount: Decimal,
    ) -> Result<(), ValidationError> {
        self.transfer_at(destination, amount, Utc::now(), TransferLogging::default())
    }

    /// Transfer with an explicit timestamp and history layout.
    ///
    /// Funds are checked first, then the destination, then that the
    /// destination can hold the credit. Both legs are validated before
    /// either account changes.
    pub fn transfer_at(
        &mut self,
        destination: Option<&mut Account>,
        amount: Decimal,
        at: DateTime<Utc>,
        logging: TransferLogging,
    ) -> Result<(), ValidationError> {
        validator::validate_transfer(self.balance, amount)?;

        let destination = destination.ok_or_else(|| ValidationError::InvalidTarget {
            reason: "destination account is missing".to_string(),
        })?;
        if destination.number == self.number {
            return Err(ValidationError::InvalidTarget {
                reason: format!("cannot transfer from account {} to itself", self.number),
            });
        }
        let credited = validator::checked_credit(destination.balance, amount)?;

        match logging {
            TransferLogging::WithdrawalAndTransferOut => {
                self.debit(Some(TransactionKind::Withdrawal), amount, at);
            }
            TransferLogging::TransferOutOnly => self.debit(None, amount, at),
        }
        destination.credit(TransactionKind::Deposit, credited, amount, at);
        self.history
            .push(Transaction::new(TransactionKind::TransferOut, amount, at));

        Ok(())
    }

    pub fn interest_rate(&self) -> Decimal {
        self.kind.interest_rate()
    }

    /// Interest the policy would pay on the current balance
    pub fn projected_interest(&self) -> Decimal {
        self.kind.policy().calculate(self.balance)
    }

    /// Add policy interest to the balance when it is positive.
    ///
    /// Interest is not written to the history. Returns the amount added;
    /// the balance is left as is when the sum would overflow.
    pub fn apply_interest(&mut self) -> Result<Decimal, ValidationError> {
        let interest = self.projected_interest();
        if interest <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        self.balance = validator::checked_credit(self.balance, interest)?;
        Ok(interest)
    }

    /// `balance` is the already checked result of adding `amount`
    fn credit(&mut self, kind: TransactionKind, balance: Decimal, amount: Decimal, at: DateTime<Utc>) {
        self.balance = balance;
        self.history.push(Transaction::new(kind, amount, at));
    }

    fn debit(&mut self, kind: Option<TransactionKind>, amount: Decimal, at: DateTime<Utc>) {
        self.balance -= amount;
        if let Some(kind) = kind {
            self.history.push(Transaction::new(kind, amount, at));
        }
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.number.hash(state);
    }
}
