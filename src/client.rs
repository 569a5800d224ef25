//! Clients and the accounts they own

use crate::account::Account;
use crate::error::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A bank client identified by document.
///
/// Accounts keep insertion order and are unique by number. Two clients are
/// equal when their documents match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    name: String,
    document: String,
    pub(crate) accounts: Vec<Account>,
}

impl Client {
    pub fn new(name: &str, document: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let document = document.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidName);
        }
        if document.is_empty() {
            return Err(ValidationError::InvalidDocument);
        }

        Ok(Self {
            name: name.to_string(),
            document: document.to_string(),
            accounts: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    /// Attach an account.
    ///
    /// Returns `false` and leaves the client unchanged when an account with
    /// the same number is already attached.
    pub fn add_account(&mut self, account: Account) -> bool {
        if self.position(account.number()).is_some() {
            return false;
        }
        self.accounts.push(account);
        true
    }

    /// Remove the account with this number, reporting whether one was removed
    pub fn remove_account(&mut self, number: &str) -> Result<bool, ValidationError> {
        let number = checked_number(number)?;
        let before = self.accounts.len();
        self.accounts.retain(|account| account.number() != number);
        Ok(self.accounts.len() != before)
    }

    pub fn find_account(&self, number: &str) -> Result<Option<&Account>, ValidationError> {
        let number = checked_number(number)?;
        Ok(self.accounts.iter().find(|account| account.number() == number))
    }

    pub fn find_account_mut(&mut self, number: &str) -> Result<Option<&mut Account>, ValidationError> {
        let number = checked_number(number)?;
        Ok(self
            .accounts
            .iter_mut()
            .find(|account| account.number() == number))
    }

    pub fn has_account(&self, number: &str) -> Result<bool, ValidationError> {
        Ok(self.find_account(number)?.is_some())
    }

    /// Read-only view of the accounts in insertion order
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Sum of account balances, saturating at `Decimal::MAX`
    pub fn total_balance(&self) -> Decimal {
        self.accounts
            .iter()
            .map(Account::balance)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub(crate) fn position(&self, number: &str) -> Option<usize> {
        self.accounts
            .iter()
            .position(|account| account.number() == number)
    }
}

fn checked_number(number: &str) -> Result<&str, ValidationError> {
    let number = number.trim();
    if number.is_empty() {
        return Err(ValidationError::InvalidNumber);
    }
    Ok(number)
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.document == other.document
    }
}

impl Eq for Client {}

impl Hash for Client {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.document.hash(state);
    }
}
