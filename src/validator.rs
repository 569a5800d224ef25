//! Amount rules for deposits, withdrawals and transfers
//!
//! Every check here runs before an account is mutated, so a failure
//! leaves balance and history untouched.

use crate::error::ValidationError;
use rust_decimal::Decimal;

/// Validation result with detailed error
pub type ValidationResult = Result<(), ValidationError>;

/// Reject zero and negative amounts
pub fn validate_positive_amount(amount: Decimal) -> ValidationResult {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount { amount });
    }
    Ok(())
}

/// A withdrawal must be positive and covered by the current balance
pub fn validate_withdrawal(current_balance: Decimal, amount: Decimal) -> ValidationResult {
    validate_positive_amount(amount)?;

    if amount > current_balance {
        return Err(ValidationError::InsufficientFunds {
            balance: current_balance,
            requested: amount,
        });
    }
    Ok(())
}

pub fn validate_deposit(amount: Decimal) -> ValidationResult {
    validate_positive_amount(amount)
}

/// Transfers follow the withdrawal rules against the source balance
pub fn validate_transfer(source_balance: Decimal, amount: Decimal) -> ValidationResult {
    validate_withdrawal(source_balance, amount)
}

/// Balance after crediting `amount`, or `AmountOverflow` when it does not fit
pub fn checked_credit(balance: Decimal, amount: Decimal) -> Result<Decimal, ValidationError> {
    balance
        .checked_add(amount)
        .ok_or(ValidationError::AmountOverflow { balance, amount })
}
