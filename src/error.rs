//! Error types for the ledger

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

/// Precondition failures raised before any balance or history is touched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("Insufficient funds: available {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("Crediting {amount} to balance {balance} exceeds the representable range")]
    AmountOverflow { balance: Decimal, amount: Decimal },

    #[error("Invalid transfer target: {reason}")]
    InvalidTarget { reason: String },

    #[error("Account number cannot be empty")]
    InvalidNumber,

    #[error("Client document cannot be empty")]
    InvalidDocument,

    #[error("Client name cannot be empty")]
    InvalidName,
}

/// Failures resolving identifiers against the registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Client not found: {document}")]
    ClientNotFound { document: String },

    #[error("Account not found: {number}")]
    AccountNotFound { number: String },

    #[error("A client with document {document} already exists")]
    DuplicateDocument { document: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },

    #[error("Failed to read configuration: {reason}")]
    Io { reason: String },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Serialization failed: {reason}")]
    SerializationFailed { reason: String },
}

impl LedgerError {
    /// The validation failure carried by this error, if any
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Validation(e) => Some(e),
            _ => None,
        }
    }

    /// The registry failure carried by this error, if any
    pub fn as_registry(&self) -> Option<&RegistryError> {
        match self {
            LedgerError::Registry(e) => Some(e),
            _ => None,
        }
    }
}
