//! Cooperative savings ledger
//!
//! In-memory ledger of bank clients and their savings accounts: validated
//! deposits, withdrawals, transfers and interest, append-only histories, and
//! portfolio reports over client snapshots.

pub mod account;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod interest;
pub mod ledger;
pub mod logging;
pub mod registry;
pub mod report;
pub mod transaction;
pub mod types;
pub mod validator;

// Re-export core types
pub use account::{Account, AccountKind, TransferLogging};
pub use client::Client;
pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use config::LedgerConfig;
pub use error::{ConfigError, LedgerError, RegistryError, SerializationError, ValidationError};
pub use fingerprint::SnapshotHasher;
pub use interest::{FixedRatePolicy, InterestPolicy, SAVINGS_RATE};
pub use ledger::{Ledger, LedgerBuilder};
pub use logging::{LedgerLogger, LogEntry, LogLevel};
pub use registry::ClientRegistry;
pub use report::{ClientTier, ReportService};
pub use transaction::{HistorySummary, Transaction, TransactionKind};
pub use types::{PortfolioSummary, SnapshotHash};
