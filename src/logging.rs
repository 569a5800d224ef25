//! Structured operation log for the ledger
//!
//! Entries are kept in memory so callers can inspect what happened, and are
//! mirrored as `tracing` events for whatever subscriber the host installs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Log level for ledger logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level - most verbose
    Trace,
    /// Debug level - detailed information
    Debug,
    /// Info level - general information
    Info,
    /// Warning level - rejected operations
    Warn,
    /// Error level - errors that occurred
    Error,
}

/// A ledger log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    /// Client document if applicable
    pub document: Option<String>,
    /// Account number if applicable
    pub account: Option<String>,
    /// Amount involved if applicable
    pub amount: Option<Decimal>,
    pub message: String,
    /// Additional structured data
    pub metadata: Vec<(String, String)>,
}

impl LogEntry {
    /// Create a new log entry
    pub fn new(level: LogLevel, timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp,
            document: None,
            account: None,
            amount: None,
            message: message.into(),
            metadata: Vec::new(),
        }
    }

    pub fn with_client(mut self, document: &str) -> Self {
        self.document = Some(document.to_string());
        self
    }

    pub fn with_account(mut self, number: &str) -> Self {
        self.account = Some(number.to_string());
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// Logger that collects entries at or above a minimum level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLogger {
    entries: Vec<LogEntry>,
    min_level: LogLevel,
}

impl LedgerLogger {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            entries: Vec::new(),
            min_level,
        }
    }

    /// Create a logger that captures all levels
    pub fn all() -> Self {
        Self::new(LogLevel::Trace)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Record an entry if it meets the minimum level
    pub fn log(&mut self, entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        emit(&entry);
        self.entries.push(entry);
    }

    pub fn info(&mut self, timestamp: DateTime<Utc>, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Info, timestamp, message));
    }

    pub fn warn(&mut self, timestamp: DateTime<Utc>, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Warn, timestamp, message));
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove and return every collected entry
    pub fn take_entries(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.entries)
    }

    pub fn filter_by_level(&self, level: LogLevel) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.level == level).collect()
    }

    pub fn filter_by_client(&self, document: &str) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.document.as_deref() == Some(document))
            .collect()
    }

    pub fn filter_by_account(&self, number: &str) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| e.account.as_deref() == Some(number))
            .collect()
    }
}

impl Default for LedgerLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

fn emit(entry: &LogEntry) {
    let document = entry.document.as_deref().unwrap_or("-");
    let account = entry.account.as_deref().unwrap_or("-");
    let amount = entry.amount.map(|a| a.to_string()).unwrap_or_default();

    match entry.level {
        LogLevel::Trace => tracing::trace!(document, account, %amount, "{}", entry.message),
        LogLevel::Debug => tracing::debug!(document, account, %amount, "{}", entry.message),
        LogLevel::Info => tracing::info!(document, account, %amount, "{}", entry.message),
        LogLevel::Warn => tracing::warn!(document, account, %amount, "{}", entry.message),
        LogLevel::Error => tracing::error!(document, account, %amount, "{}", entry.message),
    }
}
