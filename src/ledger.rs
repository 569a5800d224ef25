//! Ledger facade: the owned application root for registry operations

use crate::account::{Account, AccountKind};
use crate::client::Client;
use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, RegistryError};
use crate::logging::{LedgerLogger, LogEntry, LogLevel};
use crate::registry::ClientRegistry;
use crate::report::ReportService;
use crate::transaction::Transaction;
use crate::validator;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Owns the client registry and exposes identifier-based operations.
///
/// Every mutation is logged: accepted operations at Info, rejected ones at
/// Warn with the reason.
#[derive(Debug)]
pub struct Ledger {
    registry: ClientRegistry,
    config: LedgerConfig,
    clock: Box<dyn Clock>,
    logger: LedgerLogger,
    next_account: u32,
}

impl Ledger {
    /// Ledger with default configuration and wall-clock timestamps
    pub fn new() -> Self {
        Self::from_parts(ClientRegistry::new(), LedgerConfig::default(), Box::new(SystemClock))
    }

    /// Create a builder for constructing a ledger
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::new()
    }

    fn from_parts(registry: ClientRegistry, config: LedgerConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            registry,
            logger: LedgerLogger::new(config.log_level),
            config,
            clock,
            next_account: 1,
        }
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ClientRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn logger(&self) -> &LedgerLogger {
        &self.logger
    }

    /// Mutable access to the operation log, e.g. to drain it periodically
    pub fn logger_mut(&mut self) -> &mut LedgerLogger {
        &mut self.logger
    }

    /// Register a client and open their first savings account.
    ///
    /// Returns the generated account number.
    pub fn register_client(&mut self, name: &str, document: &str) -> Result<String, LedgerError> {
        let at = self.clock.now();
        let result = self.try_register_client(name, document);
        let entry = LogEntry::new(LogLevel::Info, at, "register client").with_client(document.trim());
        let entry = match &result {
            Ok(number) => entry.with_account(number),
            Err(_) => entry,
        };
        self.record(result, entry)
    }

    /// Open another savings account for a registered client
    pub fn open_account(&mut self, document: &str) -> Result<String, LedgerError> {
        let at = self.clock.now();
        let result = self.try_open_account(document);
        let entry = LogEntry::new(LogLevel::Info, at, "open account").with_client(document.trim());
        let entry = match &result {
            Ok(number) => entry.with_account(number),
            Err(_) => entry,
        };
        self.record(result, entry)
    }

    /// Remove a client and everything they own
    pub fn remove_client(&mut self, document: &str) -> Result<bool, LedgerError> {
        let at = self.clock.now();
        let result = self.registry.remove(document).map_err(LedgerError::from);
        let entry = LogEntry::new(LogLevel::Info, at, "remove client").with_client(document.trim());
        self.record(result, entry)
    }

    pub fn close_account(&mut self, document: &str, number: &str) -> Result<bool, LedgerError> {
        let at = self.clock.now();
        let result = self
            .registry
            .client_mut(document)
            .and_then(|client| client.remove_account(number).map_err(LedgerError::from));
        let entry = account_entry(at, "close account", document, number);
        self.record(result, entry)
    }

    /// Deposit into an account, returning the new balance
    pub fn deposit(&mut self, document: &str, number: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let at = self.clock.now();
        let result = self.registry.account_mut(document, number).and_then(|account| {
            account.deposit_at(amount, at)?;
            Ok(account.balance())
        });
        let entry = account_entry(at, "deposit", document, number).with_amount(amount);
        self.record(result, entry)
    }

    /// Withdraw from an account, returning the new balance
    pub fn withdraw(&mut self, document: &str, number: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        let at = self.clock.now();
        let result = self.registry.account_mut(document, number).and_then(|account| {
            account.withdraw_at(amount, at)?;
            Ok(account.balance())
        });
        let entry = account_entry(at, "withdraw", document, number).with_amount(amount);
        self.record(result, entry)
    }

    /// Move funds between two accounts, returning the new source balance.
    ///
    /// Funds are checked before the destination is resolved. A destination
    /// that does not resolve, or that is the source itself, is an invalid
    /// target.
    pub fn transfer(
        &mut self,
        from_document: &str,
        from_number: &str,
        to_document: &str,
        to_number: &str,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let at = self.clock.now();
        let result = self.try_transfer((from_document, from_number), (to_document, to_number), amount, at);
        let entry = account_entry(at, "transfer", from_document, from_number)
            .with_amount(amount)
            .with_metadata("to_document", to_document.trim())
            .with_metadata("to_account", to_number.trim());
        self.record(result, entry)
    }

    /// Credit policy interest to one account, returning the amount added
    pub fn apply_interest(&mut self, document: &str, number: &str) -> Result<Decimal, LedgerError> {
        let at = self.clock.now();
        let result = self
            .registry
            .account_mut(document, number)
            .and_then(|account| account.apply_interest().map_err(LedgerError::from));
        let entry = account_entry(at, "apply interest", document, number);
        let entry = match &result {
            Ok(interest) => entry.with_amount(*interest),
            Err(_) => entry,
        };
        self.record(result, entry)
    }

    /// Credit policy interest to every account, returning the total added.
    ///
    /// An account whose balance would overflow is skipped and keeps its
    /// balance; the run is then logged at Warn with the skipped count.
    pub fn apply_interest_all(&mut self) -> Decimal {
        let at = self.clock.now();
        let mut credited = 0usize;
        let mut skipped = 0usize;
        let mut total = Decimal::ZERO;
        for account in self.registry.accounts_mut() {
            match account.apply_interest() {
                Ok(interest) if interest > Decimal::ZERO => {
                    credited += 1;
                    total = total.saturating_add(interest);
                }
                Ok(_) => {}
                Err(_) => skipped += 1,
            }
        }

        let level = if skipped > 0 { LogLevel::Warn } else { LogLevel::Info };
        self.logger.log(
            LogEntry::new(level, at, "apply interest to all accounts")
                .with_amount(total)
                .with_metadata("accounts_credited", credited.to_string())
                .with_metadata("accounts_skipped", skipped.to_string()),
        );
        total
    }

    pub fn client(&self, document: &str) -> Result<&Client, LedgerError> {
        self.registry.client(document)
    }

    pub fn balance(&self, document: &str, number: &str) -> Result<Decimal, LedgerError> {
        Ok(self.registry.account(document, number)?.balance())
    }

    pub fn client_balance(&self, document: &str) -> Result<Decimal, LedgerError> {
        Ok(self.registry.client(document)?.total_balance())
    }

    pub fn history(&self, document: &str, number: &str) -> Result<&[Transaction], LedgerError> {
        Ok(self.registry.account(document, number)?.history())
    }

    /// Report over a snapshot of the current registry
    pub fn report(&self) -> ReportService {
        ReportService::with_config(self.registry.all(), &self.config)
    }

    fn try_register_client(&mut self, name: &str, document: &str) -> Result<String, LedgerError> {
        let mut client = Client::new(name, document)?;
        if self.registry.exists(client.document())? {
            return Err(RegistryError::DuplicateDocument {
                document: client.document().to_string(),
            }
            .into());
        }

        let (sequence, number) = self.next_account_number();
        client.add_account(self.new_account(&number)?);
        self.registry.register(client)?;
        self.next_account = sequence + 1;
        Ok(number)
    }

    fn try_open_account(&mut self, document: &str) -> Result<String, LedgerError> {
        let (sequence, number) = self.next_account_number();
        let account = self.new_account(&number)?;
        self.registry.client_mut(document)?.add_account(account);
        self.next_account = sequence + 1;
        Ok(number)
    }

    fn try_transfer(
        &mut self,
        source: (&str, &str),
        destination: (&str, &str),
        amount: Decimal,
        at: DateTime<Utc>,
    ) -> Result<Decimal, LedgerError> {
        let source_balance = self.registry.account(source.0, source.1)?.balance();
        validator::validate_transfer(source_balance, amount)?;

        let logging = self.config.transfer_logging;
        let (from, to) = self.registry.account_pair_mut(source, destination)?;
        from.transfer_at(to, amount, at, logging)?;
        Ok(from.balance())
    }

    fn new_account(&self, number: &str) -> Result<Account, LedgerError> {
        let kind = AccountKind::savings_with_rate(self.config.savings_interest_rate);
        Ok(Account::new(number, kind)?)
    }

    /// Next `<prefix>-NNNN` number not held by any registered account
    fn next_account_number(&self) -> (u32, String) {
        let prefix = self.config.account_number_prefix.trim();
        let mut sequence = self.next_account;
        loop {
            let number = format!("{}-{:04}", prefix, sequence);
            let taken = self
                .registry
                .all()
                .iter()
                .any(|client| client.position(&number).is_some());
            if !taken {
                return (sequence, number);
            }
            sequence += 1;
        }
    }

    fn record<T>(&mut self, result: Result<T, LedgerError>, mut entry: LogEntry) -> Result<T, LedgerError> {
        if let Err(e) = &result {
            entry.level = LogLevel::Warn;
            entry.message = format!("{} rejected: {}", entry.message, e);
        }
        self.logger.log(entry);
        result
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

fn account_entry(at: DateTime<Utc>, operation: &str, document: &str, number: &str) -> LogEntry {
    LogEntry::new(LogLevel::Info, at, operation)
        .with_client(document.trim())
        .with_account(number.trim())
}

/// Builder for constructing ledgers with a fluent API
#[derive(Debug, Default)]
pub struct LedgerBuilder {
    config: Option<LedgerConfig>,
    clock: Option<Box<dyn Clock>>,
    registry: Option<ClientRegistry>,
}

impl LedgerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Start from an existing registry instead of an empty one
    pub fn with_registry(mut self, registry: ClientRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Build the ledger, validating the configuration
    pub fn build(self) -> Result<Ledger, LedgerError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));
        let registry = self.registry.unwrap_or_default();
        Ok(Ledger::from_parts(registry, config, clock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::TransferLogging;
    use crate::clock::{FixedClock, SteppingClock};
    use crate::error::ValidationError;
    use crate::transaction::TransactionKind;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    fn ledger() -> Ledger {
        Ledger::builder()
            .with_clock(SteppingClock::new(start(), Duration::minutes(1)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_generates_sequential_numbers() {
        let mut ledger = ledger();
        assert_eq!(ledger.register_client("Ana", "100").unwrap(), "CTA-0001");
        assert_eq!(ledger.register_client("Luis", "200").unwrap(), "CTA-0002");
        assert_eq!(ledger.open_account("100").unwrap(), "CTA-0003");
        assert_eq!(ledger.client("100").unwrap().account_count(), 2);
    }

    #[test]
    fn test_failed_registration_does_not_consume_number() {
        let mut ledger = ledger();
        ledger.register_client("Ana", "100").unwrap();
        assert!(ledger.register_client("Ana Again", "100").is_err());
        assert!(ledger.register_client("", "300").is_err());
        assert_eq!(ledger.register_client("Luis", "200").unwrap(), "CTA-0002");
        assert_eq!(ledger.registry().count(), 2);
    }

    #[test]
    fn test_generated_numbers_skip_taken_ones() {
        let mut ledger = ledger();
        let mut client = Client::new("Manual", "900").unwrap();
        client.add_account(Account::savings("CTA-0001").unwrap());
        ledger.registry_mut().register(client).unwrap();

        assert_eq!(ledger.register_client("Ana", "100").unwrap(), "CTA-0002");
    }

    #[test]
    fn test_deposit_and_withdraw_use_clock() {
        let mut ledger = ledger();
        let number = ledger.register_client("Ana", "100").unwrap();

        assert_eq!(ledger.deposit("100", &number, dec!(1000)).unwrap(), dec!(1000));
        assert_eq!(ledger.withdraw("100", &number, dec!(250)).unwrap(), dec!(750));

        let history = ledger.history("100", &number).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].timestamp(), start() + Duration::minutes(1));
        assert_eq!(history[1].timestamp(), start() + Duration::minutes(2));
    }

    #[test]
    fn test_unknown_identifiers() {
        let mut ledger = ledger();
        let number = ledger.register_client("Ana", "100").unwrap();

        let err = ledger.deposit("999", &number, dec!(1)).unwrap_err();
        assert!(matches!(err.as_registry(), Some(RegistryError::ClientNotFound { .. })));

        let err = ledger.deposit("100", "CTA-9999", dec!(1)).unwrap_err();
        assert!(matches!(err.as_registry(), Some(RegistryError::AccountNotFound { .. })));

        let err = ledger.deposit("", &number, dec!(1)).unwrap_err();
        assert_eq!(err.as_validation(), Some(&ValidationError::InvalidDocument));
    }

    #[test]
    fn test_transfer_between_clients() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        let b = ledger.register_client("Luis", "200").unwrap();
        ledger.deposit("100", &a, dec!(1000)).unwrap();
        ledger.deposit("200", &b, dec!(200)).unwrap();

        assert_eq!(ledger.transfer("100", &a, "200", &b, dec!(300)).unwrap(), dec!(700));
        assert_eq!(ledger.balance("200", &b).unwrap(), dec!(500));
        assert_eq!(ledger.report().total_capital(), dec!(1200));
    }

    #[test]
    fn test_transfer_to_unknown_destination_is_invalid_target() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        ledger.deposit("100", &a, dec!(100)).unwrap();

        let err = ledger.transfer("100", &a, "404", "CTA-0404", dec!(10)).unwrap_err();
        assert!(matches!(err.as_validation(), Some(ValidationError::InvalidTarget { .. })));
        assert_eq!(ledger.balance("100", &a).unwrap(), dec!(100));
    }

    #[test]
    fn test_self_transfer_checks_funds_first() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        ledger.deposit("100", &a, dec!(100)).unwrap();

        let err = ledger.transfer("100", &a, "100", &a, dec!(500)).unwrap_err();
        assert!(matches!(err.as_validation(), Some(ValidationError::InsufficientFunds { .. })));

        let err = ledger.transfer("100", &a, "100", &a, dec!(50)).unwrap_err();
        assert!(matches!(err.as_validation(), Some(ValidationError::InvalidTarget { .. })));
        assert_eq!(ledger.history("100", &a).unwrap().len(), 1);
    }

    #[test]
    fn test_transfer_logging_from_config() {
        let config = LedgerConfig {
            transfer_logging: TransferLogging::TransferOutOnly,
            ..LedgerConfig::default()
        };
        let mut ledger = Ledger::builder()
            .with_config(config)
            .with_clock(FixedClock::new(start()))
            .build()
            .unwrap();
        let a = ledger.register_client("Ana", "100").unwrap();
        let b = ledger.open_account("100").unwrap();
        ledger.deposit("100", &a, dec!(50)).unwrap();
        ledger.transfer("100", &a, "100", &b, dec!(20)).unwrap();

        let kinds: Vec<_> = ledger
            .history("100", &a)
            .unwrap()
            .iter()
            .map(|t| t.kind())
            .collect();
        assert_eq!(kinds, vec![TransactionKind::Deposit, TransactionKind::TransferOut]);
    }

    #[test]
    fn test_interest_uses_configured_rate() {
        let config = LedgerConfig {
            savings_interest_rate: dec!(0.1),
            ..LedgerConfig::default()
        };
        let mut ledger = Ledger::builder().with_config(config).build().unwrap();
        let a = ledger.register_client("Ana", "100").unwrap();
        let b = ledger.register_client("Luis", "200").unwrap();
        ledger.deposit("100", &a, dec!(100)).unwrap();
        ledger.deposit("200", &b, dec!(50)).unwrap();

        assert_eq!(ledger.apply_interest("100", &a).unwrap(), dec!(10));
        assert_eq!(ledger.apply_interest_all(), dec!(16));
        assert_eq!(ledger.client_balance("100").unwrap(), dec!(121));
        assert_eq!(ledger.client_balance("200").unwrap(), dec!(55));
    }

    #[test]
    fn test_overflowing_deposit_is_rejected_and_logged() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        ledger.deposit("100", &a, Decimal::MAX).unwrap();

        let err = ledger.deposit("100", &a, dec!(1)).unwrap_err();
        assert!(matches!(err.as_validation(), Some(ValidationError::AmountOverflow { .. })));
        assert_eq!(ledger.balance("100", &a).unwrap(), Decimal::MAX);
        assert_eq!(ledger.logger().entries().last().unwrap().level, LogLevel::Warn);
    }

    #[test]
    fn test_transfer_into_full_account_is_atomic() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        let b = ledger.register_client("Luis", "200").unwrap();
        ledger.deposit("100", &a, dec!(100)).unwrap();
        ledger.deposit("200", &b, Decimal::MAX).unwrap();

        let err = ledger.transfer("100", &a, "200", &b, dec!(40)).unwrap_err();
        assert!(matches!(err.as_validation(), Some(ValidationError::AmountOverflow { .. })));
        assert_eq!(ledger.balance("100", &a).unwrap(), dec!(100));
        assert_eq!(ledger.history("100", &a).unwrap().len(), 1);
        assert_eq!(ledger.balance("200", &b).unwrap(), Decimal::MAX);
    }

    #[test]
    fn test_interest_round_skips_full_accounts() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        let b = ledger.register_client("Luis", "200").unwrap();
        ledger.deposit("100", &a, dec!(1000)).unwrap();
        ledger.deposit("200", &b, Decimal::MAX).unwrap();

        assert!(ledger.apply_interest("200", &b).is_err());
        assert_eq!(ledger.apply_interest_all(), dec!(20));
        assert_eq!(ledger.balance("200", &b).unwrap(), Decimal::MAX);

        let entry = ledger.logger().entries().last().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert!(entry
            .metadata
            .contains(&("accounts_skipped".to_string(), "1".to_string())));
    }

    #[test]
    fn test_log_can_be_drained() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        ledger.deposit("100", &a, dec!(10)).unwrap();

        let drained = ledger.logger_mut().take_entries();
        assert_eq!(drained.len(), 2);
        assert!(ledger.logger().is_empty());

        ledger.deposit("100", &a, dec!(5)).unwrap();
        assert_eq!(ledger.logger().len(), 1);
    }

    #[test]
    fn test_operations_are_logged() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();
        ledger.deposit("100", &a, dec!(10)).unwrap();
        let _ = ledger.withdraw("100", &a, dec!(50));

        let entries = ledger.logger().filter_by_account(&a);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].message, "deposit");
        assert_eq!(entries[2].level, LogLevel::Warn);
        assert!(entries[2].message.starts_with("withdraw rejected"));
    }

    #[test]
    fn test_close_account_and_remove_client() {
        let mut ledger = ledger();
        let a = ledger.register_client("Ana", "100").unwrap();

        assert!(ledger.close_account("100", &a).unwrap());
        assert!(!ledger.close_account("100", &a).unwrap());
        assert!(ledger.remove_client("100").unwrap());
        assert!(!ledger.remove_client("100").unwrap());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = LedgerConfig {
            premium_fraction: Decimal::ZERO,
            ..LedgerConfig::default()
        };
        let err = Ledger::builder().with_config(config).build().unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }
}
