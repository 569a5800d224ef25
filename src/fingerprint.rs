//! Snapshot fingerprinting using Blake3

use crate::client::Client;
use crate::error::SerializationError;
use crate::types::SnapshotHash;
use blake3::Hasher as Blake3Hasher;
use rust_decimal::Decimal;
use serde::Serialize;

/// The fields that identify a client's financial position
#[derive(Serialize)]
struct ClientRecord<'a> {
    document: &'a str,
    accounts: Vec<AccountRecord<'a>>,
}

#[derive(Serialize)]
struct AccountRecord<'a> {
    number: &'a str,
    /// Normalized so 10.50 and 10.5 hash alike
    balance: String,
    transactions: usize,
}

/// Hashes client sets so two snapshots can be compared cheaply.
///
/// Names are left out; documents, account numbers, balances and history
/// lengths are covered, in order.
#[derive(Debug, Clone, Default)]
pub struct SnapshotHasher;

impl SnapshotHasher {
    pub fn new() -> Self {
        Self
    }

    pub fn hash(&self, clients: &[Client]) -> Result<SnapshotHash, SerializationError> {
        let records: Vec<ClientRecord<'_>> = clients.iter().map(record).collect();
        let encoded = bincode::serialize(&records).map_err(|e| {
            SerializationError::SerializationFailed {
                reason: format!("Bincode serialization failed: {}", e),
            }
        })?;

        let mut hasher = Blake3Hasher::new();
        hasher.update(&encoded);
        Ok(SnapshotHash(*hasher.finalize().as_bytes()))
    }
}

fn record(client: &Client) -> ClientRecord<'_> {
    ClientRecord {
        document: client.document(),
        accounts: client
            .accounts()
            .iter()
            .map(|account| AccountRecord {
                number: account.number(),
                balance: normalized(account.balance()),
                transactions: account.transaction_count(),
            })
            .collect(),
    }
}

fn normalized(value: Decimal) -> String {
    value.normalize().to_string()
}
