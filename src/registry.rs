//! Client registry keyed by document

use crate::account::Account;
use crate::client::Client;
use crate::error::{LedgerError, RegistryError, ValidationError};

/// Store of registered clients, in registration order.
///
/// Owned by the caller; there is no process-wide instance.
#[derive(Debug, Clone, Default)]
pub struct ClientRegistry {
    clients: Vec<Client>,
}

impl ClientRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            clients: Vec::new(),
        }
    }

    /// Register a client, rejecting a document that is already taken
    pub fn register(&mut self, client: Client) -> Result<(), RegistryError> {
        if self.position(client.document()).is_some() {
            return Err(RegistryError::DuplicateDocument {
                document: client.document().to_string(),
            });
        }

        self.clients.push(client);
        Ok(())
    }

    pub fn find_by_document(&self, document: &str) -> Result<Option<&Client>, ValidationError> {
        let document = checked_document(document)?;
        Ok(self.clients.iter().find(|c| c.document() == document))
    }

    pub fn find_by_document_mut(
        &mut self,
        document: &str,
    ) -> Result<Option<&mut Client>, ValidationError> {
        let document = checked_document(document)?;
        Ok(self.clients.iter_mut().find(|c| c.document() == document))
    }

    pub fn exists(&self, document: &str) -> Result<bool, ValidationError> {
        Ok(self.find_by_document(document)?.is_some())
    }

    /// Remove a client by document, reporting whether one was removed
    pub fn remove(&mut self, document: &str) -> Result<bool, ValidationError> {
        let document = checked_document(document)?;
        let before = self.clients.len();
        self.clients.retain(|c| c.document() != document);
        Ok(self.clients.len() != before)
    }

    /// Read-only view of all clients in registration order
    pub fn all(&self) -> &[Client] {
        &self.clients
    }

    /// Owned copy of all clients, detached from later registry changes
    pub fn snapshot(&self) -> Vec<Client> {
        self.clients.clone()
    }

    pub fn count(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Resolve a document to a client
    pub fn client(&self, document: &str) -> Result<&Client, LedgerError> {
        self.find_by_document(document)?
            .ok_or_else(|| client_not_found(document).into())
    }

    pub fn client_mut(&mut self, document: &str) -> Result<&mut Client, LedgerError> {
        self.find_by_document_mut(document)?
            .ok_or_else(|| client_not_found(document).into())
    }

    /// Resolve a (document, account number) pair to an account
    pub fn account(&self, document: &str, number: &str) -> Result<&Account, LedgerError> {
        self.client(document)?
            .find_account(number)?
            .ok_or_else(|| account_not_found(number).into())
    }

    pub fn account_mut(&mut self, document: &str, number: &str) -> Result<&mut Account, LedgerError> {
        self.client_mut(document)?
            .find_account_mut(number)?
            .ok_or_else(|| account_not_found(number).into())
    }

    /// Borrow a transfer source and, if it resolves, its destination.
    ///
    /// The source must exist. An unresolvable destination yields `None` so
    /// the caller can report it as an invalid target; naming the source
    /// account twice is an invalid target as well.
    pub fn account_pair_mut(
        &mut self,
        source: (&str, &str),
        destination: (&str, &str),
    ) -> Result<(&mut Account, Option<&mut Account>), LedgerError> {
        let (src_client, src_account) = self.locate(source.0, source.1)?;
        let dst = self.locate(destination.0, destination.1).ok();

        match dst {
            None => Ok((&mut self.clients[src_client].accounts[src_account], None)),
            Some((dst_client, dst_account)) if dst_client == src_client => {
                if dst_account == src_account {
                    return Err(ValidationError::InvalidTarget {
                        reason: format!("cannot transfer from account {} to itself", source.1),
                    }
                    .into());
                }
                let accounts = &mut self.clients[src_client].accounts;
                let (src, dst) = pair_mut(accounts, src_account, dst_account);
                Ok((src, Some(dst)))
            }
            Some((dst_client, dst_account)) => {
                let (src, dst) = pair_mut(&mut self.clients, src_client, dst_client);
                Ok((
                    &mut src.accounts[src_account],
                    Some(&mut dst.accounts[dst_account]),
                ))
            }
        }
    }

    pub(crate) fn accounts_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        self.clients
            .iter_mut()
            .flat_map(|client| client.accounts.iter_mut())
    }

    fn position(&self, document: &str) -> Option<usize> {
        self.clients.iter().position(|c| c.document() == document)
    }

    /// Indices of a client and one of its accounts
    fn locate(&self, document: &str, number: &str) -> Result<(usize, usize), LedgerError> {
        let document = checked_document(document)?;
        let client_index = self
            .position(document)
            .ok_or_else(|| client_not_found(document))?;
        let number = number.trim();
        if number.is_empty() {
            return Err(ValidationError::InvalidNumber.into());
        }
        let account_index = self.clients[client_index]
            .position(number)
            .ok_or_else(|| account_not_found(number))?;
        Ok((client_index, account_index))
    }
}

fn checked_document(document: &str) -> Result<&str, ValidationError> {
    let document = document.trim();
    if document.is_empty() {
        return Err(ValidationError::InvalidDocument);
    }
    Ok(document)
}

fn client_not_found(document: &str) -> RegistryError {
    RegistryError::ClientNotFound {
        document: document.to_string(),
    }
}

fn account_not_found(number: &str) -> RegistryError {
    RegistryError::AccountNotFound {
        number: number.to_string(),
    }
}

/// Two distinct mutable elements of one slice
fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(first, second);
    if first < second {
        let (head, tail) = items.split_at_mut(second);
        (&mut head[first], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(first);
        (&mut tail[0], &mut head[second])
    }
}
