use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use interledger_core::outbox::DEFAULT_OUTBOX_CAPACITY;
use interledger_core::{Clock, LedgerConfig, Outbox};

use crate::entry::{TransferEntry, TransferStatus};
use crate::error::StateError;
use crate::events::TransferNotification;

/// Keyed store of transfer entries, one per transfer id.
///
/// Entries are kept serialized as JSON, the way a ledger's world state holds
/// them, and decoded on read. Each id is a `DashMap` key, so create-if-absent
/// and read-modify-write are atomic per id.
pub struct TransferEntryStore {
    entries: DashMap<String, Vec<u8>>,
    notifications: Outbox<TransferNotification>,
}

impl TransferEntryStore {
    pub fn new() -> Self {
        Self::with_outbox_capacity(DEFAULT_OUTBOX_CAPACITY)
    }

    pub fn with_outbox_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            notifications: Outbox::new(capacity),
        }
    }

    /// Stamp notifications with the hosting ledger's clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.notifications = self.notifications.with_clock(clock);
        self
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::with_outbox_capacity(config.outbox.capacity)
    }

    /// Whether an entry exists for `id`.
    pub fn exists(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Create a READY entry and emit `transferReady`.
    pub fn create(&self, id: &str, nonce: &str, data: &str) -> Result<TransferEntry, StateError> {
        let slot = match self.entries.entry(id.to_string()) {
            Entry::Occupied(_) => return Err(StateError::AlreadyExists(id.to_string())),
            Entry::Vacant(slot) => slot,
        };

        let entry = TransferEntry::new(id, nonce, data);
        let encoded = serde_json::to_vec(&entry)?;
        let _guard = slot.insert(encoded);
        self.notifications.append(TransferNotification::Ready {
            entry: entry.clone(),
        });

        tracing::info!(transfer = id, "transfer entry created");
        Ok(entry)
    }

    pub fn read(&self, id: &str) -> Result<TransferEntry, StateError> {
        let encoded = self
            .entries
            .get(id)
            .ok_or_else(|| StateError::NotFound(id.to_string()))?;
        Ok(serde_json::from_slice(&encoded)?)
    }

    /// Overwrite the status and any provided optional fields.
    ///
    /// Emits `transferResponded` iff the new status is RESPONDED.
    pub fn update(
        &self,
        id: &str,
        status: TransferStatus,
        send_acceptance: Option<bool>,
        result: Option<String>,
    ) -> Result<TransferEntry, StateError> {
        let mut encoded = self
            .entries
            .get_mut(id)
            .ok_or_else(|| StateError::NotFound(id.to_string()))?;

        let mut entry: TransferEntry = serde_json::from_slice(&encoded)?;
        let previous = entry.status;
        entry.status = status;
        if send_acceptance.is_some() {
            entry.send_acceptance = send_acceptance;
        }
        if result.is_some() {
            entry.result = result;
        }
        *encoded = serde_json::to_vec(&entry)?;

        if status == TransferStatus::Responded {
            self.notifications.append(TransferNotification::Responded {
                entry: entry.clone(),
            });
        }

        tracing::info!(transfer = id, from = %previous, to = %status, "transfer entry updated");
        Ok(entry)
    }

    /// Remove an entry on completion or abandonment.
    pub fn delete(&self, id: &str) -> Result<(), StateError> {
        self.entries
            .remove(id)
            .ok_or_else(|| StateError::NotFound(id.to_string()))?;
        tracing::info!(transfer = id, "transfer entry deleted");
        Ok(())
    }

    /// Ids of all stored entries, unordered.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Notification log consumed by the relay.
    pub fn events(&self) -> &Outbox<TransferNotification> {
        &self.notifications
    }
}

impl Default for TransferEntryStore {
    fn default() -> Self {
        Self::new()
    }
}
