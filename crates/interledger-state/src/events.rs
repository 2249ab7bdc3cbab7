//! Notifications emitted by the relay status ledger.

use serde::{Deserialize, Serialize};

use crate::entry::TransferEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TransferNotification {
    /// A new entry was created and is ready to be picked up.
    Ready { entry: TransferEntry },
    /// An update moved an entry to RESPONDED.
    Responded { entry: TransferEntry },
}

impl TransferNotification {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "transferReady",
            Self::Responded { .. } => "transferResponded",
        }
    }

    pub fn entry(&self) -> &TransferEntry {
        match self {
            Self::Ready { entry } | Self::Responded { entry } => entry,
        }
    }
}
