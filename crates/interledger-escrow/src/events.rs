//! Notifications emitted by the escrow for the relay to observe.

use interledger_core::{Address, LockHash, Timestamp, Value};
use serde::{Deserialize, Serialize};

/// Escrow state changes, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EscrowEvent {
    /// Value was locked under a commitment.
    Deposited {
        lock_value: LockHash,
        sender: Address,
        receiver: Address,
        amount: Value,
        refund_deadline: Timestamp,
    },

    /// The receiver was paid. Carries the revealed key so a relay can open
    /// the matching lock on the other ledger.
    Redeemed {
        lock_value: LockHash,
        receiver: Address,
        amount: Value,
        /// Hex-encoded preimage.
        key: String,
        /// Whoever submitted the key; not necessarily the receiver.
        caller: Address,
    },

    /// The sender was refunded after the deadline.
    Recovered {
        lock_value: LockHash,
        sender: Address,
        amount: Value,
    },
}

impl EscrowEvent {
    /// Stable event name for subscribers that filter by topic.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposited { .. } => "FundsDeposited",
            Self::Redeemed { .. } => "FundsWithdrawn",
            Self::Recovered { .. } => "FundsRecovered",
        }
    }

    pub fn lock_value(&self) -> LockHash {
        match self {
            Self::Deposited { lock_value, .. }
            | Self::Redeemed { lock_value, .. }
            | Self::Recovered { lock_value, .. } => *lock_value,
        }
    }

    /// Decoded preimage of a `Redeemed` event.
    pub fn revealed_key(&self) -> Option<Vec<u8>> {
        match self {
            Self::Redeemed { key, .. } => hex::decode(key).ok(),
            _ => None,
        }
    }
}
