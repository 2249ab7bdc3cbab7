use interledger_core::{Address, LockHash, Timestamp, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Funds held by the escrow under one lock value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Commitment the receiver must open; unique key of the record.
    pub lock_value: LockHash,
    /// Depositor; the only principal allowed to recover after the deadline.
    pub sender: Address,
    /// Destination of a successful redemption.
    pub receiver: Address,
    /// Value currently locked. Zero once redeemed or recovered.
    pub amount: Value,
    /// After this time (exclusive) the sender may recover.
    pub refund_deadline: Timestamp,
    /// Set by redemption. A withdrawn lock value can never be deposited again.
    pub withdrawn: bool,
}

impl LockRecord {
    /// Where this record sits in its lifecycle.
    pub fn status(&self) -> LockStatus {
        match (self.amount > 0, self.withdrawn) {
            (true, _) => LockStatus::Active,
            (false, true) => LockStatus::Redeemed,
            (false, false) => LockStatus::Recovered,
        }
    }

    /// Whether a fresh deposit may take over this lock value.
    pub fn is_reusable(&self) -> bool {
        self.status() == LockStatus::Recovered
    }
}

/// Lifecycle of a lock record, derived from `amount` and `withdrawn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStatus {
    /// Funds locked, awaiting redemption or recovery.
    Active,
    /// Receiver was paid. Tombstoned forever.
    Redeemed,
    /// Sender was refunded after the deadline. Lock value may be reused.
    Recovered,
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Redeemed => write!(f, "Redeemed"),
            Self::Recovered => write!(f, "Recovered"),
        }
    }
}
