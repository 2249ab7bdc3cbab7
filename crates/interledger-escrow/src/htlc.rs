use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use interledger_core::outbox::DEFAULT_OUTBOX_CAPACITY;
use interledger_core::{Address, Balances, Clock, LedgerConfig, LockHash, Outbox, Timestamp, Value};

use crate::error::EscrowError;
use crate::events::EscrowEvent;
use crate::types::LockRecord;

/// Hash time-locked escrow.
///
/// Holds value under a commitment. The value is released to the receiver by
/// anyone presenting the preimage, or returned to the sender once the refund
/// deadline has passed. Locked value lives in the escrow's own account in the
/// shared [`Balances`].
///
/// Thread-safe: each lock value is a `DashMap` key, and every operation does
/// its read-check-write under that key's guard, so concurrent calls on the
/// same lock value are serialized and the loser sees a precondition failure.
pub struct HashTimeLock {
    address: Address,
    locks: DashMap<LockHash, LockRecord>,
    balances: Arc<Balances>,
    clock: Arc<dyn Clock>,
    events: Outbox<EscrowEvent>,
}

impl HashTimeLock {
    /// Create an escrow living at `address`.
    pub fn new(address: Address, balances: Arc<Balances>, clock: Arc<dyn Clock>) -> Self {
        Self::with_outbox_capacity(address, balances, clock, DEFAULT_OUTBOX_CAPACITY)
    }

    pub fn with_outbox_capacity(
        address: Address,
        balances: Arc<Balances>,
        clock: Arc<dyn Clock>,
        capacity: usize,
    ) -> Self {
        Self {
            address,
            locks: DashMap::new(),
            balances,
            events: Outbox::new(capacity).with_clock(clock.clone()),
            clock,
        }
    }

    pub fn from_config(config: &LedgerConfig, balances: Arc<Balances>, clock: Arc<dyn Clock>) -> Self {
        Self::with_outbox_capacity(config.escrow.address, balances, clock, config.outbox.capacity)
    }

    /// Lock `amount` from `caller` under `lock_value` for `receiver`.
    ///
    /// A lock value whose previous record was recovered may be reused; one
    /// whose record was redeemed is blocked forever.
    pub fn deposit(
        &self,
        caller: Address,
        receiver: Address,
        lock_value: LockHash,
        refund_deadline: Timestamp,
        amount: Value,
    ) -> Result<LockRecord, EscrowError> {
        let now = self.clock.now();
        if refund_deadline <= now {
            return Err(self.reject(
                "deposit",
                EscrowError::DeadlineNotInFuture {
                    deadline: refund_deadline,
                    now,
                },
            ));
        }
        if amount == 0 {
            return Err(self.reject("deposit", EscrowError::ZeroAmount));
        }
        if receiver.is_zero() {
            return Err(self.reject("deposit", EscrowError::NullReceiver));
        }
        if receiver == self.address {
            return Err(self.reject("deposit", EscrowError::ReceiverIsEscrow));
        }
        // The escrow paying itself moves no value, so the lock would be unbacked.
        if caller == self.address {
            return Err(self.reject("deposit", EscrowError::SenderIsEscrow));
        }

        let slot = self.locks.entry(lock_value);
        if let Entry::Occupied(existing) = &slot {
            let existing = existing.get();
            if existing.amount > 0 {
                return Err(self.reject("deposit", EscrowError::LockInUse(lock_value)));
            }
            if existing.withdrawn {
                return Err(self.reject("deposit", EscrowError::LockSpent(lock_value)));
            }
        }

        self.balances.transfer(caller, self.address, amount)?;

        let record = LockRecord {
            lock_value,
            sender: caller,
            receiver,
            amount,
            refund_deadline,
            withdrawn: false,
        };
        let _guard = slot.insert(record.clone());
        self.events.append(EscrowEvent::Deposited {
            lock_value,
            sender: caller,
            receiver,
            amount,
            refund_deadline,
        });

        tracing::info!(lock = %lock_value, sender = %caller, %receiver, amount, refund_deadline, "funds deposited");
        Ok(record)
    }

    /// Pay the locked amount to the stored receiver, given the preimage.
    ///
    /// Permissionless: any caller holding the key may trigger it.
    pub fn redeem(
        &self,
        caller: Address,
        lock_value: LockHash,
        key: &[u8],
    ) -> Result<LockRecord, EscrowError> {
        if !lock_value.is_opened_by(key) {
            return Err(self.reject("redeem", EscrowError::InvalidKey(lock_value)));
        }

        let mut record = match self.locks.get_mut(&lock_value) {
            Some(record) if record.amount > 0 => record,
            _ => return Err(self.reject("redeem", EscrowError::NoFunds(lock_value))),
        };

        let amount = record.amount;
        let receiver = record.receiver;
        self.balances.transfer(self.address, receiver, amount)?;

        record.amount = 0;
        record.withdrawn = true;
        self.events.append(EscrowEvent::Redeemed {
            lock_value,
            receiver,
            amount,
            key: hex::encode(key),
            caller,
        });

        tracing::info!(lock = %lock_value, %receiver, %caller, amount, "funds redeemed");
        Ok(record.clone())
    }

    /// Refund the sender once the refund deadline has passed.
    pub fn recover(&self, caller: Address, lock_value: LockHash) -> Result<LockRecord, EscrowError> {
        let mut record = match self.locks.get_mut(&lock_value) {
            Some(record) if record.amount > 0 => record,
            _ => {
                return Err(self.reject("recover", EscrowError::NoFundsToRecover(lock_value)));
            }
        };

        let now = self.clock.now();
        if now <= record.refund_deadline {
            let deadline = record.refund_deadline;
            return Err(self.reject(
                "recover",
                EscrowError::RefundNotReached {
                    lock_value,
                    deadline,
                    now,
                },
            ));
        }
        if caller != record.sender {
            return Err(self.reject("recover", EscrowError::NotSender { lock_value, caller }));
        }

        let amount = record.amount;
        let sender = record.sender;
        self.balances.transfer(self.address, sender, amount)?;

        record.amount = 0;
        self.events.append(EscrowEvent::Recovered {
            lock_value,
            sender,
            amount,
        });

        tracing::info!(lock = %lock_value, %sender, amount, "funds recovered");
        Ok(record.clone())
    }

    /// Get the record for a lock value, if one was ever deposited.
    pub fn get(&self, lock_value: &LockHash) -> Option<LockRecord> {
        self.locks.get(lock_value).map(|entry| entry.clone())
    }

    /// Address of the escrow's own account.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Value currently held by the escrow.
    pub fn locked_total(&self) -> Value {
        self.balances.balance_of(&self.address)
    }

    pub fn balances(&self) -> &Arc<Balances> {
        &self.balances
    }

    /// Notification log consumed by the relay.
    pub fn events(&self) -> &Outbox<EscrowEvent> {
        &self.events
    }

    /// Number of lock values ever used.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn reject(&self, operation: &'static str, err: EscrowError) -> EscrowError {
        tracing::debug!(operation, error = %err, "escrow call rejected");
        err
    }
}
