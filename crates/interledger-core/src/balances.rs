use dashmap::DashMap;

use crate::error::CoreError;
use crate::types::{Address, Value};

/// Per-address value accounts of a hosting ledger.
///
/// Thread-safe: uses `DashMap` for concurrent access. A contract that holds
/// value (such as an escrow) keeps it in the account of its own address.
#[derive(Debug, Default)]
pub struct Balances {
    accounts: DashMap<Address, Value>,
}

impl Balances {
    /// Create an empty set of accounts.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Current balance of an account. Unknown accounts hold zero.
    pub fn balance_of(&self, account: &Address) -> Value {
        self.accounts.get(account).map(|v| *v).unwrap_or(0)
    }

    /// Add value to an account (genesis funding, faucet, or the receiving leg
    /// of a transfer).
    pub fn credit(&self, account: Address, amount: Value) -> Result<Value, CoreError> {
        let mut entry = self.accounts.entry(account).or_insert(0);
        let updated = entry
            .checked_add(amount)
            .ok_or(CoreError::BalanceOverflow(account))?;
        *entry = updated;
        Ok(updated)
    }

    /// Remove value from an account. Fails without side effects if the account
    /// cannot cover `amount`.
    pub fn debit(&self, account: Address, amount: Value) -> Result<Value, CoreError> {
        // Unknown accounts hold zero; a rejected debit must not create one.
        let mut entry = match self.accounts.get_mut(&account) {
            Some(entry) => entry,
            None if amount == 0 => return Ok(0),
            None => {
                return Err(CoreError::InsufficientBalance {
                    account,
                    available: 0,
                    required: amount,
                })
            }
        };
        let available = *entry;
        if available < amount {
            return Err(CoreError::InsufficientBalance {
                account,
                available,
                required: amount,
            });
        }
        *entry = available - amount;
        Ok(*entry)
    }

    /// Move value between accounts: debit `from`, then credit `to`.
    pub fn transfer(&self, from: Address, to: Address, amount: Value) -> Result<(), CoreError> {
        if from == to {
            // Still enforce that the account could have paid.
            let available = self.balance_of(&from);
            if available < amount {
                return Err(CoreError::InsufficientBalance {
                    account: from,
                    available,
                    required: amount,
                });
            }
            return Ok(());
        }
        self.debit(from, amount)?;
        if let Err(e) = self.credit(to, amount) {
            // Undo the debit so a failed transfer moves nothing.
            self.credit(from, amount)?;
            return Err(e);
        }
        tracing::trace!(%from, %to, amount, "value transferred");
        Ok(())
    }

    /// Sum of all account balances.
    pub fn total_supply(&self) -> Value {
        self.accounts.iter().map(|entry| *entry.value()).sum()
    }
}
