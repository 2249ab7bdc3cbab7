//! Shared fixtures for the cross-crate scenario tests.

use std::sync::Arc;

use interledger_asset::{AssetGuard, Roles};
use interledger_core::{Address, Balances, Clock, LedgerConfig, LockHash, ManualClock, Value};
use interledger_escrow::HashTimeLock;

/// Fixed starting time for every fixture clock.
pub const START: u64 = 1_700_000_000;

/// Balance every named principal starts with.
pub const FUNDING: Value = 10_000;

pub fn alice() -> Address {
    Address::from_label("alice")
}

pub fn bob() -> Address {
    Address::from_label("bob")
}

pub fn carol() -> Address {
    Address::from_label("carol")
}

/// A secret key and the lock value it opens.
pub fn secret(label: &str) -> (Vec<u8>, LockHash) {
    let key = format!("secret:{}", label).into_bytes();
    let lock = LockHash::from_preimage(&key);
    (key, lock)
}

/// One hosting ledger with an escrow, funded principals and a manual clock.
pub struct EscrowLedger {
    pub clock: Arc<ManualClock>,
    pub balances: Arc<Balances>,
    pub escrow: Arc<HashTimeLock>,
}

impl EscrowLedger {
    /// A ledger whose escrow lives at `Address::from_label(name)`.
    pub fn new(name: &str) -> Self {
        Self::with_clock(name, Arc::new(ManualClock::new(START)))
    }

    /// A ledger sharing `clock` with other fixtures.
    pub fn with_clock(name: &str, clock: Arc<ManualClock>) -> Self {
        let balances = Arc::new(Balances::new());
        for principal in [alice(), bob(), carol()] {
            // Fresh accounts cannot overflow.
            let _ = balances.credit(principal, FUNDING);
        }
        let escrow = Arc::new(HashTimeLock::new(
            Address::from_label(name),
            balances.clone(),
            clock.clone(),
        ));
        tracing::debug!(ledger = name, escrow = %escrow.address(), "fixture ledger ready");
        Self {
            clock,
            balances,
            escrow,
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn balance(&self, who: &Address) -> Value {
        self.balances.balance_of(who)
    }
}

/// The authority that accepts, commits and aborts relocations.
pub fn authority() -> Address {
    LedgerConfig::default().asset.authority
}

/// An asset guard with the default roles: one authority that also mints.
pub fn asset_guard() -> AssetGuard {
    let config = LedgerConfig::default();
    AssetGuard::new(
        config.asset.name,
        config.asset.symbol,
        Roles {
            minter: config.asset.minter,
            authority: config.asset.authority,
        },
    )
}
