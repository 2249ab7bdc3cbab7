//! Interledger core primitives.
//!
//! Shared by the escrow, asset guard and relay status ledger: principal and
//! commitment types, the value ledger, time sources, the append-only outbox,
//! configuration, and the error taxonomy.

pub mod balances;
pub mod clock;
pub mod config;
pub mod error;
pub mod outbox;
pub mod types;

pub use balances::Balances;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use error::{CoreError, ErrorKind};
pub use outbox::{Envelope, Outbox};
pub use types::{Address, LockHash, Timestamp, Value};
