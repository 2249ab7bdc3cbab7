//! Interledger Relay State
//!
//! Off-ledger status records for in-flight transfers, keyed by transfer id,
//! with `transferReady` and `transferResponded` notifications for relays.

pub mod entry;
pub mod error;
pub mod events;
pub mod store;

pub use entry::{TransferEntry, TransferPayload, TransferStatus};
pub use error::StateError;
pub use events::TransferNotification;
pub use store::TransferEntryStore;
