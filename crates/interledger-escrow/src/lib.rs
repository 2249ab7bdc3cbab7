//! Interledger Escrow
//!
//! Hash time-locked escrow: value locked under a commitment is released to
//! the receiver on presentation of the preimage, or refunded to the sender
//! after the refund deadline.

pub mod error;
pub mod events;
pub mod htlc;
pub mod types;

pub use error::EscrowError;
pub use events::EscrowEvent;
pub use htlc::HashTimeLock;
pub use types::{LockRecord, LockStatus};
