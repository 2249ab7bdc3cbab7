//! Interledger Asset Guard
//!
//! Transferable assets carrying a location state (`NotHere`, `TransferOut`,
//! `Here`) that gates native ownership transfer and lets an external
//! authority commit or abort a relocation to another ledger.

pub mod error;
pub mod events;
pub mod guard;
pub mod state;
pub mod types;

pub use error::AssetError;
pub use events::AssetEvent;
pub use guard::{AssetGuard, Roles};
pub use state::{LocationEvent, LocationState, LocationStateMachine};
pub use types::{Asset, AssetId};
