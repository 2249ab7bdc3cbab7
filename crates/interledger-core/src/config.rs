use serde::{Deserialize, Serialize};

use crate::outbox::DEFAULT_OUTBOX_CAPACITY;
use crate::types::Address;

/// Configuration for the ledger components hosted by one node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Escrow primitive settings.
    #[serde(default)]
    pub escrow: EscrowConfig,

    /// Asset guard settings.
    #[serde(default)]
    pub asset: AssetConfig,

    /// Notification log settings.
    #[serde(default)]
    pub outbox: OutboxConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// The escrow's own address; holds locked value and can never be a receiver.
    #[serde(default = "default_escrow_address")]
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Collection name.
    #[serde(default = "default_asset_name")]
    pub name: String,
    /// Collection symbol.
    #[serde(default = "default_asset_symbol")]
    pub symbol: String,
    /// Principal allowed to mint.
    #[serde(default = "default_authority")]
    pub minter: Address,
    /// Principal allowed to accept, commit and abort relocations.
    #[serde(default = "default_authority")]
    pub authority: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxConfig {
    /// Envelopes buffered per live subscriber before it lags.
    #[serde(default = "default_outbox_capacity")]
    pub capacity: usize,
}

// Default value functions
fn default_escrow_address() -> Address {
    Address::from_label("escrow")
}
fn default_asset_name() -> String {
    "GameToken".into()
}
fn default_asset_symbol() -> String {
    "GAME".into()
}
fn default_authority() -> Address {
    Address::from_label("authority")
}
fn default_outbox_capacity() -> usize {
    DEFAULT_OUTBOX_CAPACITY
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            address: default_escrow_address(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            name: default_asset_name(),
            symbol: default_asset_symbol(),
            minter: default_authority(),
            authority: default_authority(),
        }
    }
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            capacity: default_outbox_capacity(),
        }
    }
}
