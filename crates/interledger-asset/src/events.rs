//! Notifications emitted by the asset guard.

use interledger_core::Address;
use serde::{Deserialize, Serialize};

use crate::types::AssetId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AssetEvent {
    Minted {
        id: AssetId,
        owner: Address,
        asset_name: String,
    },
    Burned {
        id: AssetId,
        owner: Address,
    },
    Accepted {
        id: AssetId,
    },
    /// The owner started a relocation; the relay reacts to this one.
    TransferOut {
        id: AssetId,
        from: Address,
        asset_name: String,
    },
    Committed {
        id: AssetId,
    },
    Aborted {
        id: AssetId,
        reason: u64,
    },
    Transferred {
        id: AssetId,
        from: Address,
        to: Address,
    },
    Approval {
        id: AssetId,
        owner: Address,
        spender: Option<Address>,
    },
}

impl AssetEvent {
    /// Stable event name for subscribers that filter by topic.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Minted { .. } => "Minted",
            Self::Burned { .. } => "Burned",
            Self::Accepted { .. } => "Accepted",
            Self::TransferOut { .. } => "TransferOut",
            Self::Committed { .. } => "InterledgerCommit",
            Self::Aborted { .. } => "InterledgerAbort",
            Self::Transferred { .. } => "Transfer",
            Self::Approval { .. } => "Approval",
        }
    }

    pub fn asset_id(&self) -> AssetId {
        match self {
            Self::Minted { id, .. }
            | Self::Burned { id, .. }
            | Self::Accepted { id }
            | Self::TransferOut { id, .. }
            | Self::Committed { id }
            | Self::Aborted { id, .. }
            | Self::Transferred { id, .. }
            | Self::Approval { id, .. } => *id,
        }
    }
}
