use interledger_core::Address;
use serde::{Deserialize, Serialize};

use crate::state::LocationState;

/// Token identifier, unique within one guard.
pub type AssetId = u64;

/// A transferable asset record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub owner: Address,
    /// Metadata location.
    pub uri: String,
    /// Application-level name the token is paired with (e.g. an in-game item).
    pub asset_name: String,
    pub state: LocationState,
    /// Principal allowed to move or burn this asset on the owner's behalf.
    pub approved: Option<Address>,
}

impl Asset {
    /// Whether `who` may act as the owner of this asset.
    pub fn is_owner_or_approved(&self, who: &Address) -> bool {
        self.owner == *who || self.approved.as_ref() == Some(who)
    }
}
