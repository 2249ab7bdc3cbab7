use interledger_core::{Address, ErrorKind};

use crate::state::{LocationEvent, LocationState};
use crate::types::AssetId;

/// Asset guard errors.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("{event} not allowed while asset is {from}")]
    InvalidTransition {
        from: LocationState,
        event: LocationEvent,
    },

    #[error("asset {id} is {state}; ownership transfer requires Here")]
    NotTransferable { id: AssetId, state: LocationState },

    #[error("{caller} lacks the {role} role")]
    PermissionDenied { caller: Address, role: &'static str },

    #[error("asset not found: {0}")]
    NotFound(AssetId),

    #[error("asset already minted: {0}")]
    AlreadyMinted(AssetId),

    #[error("owner can't be the null address")]
    NullOwner,

    #[error("recipient can't be the null address")]
    NullRecipient,

    #[error("asset {id} is not owned by {claimed}")]
    WrongOwner { id: AssetId, claimed: Address },

    #[error("unknown location state code: {0}")]
    UnknownStateCode(u8),
}

impl AssetError {
    /// Map onto the shared failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTransition { .. } | Self::NotTransferable { .. } => ErrorKind::WrongState,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyMinted(_) => ErrorKind::Conflict,
            Self::NullOwner
            | Self::NullRecipient
            | Self::WrongOwner { .. }
            | Self::UnknownStateCode(_) => ErrorKind::InvalidInput,
        }
    }
}
