use std::fmt;

use crate::types::{Address, Value};

/// Failure categories shared by every ledger component.
///
/// Component error enums map onto these via their `kind()` method so a relay
/// can decide how to react without matching on component-specific variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Malformed or out-of-range argument.
    InvalidInput,
    /// Caller lacks the required role or identity.
    PermissionDenied,
    /// Missing key, or a record holding no funds.
    NotFound,
    /// Duplicate or tombstoned key.
    Conflict,
    /// Preimage does not open the commitment.
    InvalidProof,
    /// Operation invalid for the current lifecycle state.
    WrongState,
    /// Timing precondition not met yet.
    NotYetEligible,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "InvalidInput"),
            Self::PermissionDenied => write!(f, "PermissionDenied"),
            Self::NotFound => write!(f, "NotFound"),
            Self::Conflict => write!(f, "Conflict"),
            Self::InvalidProof => write!(f, "InvalidProof"),
            Self::WrongState => write!(f, "WrongState"),
            Self::NotYetEligible => write!(f, "NotYetEligible"),
        }
    }
}

/// Errors raised by the shared ledger primitives.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("insufficient balance for {account}: available {available}, required {required}")]
    InsufficientBalance {
        account: Address,
        available: Value,
        required: Value,
    },

    #[error("balance overflow for {0}")]
    BalanceOverflow(Address),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientBalance { .. }
            | Self::BalanceOverflow(_)
            | Self::InvalidAddress(_)
            | Self::InvalidHash(_) => ErrorKind::InvalidInput,
        }
    }
}
