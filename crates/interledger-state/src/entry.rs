use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Progress of a transfer through the relay protocol.
///
/// The nominal order is READY → INQUIRED → ANSWERED → SENT → RESPONDED →
/// CONFIRMING → FINALIZED. The order is advisory: the relay enforces it, the
/// store records whatever it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum TransferStatus {
    Ready,
    Inquired,
    Answered,
    Sent,
    Responded,
    Confirming,
    Finalized,
}

impl TransferStatus {
    /// Numeric code used in the serialized record.
    pub fn to_code(&self) -> u8 {
        match self {
            Self::Ready => 1,
            Self::Inquired => 2,
            Self::Answered => 3,
            Self::Sent => 4,
            Self::Responded => 5,
            Self::Confirming => 6,
            Self::Finalized => 7,
        }
    }

    pub fn from_code(value: u8) -> Result<Self, StateError> {
        match value {
            1 => Ok(Self::Ready),
            2 => Ok(Self::Inquired),
            3 => Ok(Self::Answered),
            4 => Ok(Self::Sent),
            5 => Ok(Self::Responded),
            6 => Ok(Self::Confirming),
            7 => Ok(Self::Finalized),
            _ => Err(StateError::UnknownStatus(value)),
        }
    }

    /// The nominal successor, or `None` after FINALIZED.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Ready => Some(Self::Inquired),
            Self::Inquired => Some(Self::Answered),
            Self::Answered => Some(Self::Sent),
            Self::Sent => Some(Self::Responded),
            Self::Responded => Some(Self::Confirming),
            Self::Confirming => Some(Self::Finalized),
            Self::Finalized => None,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, Self::Finalized)
    }
}

impl From<TransferStatus> for u8 {
    fn from(status: TransferStatus) -> Self {
        status.to_code()
    }
}

impl TryFrom<u8> for TransferStatus {
    type Error = StateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "READY"),
            Self::Inquired => write!(f, "INQUIRED"),
            Self::Answered => write!(f, "ANSWERED"),
            Self::Sent => write!(f, "SENT"),
            Self::Responded => write!(f, "RESPONDED"),
            Self::Confirming => write!(f, "CONFIRMING"),
            Self::Finalized => write!(f, "FINALIZED"),
        }
    }
}

/// The transactional bundle a transfer carries between ledgers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferPayload {
    pub id: String,
    pub nonce: String,
    pub data: String,
}

/// Off-ledger record of one in-flight transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEntry {
    pub status: TransferStatus,
    pub payload: TransferPayload,
    /// Whether a relay node accepted the send task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_acceptance: Option<bool>,
    /// Outcome reported by the destination ledger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl TransferEntry {
    /// A fresh entry in READY.
    pub fn new(id: impl Into<String>, nonce: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            status: TransferStatus::Ready,
            payload: TransferPayload {
                id: id.into(),
                nonce: nonce.into(),
                data: data.into(),
            },
            send_acceptance: None,
            result: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.payload.id
    }
}
