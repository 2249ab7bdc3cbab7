use interledger_core::ErrorKind;

/// Relay status ledger errors.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("the transfer entry {0} already exists")]
    AlreadyExists(String),

    #[error("the transfer entry {0} does not exist")]
    NotFound(String),

    #[error("unknown transfer status code: {0}")]
    UnknownStatus(u8),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StateError {
    /// Map onto the shared failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::UnknownStatus(_) | Self::Serialization(_) => ErrorKind::InvalidInput,
        }
    }
}
