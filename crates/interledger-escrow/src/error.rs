use interledger_core::{Address, CoreError, ErrorKind, LockHash, Timestamp};

/// Escrow errors.
#[derive(Debug, thiserror::Error)]
pub enum EscrowError {
    #[error("refund deadline {deadline} must be after current time {now}")]
    DeadlineNotInFuture { deadline: Timestamp, now: Timestamp },

    #[error("funds must be deposited")]
    ZeroAmount,

    #[error("receiver address can't be the null address")]
    NullReceiver,

    #[error("receiver address can't be the escrow itself")]
    ReceiverIsEscrow,

    #[error("sender address can't be the escrow itself")]
    SenderIsEscrow,

    #[error("lock value {0} is already in use")]
    LockInUse(LockHash),

    #[error("withdrawal has already been made with lock value {0}")]
    LockSpent(LockHash),

    #[error("invalid key for lock value {0}")]
    InvalidKey(LockHash),

    #[error("no funds held under lock value {0}")]
    NoFunds(LockHash),

    #[error("no funds to recover under lock value {0}")]
    NoFundsToRecover(LockHash),

    #[error("refund deadline {deadline} for {lock_value} not reached yet (now {now})")]
    RefundNotReached {
        lock_value: LockHash,
        deadline: Timestamp,
        now: Timestamp,
    },

    #[error("only the sender can recover funds under {lock_value}, caller was {caller}")]
    NotSender { lock_value: LockHash, caller: Address },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EscrowError {
    /// Map onto the shared failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DeadlineNotInFuture { .. }
            | Self::ZeroAmount
            | Self::NullReceiver
            | Self::ReceiverIsEscrow
            | Self::SenderIsEscrow => ErrorKind::InvalidInput,
            Self::LockInUse(_) | Self::LockSpent(_) => ErrorKind::Conflict,
            Self::InvalidKey(_) => ErrorKind::InvalidProof,
            Self::NoFunds(_) | Self::NoFundsToRecover(_) => ErrorKind::NotFound,
            Self::RefundNotReached { .. } => ErrorKind::NotYetEligible,
            Self::NotSender { .. } => ErrorKind::PermissionDenied,
            Self::Core(e) => e.kind(),
        }
    }
}
