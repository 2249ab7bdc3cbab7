use std::fmt;

use crate::error::AssetError;

/// Where an asset currently lives, from this ledger's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LocationState {
    /// Represented on another ledger, or not yet activated here. Initial state.
    NotHere,
    /// Leaving this ledger; awaiting the authority's commit or abort.
    TransferOut,
    /// Active on this ledger and freely transferable.
    Here,
}

impl LocationState {
    /// Whether native ownership transfer is allowed in this state.
    pub fn is_transferable(&self) -> bool {
        matches!(self, Self::Here)
    }

    /// Numeric code as exposed by the token contract interface.
    pub fn to_code(&self) -> u8 {
        match self {
            Self::NotHere => 0,
            Self::TransferOut => 1,
            Self::Here => 2,
        }
    }

    /// Parse a numeric state code.
    pub fn from_code(value: u8) -> Result<Self, AssetError> {
        match value {
            0 => Ok(Self::NotHere),
            1 => Ok(Self::TransferOut),
            2 => Ok(Self::Here),
            _ => Err(AssetError::UnknownStateCode(value)),
        }
    }
}

impl fmt::Display for LocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotHere => write!(f, "NotHere"),
            Self::TransferOut => write!(f, "TransferOut"),
            Self::Here => write!(f, "Here"),
        }
    }
}

/// Calls that move an asset between location states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum LocationEvent {
    /// The authority activates the asset on this ledger.
    Accept,
    /// The owner asks to move the asset to another ledger.
    TransferOut,
    /// The authority finalizes an outgoing relocation.
    Commit,
    /// The authority cancels an outgoing relocation.
    Abort,
}

impl fmt::Display for LocationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accept => write!(f, "accept"),
            Self::TransferOut => write!(f, "transferOut"),
            Self::Commit => write!(f, "interledgerCommit"),
            Self::Abort => write!(f, "interledgerAbort"),
        }
    }
}

/// Location state transitions.
///
/// Valid transitions:
/// - NotHere → Here (Accept)
/// - Here → TransferOut (TransferOut)
/// - TransferOut → NotHere (Commit)
/// - TransferOut → Here (Abort)
pub struct LocationStateMachine;

impl LocationStateMachine {
    /// Attempt a state transition based on an event.
    /// Returns the new state on success, or `InvalidTransition` otherwise.
    pub fn transition(
        current: LocationState,
        event: LocationEvent,
    ) -> Result<LocationState, AssetError> {
        let new_state = match (current, event) {
            (LocationState::NotHere, LocationEvent::Accept) => LocationState::Here,
            (LocationState::Here, LocationEvent::TransferOut) => LocationState::TransferOut,
            (LocationState::TransferOut, LocationEvent::Commit) => LocationState::NotHere,
            (LocationState::TransferOut, LocationEvent::Abort) => LocationState::Here,
            _ => {
                return Err(AssetError::InvalidTransition {
                    from: current,
                    event,
                });
            }
        };

        tracing::debug!(
            from = %current,
            to = %new_state,
            event = %event,
            "location state transition"
        );

        Ok(new_state)
    }

    /// Check if a transition is valid without performing it.
    pub fn can_transition(current: LocationState, event: LocationEvent) -> bool {
        Self::transition(current, event).is_ok()
    }
}
