//! Action validation errors.

use crate::battlefield::PlacementError;
use crate::card::CardId;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, Side};

/// Errors raised while validating or applying a player action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("Card {card_id} is not in hand")]
    CardNotInHand { card_id: CardId },

    #[error("Not enough mana: need {required}, have {available}")]
    InsufficientMana { required: u32, available: u32 },

    #[error("Card {card_id} is on cooldown for {remaining} more turn(s)")]
    OnCooldown { card_id: CardId, remaining: u32 },

    #[error("{side} cannot act while stunned or frozen")]
    Incapacitated { side: Side },

    #[error("Target {position} is outside the battlefield")]
    InvalidTarget { position: Position },

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            InsufficientMana { .. } | OnCooldown { .. } | Incapacitated { .. } => {
                ErrorSeverity::Recoverable
            }
            CardNotInHand { .. } | InvalidTarget { .. } => ErrorSeverity::Validation,
            Placement(PlacementError::NotPlaced { .. }) => ErrorSeverity::Internal,
            Placement(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            CardNotInHand { .. } => "ACTION_CARD_NOT_IN_HAND",
            InsufficientMana { .. } => "ACTION_INSUFFICIENT_MANA",
            OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            Incapacitated { .. } => "ACTION_INCAPACITATED",
            InvalidTarget { .. } => "ACTION_INVALID_TARGET",
            Placement(PlacementError::OutOfBounds { .. }) => "ACTION_PLACEMENT_OUT_OF_BOUNDS",
            Placement(PlacementError::Occupied { .. }) => "ACTION_PLACEMENT_OCCUPIED",
            Placement(PlacementError::NotPlaced { .. }) => "ACTION_PLACEMENT_NOT_PLACED",
        }
    }
}
