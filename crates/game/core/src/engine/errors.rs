//! Error types for the action execution pipeline.

use crate::action::{
    ActionTransition, EndTurnAction, PlaceHeroAction, PlayCardAction, SurrenderAction,
};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{MatchResult, Side};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing an action through the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExecuteError {
    #[error("place hero failed: {0}")]
    PlaceHero(TransitionPhaseError<<PlaceHeroAction as ActionTransition>::Error>),

    #[error("play card failed: {0}")]
    PlayCard(TransitionPhaseError<<PlayCardAction as ActionTransition>::Error>),

    #[error("end turn failed: {0}")]
    EndTurn(TransitionPhaseError<<EndTurnAction as ActionTransition>::Error>),

    #[error("surrender failed: {0}")]
    Surrender(TransitionPhaseError<<SurrenderAction as ActionTransition>::Error>),

    #[error("Not your turn: {side} acted during {current}'s turn")]
    NotYourTurn { side: Side, current: Side },

    #[error("Match already finished")]
    MatchFinished { result: MatchResult },
}

impl ExecuteError {
    /// The action-level error, when the failure came from a transition.
    pub fn action_error(&self) -> Option<&crate::action::ActionError> {
        match self {
            ExecuteError::PlaceHero(inner)
            | ExecuteError::PlayCard(inner)
            | ExecuteError::EndTurn(inner)
            | ExecuteError::Surrender(inner) => Some(&inner.error),
            ExecuteError::NotYourTurn { .. } | ExecuteError::MatchFinished { .. } => None,
        }
    }

    /// Pipeline phase that failed, when the failure came from a transition.
    pub fn phase(&self) -> Option<TransitionPhase> {
        match self {
            ExecuteError::PlaceHero(inner)
            | ExecuteError::PlayCard(inner)
            | ExecuteError::EndTurn(inner)
            | ExecuteError::Surrender(inner) => Some(inner.phase),
            ExecuteError::NotYourTurn { .. } | ExecuteError::MatchFinished { .. } => None,
        }
    }

    /// Short message for the client that issued the action.
    ///
    /// Internal failures are reported generically.
    pub fn client_message(&self) -> String {
        match self {
            ExecuteError::NotYourTurn { .. } => "Not your turn".to_string(),
            ExecuteError::MatchFinished { .. } => "Match already finished".to_string(),
            _ => match self.action_error() {
                Some(error) if !error.severity().is_internal() => error.to_string(),
                _ => "Action failed".to_string(),
            },
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::NotYourTurn { .. } => ErrorSeverity::Recoverable,
            ExecuteError::MatchFinished { .. } => ErrorSeverity::Validation,
            _ => self
                .action_error()
                .map_or(ErrorSeverity::Internal, GameError::severity),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::NotYourTurn { .. } => "EXECUTE_NOT_YOUR_TURN",
            ExecuteError::MatchFinished { .. } => "EXECUTE_MATCH_FINISHED",
            _ => self
                .action_error()
                .map_or("EXECUTE_UNKNOWN", GameError::error_code),
        }
    }
}
