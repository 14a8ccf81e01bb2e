//! Action transition dispatch.

use crate::action::{Action, ActionTransition};
use crate::events::CombatEvent;
use crate::state::MatchState;

use super::errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

/// Runs a transition through the three-phase pipeline.
///
/// 1. `pre_validate` - check preconditions before mutation
/// 2. `apply` - mutate the state and record events
/// 3. `post_validate` - verify postconditions after mutation
#[inline]
fn drive_transition<T>(
    transition: &T,
    state: &mut MatchState,
    events: &mut Vec<CombatEvent>,
) -> Result<(), TransitionPhaseError<T::Error>>
where
    T: ActionTransition,
{
    transition
        .pre_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PreValidate, error))?;

    transition
        .apply(state, events)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::Apply, error))?;

    transition
        .post_validate(state)
        .map_err(|error| TransitionPhaseError::new(TransitionPhase::PostValidate, error))?;

    Ok(())
}

/// Routes each action to its transition.
pub(super) fn execute_transition(
    action: &Action,
    state: &mut MatchState,
    events: &mut Vec<CombatEvent>,
) -> Result<(), ExecuteError> {
    match action {
        Action::PlaceHero(transition) => {
            drive_transition(transition, state, events).map_err(ExecuteError::PlaceHero)
        }
        Action::PlayCard(transition) => {
            drive_transition(transition, state, events).map_err(ExecuteError::PlayCard)
        }
        Action::EndTurn(transition) => {
            drive_transition(transition, state, events).map_err(ExecuteError::EndTurn)
        }
        Action::Surrender(transition) => {
            drive_transition(transition, state, events).map_err(ExecuteError::Surrender)
        }
    }
}
