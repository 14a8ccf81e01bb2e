use crate::action::{ActionError, ActionTransition};
use crate::events::CombatEvent;
use crate::state::{MatchResult, MatchState, ResultReason, Side, Winner};

/// Concedes the match; legal regardless of whose turn it is.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurrenderAction {
    pub side: Side,
}

impl SurrenderAction {
    pub fn new(side: Side) -> Self {
        Self { side }
    }
}

impl ActionTransition for SurrenderAction {
    type Error = ActionError;

    fn side(&self) -> Side {
        self.side
    }

    fn apply(
        &self,
        state: &mut MatchState,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), Self::Error> {
        let result = MatchResult::new(Winner::from(self.side.other()), ResultReason::Surrender);
        if state.finish(result) {
            events.push(CombatEvent::MatchEnded { result });
        }
        Ok(())
    }
}
