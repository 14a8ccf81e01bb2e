use crate::action::{ActionError, ActionTransition};
use crate::battlefield::PlacementError;
use crate::events::CombatEvent;
use crate::state::{MatchState, Position, Side};

/// Puts a side's hero on the battlefield, vacating any cell it held before.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaceHeroAction {
    pub side: Side,
    pub x: i32,
    pub y: i32,
}

impl PlaceHeroAction {
    pub fn new(side: Side, x: i32, y: i32) -> Self {
        Self { side, x, y }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl ActionTransition for PlaceHeroAction {
    type Error = ActionError;

    fn side(&self) -> Side {
        self.side
    }

    fn pre_validate(&self, state: &MatchState) -> Result<(), Self::Error> {
        let battlefield = &state.battlefield;
        let position = self.position();

        if !battlefield.is_valid_position(position) {
            return Err(PlacementError::OutOfBounds { position }.into());
        }
        if let Some(occupant) = battlefield.entity_at(position) {
            return Err(PlacementError::Occupied { position, occupant }.into());
        }

        Ok(())
    }

    fn apply(
        &self,
        state: &mut MatchState,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), Self::Error> {
        let position = self.position();
        let MatchState {
            battlefield,
            player1,
            player2,
            ..
        } = state;
        let hero = match self.side {
            Side::Player1 => player1,
            Side::Player2 => player2,
        };

        battlefield.place(hero, position)?;
        events.push(CombatEvent::HeroPlaced {
            side: self.side,
            position,
        });
        Ok(())
    }

    fn post_validate(&self, state: &MatchState) -> Result<(), Self::Error> {
        let hero = state.player(self.side);
        debug_assert_eq!(hero.position, Some(self.position()));
        debug_assert_eq!(
            state.battlefield.entity_at(self.position()),
            Some(self.side.entity())
        );
        Ok(())
    }
}
