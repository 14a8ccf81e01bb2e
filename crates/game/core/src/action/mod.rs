//! Player actions and their transition logic.
//!
//! Each action is a plain struct implementing [`ActionTransition`]; the engine
//! drives it through `pre_validate → apply → post_validate` on a cloned state.
//! Everything that can reject an action is checked in `pre_validate`, so
//! `apply` only fails on internal inconsistencies.

mod available;
mod effect;
mod end_turn;
mod error;
mod place_hero;
mod play_card;
mod surrender;

pub use available::legal_actions;
pub use effect::{DamageBreakdown, absorb_damage, apply_effect};
pub use end_turn::EndTurnAction;
pub use error::ActionError;
pub use place_hero::PlaceHeroAction;
pub use play_card::PlayCardAction;
pub use surrender::SurrenderAction;

use crate::events::CombatEvent;
use crate::state::{MatchState, Side};

/// Defines how a concrete action mutates match state.
///
/// Validation hooks receive read-only state and must stay side-effect free.
/// `apply` records what happened into `events`; the engine discards the
/// buffer if any phase fails.
pub trait ActionTransition {
    type Error;

    /// Side issuing the action.
    fn side(&self) -> Side;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &MatchState) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the (cloned) state directly.
    fn apply(&self, state: &mut MatchState, events: &mut Vec<CombatEvent>)
    -> Result<(), Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &MatchState) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Every action the engine accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Action {
    PlaceHero(PlaceHeroAction),
    PlayCard(PlayCardAction),
    EndTurn(EndTurnAction),
    Surrender(SurrenderAction),
}

impl Action {
    pub fn place_hero(side: Side, x: i32, y: i32) -> Self {
        Self::PlaceHero(PlaceHeroAction::new(side, x, y))
    }

    pub fn play_card(side: Side, card_id: impl Into<String>) -> Self {
        Self::PlayCard(PlayCardAction::new(side, card_id))
    }

    pub fn end_turn(side: Side) -> Self {
        Self::EndTurn(EndTurnAction::new(side))
    }

    pub fn surrender(side: Side) -> Self {
        Self::Surrender(SurrenderAction::new(side))
    }

    /// Side issuing the action.
    pub fn side(&self) -> Side {
        match self {
            Action::PlaceHero(action) => action.side(),
            Action::PlayCard(action) => action.side(),
            Action::EndTurn(action) => action.side(),
            Action::Surrender(action) => action.side(),
        }
    }

    /// Wire name of the action type.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::PlaceHero(_) => "PLACE_HERO",
            Action::PlayCard(_) => "PLAY_CARD",
            Action::EndTurn(_) => "END_TURN",
            Action::Surrender(_) => "SURRENDER",
        }
    }

    /// Whether the action may only be issued by the side whose turn it is.
    pub fn requires_turn(&self) -> bool {
        matches!(self, Action::PlayCard(_) | Action::EndTurn(_))
    }
}
