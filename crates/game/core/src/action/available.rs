//! Enumerates the actions a side may take in a given state.

use crate::action::{Action, PlayCardAction};
use crate::state::{MatchState, Side};

/// Legal actions for `side`.
///
/// Empty once the match has a result or when it is not `side`'s turn.
/// Otherwise surrender and end turn are always offered, plus one card play
/// per affordable, off-cooldown hand card unless the side is stunned or
/// frozen. Card targets are left empty; target legality is checked when
/// the card is actually played.
pub fn legal_actions(state: &MatchState, side: Side) -> Vec<Action> {
    if state.is_finished() || state.current_side != side {
        return Vec::new();
    }

    let mut actions = vec![Action::surrender(side), Action::end_turn(side)];

    let player = state.player(side);
    if player.control().is_incapacitated() {
        return actions;
    }

    if let Some(deck) = &player.deck {
        actions.extend(
            deck.hand()
                .iter()
                .filter(|card| player.mana >= card.cost && player.cooldown(&card.id) == 0)
                .map(|card| Action::PlayCard(PlayCardAction::new(side, card.id.clone()))),
        );
    }

    actions
}
