use crate::action::{ActionError, ActionTransition};
use crate::engine::turns::{check_game_over, tick_statuses};
use crate::events::CombatEvent;
use crate::state::{MatchState, Side};

/// Ends the acting side's turn.
///
/// Ticks the actor's buffs and debuffs, cools down cards, regenerates mana,
/// hands the turn to the other side and checks for a terminal result. The
/// incoming side then draws its per-turn cards.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurnAction {
    pub side: Side,
}

impl EndTurnAction {
    pub fn new(side: Side) -> Self {
        Self { side }
    }
}

impl ActionTransition for EndTurnAction {
    type Error = ActionError;

    fn side(&self) -> Side {
        self.side
    }

    fn apply(
        &self,
        state: &mut MatchState,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), Self::Error> {
        let mana_regen = state.config.mana_regen_per_turn;
        let discard_hand = state.config.discard_hand_at_end_of_turn;
        let cards_per_turn = state.config.cards_per_turn;

        let player = state.player_mut(self.side);
        let dot_damage = tick_statuses(player, events);

        for remaining in player.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        player.cooldowns.retain(|_, remaining| *remaining > 0);

        player.restore_mana(mana_regen);

        if discard_hand && let Some(deck) = player.deck.as_mut() {
            deck.discard_hand();
        }

        if dot_damage > 0 {
            state.turns_without_damage = 0;
        }

        events.push(CombatEvent::TurnEnded {
            side: self.side,
            turn: state.turn,
        });
        state.current_side = self.side.other();
        state.turn += 1;
        state.turns_without_damage += 1;

        if let Some(result) = check_game_over(state) {
            if state.finish(result) {
                events.push(CombatEvent::MatchEnded { result });
            }
            return Ok(());
        }

        let incoming = state.current_side;
        let MatchState {
            rng,
            player1,
            player2,
            ..
        } = state;
        let next = match incoming {
            Side::Player1 => player1,
            Side::Player2 => player2,
        };
        if let Some(deck) = next.deck.as_mut() {
            let cards = deck.draw(cards_per_turn, rng);
            if !cards.is_empty() {
                events.push(CombatEvent::CardsDrawn {
                    side: incoming,
                    cards,
                });
            }
        }

        Ok(())
    }

    fn post_validate(&self, state: &MatchState) -> Result<(), Self::Error> {
        debug_assert!(state.is_finished() || state.current_side == self.side.other());
        Ok(())
    }
}
