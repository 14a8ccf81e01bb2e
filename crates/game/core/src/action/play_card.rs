use crate::action::{ActionError, ActionTransition, apply_effect};
use crate::card::{Card, CardId};
use crate::events::CombatEvent;
use crate::state::{MatchState, Position, Side};

/// Plays a card from the acting side's hand.
///
/// All checks (hand, mana, cooldown, control, targets) happen before mana
/// is deducted; effects then resolve in card order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlayCardAction {
    pub side: Side,
    pub card_id: CardId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub targets: Vec<Position>,
}

impl PlayCardAction {
    pub fn new(side: Side, card_id: impl Into<CardId>) -> Self {
        Self {
            side,
            card_id: card_id.into(),
            targets: Vec::new(),
        }
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Position>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    fn card<'a>(&self, state: &'a MatchState) -> Result<&'a Card, ActionError> {
        state
            .player(self.side)
            .deck
            .as_ref()
            .and_then(|deck| deck.card_in_hand(&self.card_id))
            .ok_or_else(|| ActionError::CardNotInHand {
                card_id: self.card_id.clone(),
            })
    }
}

impl ActionTransition for PlayCardAction {
    type Error = ActionError;

    fn side(&self) -> Side {
        self.side
    }

    fn pre_validate(&self, state: &MatchState) -> Result<(), Self::Error> {
        let player = state.player(self.side);
        let card = self.card(state)?;

        if player.mana < card.cost {
            return Err(ActionError::InsufficientMana {
                required: card.cost,
                available: player.mana,
            });
        }

        let remaining = player.cooldown(&self.card_id);
        if remaining > 0 {
            return Err(ActionError::OnCooldown {
                card_id: self.card_id.clone(),
                remaining,
            });
        }

        if player.control().is_incapacitated() {
            return Err(ActionError::Incapacitated { side: self.side });
        }

        if let Some(&position) = self
            .targets
            .iter()
            .find(|target| !state.battlefield.is_valid_position(**target))
        {
            return Err(ActionError::InvalidTarget { position });
        }

        Ok(())
    }

    fn apply(
        &self,
        state: &mut MatchState,
        events: &mut Vec<CombatEvent>,
    ) -> Result<(), Self::Error> {
        let card = self.card(state)?.clone();

        let player = state.player_mut(self.side);
        player.mana -= card.cost;
        events.push(CombatEvent::CardPlayed {
            side: self.side,
            card_id: card.id.clone(),
            cost: card.cost,
            exhausted: card.exhaust,
        });

        for effect in &card.effects {
            apply_effect(state, self.side, effect, events);
        }

        let player = state.player_mut(self.side);
        if let Some(turns) = card.cooldown
            && turns > 0
        {
            player.cooldowns.insert(card.id.clone(), turns);
        }

        let Some(deck) = player.deck.as_mut() else {
            return Err(ActionError::CardNotInHand {
                card_id: self.card_id.clone(),
            });
        };
        let played = deck
            .play_card(&self.card_id)
            .ok_or_else(|| ActionError::CardNotInHand {
                card_id: self.card_id.clone(),
            })?;
        if card.exhaust {
            deck.exhaust(played);
        } else {
            deck.discard(played);
        }

        Ok(())
    }

    fn post_validate(&self, state: &MatchState) -> Result<(), Self::Error> {
        let player = state.player(self.side);
        debug_assert!(player.mana <= player.max_mana);
        Ok(())
    }
}
