//! Typed notifications emitted by the engine.
//!
//! Transitions record events into a buffer while they run. The buffer is only
//! handed to a [`CombatObserver`] after the action has committed, so observers
//! never see events from a rejected action.

use crate::card::CardId;
use crate::state::{Buff, Debuff, MatchResult, Position, Side};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "event", rename_all = "snake_case", rename_all_fields = "camelCase")
)]
pub enum CombatEvent {
    HeroPlaced {
        side: Side,
        position: Position,
    },
    CardPlayed {
        side: Side,
        card_id: CardId,
        cost: u32,
        exhausted: bool,
    },
    /// One damage instance after scaling, split by what absorbed it.
    DamageDealt {
        source: Side,
        target: Side,
        amount: u32,
        critical: bool,
        absorbed_by_shield: u32,
        absorbed_by_mana: u32,
        hp_damage: u32,
    },
    Healed {
        source: Side,
        target: Side,
        amount: u32,
    },
    BuffApplied {
        side: Side,
        buff: Buff,
    },
    DebuffApplied {
        side: Side,
        debuff: Debuff,
    },
    DotTicked {
        side: Side,
        damage: u32,
    },
    StatusExpired {
        side: Side,
        status: String,
    },
    CardsDrawn {
        side: Side,
        cards: Vec<CardId>,
    },
    TurnEnded {
        side: Side,
        turn: u32,
    },
    MatchEnded {
        result: MatchResult,
    },
}

/// Receives committed engine events.
pub trait CombatObserver {
    fn on_event(&mut self, event: &CombatEvent);
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl CombatObserver for NoopObserver {
    fn on_event(&mut self, _event: &CombatEvent) {}
}

impl CombatObserver for Vec<CombatEvent> {
    fn on_event(&mut self, event: &CombatEvent) {
        self.push(event.clone());
    }
}
