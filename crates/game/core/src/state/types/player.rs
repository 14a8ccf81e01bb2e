//! Per-side combatant state.

use std::collections::BTreeMap;

use super::common::{EntityId, Position, Side};
use super::status::{Buff, ControlFlags, Debuff};
use crate::battlefield::Occupant;
use crate::card::CardId;
use crate::deck::Deck;

/// Class-derived scaling applied to the effects a player casts.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Modifiers {
    pub damage_multiplier: f64,
    pub heal_multiplier: f64,
    pub shield_bonus: u32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            heal_multiplier: 1.0,
            shield_bonus: 0,
        }
    }
}

/// Hero state for one side of a match, exclusively owned by the match.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub side: Side,

    pub hp: u32,
    pub max_hp: u32,
    pub mana: u32,
    pub max_mana: u32,

    pub position: Option<Position>,
    pub deck: Option<Deck>,

    pub buffs: Vec<Buff>,
    pub debuffs: Vec<Debuff>,
    pub cooldowns: BTreeMap<CardId, u32>,
    pub modifiers: Modifiers,

    pub is_alive: bool,
    control: ControlFlags,
}

impl PlayerState {
    /// Creates a full-health, full-mana player with no modifiers applied yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        class_id: impl Into<String>,
        side: Side,
        max_hp: u32,
        max_mana: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_id: class_id.into(),
            side,
            hp: max_hp,
            max_hp,
            mana: max_mana,
            max_mana,
            position: None,
            deck: None,
            buffs: Vec::new(),
            debuffs: Vec::new(),
            cooldowns: BTreeMap::new(),
            modifiers: Modifiers::default(),
            is_alive: max_hp > 0,
            control: ControlFlags::empty(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_deck(mut self, deck: Deck) -> Self {
        self.deck = Some(deck);
        self
    }

    pub fn is_stunned(&self) -> bool {
        self.control.contains(ControlFlags::STUNNED)
    }

    pub fn is_frozen(&self) -> bool {
        self.control.contains(ControlFlags::FROZEN)
    }

    pub fn control(&self) -> ControlFlags {
        self.control
    }

    /// Recomputes crowd-control flags from the current debuff list.
    pub fn refresh_control(&mut self) {
        self.control = ControlFlags::from_debuffs(&self.debuffs);
    }

    /// Appends a debuff and refreshes the derived flags.
    pub fn push_debuff(&mut self, debuff: Debuff) {
        self.debuffs.push(debuff);
        self.refresh_control();
    }

    /// Remaining cooldown for `card_id` (zero when absent).
    pub fn cooldown(&self, card_id: &str) -> u32 {
        self.cooldowns.get(card_id).copied().unwrap_or(0)
    }

    /// Lowers HP, flooring at zero and marking death at exactly zero.
    ///
    /// Returns the HP actually removed.
    pub fn lose_hp(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        if self.hp == 0 {
            self.is_alive = false;
        }
        lost
    }

    /// Raises HP up to `max_hp`; returns the HP actually restored.
    pub fn restore_hp(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp += restored;
        restored
    }

    /// Raises mana up to `max_mana`.
    pub fn restore_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
    }
}

impl Occupant for PlayerState {
    fn entity_id(&self) -> EntityId {
        self.side.entity()
    }

    fn position(&self) -> Option<Position> {
        self.position
    }

    fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }
}
