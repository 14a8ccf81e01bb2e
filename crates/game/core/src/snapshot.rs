//! Client-facing projection of a match.
//!
//! Snapshots carry everything a client needs to render the duel and omit
//! engine-only fields such as the live RNG and the combat config.

use std::collections::BTreeMap;

use crate::battlefield::BattlefieldView;
use crate::card::CardId;
use crate::deck::DeckView;
use crate::state::{
    Buff, Debuff, MatchResult, MatchState, Phase, PlayerState, Position, Side,
};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MatchSnapshot {
    pub version: String,
    pub match_id: Option<String>,
    pub turn: u32,
    pub phase: Phase,
    pub current_side: Side,
    pub turns_without_damage: u32,
    pub player1: PlayerSnapshot,
    pub player2: PlayerSnapshot,
    pub battlefield: BattlefieldView,
    pub result: Option<MatchResult>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PlayerSnapshot {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub side: Side,
    pub hp: u32,
    pub max_hp: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub position: Option<Position>,
    pub buffs: Vec<Buff>,
    pub debuffs: Vec<Debuff>,
    pub cooldowns: BTreeMap<CardId, u32>,
    pub is_alive: bool,
    pub is_stunned: bool,
    pub is_frozen: bool,
    pub deck: Option<DeckView>,
}

impl From<&PlayerState> for PlayerSnapshot {
    fn from(player: &PlayerState) -> Self {
        Self {
            id: player.id.clone(),
            name: player.name.clone(),
            class_id: player.class_id.clone(),
            side: player.side,
            hp: player.hp,
            max_hp: player.max_hp,
            mana: player.mana,
            max_mana: player.max_mana,
            position: player.position,
            buffs: player.buffs.clone(),
            debuffs: player.debuffs.clone(),
            cooldowns: player.cooldowns.clone(),
            is_alive: player.is_alive,
            is_stunned: player.is_stunned(),
            is_frozen: player.is_frozen(),
            deck: player.deck.as_ref().map(|deck| deck.view()),
        }
    }
}

impl From<&MatchState> for MatchSnapshot {
    fn from(state: &MatchState) -> Self {
        Self {
            version: state.version.clone(),
            match_id: state.match_id.clone(),
            turn: state.turn,
            phase: state.phase,
            current_side: state.current_side,
            turns_without_damage: state.turns_without_damage,
            player1: PlayerSnapshot::from(&state.player1),
            player2: PlayerSnapshot::from(&state.player2),
            battlefield: state.battlefield.view(),
            result: state.result,
        }
    }
}

impl MatchSnapshot {
    pub fn player(&self, side: Side) -> &PlayerSnapshot {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::engine::{ClassStats, PlayerData, create_match};

    #[test]
    fn serializes_with_wire_field_names() {
        let player = PlayerData::new("p", "Pat", "priest", ClassStats::new(90, 120));
        let state = create_match(&CombatConfig::default(), 5, player.clone(), player);

        let json = serde_json::to_value(MatchSnapshot::from(&state)).unwrap();

        assert_eq!(json["phase"], "TURN");
        assert_eq!(json["player1"]["maxHp"], 90);
        assert_eq!(json["player2"]["classId"], "priest");
        assert_eq!(json["battlefield"]["width"], 4);
        assert!(json["result"].is_null());
        assert!(json.get("rng").is_none());
    }
}
