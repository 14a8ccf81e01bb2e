//! Match creation and the action execution pipeline.
//!
//! [`apply_action`] is the only way a [`MatchState`] changes. It clones the
//! input, drives the action through its transition on the clone and returns
//! the clone. On error the clone is dropped, so the caller's state is never
//! observed half-applied. Events recorded while the transition runs are
//! handed to the observer only after the action commits.

mod errors;
mod transition;
pub(crate) mod turns;

pub use errors::{ExecuteError, TransitionPhase, TransitionPhaseError};

use crate::action::Action;
use crate::battlefield::Battlefield;
use crate::card::Card;
use crate::config::CombatConfig;
use crate::deck::Deck;
use crate::events::{CombatObserver, NoopObserver};
use crate::rng::CombatRng;
use crate::state::{
    MatchResult, MatchState, Modifiers, Phase, PlayerState, STATE_VERSION, Side,
};

/// Base numbers a class contributes to a player.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassStats {
    pub max_hp: u32,
    pub max_mana: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Modifiers,
}

impl ClassStats {
    pub fn new(max_hp: u32, max_mana: u32) -> Self {
        Self {
            max_hp,
            max_mana,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Everything the engine needs to seat one player.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerData {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub stats: ClassStats,
    /// Deck list; an empty list leaves the player without a deck.
    pub cards: Vec<Card>,
}

impl PlayerData {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        class_id: impl Into<String>,
        stats: ClassStats,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            class_id: class_id.into(),
            stats,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.cards = cards.into_iter().collect();
        self
    }

    fn into_player(self, side: Side, config: &CombatConfig) -> PlayerState {
        let player = PlayerState::new(
            self.id,
            self.name,
            self.class_id,
            side,
            self.stats.max_hp,
            self.stats.max_mana,
        )
        .with_modifiers(self.stats.modifiers);

        if self.cards.is_empty() {
            player
        } else {
            player.with_deck(Deck::new(self.cards, config.max_hand_size))
        }
    }
}

/// Builds a fresh match in the [`Phase::Turn`] phase.
///
/// The starting side is drawn from the seeded RNG. Each deck is then
/// shuffled and dealt `config.starting_hand` cards, player1 first.
pub fn create_match(
    config: &CombatConfig,
    seed: u64,
    player1: PlayerData,
    player2: PlayerData,
) -> MatchState {
    let mut rng = CombatRng::new(seed);
    let current_side = if rng.chance(0.5) {
        Side::Player1
    } else {
        Side::Player2
    };

    let battlefield = Battlefield::new(config.battlefield.width, config.battlefield.height);
    let mut player1 = player1.into_player(Side::Player1, config);
    let mut player2 = player2.into_player(Side::Player2, config);

    for player in [&mut player1, &mut player2] {
        if let Some(deck) = player.deck.as_mut() {
            deck.shuffle(&mut rng);
            deck.draw(config.starting_hand, &mut rng);
        }
    }

    MatchState {
        version: STATE_VERSION.to_string(),
        match_id: None,
        seed,
        rng,
        config: config.clone(),
        turn: 0,
        phase: Phase::Turn,
        current_side,
        turns_without_damage: 0,
        battlefield,
        player1,
        player2,
        result: None,
    }
}

/// Applies `action` to a copy of `state` and returns the copy.
pub fn apply_action(state: &MatchState, action: &Action) -> Result<MatchState, ExecuteError> {
    apply_action_with(state, action, &mut NoopObserver)
}

/// [`apply_action`] that reports committed events to `observer`.
pub fn apply_action_with<O>(
    state: &MatchState,
    action: &Action,
    observer: &mut O,
) -> Result<MatchState, ExecuteError>
where
    O: CombatObserver + ?Sized,
{
    validate_actor(state, action)?;

    let mut next = state.clone();
    let mut events = Vec::new();
    transition::execute_transition(action, &mut next, &mut events)?;

    for event in &events {
        observer.on_event(event);
    }
    Ok(next)
}

/// The result once the match has ended.
pub fn is_terminal(state: &MatchState) -> Option<MatchResult> {
    state.result
}

/// Rejects any action after the result is set, and turn-bound actions from
/// the side that is not on turn.
fn validate_actor(state: &MatchState, action: &Action) -> Result<(), ExecuteError> {
    if let Some(result) = state.result {
        return Err(ExecuteError::MatchFinished { result });
    }

    let side = action.side();
    if action.requires_turn() && side != state.current_side {
        return Err(ExecuteError::NotYourTurn {
            side,
            current: state.current_side,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionError, PlayCardAction, legal_actions};
    use crate::card::CardEffect;
    use crate::events::CombatEvent;
    use crate::state::{Buff, Debuff, Position, ResultReason, Winner};

    fn cards() -> Vec<Card> {
        vec![
            Card::new("strike", 10).with_effect(CardEffect::damage(20)),
            Card::new("mend", 10).with_effect(CardEffect::heal(15)),
            Card::new("bulwark", 20)
                .with_cooldown(2)
                .with_effect(CardEffect::shield(30, 2)),
            Card::new("fireball", 60).with_effect(CardEffect::damage(40)),
        ]
    }

    fn config() -> CombatConfig {
        CombatConfig {
            crit_chance: 0.0,
            ..CombatConfig::default()
        }
    }

    fn player(id: &str) -> PlayerData {
        PlayerData::new(id, id, "warrior", ClassStats::new(100, 50)).with_cards(cards())
    }

    fn new_match(seed: u64) -> MatchState {
        create_match(&config(), seed, player("alice"), player("bob"))
    }

    fn play(state: &MatchState, card_id: &str) -> Result<MatchState, ExecuteError> {
        apply_action(state, &Action::play_card(state.current_side, card_id))
    }

    fn end_turn(state: &MatchState) -> MatchState {
        apply_action(state, &Action::end_turn(state.current_side)).unwrap()
    }

    #[test]
    fn create_match_is_deterministic() {
        let first = new_match(42);
        let second = new_match(42);

        assert_eq!(first, second);
        assert_eq!(first.phase, Phase::Turn);
        assert_eq!(first.turn, 0);
        assert!(first.result.is_none());
        assert_eq!(first.battlefield.width(), 4);
        assert_eq!(first.battlefield.height(), 3);
        for side in Side::BOTH {
            let deck = first.player(side).deck.as_ref().unwrap();
            assert_eq!(deck.hand().len(), 4);
            assert_eq!(deck.total_cards(), 4);
        }
    }

    #[test]
    fn players_without_cards_have_no_deck() {
        let bare = PlayerData::new("p", "p", "mage", ClassStats::new(80, 100));
        let state = create_match(&config(), 7, bare.clone(), bare);
        assert!(state.player1.deck.is_none());
        assert_eq!(state.player1.hp, 80);
        assert_eq!(state.player2.mana, 100);
    }

    #[test]
    fn illegal_action_leaves_state_unchanged() {
        let state = new_match(1);
        let before = state.clone();

        let error = play(&state, "missing").unwrap_err();

        assert_eq!(error.phase(), Some(TransitionPhase::PreValidate));
        assert_eq!(
            error.action_error(),
            Some(&ActionError::CardNotInHand {
                card_id: "missing".into()
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn play_card_spends_mana_and_discards() {
        let state = new_match(3);
        let side = state.current_side;

        let next = play(&state, "strike").unwrap();

        let caster = next.player(side);
        assert_eq!(caster.mana, 40);
        let deck = caster.deck.as_ref().unwrap();
        assert!(!deck.has_card("strike"));
        assert_eq!(deck.discard_pile()[0].id, "strike");
        assert_eq!(next.player(side.other()).hp, 80);
        assert_eq!(next.turns_without_damage, 0);
    }

    #[test]
    fn play_card_validates_mana_before_spending() {
        let state = new_match(3);
        let side = state.current_side;

        let error = play(&state, "fireball").unwrap_err();

        assert_eq!(
            error.action_error(),
            Some(&ActionError::InsufficientMana {
                required: 60,
                available: 50
            })
        );
        assert_eq!(state.player(side).mana, 50);
    }

    #[test]
    fn cooldown_blocks_replay() {
        let state = new_match(5);
        let side = state.current_side;

        let mut next = play(&state, "bulwark").unwrap();
        assert_eq!(next.player(side).cooldown("bulwark"), 2);
        assert_eq!(next.player(side).buffs.len(), 1);

        let deck = next.player_mut(side).deck.as_mut().unwrap();
        deck.add_to_hand(Card::new("bulwark", 20)).unwrap();

        let error = play(&next, "bulwark").unwrap_err();
        assert_eq!(
            error.action_error(),
            Some(&ActionError::OnCooldown {
                card_id: "bulwark".into(),
                remaining: 2
            })
        );
    }

    #[test]
    fn cooldowns_tick_down_on_own_end_turn() {
        let state = new_match(5);
        let side = state.current_side;
        let next = play(&state, "bulwark").unwrap();

        let next = end_turn(&next);
        assert_eq!(next.player(side).cooldown("bulwark"), 1);
        let next = end_turn(&next);
        assert_eq!(next.player(side).cooldown("bulwark"), 1);
        let next = end_turn(&next);
        assert_eq!(next.player(side).cooldown("bulwark"), 0);
    }

    #[test]
    fn end_turn_regenerates_and_flips_side() {
        let state = new_match(9);
        let side = state.current_side;
        let next = play(&state, "strike").unwrap();
        assert_eq!(next.player(side).mana, 40);

        let next = end_turn(&next);

        assert_eq!(next.player(side).mana, 50);
        assert_eq!(next.current_side, side.other());
        assert_eq!(next.turn, 1);
        assert_eq!(next.turns_without_damage, 1);
    }

    #[test]
    fn out_of_turn_actions_are_rejected() {
        let state = new_match(11);
        let idle = state.current_side.other();

        let error = apply_action(&state, &Action::end_turn(idle)).unwrap_err();
        assert!(matches!(error, ExecuteError::NotYourTurn { .. }));
        assert_eq!(error.client_message(), "Not your turn");

        let error = apply_action(&state, &Action::play_card(idle, "strike")).unwrap_err();
        assert!(matches!(error, ExecuteError::NotYourTurn { .. }));
    }

    #[test]
    fn surrender_is_legal_off_turn_and_final() {
        let state = new_match(13);
        let idle = state.current_side.other();

        let next = apply_action(&state, &Action::surrender(idle)).unwrap();

        let result = is_terminal(&next).unwrap();
        assert_eq!(result.winner, Winner::from(idle.other()));
        assert_eq!(result.reason, ResultReason::Surrender);
        assert_eq!(next.phase, Phase::Result);

        let error = apply_action(&next, &Action::surrender(idle.other())).unwrap_err();
        assert_eq!(error, ExecuteError::MatchFinished { result });
        assert!(legal_actions(&next, next.current_side).is_empty());
    }

    #[test]
    fn stalemate_after_ten_quiet_turns() {
        let mut state = new_match(17);
        for _ in 0..9 {
            state = end_turn(&state);
            assert!(state.result.is_none());
        }

        state = end_turn(&state);

        assert_eq!(state.turns_without_damage, 10);
        assert_eq!(
            state.result,
            Some(MatchResult::new(Winner::Draw, ResultReason::Stalemate))
        );
        assert_eq!(state.phase, Phase::Result);
    }

    #[test]
    fn damage_resets_stalemate_counter() {
        let mut state = new_match(19);
        for _ in 0..6 {
            state = end_turn(&state);
        }
        assert_eq!(state.turns_without_damage, 6);

        state = play(&state, "strike").unwrap();
        assert_eq!(state.turns_without_damage, 0);

        for _ in 0..9 {
            state = end_turn(&state);
        }
        assert!(state.result.is_none());
    }

    #[test]
    fn dot_damage_resets_stalemate_counter() {
        let mut state = new_match(29);
        for _ in 0..6 {
            state = end_turn(&state);
        }
        assert_eq!(state.turns_without_damage, 6);

        let side = state.current_side;
        state.player_mut(side).push_debuff(Debuff::Dot {
            damage_per_tick: 10,
            duration: 1,
        });
        let state = end_turn(&state);

        assert_eq!(state.player(side).hp, 90);
        assert_eq!(state.turns_without_damage, 1);
        assert!(state.result.is_none());
    }

    #[test]
    fn played_damage_drains_shield_then_mana_then_hp() {
        let mut state = new_match(31);
        let caster = state.current_side;
        let victim = caster.other();
        {
            let deck = state.player_mut(caster).deck.as_mut().unwrap();
            deck.add_to_hand(Card::new("smash", 0).with_effect(CardEffect::damage(100)))
                .unwrap();
            deck.add_to_hand(Card::new("crush", 0).with_effect(CardEffect::damage(150)))
                .unwrap();
        }
        {
            let target = state.player_mut(victim);
            target.mana = 40;
            target.buffs.push(Buff::Shield {
                absorb_amount: 150,
                duration: 3,
            });
            target.buffs.push(Buff::ManaShield { duration: 3 });
        }

        let state = play(&state, "smash").unwrap();
        let target = state.player(victim);
        assert_eq!(
            target.buffs[0],
            Buff::Shield {
                absorb_amount: 50,
                duration: 3
            }
        );
        assert_eq!(target.hp, 100);
        assert_eq!(target.mana, 40);

        let state = play(&state, "crush").unwrap();
        let target = state.player(victim);
        assert_eq!(target.buffs, vec![Buff::ManaShield { duration: 3 }]);
        assert_eq!(target.mana, 0);
        assert_eq!(target.hp, 40);
        assert!(target.is_alive);
        assert_eq!(state.turns_without_damage, 0);
    }

    #[test]
    fn lethal_dot_ends_match_on_owner_tick() {
        let mut state = new_match(23);
        let victim = state.current_side.other();
        {
            let target = state.player_mut(victim);
            target.hp = 40;
            target.push_debuff(Debuff::Dot {
                damage_per_tick: 50,
                duration: 1,
            });
        }

        let state = end_turn(&state);
        assert!(state.result.is_none());
        let state = end_turn(&state);

        let target = state.player(victim);
        assert_eq!(target.hp, 0);
        assert!(!target.is_alive);
        assert!(target.debuffs.is_empty());
        assert_eq!(
            state.result,
            Some(MatchResult::new(
                Winner::from(victim.other()),
                ResultReason::Death
            ))
        );
    }

    #[test]
    fn incapacitated_side_can_only_pass() {
        let mut state = new_match(29);
        let side = state.current_side;
        state.player_mut(side).push_debuff(Debuff::Stun { duration: 1 });

        let actions = legal_actions(&state, side);
        assert_eq!(
            actions,
            vec![Action::surrender(side), Action::end_turn(side)]
        );

        let error = play(&state, "strike").unwrap_err();
        assert_eq!(
            error.action_error(),
            Some(&ActionError::Incapacitated { side })
        );
    }

    #[test]
    fn legal_actions_offer_affordable_cards() {
        let state = new_match(31);
        let side = state.current_side;

        let actions = legal_actions(&state, side);

        let playable: Vec<&str> = actions
            .iter()
            .filter_map(|action| match action {
                Action::PlayCard(play) => Some(play.card_id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(playable.len(), 3);
        assert!(!playable.contains(&"fireball"));
        assert!(legal_actions(&state, side.other()).is_empty());
    }

    #[test]
    fn off_grid_targets_are_rejected() {
        let state = new_match(37);
        let action = Action::PlayCard(
            PlayCardAction::new(state.current_side, "strike")
                .with_targets([Position::new(9, 9)]),
        );

        let error = apply_action(&state, &action).unwrap_err();

        assert_eq!(
            error.action_error(),
            Some(&ActionError::InvalidTarget {
                position: Position::new(9, 9)
            })
        );
    }

    #[test]
    fn place_hero_keeps_grid_in_sync() {
        let state = new_match(41);

        let next = apply_action(&state, &Action::place_hero(Side::Player1, 0, 1)).unwrap();
        assert_eq!(next.player1.position, Some(Position::new(0, 1)));
        assert_eq!(
            next.battlefield.entity_at(Position::new(0, 1)),
            Some(Side::Player1.entity())
        );

        let occupied = apply_action(&next, &Action::place_hero(Side::Player2, 0, 1));
        assert!(occupied.is_err());
        let outside = apply_action(&next, &Action::place_hero(Side::Player2, 4, 0));
        assert!(outside.is_err());

        let moved = apply_action(&next, &Action::place_hero(Side::Player1, 1, 1)).unwrap();
        assert!(moved.battlefield.is_empty(Position::new(0, 1)));
        assert_eq!(moved.player1.position, Some(Position::new(1, 1)));
    }

    #[test]
    fn incoming_side_draws_each_turn() {
        let player = |id: &str| {
            let deck = (0..8).map(|i| Card::new(format!("c{i}"), 1));
            PlayerData::new(id, id, "mage", ClassStats::new(100, 50)).with_cards(deck)
        };
        let config = CombatConfig {
            starting_hand: 3,
            ..config()
        };
        let state = create_match(&config, 43, player("a"), player("b"));
        let incoming = state.current_side.other();

        let next = end_turn(&state);

        let hand = next.player(incoming).deck.as_ref().unwrap().hand().len();
        assert_eq!(hand, 4);
    }

    #[test]
    fn events_reach_observer_only_on_commit() {
        let state = new_match(47);
        let side = state.current_side;
        let mut events: Vec<CombatEvent> = Vec::new();

        let _ = apply_action_with(&state, &Action::play_card(side, "missing"), &mut events);
        assert!(events.is_empty());

        apply_action_with(&state, &Action::play_card(side, "strike"), &mut events).unwrap();
        assert!(matches!(events[0], CombatEvent::CardPlayed { .. }));
        assert!(events.iter().any(|event| matches!(
            event,
            CombatEvent::DamageDealt { hp_damage: 20, critical: false, .. }
        )));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn replays_share_a_digest() {
        let replay = |seed| {
            let state = new_match(seed);
            let state = play(&state, "strike").unwrap();
            end_turn(&state)
        };

        let digest = replay(53).digest().unwrap();
        assert_eq!(hex::encode(digest).len(), 64);
        assert_eq!(digest, replay(53).digest().unwrap());
        assert_ne!(digest, replay(59).digest().unwrap());
    }
}
