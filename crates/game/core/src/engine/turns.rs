//! End-of-turn bookkeeping and terminal detection.

use crate::events::CombatEvent;
use crate::state::{Debuff, MatchResult, MatchState, PlayerState, ResultReason, Winner};

/// Runs one end-of-turn tick over `player`'s timed modifiers.
///
/// Damage-over-time debuffs hit HP directly (shields do not apply), then
/// every buff and debuff loses one turn of duration and expired ones are
/// dropped. Control flags are recomputed from the surviving debuffs.
/// Returns the total DoT damage dealt.
pub(crate) fn tick_statuses(player: &mut PlayerState, events: &mut Vec<CombatEvent>) -> u32 {
    let side = player.side;
    let mut dot_damage = 0;

    let mut debuffs = std::mem::take(&mut player.debuffs);
    for debuff in &debuffs {
        if let Debuff::Dot {
            damage_per_tick, ..
        } = *debuff
        {
            player.lose_hp(damage_per_tick);
            dot_damage += damage_per_tick;
            events.push(CombatEvent::DotTicked {
                side,
                damage: damage_per_tick,
            });
        }
    }

    debuffs.retain_mut(|debuff| {
        let active = debuff.tick();
        if !active {
            events.push(CombatEvent::StatusExpired {
                side,
                status: debuff.name().to_string(),
            });
        }
        active
    });
    player.debuffs = debuffs;
    player.refresh_control();

    player.buffs.retain_mut(|buff| {
        let active = buff.tick();
        if !active {
            events.push(CombatEvent::StatusExpired {
                side,
                status: buff.name().to_string(),
            });
        }
        active
    });

    dot_damage
}

/// First matching terminal condition: player1 dead, player2 dead, stalemate.
pub(crate) fn check_game_over(state: &MatchState) -> Option<MatchResult> {
    if !state.player1.is_alive {
        Some(MatchResult::new(Winner::Player2, ResultReason::Death))
    } else if !state.player2.is_alive {
        Some(MatchResult::new(Winner::Player1, ResultReason::Death))
    } else if state.turns_without_damage >= state.config.stalemate_turns {
        Some(MatchResult::new(Winner::Draw, ResultReason::Stalemate))
    } else {
        None
    }
}
