//! Card effect resolution.

use crate::card::{CardEffect, EffectTarget};
use crate::events::CombatEvent;
use crate::state::{Buff, Debuff, MatchState, PlayerState, Side};

/// Where one damage instance went.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageBreakdown {
    pub shield: u32,
    pub mana: u32,
    /// Damage that reached HP (before flooring at zero).
    pub hp: u32,
}

/// Resolves one effect cast by `caster`.
///
/// Scaling uses the caster's modifiers; the recipient is picked by
/// [`CardEffect::target`].
pub fn apply_effect(
    state: &mut MatchState,
    caster: Side,
    effect: &CardEffect,
    events: &mut Vec<CombatEvent>,
) {
    let target = match effect.target() {
        EffectTarget::Caster => caster,
        EffectTarget::Opponent => caster.other(),
    };
    let modifiers = state.player(caster).modifiers;

    match *effect {
        CardEffect::Damage { amount, .. } => {
            let mut raw = f64::from(amount) * modifiers.damage_multiplier;
            let critical = state.rng.chance(state.config.crit_chance);
            if critical {
                raw *= state.config.crit_multiplier;
            }
            let amount = round_amount(raw);

            let breakdown = absorb_damage(state.player_mut(target), amount);
            if breakdown.hp > 0 {
                state.turns_without_damage = 0;
            }

            events.push(CombatEvent::DamageDealt {
                source: caster,
                target,
                amount,
                critical,
                absorbed_by_shield: breakdown.shield,
                absorbed_by_mana: breakdown.mana,
                hp_damage: breakdown.hp,
            });
        }
        CardEffect::Heal { amount, .. } => {
            let amount = round_amount(f64::from(amount) * modifiers.heal_multiplier);
            let restored = state.player_mut(target).restore_hp(amount);
            events.push(CombatEvent::Healed {
                source: caster,
                target,
                amount: restored,
            });
        }
        CardEffect::Shield {
            amount, duration, ..
        } => {
            let buff = Buff::Shield {
                absorb_amount: amount + modifiers.shield_bonus,
                duration,
            };
            add_buff(state.player_mut(target), buff, events);
        }
        CardEffect::ManaShield { duration, .. } => {
            add_buff(state.player_mut(target), Buff::ManaShield { duration }, events);
        }
        CardEffect::Stun { duration, .. } => {
            add_debuff(state.player_mut(target), Debuff::Stun { duration }, events);
        }
        CardEffect::Freeze { duration, .. } => {
            add_debuff(state.player_mut(target), Debuff::Freeze { duration }, events);
        }
        CardEffect::Dot {
            damage_per_tick,
            duration,
            ..
        } => {
            let debuff = Debuff::Dot {
                damage_per_tick,
                duration,
            };
            add_debuff(state.player_mut(target), debuff, events);
        }
    }
}

/// Runs `amount` through the target's shield buff, then its mana shield,
/// and applies the rest to HP.
///
/// Only the first shield buff absorbs; it is removed once depleted. A mana
/// shield converts damage into mana loss 1:1 until mana runs out.
pub fn absorb_damage(target: &mut PlayerState, amount: u32) -> DamageBreakdown {
    let mut remaining = amount;
    let mut breakdown = DamageBreakdown::default();

    let shield = target
        .buffs
        .iter_mut()
        .enumerate()
        .find_map(|(index, buff)| match buff {
            Buff::Shield { absorb_amount, .. } => Some((index, absorb_amount)),
            Buff::ManaShield { .. } => None,
        });
    if let Some((index, absorb_amount)) = shield {
        let absorbed = remaining.min(*absorb_amount);
        *absorb_amount -= absorbed;
        remaining -= absorbed;
        breakdown.shield = absorbed;
        if *absorb_amount == 0 {
            target.buffs.remove(index);
        }
    }

    let has_mana_shield = target
        .buffs
        .iter()
        .any(|buff| matches!(buff, Buff::ManaShield { .. }));
    if has_mana_shield && target.mana > 0 {
        let absorbed = remaining.min(target.mana);
        target.mana -= absorbed;
        remaining -= absorbed;
        breakdown.mana = absorbed;
    }

    target.lose_hp(remaining);
    breakdown.hp = remaining;
    breakdown
}

fn add_buff(target: &mut PlayerState, buff: Buff, events: &mut Vec<CombatEvent>) {
    events.push(CombatEvent::BuffApplied {
        side: target.side,
        buff: buff.clone(),
    });
    target.buffs.push(buff);
}

fn add_debuff(target: &mut PlayerState, debuff: Debuff, events: &mut Vec<CombatEvent>) {
    events.push(CombatEvent::DebuffApplied {
        side: target.side,
        debuff: debuff.clone(),
    });
    target.push_debuff(debuff);
}

fn round_amount(value: f64) -> u32 {
    // `as` saturates, and maps NaN to zero.
    value.round() as u32
}
