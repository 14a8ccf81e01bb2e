//! Timed modifiers attached to a player.
//!
//! Buffs are beneficial (shields), debuffs adverse (crowd control and
//! damage-over-time). Both are closed enums so every resolution site matches
//! exhaustively. Durations count down once per end-of-turn tick of the owner;
//! a modifier whose duration reaches zero is removed.

use bitflags::bitflags;

/// Beneficial modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum Buff {
    /// Absorbs incoming damage until `absorb_amount` is spent.
    Shield { absorb_amount: u32, duration: i32 },

    /// Converts incoming damage into mana loss, 1:1, while mana remains.
    ManaShield { duration: i32 },
}

/// Adverse modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum Debuff {
    /// Cannot play cards.
    Stun { duration: i32 },

    /// Cannot play cards.
    Freeze { duration: i32 },

    /// Loses `damage_per_tick` HP at each end-of-turn tick, ignoring shields.
    Dot { damage_per_tick: u32, duration: i32 },
}

impl Buff {
    pub fn duration(&self) -> i32 {
        match self {
            Buff::Shield { duration, .. } | Buff::ManaShield { duration } => *duration,
        }
    }

    fn duration_mut(&mut self) -> &mut i32 {
        match self {
            Buff::Shield { duration, .. } | Buff::ManaShield { duration } => duration,
        }
    }

    /// Decrements the remaining duration; returns true while still active.
    pub fn tick(&mut self) -> bool {
        let duration = self.duration_mut();
        *duration -= 1;
        *duration > 0
    }

    pub fn name(&self) -> &'static str {
        match self {
            Buff::Shield { .. } => "shield",
            Buff::ManaShield { .. } => "manaShield",
        }
    }
}

impl Debuff {
    pub fn duration(&self) -> i32 {
        match self {
            Debuff::Stun { duration }
            | Debuff::Freeze { duration }
            | Debuff::Dot { duration, .. } => *duration,
        }
    }

    fn duration_mut(&mut self) -> &mut i32 {
        match self {
            Debuff::Stun { duration }
            | Debuff::Freeze { duration }
            | Debuff::Dot { duration, .. } => duration,
        }
    }

    /// Decrements the remaining duration; returns true while still active.
    pub fn tick(&mut self) -> bool {
        let duration = self.duration_mut();
        *duration -= 1;
        *duration > 0
    }

    /// Control effect this debuff imposes.
    pub fn control(&self) -> ControlFlags {
        match self {
            Debuff::Stun { .. } => ControlFlags::STUNNED,
            Debuff::Freeze { .. } => ControlFlags::FROZEN,
            Debuff::Dot { .. } => ControlFlags::empty(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Debuff::Stun { .. } => "stun",
            Debuff::Freeze { .. } => "freeze",
            Debuff::Dot { .. } => "dot",
        }
    }
}

bitflags! {
    /// Crowd-control state derived from the debuff list.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ControlFlags: u8 {
        const STUNNED = 1 << 0;
        const FROZEN  = 1 << 1;
    }
}

impl ControlFlags {
    /// Folds the control effects of every debuff.
    pub fn from_debuffs<'a>(debuffs: impl IntoIterator<Item = &'a Debuff>) -> Self {
        debuffs
            .into_iter()
            .fold(Self::empty(), |flags, debuff| flags | debuff.control())
    }

    /// True when card play is blocked.
    pub fn is_incapacitated(self) -> bool {
        self.intersects(Self::STUNNED | Self::FROZEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_expires_at_zero() {
        let mut stun = Debuff::Stun { duration: 2 };
        assert!(stun.tick());
        assert!(!stun.tick());
        assert_eq!(stun.duration(), 0);

        let mut shield = Buff::Shield {
            absorb_amount: 10,
            duration: 1,
        };
        assert!(!shield.tick());
    }

    #[test]
    fn control_flags_follow_debuffs() {
        let debuffs = [
            Debuff::Dot {
                damage_per_tick: 5,
                duration: 3,
            },
            Debuff::Freeze { duration: 1 },
        ];
        let flags = ControlFlags::from_debuffs(&debuffs);
        assert!(flags.contains(ControlFlags::FROZEN));
        assert!(!flags.contains(ControlFlags::STUNNED));
        assert!(flags.is_incapacitated());
        assert!(!ControlFlags::from_debuffs(&debuffs[..1]).is_incapacitated());
    }
}
