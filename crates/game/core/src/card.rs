//! Static card definitions.
//!
//! Cards are immutable data loaded from content files. A card is a cost, an
//! optional cooldown, an exhaust flag and an ordered list of effects that are
//! resolved one after another when the card is played.

/// Card identifier, unique within a catalog.
pub type CardId = String;

/// Who an effect lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EffectTarget {
    Caster,
    Opponent,
}

/// One effect descriptor on a card.
///
/// `target` is optional; see [`CardEffect::target`] for the default.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum CardEffect {
    Damage {
        amount: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EffectTarget>,
    },
    Heal {
        amount: u32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EffectTarget>,
    },
    Shield {
        amount: u32,
        duration: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EffectTarget>,
    },
    ManaShield {
        duration: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EffectTarget>,
    },
    Stun {
        duration: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EffectTarget>,
    },
    Freeze {
        duration: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EffectTarget>,
    },
    Dot {
        damage_per_tick: u32,
        duration: i32,
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<EffectTarget>,
    },
}

impl CardEffect {
    pub fn damage(amount: u32) -> Self {
        Self::Damage {
            amount,
            target: None,
        }
    }

    pub fn heal(amount: u32) -> Self {
        Self::Heal {
            amount,
            target: None,
        }
    }

    pub fn shield(amount: u32, duration: i32) -> Self {
        Self::Shield {
            amount,
            duration,
            target: None,
        }
    }

    pub fn mana_shield(duration: i32) -> Self {
        Self::ManaShield {
            duration,
            target: None,
        }
    }

    pub fn stun(duration: i32) -> Self {
        Self::Stun {
            duration,
            target: None,
        }
    }

    pub fn freeze(duration: i32) -> Self {
        Self::Freeze {
            duration,
            target: None,
        }
    }

    pub fn dot(damage_per_tick: u32, duration: i32) -> Self {
        Self::Dot {
            damage_per_tick,
            duration,
            target: None,
        }
    }

    /// Overrides the default recipient.
    pub fn targeting(mut self, recipient: EffectTarget) -> Self {
        match &mut self {
            Self::Damage { target, .. }
            | Self::Heal { target, .. }
            | Self::Shield { target, .. }
            | Self::ManaShield { target, .. }
            | Self::Stun { target, .. }
            | Self::Freeze { target, .. }
            | Self::Dot { target, .. } => *target = Some(recipient),
        }
        self
    }

    /// Resolved recipient: beneficial effects default to the caster,
    /// adverse effects to the opponent.
    pub fn target(&self) -> EffectTarget {
        match self {
            Self::Heal { target, .. }
            | Self::Shield { target, .. }
            | Self::ManaShield { target, .. } => target.unwrap_or(EffectTarget::Caster),
            Self::Damage { target, .. }
            | Self::Stun { target, .. }
            | Self::Freeze { target, .. }
            | Self::Dot { target, .. } => target.unwrap_or(EffectTarget::Opponent),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Damage { .. } => "damage",
            Self::Heal { .. } => "heal",
            Self::Shield { .. } => "shield",
            Self::ManaShield { .. } => "manaShield",
            Self::Stun { .. } => "stun",
            Self::Freeze { .. } => "freeze",
            Self::Dot { .. } => "dot",
        }
    }
}

/// Immutable card definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub id: CardId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub cost: u32,
    /// Turns the card stays unplayable after use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: Option<u32>,
    /// Exhausted cards leave the match instead of going to discard.
    #[cfg_attr(feature = "serde", serde(default))]
    pub exhaust: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effects: Vec<CardEffect>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, cost: u32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            cost,
            cooldown: None,
            exhaust: false,
            effects: Vec::new(),
        }
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown = Some(turns);
        self
    }

    pub fn exhausting(mut self) -> Self {
        self.exhaust = true;
        self
    }

    pub fn with_effect(mut self, effect: CardEffect) -> Self {
        self.effects.push(effect);
        self
    }
}
