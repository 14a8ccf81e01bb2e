/// Combat configuration constants and tunable parameters.
///
/// A copy travels inside every [`MatchState`](crate::MatchState) so the
/// reducer never consults global data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    pub battlefield: BattlefieldConfig,
    /// Mana restored to the acting player at the end of their turn.
    pub mana_regen_per_turn: u32,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    /// Consecutive damage-free turns that end the match in a draw.
    pub stalemate_turns: u32,
    pub max_hand_size: usize,
    /// Cards dealt to each player when the match is created.
    pub starting_hand: usize,
    /// Cards drawn by the side whose turn begins.
    pub cards_per_turn: usize,
    /// Move the acting player's hand to the discard pile on `END_TURN`.
    pub discard_hand_at_end_of_turn: bool,
}

/// Battlefield dimensions and hero spawn cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattlefieldConfig {
    pub width: u32,
    pub height: u32,
    pub player1_spawn: (i32, i32),
    pub player2_spawn: (i32, i32),
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MANA_REGEN: u32 = 10;
    pub const DEFAULT_CRIT_CHANCE: f64 = 0.25;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_STALEMATE_TURNS: u32 = 10;
    pub const DEFAULT_MAX_HAND_SIZE: usize = 10;
    pub const DEFAULT_STARTING_HAND: usize = 5;
    pub const DEFAULT_CARDS_PER_TURN: usize = 1;

    pub fn new() -> Self {
        Self {
            battlefield: BattlefieldConfig::default(),
            mana_regen_per_turn: Self::DEFAULT_MANA_REGEN,
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            stalemate_turns: Self::DEFAULT_STALEMATE_TURNS,
            max_hand_size: Self::DEFAULT_MAX_HAND_SIZE,
            starting_hand: Self::DEFAULT_STARTING_HAND,
            cards_per_turn: Self::DEFAULT_CARDS_PER_TURN,
            discard_hand_at_end_of_turn: false,
        }
    }

    pub fn with_battlefield(mut self, width: u32, height: u32) -> Self {
        self.battlefield = BattlefieldConfig::sized(width, height);
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl BattlefieldConfig {
    pub const DEFAULT_WIDTH: u32 = 4;
    pub const DEFAULT_HEIGHT: u32 = 3;

    /// Grid of the given size with heroes spawning on opposite edges of the middle row.
    pub fn sized(width: u32, height: u32) -> Self {
        let row = (height / 2) as i32;
        Self {
            width,
            height,
            player1_spawn: (0, row),
            player2_spawn: (width.saturating_sub(1) as i32, row),
        }
    }
}

impl Default for BattlefieldConfig {
    fn default() -> Self {
        Self::sized(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT)
    }
}
