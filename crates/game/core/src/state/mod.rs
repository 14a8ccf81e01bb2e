//! Authoritative match state representation.
//!
//! This module owns the data structures describing one duel: the two
//! players, the battlefield, turn bookkeeping and the final result. The
//! server clones or queries this state but mutates it exclusively through
//! the engine.
pub mod types;

pub use types::{
    Buff, ControlFlags, Debuff, EntityId, Modifiers, PlayerState, Position, Side,
};

use crate::battlefield::Battlefield;
use crate::config::CombatConfig;
use crate::rng::CombatRng;

/// Version tag carried by every state and snapshot.
pub const STATE_VERSION: &str = "1.0.0";

/// Match lifecycle phase; governs which actions are legal.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Phase {
    /// Sides are choosing classes.
    #[default]
    Pick,
    /// Both classes chosen, waiting for both sides to confirm.
    Ready,
    /// Battle in progress.
    Turn,
    /// Terminal.
    Result,
}

/// Outcome of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Winner {
    Player1,
    Player2,
    Draw,
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::Player1 => Winner::Player1,
            Side::Player2 => Winner::Player2,
        }
    }
}

/// Why the match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResultReason {
    Death,
    Surrender,
    Stalemate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    pub winner: Winner,
    pub reason: ResultReason,
}

impl MatchResult {
    pub const fn new(winner: Winner, reason: ResultReason) -> Self {
        Self { winner, reason }
    }
}

/// Canonical snapshot of one deterministic duel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchState {
    pub version: String,
    /// Label assigned by the orchestrator; not consulted by the rules.
    pub match_id: Option<String>,

    /// RNG seed; fixed for the lifetime of the match.
    pub seed: u64,
    /// Live generator. Cloned with the state so copies resume the same stream.
    pub rng: CombatRng,
    pub config: CombatConfig,

    /// Completed turns.
    pub turn: u32,
    pub phase: Phase,
    pub current_side: Side,
    pub turns_without_damage: u32,

    pub battlefield: Battlefield,
    pub player1: PlayerState,
    pub player2: PlayerState,

    /// Set once; never modified afterwards.
    pub result: Option<MatchResult>,
}

impl MatchState {
    pub fn player(&self, side: Side) -> &PlayerState {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub fn player_mut(&mut self, side: Side) -> &mut PlayerState {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    /// Returns `(side, other)` as disjoint mutable borrows.
    pub fn players_mut(&mut self, side: Side) -> (&mut PlayerState, &mut PlayerState) {
        match side {
            Side::Player1 => (&mut self.player1, &mut self.player2),
            Side::Player2 => (&mut self.player2, &mut self.player1),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Records the terminal result. Has no effect once a result exists.
    pub(crate) fn finish(&mut self, result: MatchResult) -> bool {
        if self.result.is_some() {
            return false;
        }
        self.result = Some(result);
        self.phase = Phase::Result;
        true
    }

    /// SHA-256 over the canonical bincode encoding of the full state.
    ///
    /// Two states that replay the same actions from the same seed produce the
    /// same digest. Fails only if the state cannot be encoded.
    #[cfg(feature = "serde")]
    pub fn digest(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let encoded = bincode::serialize(self)?;
        Ok(Sha256::digest(&encoded).into())
    }
}
