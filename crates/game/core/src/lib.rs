//! Deterministic duel rules shared by the match server and its clients.
//!
//! `duel-core` defines the canonical combat rules (actions, engine, match
//! state) and exposes pure APIs. All state mutation flows through
//! [`engine::apply_action`], which returns a fresh copy of the state or a
//! typed error while leaving the input untouched.
pub mod action;
pub mod battlefield;
pub mod card;
pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod events;
pub mod rng;
pub mod snapshot;
pub mod state;

pub use action::{
    Action, ActionError, ActionTransition, EndTurnAction, PlaceHeroAction, PlayCardAction,
    SurrenderAction, legal_actions,
};
pub use battlefield::{Battlefield, BattlefieldView, Occupant, PlacedEntity, PlacementError};
pub use card::{Card, CardEffect, CardId, EffectTarget};
pub use config::{BattlefieldConfig, CombatConfig};
pub use deck::{Deck, DeckView};
pub use engine::{
    ClassStats, ExecuteError, PlayerData, TransitionPhase, TransitionPhaseError, apply_action,
    apply_action_with, create_match, is_terminal,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{CombatEvent, CombatObserver, NoopObserver};
pub use rng::{CombatRng, RngState};
pub use snapshot::{MatchSnapshot, PlayerSnapshot};
pub use state::{
    Buff, ControlFlags, Debuff, EntityId, MatchResult, MatchState, Modifiers, Phase, PlayerState,
    Position, ResultReason, Side, Winner,
};
