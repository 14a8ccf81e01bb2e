//! Per-match lobby and battle bookkeeping.

use duel_core::{MatchState, Phase, Side};

use super::ClientId;

/// One seat at the table.
#[derive(Clone, Debug)]
pub struct Seat {
    pub client_id: ClientId,
    pub player_id: String,
    pub name: String,
    pub class_id: Option<String>,
    pub ready: bool,
}

impl Seat {
    pub fn new(client_id: ClientId, player_id: String, name: String) -> Self {
        Self {
            client_id,
            player_id,
            name,
            class_id: None,
            ready: false,
        }
    }
}

/// A paired match: lobby state until both sides are ready, then the
/// authoritative engine state.
#[derive(Clone, Debug)]
pub struct MatchSession {
    pub id: String,
    pub seed: u64,
    /// `Pick` and `Ready` are lobby phases; afterwards this mirrors the
    /// engine state's phase.
    pub phase: Phase,
    pub player1: Seat,
    pub player2: Seat,
    pub state: Option<MatchState>,
}

impl MatchSession {
    pub fn new(id: String, seed: u64, player1: Seat, player2: Seat) -> Self {
        Self {
            id,
            seed,
            phase: Phase::Pick,
            player1,
            player2,
            state: None,
        }
    }

    pub fn seat(&self, side: Side) -> &Seat {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub fn seat_mut(&mut self, side: Side) -> &mut Seat {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    pub fn side_of(&self, client_id: &str) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.seat(*side).client_id == client_id)
    }

    pub fn in_lobby(&self) -> bool {
        matches!(self.phase, Phase::Pick | Phase::Ready)
    }

    /// Both class ids once both seats have picked.
    pub fn picked_classes(&self) -> Option<(&str, &str)> {
        Some((
            self.player1.class_id.as_deref()?,
            self.player2.class_id.as_deref()?,
        ))
    }

    pub fn both_ready(&self) -> bool {
        self.player1.ready && self.player2.ready
    }

    pub fn is_finished(&self) -> bool {
        self.state.as_ref().is_some_and(MatchState::is_finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> MatchSession {
        MatchSession::new(
            "match_1".into(),
            7,
            Seat::new("client_1".into(), "a".into(), "Ann".into()),
            Seat::new("client_2".into(), "b".into(), "Bo".into()),
        )
    }

    #[test]
    fn finds_sides_by_client() {
        let session = session();
        assert_eq!(session.side_of("client_2"), Some(Side::Player2));
        assert_eq!(session.side_of("client_9"), None);
    }

    #[test]
    fn classes_are_reported_once_both_pick() {
        let mut session = session();
        session.seat_mut(Side::Player1).class_id = Some("mage".into());
        assert!(session.picked_classes().is_none());

        session.seat_mut(Side::Player2).class_id = Some("priest".into());
        assert_eq!(session.picked_classes(), Some(("mage", "priest")));
        assert!(session.in_lobby());
    }
}
