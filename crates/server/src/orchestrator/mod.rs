//! Matchmaking and match authority.
//!
//! [`Orchestrator`] owns every connected client, the FIFO queue and all
//! matches. It is synchronous: the worker feeds it one command at a time,
//! outbound messages go to per-client unbounded channels, and timers are
//! handed back to the worker as [`TimerRequest`]s instead of being spawned
//! here.
//!
//! Every state change goes through [`duel_core::apply_action`]. A rejected
//! action leaves the stored state untouched and only the sender hears about
//! it.

mod seed;
mod session;

pub use seed::{ClockSeed, FixedSeed, SeedSource};
pub use session::{MatchSession, Seat};

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use duel_content::ContentCatalog;
use duel_core::state::STATE_VERSION;
use duel_core::{
    Action, ExecuteError, GameError, MatchSnapshot, MatchState, Phase, Position, Side,
    apply_action, create_match, is_terminal,
};

use crate::config::MatchSettings;
use crate::errors::RequestError;
use crate::protocol::{ClientMessage, OpponentInfo, ServerMessage, parse_client_message};

pub type ClientId = String;

/// Per-client outbound queue, drained by the connection's writer task.
pub type Outbound = mpsc::UnboundedSender<ServerMessage>;

const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientStatus {
    Connected,
    Queued,
    InMatch(String),
}

struct ClientEntry {
    outbound: Outbound,
    player_id: Option<String>,
    player_name: String,
    status: ClientStatus,
}

/// Deferred work the worker delivers back after `delay`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Ends `side`'s turn if the match is still on that exact turn.
    TurnTimeout {
        match_id: String,
        turn: u32,
        side: Side,
    },
    /// Drops a finished match after the result grace window.
    DisposeMatch { match_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerRequest {
    pub delay: Duration,
    pub event: TimerEvent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrchestratorStats {
    pub clients: usize,
    pub queued: usize,
    pub matches: usize,
}

pub struct Orchestrator<S = ClockSeed> {
    catalog: Arc<ContentCatalog>,
    settings: MatchSettings,
    seeds: S,
    clients: HashMap<ClientId, ClientEntry>,
    queue: VecDeque<ClientId>,
    matches: HashMap<String, MatchSession>,
    next_client_id: u64,
    next_match_id: u64,
    timers: Vec<TimerRequest>,
}

impl Orchestrator<ClockSeed> {
    pub fn new(catalog: Arc<ContentCatalog>, settings: MatchSettings) -> Self {
        Self::with_seeds(catalog, settings, ClockSeed)
    }
}

impl<S: SeedSource> Orchestrator<S> {
    pub fn with_seeds(catalog: Arc<ContentCatalog>, settings: MatchSettings, seeds: S) -> Self {
        Self {
            catalog,
            settings,
            seeds,
            clients: HashMap::new(),
            queue: VecDeque::new(),
            matches: HashMap::new(),
            next_client_id: 0,
            next_match_id: 0,
            timers: Vec::new(),
        }
    }

    // ===== queries =====

    pub fn stats(&self) -> OrchestratorStats {
        OrchestratorStats {
            clients: self.clients.len(),
            queued: self.queue.len(),
            matches: self.matches.len(),
        }
    }

    pub fn session(&self, match_id: &str) -> Option<&MatchSession> {
        self.matches.get(match_id)
    }

    pub fn status(&self, client_id: &str) -> Option<&ClientStatus> {
        self.clients.get(client_id).map(|entry| &entry.status)
    }

    /// Timer requests accumulated since the last call.
    pub fn take_timers(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.timers)
    }

    // ===== connection lifecycle =====

    /// Registers a connection and greets it with `CONNECTED`.
    pub fn connect(&mut self, outbound: Outbound) -> ClientId {
        self.next_client_id += 1;
        let client_id = format!("client_{}", self.next_client_id);

        self.clients.insert(
            client_id.clone(),
            ClientEntry {
                outbound,
                player_id: None,
                player_name: DEFAULT_PLAYER_NAME.to_string(),
                status: ClientStatus::Connected,
            },
        );
        info!(target: "server::orchestrator", client = %client_id, "Client connected");

        deliver(
            &self.clients,
            &client_id,
            ServerMessage::Connected {
                client_id: client_id.clone(),
                version: STATE_VERSION.to_string(),
            },
        );
        client_id
    }

    /// Forgets a connection. A running match is surrendered on its behalf;
    /// a lobby is cancelled.
    pub fn disconnect(&mut self, client_id: &str) {
        let Some(entry) = self.clients.get(client_id) else {
            return;
        };
        let status = entry.status.clone();
        info!(target: "server::orchestrator", client = %client_id, "Client disconnected");

        self.queue.retain(|queued| queued != client_id);
        if let ClientStatus::InMatch(match_id) = status {
            self.abandon(&match_id, client_id);
        }
        self.clients.remove(client_id);
    }

    // ===== inbound messages =====

    /// Decodes one wire line and dispatches it.
    pub fn handle_line(&mut self, client_id: &str, line: &str) {
        match parse_client_message(line) {
            Ok(message) => self.handle_message(client_id, message),
            Err(error) => self.reject(client_id, error.into()),
        }
    }

    pub fn handle_message(&mut self, client_id: &str, message: ClientMessage) {
        if !self.clients.contains_key(client_id) {
            warn!(target: "server::orchestrator", client = %client_id, "Message from unknown client");
            return;
        }
        debug!(target: "server::orchestrator", client = %client_id, kind = message.kind(), "Message received");

        let outcome = match message {
            ClientMessage::Join {
                player_id,
                player_name,
            } => self.join(client_id, player_id, player_name),
            ClientMessage::PickClass { class_id } => self.pick_class(client_id, class_id),
            ClientMessage::Ready => self.ready(client_id),
            ClientMessage::PlayCard { card_id, targets } => {
                self.act(client_id, |side| play_card(side, card_id, targets))
            }
            ClientMessage::EndTurn => self.act(client_id, Action::end_turn),
            ClientMessage::Surrender => self.act(client_id, Action::surrender),
        };

        if let Err(error) = outcome {
            self.reject(client_id, error);
        }
    }

    pub fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::TurnTimeout {
                match_id,
                turn,
                side,
            } => {
                let expired = self
                    .matches
                    .get(&match_id)
                    .and_then(|session| session.state.as_ref())
                    .is_some_and(|state| {
                        !state.is_finished() && state.turn == turn && state.current_side == side
                    });
                if !expired {
                    return;
                }

                warn!(
                    target: "server::orchestrator",
                    match_id = %match_id,
                    side = %side,
                    turn,
                    "Turn timed out, ending it"
                );
                if let Err(error) = self.commit(&match_id, Action::end_turn(side)) {
                    error!(target: "server::orchestrator", match_id = %match_id, error = %error, "Forced end turn rejected");
                }
            }
            TimerEvent::DisposeMatch { match_id } => {
                if self.matches.remove(&match_id).is_some() {
                    info!(target: "server::orchestrator", match_id = %match_id, "Match disposed");
                }
            }
        }
    }

    // ===== matchmaking =====

    fn join(
        &mut self,
        client_id: &str,
        player_id: Option<String>,
        player_name: Option<String>,
    ) -> Result<(), RequestError> {
        let Some(entry) = self.clients.get_mut(client_id) else {
            return Ok(());
        };
        match entry.status {
            ClientStatus::Queued => return Err(RequestError::AlreadyQueued),
            ClientStatus::InMatch(_) => return Err(RequestError::AlreadyInMatch),
            ClientStatus::Connected => {}
        }

        entry.player_id = Some(player_id.unwrap_or_else(|| client_id.to_string()));
        entry.player_name = player_name.unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
        entry.status = ClientStatus::Queued;
        let name = entry.player_name.clone();

        self.queue.push_back(client_id.to_string());
        let position = self.queue.len();
        deliver(&self.clients, client_id, ServerMessage::Queued { position });
        info!(target: "server::orchestrator", client = %client_id, player = %name, waiting = position, "Player joined queue");

        self.try_matchmaking();
        Ok(())
    }

    /// Pairs queued clients two at a time in arrival order.
    fn try_matchmaking(&mut self) {
        while self.queue.len() >= 2 {
            let (Some(first), Some(second)) = (self.queue.pop_front(), self.queue.pop_front())
            else {
                break;
            };

            if !self.clients.contains_key(&first) || !self.clients.contains_key(&second) {
                for id in [second, first] {
                    if self.clients.contains_key(&id) {
                        self.queue.push_front(id);
                    }
                }
                continue;
            }

            self.open_lobby(first, second);
        }
    }

    fn open_lobby(&mut self, first: ClientId, second: ClientId) {
        self.next_match_id += 1;
        let match_id = format!("match_{}", self.next_match_id);
        let seed = self.seeds.next_seed();

        let player1 = self.seat_for(first);
        let player2 = self.seat_for(second);

        for seat in [&player1, &player2] {
            if let Some(entry) = self.clients.get_mut(&seat.client_id) {
                entry.status = ClientStatus::InMatch(match_id.clone());
            }
        }
        for (side, seat, opponent) in [
            (Side::Player1, &player1, &player2),
            (Side::Player2, &player2, &player1),
        ] {
            deliver(
                &self.clients,
                &seat.client_id,
                ServerMessage::Matched {
                    match_id: match_id.clone(),
                    side,
                    seed,
                    opponent: OpponentInfo {
                        name: opponent.name.clone(),
                    },
                },
            );
        }

        info!(
            target: "server::orchestrator",
            match_id = %match_id,
            seed,
            player1 = %player1.name,
            player2 = %player2.name,
            "Match created"
        );
        self.matches.insert(
            match_id.clone(),
            MatchSession::new(match_id, seed, player1, player2),
        );
    }

    fn seat_for(&self, client_id: ClientId) -> Seat {
        let (player_id, name) = match self.clients.get(&client_id) {
            Some(entry) => (
                entry
                    .player_id
                    .clone()
                    .unwrap_or_else(|| client_id.clone()),
                entry.player_name.clone(),
            ),
            None => (client_id.clone(), DEFAULT_PLAYER_NAME.to_string()),
        };
        Seat::new(client_id, player_id, name)
    }

    // ===== lobby =====

    fn pick_class(&mut self, client_id: &str, class_id: String) -> Result<(), RequestError> {
        let (match_id, side) = self.seat_of(client_id)?;
        if !self.catalog.has_class(&class_id) {
            return Err(RequestError::InvalidClass);
        }

        let Self {
            clients, matches, ..
        } = self;
        let session = matches
            .get_mut(&match_id)
            .ok_or(RequestError::MatchNotFound)?;
        if !session.in_lobby() {
            return Err(RequestError::MatchAlreadyStarted);
        }

        session.seat_mut(side).class_id = Some(class_id.clone());
        info!(target: "server::orchestrator", match_id = %match_id, side = %side, class = %class_id, "Class picked");
        deliver(clients, client_id, ServerMessage::ClassPicked { class_id });

        if let Some((player1, player2)) = session.picked_classes() {
            let message = ServerMessage::BothPicked {
                player1_class: player1.to_string(),
                player2_class: player2.to_string(),
            };
            session.phase = Phase::Ready;
            broadcast(clients, session, message);
        }
        Ok(())
    }

    fn ready(&mut self, client_id: &str) -> Result<(), RequestError> {
        let (match_id, side) = self.seat_of(client_id)?;
        let session = self
            .matches
            .get_mut(&match_id)
            .ok_or(RequestError::MatchNotFound)?;
        if !session.in_lobby() {
            return Err(RequestError::MatchAlreadyStarted);
        }

        let seat = session.seat_mut(side);
        if seat.class_id.is_none() {
            return Err(RequestError::ClassNotPicked);
        }
        seat.ready = true;
        info!(target: "server::orchestrator", match_id = %match_id, side = %side, "Player ready");

        if session.both_ready() {
            self.start_match(&match_id);
        }
        Ok(())
    }

    fn start_match(&mut self, match_id: &str) {
        let Some(built) = self
            .matches
            .get(match_id)
            .map(|session| self.build_state(session))
        else {
            return;
        };

        let state = match built {
            Ok(state) => state,
            Err(error) => {
                error!(target: "server::orchestrator", match_id = %match_id, error = %error, "Failed to start match");
                self.cancel_lobby(match_id, "Match could not be started");
                return;
            }
        };

        let (turn, first) = (state.turn, state.current_side);
        let Self {
            clients, matches, ..
        } = self;
        let Some(session) = matches.get_mut(match_id) else {
            return;
        };
        let snapshot = MatchSnapshot::from(&state);
        session.phase = state.phase;
        session.state = Some(state);
        broadcast(
            clients,
            session,
            ServerMessage::State {
                state: Box::new(snapshot),
            },
        );
        info!(target: "server::orchestrator", match_id = %match_id, first = %first, "Match started");

        self.schedule_turn_timeout(match_id, turn, first);
    }

    /// Creates the engine state and places both heroes on their spawn cells.
    fn build_state(&self, session: &MatchSession) -> Result<MatchState, RequestError> {
        let player_data = |seat: &Seat| {
            let class_id = seat
                .class_id
                .as_deref()
                .ok_or(RequestError::ClassNotPicked)?;
            self.catalog
                .player_data(class_id, seat.player_id.clone(), seat.name.clone())
                .ok_or(RequestError::InvalidClass)
        };

        let config = self.catalog.config();
        let mut state = create_match(
            config,
            session.seed,
            player_data(&session.player1)?,
            player_data(&session.player2)?,
        );
        state.match_id = Some(session.id.clone());

        let spawns = [
            (Side::Player1, config.battlefield.player1_spawn),
            (Side::Player2, config.battlefield.player2_spawn),
        ];
        for (side, (x, y)) in spawns {
            state = apply_action(&state, &Action::place_hero(side, x, y))
                .map_err(RequestError::Rejected)?;
        }
        Ok(state)
    }

    fn cancel_lobby(&mut self, match_id: &str, reason: &str) {
        let Some(session) = self.matches.remove(match_id) else {
            return;
        };
        for seat in [&session.player1, &session.player2] {
            if let Some(entry) = self.clients.get_mut(&seat.client_id) {
                entry.status = ClientStatus::Connected;
            }
            deliver(&self.clients, &seat.client_id, ServerMessage::error(reason));
        }
        info!(target: "server::orchestrator", match_id = %match_id, reason, "Lobby cancelled");
    }

    fn abandon(&mut self, match_id: &str, client_id: &str) {
        let Some(session) = self.matches.get(match_id) else {
            return;
        };
        let Some(side) = session.side_of(client_id) else {
            return;
        };

        if session.state.is_none() {
            self.cancel_lobby(match_id, "Opponent disconnected");
            return;
        }

        warn!(target: "server::orchestrator", match_id = %match_id, side = %side, "Player left a running match, surrendering");
        if let Err(error) = self.commit(match_id, Action::surrender(side)) {
            error!(target: "server::orchestrator", match_id = %match_id, error = %error, "Auto-surrender rejected");
        }
    }

    // ===== battle =====

    fn act(
        &mut self,
        client_id: &str,
        build: impl FnOnce(Side) -> Action,
    ) -> Result<(), RequestError> {
        let (match_id, side) = self.seat_of(client_id)?;
        let state = self
            .matches
            .get(&match_id)
            .and_then(|session| session.state.as_ref())
            .ok_or(RequestError::MatchNotStarted)?;

        let action = build(side);
        if action.requires_turn() && state.current_side != side {
            return Err(RequestError::NotYourTurn);
        }

        self.commit(&match_id, action)
            .map_err(RequestError::Rejected)
    }

    /// Applies `action` to the stored state, broadcasts the new snapshot and
    /// wraps up the match when it became terminal.
    fn commit(&mut self, match_id: &str, action: Action) -> Result<(), ExecuteError> {
        let Self {
            clients, matches, ..
        } = self;
        let Some(session) = matches.get_mut(match_id) else {
            return Ok(());
        };
        let Some(state) = session.state.as_ref() else {
            return Ok(());
        };

        let next = apply_action(state, &action)?;
        debug!(
            target: "server::orchestrator",
            match_id = %match_id,
            action = action.kind(),
            side = %action.side(),
            turn = next.turn,
            "Action committed"
        );

        let snapshot = MatchSnapshot::from(&next);
        let (turn, current, result) = (next.turn, next.current_side, is_terminal(&next));
        session.phase = next.phase;
        session.state = Some(next);
        broadcast(
            clients,
            session,
            ServerMessage::State {
                state: Box::new(snapshot),
            },
        );

        match result {
            Some(_) => self.finish_match(match_id),
            None if matches!(action, Action::EndTurn(_)) => {
                self.schedule_turn_timeout(match_id, turn, current)
            }
            None => {}
        }
        Ok(())
    }

    /// Sends `RESULT`, frees both players to queue again and schedules disposal.
    fn finish_match(&mut self, match_id: &str) {
        let Self {
            clients, matches, ..
        } = self;
        let Some(session) = matches.get(match_id) else {
            return;
        };
        let Some(result) = session.state.as_ref().and_then(|state| state.result) else {
            return;
        };

        broadcast(clients, session, ServerMessage::Outcome { result });
        for seat in [&session.player1, &session.player2] {
            if let Some(entry) = clients.get_mut(&seat.client_id)
                && matches!(&entry.status, ClientStatus::InMatch(id) if id == match_id)
            {
                entry.status = ClientStatus::Connected;
            }
        }
        info!(
            target: "server::orchestrator",
            match_id = %match_id,
            winner = %result.winner,
            reason = %result.reason,
            "Match ended"
        );

        self.timers.push(TimerRequest {
            delay: self.settings.result_grace,
            event: TimerEvent::DisposeMatch {
                match_id: match_id.to_string(),
            },
        });
    }

    fn schedule_turn_timeout(&mut self, match_id: &str, turn: u32, side: Side) {
        if let Some(delay) = self.settings.turn_timeout {
            self.timers.push(TimerRequest {
                delay,
                event: TimerEvent::TurnTimeout {
                    match_id: match_id.to_string(),
                    turn,
                    side,
                },
            });
        }
    }

    // ===== helpers =====

    fn seat_of(&self, client_id: &str) -> Result<(String, Side), RequestError> {
        let Some(ClientStatus::InMatch(match_id)) = self.status(client_id) else {
            return Err(RequestError::NotInMatch);
        };
        let side = self
            .matches
            .get(match_id)
            .and_then(|session| session.side_of(client_id))
            .ok_or(RequestError::MatchNotFound)?;
        Ok((match_id.clone(), side))
    }

    fn reject(&self, client_id: &str, error: RequestError) {
        match &error {
            RequestError::Rejected(inner) if inner.severity().is_internal() => {
                error!(
                    target: "server::orchestrator",
                    client = %client_id,
                    code = inner.error_code(),
                    error = %inner,
                    "Action failed"
                );
            }
            _ => {
                debug!(target: "server::orchestrator", client = %client_id, error = %error, "Request rejected");
            }
        }
        deliver(&self.clients, client_id, ServerMessage::error(error.to_string()));
    }
}

fn play_card(side: Side, card_id: String, targets: Vec<Position>) -> Action {
    Action::PlayCard(duel_core::PlayCardAction::new(side, card_id).with_targets(targets))
}

fn deliver(clients: &HashMap<ClientId, ClientEntry>, client_id: &str, message: ServerMessage) {
    let Some(entry) = clients.get(client_id) else {
        return;
    };
    let kind = message.kind();
    if entry.outbound.send(message).is_err() {
        debug!(target: "server::orchestrator", client = %client_id, kind, "Outbound channel closed");
    }
}

fn broadcast(
    clients: &HashMap<ClientId, ClientEntry>,
    session: &MatchSession,
    message: ServerMessage,
) {
    deliver(clients, &session.player1.client_id, message.clone());
    deliver(clients, &session.player2.client_id, message);
}
