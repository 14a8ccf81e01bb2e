//! Wire protocol: newline-delimited JSON objects with a `type` discriminator.
//!
//! Inbound lines are decoded into [`ClientMessage`] in two steps. The line is
//! first read as a generic JSON value so that a well-formed object with an
//! unrecognised `type` can be told apart from a malformed line.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use duel_core::{MatchResult, MatchSnapshot, Position, Side};

/// Messages a client may send.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ClientMessage {
    Join {
        #[serde(default)]
        player_id: Option<String>,
        #[serde(default)]
        player_name: Option<String>,
    },
    PickClass {
        class_id: String,
    },
    Ready,
    PlayCard {
        card_id: String,
        #[serde(default)]
        targets: Vec<Position>,
    },
    EndTurn,
    Surrender,
}

impl ClientMessage {
    /// Every `type` tag the server understands.
    pub const TYPES: [&'static str; 6] = [
        "JOIN",
        "PICK_CLASS",
        "READY",
        "PLAY_CARD",
        "END_TURN",
        "SURRENDER",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "JOIN",
            Self::PickClass { .. } => "PICK_CLASS",
            Self::Ready => "READY",
            Self::PlayCard { .. } => "PLAY_CARD",
            Self::EndTurn => "END_TURN",
            Self::Surrender => "SURRENDER",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentInfo {
    pub name: String,
}

/// Messages the server sends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ServerMessage {
    Connected {
        client_id: String,
        version: String,
    },
    Queued {
        position: usize,
    },
    Matched {
        match_id: String,
        side: Side,
        seed: u64,
        opponent: OpponentInfo,
    },
    ClassPicked {
        class_id: String,
    },
    BothPicked {
        player1_class: String,
        player2_class: String,
    },
    State {
        state: Box<MatchSnapshot>,
    },
    #[serde(rename = "RESULT")]
    Outcome {
        result: MatchResult,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "CONNECTED",
            Self::Queued { .. } => "QUEUED",
            Self::Matched { .. } => "MATCHED",
            Self::ClassPicked { .. } => "CLASS_PICKED",
            Self::BothPicked { .. } => "BOTH_PICKED",
            Self::State { .. } => "STATE",
            Self::Outcome { .. } => "RESULT",
            Self::Error { .. } => "ERROR",
        }
    }
}

/// Reasons an inbound line could not be turned into a [`ClientMessage`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Unknown message type")]
    UnknownType(Option<String>),

    #[error("Invalid message format")]
    InvalidFormat,
}

pub fn parse_client_message(line: &str) -> Result<ClientMessage, ProtocolError> {
    let value: Value = serde_json::from_str(line).map_err(|_| ProtocolError::InvalidFormat)?;
    if !value.is_object() {
        return Err(ProtocolError::InvalidFormat);
    }

    match value.get("type").and_then(Value::as_str) {
        Some(kind) if ClientMessage::TYPES.contains(&kind) => {}
        other => return Err(ProtocolError::UnknownType(other.map(str::to_string))),
    }

    serde_json::from_value(value).map_err(|_| ProtocolError::InvalidFormat)
}

pub fn encode_server_message(message: &ServerMessage) -> serde_json::Result<String> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}
