//! Error types surfaced by the server API.
use thiserror::Error;
use tokio::sync::oneshot;

use duel_core::ExecuteError;

use crate::protocol::ProtocolError;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("orchestrator command channel closed")]
    CommandChannelClosed,

    #[error("orchestrator reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("orchestrator worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("server requires a content catalog before building")]
    MissingCatalog,

    #[error("failed to accept connection")]
    Accept(#[source] std::io::Error),

    #[error("connection i/o failed")]
    Io(#[from] std::io::Error),

    #[error("failed to encode outbound message")]
    Encode(#[from] serde_json::Error),
}

/// Why a client request was refused. The display text is what the client
/// receives in `ERROR`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Already queued")]
    AlreadyQueued,

    #[error("Already in a match")]
    AlreadyInMatch,

    #[error("Not in a match")]
    NotInMatch,

    #[error("Match not found")]
    MatchNotFound,

    #[error("Match not started")]
    MatchNotStarted,

    #[error("Match already started")]
    MatchAlreadyStarted,

    #[error("Invalid class")]
    InvalidClass,

    #[error("Pick a class first")]
    ClassNotPicked,

    #[error("Not your turn")]
    NotYourTurn,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("{}", .0.client_message())]
    Rejected(ExecuteError),
}
