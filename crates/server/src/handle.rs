//! Cloneable façade for issuing commands to the orchestrator worker.
use tokio::sync::{mpsc, oneshot};

use crate::errors::{Result, ServerError};
use crate::orchestrator::{ClientId, OrchestratorStats, Outbound};
use crate::worker::Command;

/// Handle shared by every connection task.
#[derive(Clone)]
pub struct ServerHandle {
    command_tx: mpsc::Sender<Command>,
}

impl ServerHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    /// Register a connection whose outbound messages go to `outbound`.
    pub async fn connect(&self, outbound: Outbound) -> Result<ClientId> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Connect {
                outbound,
                reply: reply_tx,
            })
            .await
            .map_err(|_| ServerError::CommandChannelClosed)?;

        reply_rx.await.map_err(ServerError::ReplyChannelClosed)
    }

    /// Forward one inbound line.
    pub async fn submit(&self, client_id: ClientId, line: String) -> Result<()> {
        self.command_tx
            .send(Command::Message { client_id, line })
            .await
            .map_err(|_| ServerError::CommandChannelClosed)
    }

    pub async fn disconnect(&self, client_id: ClientId) -> Result<()> {
        self.command_tx
            .send(Command::Disconnect { client_id })
            .await
            .map_err(|_| ServerError::CommandChannelClosed)
    }

    /// Query client, queue and match counts.
    pub async fn stats(&self) -> Result<OrchestratorStats> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryStats { reply: reply_tx })
            .await
            .map_err(|_| ServerError::CommandChannelClosed)?;

        reply_rx.await.map_err(ServerError::ReplyChannelClosed)
    }
}
