//! Orchestrator worker that owns all server state.
//!
//! Receives commands from [`ServerHandle`](crate::ServerHandle) and timer
//! callbacks, applies them to the [`Orchestrator`] one at a time, and spawns
//! the sleeps for any timers the orchestrator requested.

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::orchestrator::{
    ClientId, Orchestrator, OrchestratorStats, Outbound, SeedSource, TimerEvent,
};

/// Commands that can be sent to the orchestrator worker.
pub enum Command {
    /// Register a connection; replies with its client id.
    Connect {
        outbound: Outbound,
        reply: oneshot::Sender<ClientId>,
    },
    /// One raw inbound line from a client.
    Message { client_id: ClientId, line: String },
    /// The connection is gone.
    Disconnect { client_id: ClientId },
    /// Query queue and match counts.
    QueryStats {
        reply: oneshot::Sender<OrchestratorStats>,
    },
}

/// Background task that processes orchestrator commands.
pub struct OrchestratorWorker<S> {
    orchestrator: Orchestrator<S>,
    command_rx: mpsc::Receiver<Command>,
    timer_tx: mpsc::UnboundedSender<TimerEvent>,
    timer_rx: mpsc::UnboundedReceiver<TimerEvent>,
}

impl<S: SeedSource> OrchestratorWorker<S> {
    pub fn new(orchestrator: Orchestrator<S>, command_rx: mpsc::Receiver<Command>) -> Self {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        Self {
            orchestrator,
            command_rx,
            timer_tx,
            timer_rx,
        }
    }

    /// Main worker loop. Exits once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(event) = self.timer_rx.recv() => {
                    self.orchestrator.handle_timer(event);
                }
            }
            self.spawn_timers();
        }
        debug!(target: "server::worker", "Orchestrator worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Connect { outbound, reply } => {
                let client_id = self.orchestrator.connect(outbound);
                if let Err(client_id) = reply.send(client_id) {
                    debug!(target: "server::worker", client = %client_id, "Connect reply channel closed (caller dropped)");
                    self.orchestrator.disconnect(&client_id);
                }
            }
            Command::Message { client_id, line } => {
                self.orchestrator.handle_line(&client_id, &line);
            }
            Command::Disconnect { client_id } => {
                self.orchestrator.disconnect(&client_id);
            }
            Command::QueryStats { reply } => {
                if reply.send(self.orchestrator.stats()).is_err() {
                    debug!(target: "server::worker", "QueryStats reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn spawn_timers(&mut self) {
        for request in self.orchestrator.take_timers() {
            let timer_tx = self.timer_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(request.delay).await;
                if timer_tx.send(request.event).is_err() {
                    debug!(target: "server::worker", "Timer fired after worker shut down");
                }
            });
        }
    }
}
