//! Server assembly: builds the orchestrator, spawns its worker and hands
//! out [`ServerHandle`]s.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use duel_content::ContentCatalog;

use crate::config::ServerConfig;
use crate::errors::{Result, ServerError};
use crate::handle::ServerHandle;
use crate::orchestrator::{ClockSeed, Orchestrator, SeedSource};
use crate::worker::OrchestratorWorker;

pub struct DuelServer {
    handle: ServerHandle,
    worker: JoinHandle<()>,
}

impl DuelServer {
    pub fn builder() -> DuelServerBuilder<ClockSeed> {
        DuelServerBuilder::new()
    }

    /// Get a cloneable handle to the orchestrator.
    pub fn handle(&self) -> ServerHandle {
        self.handle.clone()
    }

    /// Drops this handle and waits for the worker to drain.
    ///
    /// The worker stops once every other handle is dropped as well.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker.await.map_err(ServerError::WorkerJoin)
    }
}

/// Builder for [`DuelServer`].
pub struct DuelServerBuilder<S> {
    config: ServerConfig,
    catalog: Option<Arc<ContentCatalog>>,
    seeds: S,
}

impl DuelServerBuilder<ClockSeed> {
    fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            catalog: None,
            seeds: ClockSeed,
        }
    }
}

impl<S: SeedSource + 'static> DuelServerBuilder<S> {
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(mut self, catalog: impl Into<Arc<ContentCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    /// Replace the wall-clock seed source.
    pub fn seeds<T: SeedSource + 'static>(self, seeds: T) -> DuelServerBuilder<T> {
        DuelServerBuilder {
            config: self.config,
            catalog: self.catalog,
            seeds,
        }
    }

    /// Spawns the worker. Must be called inside a Tokio runtime.
    pub fn build(self) -> Result<DuelServer> {
        let catalog = self.catalog.ok_or(ServerError::MissingCatalog)?;
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer.max(1));

        let orchestrator = Orchestrator::with_seeds(catalog, self.config.matches, self.seeds);
        let worker = tokio::spawn(OrchestratorWorker::new(orchestrator, command_rx).run());

        Ok(DuelServer {
            handle: ServerHandle::new(command_tx),
            worker,
        })
    }
}
