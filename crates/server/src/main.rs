//! Match server entry point.
use std::path::Path;

use anyhow::Result;
use duel_content::ContentFactory;
use duel_server::{DuelServer, ServerConfig};
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env();
    let _guard = setup_logging(config.log_dir.as_deref())?;

    let catalog = match &config.content_dir {
        Some(dir) => {
            tracing::info!("Loading content from {}", dir.display());
            ContentFactory::new(dir).load_catalog()?
        }
        None => ContentFactory::builtin()?,
    };
    tracing::info!(
        classes = ?catalog.class_ids().collect::<Vec<_>>(),
        "Content loaded"
    );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    let server = DuelServer::builder()
        .config(config)
        .catalog(catalog)
        .build()?;

    tokio::select! {
        result = duel_server::serve(listener, server.handle()) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutting down"),
    }

    Ok(())
}

/// Logs to stderr, and additionally to `<log_dir>/server.log` when set.
fn setup_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "server.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Log file: {}/server.log", log_dir.display());
    Ok(Some(guard))
}
