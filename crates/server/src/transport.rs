//! TCP transport: one task per connection, one JSON object per line.
//!
//! The reader half forwards raw lines to the orchestrator. Lines that are not
//! UTF-8 or exceed [`MAX_LINE_BYTES`] are answered with an `ERROR` here and
//! never reach it. The writer half drains the client's outbound channel until
//! every sender is dropped.

use std::net::SocketAddr;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{Result, ServerError};
use crate::handle::ServerHandle;
use crate::protocol::{ProtocolError, ServerMessage, encode_server_message};

/// Longest accepted inbound line, newline included.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Accepts connections until the listener fails.
pub async fn serve(listener: TcpListener, handle: ServerHandle) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(target: "server::transport", %addr, "Listening");
    }

    loop {
        let (stream, peer) = listener.accept().await.map_err(ServerError::Accept)?;
        let handle = handle.clone();
        tokio::spawn(async move {
            if let Err(error) = handle_connection(stream, peer, handle).await {
                warn!(target: "server::transport", %peer, error = %error, "Connection ended with error");
            }
        });
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, handle: ServerHandle) -> Result<()> {
    let (reader, writer) = stream.into_split();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

    let client_id = handle.connect(outbound_tx.clone()).await?;
    debug!(target: "server::transport", %peer, client = %client_id, "Connection opened");

    let writer_task = tokio::spawn(write_messages(writer, outbound_rx));

    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut skipping = false;
    loop {
        buf.clear();
        let read = (&mut reader)
            .take(MAX_LINE_BYTES as u64)
            .read_until(b'\n', &mut buf)
            .await;
        match read {
            Ok(0) => break,
            Ok(_) => {
                let terminated = buf.last() == Some(&b'\n');
                if skipping {
                    // Tail of an oversized line that was already rejected.
                    skipping = !terminated;
                    continue;
                }
                if !terminated && buf.len() >= MAX_LINE_BYTES {
                    debug!(target: "server::transport", client = %client_id, "Line too long");
                    skipping = true;
                    reject(&outbound_tx);
                    continue;
                }
                match std::str::from_utf8(&buf) {
                    Ok(line) if line.trim().is_empty() => {}
                    Ok(line) => {
                        let line = line.trim_end_matches(['\r', '\n']).to_string();
                        handle.submit(client_id.clone(), line).await?;
                    }
                    Err(error) => {
                        debug!(target: "server::transport", client = %client_id, error = %error, "Line is not UTF-8");
                        reject(&outbound_tx);
                    }
                }
            }
            Err(error) => {
                debug!(target: "server::transport", client = %client_id, error = %error, "Read failed");
                break;
            }
        }
    }
    drop(outbound_tx);

    handle.disconnect(client_id).await?;
    match writer_task.await {
        Ok(result) => result,
        Err(error) => {
            debug!(target: "server::transport", error = %error, "Writer task aborted");
            Ok(())
        }
    }
}

fn reject(outbound: &mpsc::UnboundedSender<ServerMessage>) {
    // Fails only once the writer is gone, and then the read loop ends too.
    let _ = outbound.send(ServerMessage::error(ProtocolError::InvalidFormat.to_string()));
}

async fn write_messages(
    mut writer: OwnedWriteHalf,
    mut outbound_rx: mpsc::UnboundedReceiver<ServerMessage>,
) -> Result<()> {
    while let Some(message) = outbound_rx.recv().await {
        let line = encode_server_message(&message)?;
        writer.write_all(line.as_bytes()).await?;
    }
    writer.shutdown().await.ok();
    Ok(())
}
