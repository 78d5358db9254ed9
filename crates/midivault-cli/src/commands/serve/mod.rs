//! WebSocket server for creating and fetching MIDI files.
//!
//! ## Protocol
//!
//! Requests are JSON objects with a `type` field:
//!
//! - `create_midi`: Encode and store a performance
//!   ```json
//!   {"type": "create_midi", "parameters": {"NOTE_ON": 1, "NOTE_OFF": 0},
//!    "programs": [{"channel": 0, "program": 40}],
//!    "notes": [{"time": 0, "event": 1, "channel": 0, "pitch": 60}]}
//!   ```
//!   Response: `{"success": true, "id": 0, "hash": "<blake3>"}`
//!
//! - `fetch_midi`: Read a stored file
//!   ```json
//!   {"type": "fetch_midi", "id": 0}
//!   ```
//!   Response: `{"success": true, "id": 0, "data": "<base64>"}`
//!
//! Failures are `{"success": false, "errors": [{"code": ..., "message": ...}]}`.

mod handler;
mod types;


use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::service::MidiService;

pub use handler::{create_midi, fetch_midi, handle_request, process_message, MISSING_ID_MESSAGE};
pub use types::{ErrorResponse, MidiRequest};

/// Default port for the WebSocket server.
pub const DEFAULT_PORT: u16 = 9124;

/// Run the WebSocket server until Ctrl+C.
///
/// # Returns
/// Exit code: 0 on clean shutdown, 1 on error
pub fn run(service: MidiService, port: u16) -> Result<ExitCode> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    rt.block_on(async move { run_server(service, port).await })
}

async fn run_server(service: MidiService, port: u16) -> Result<ExitCode> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    eprintln!("midivault server listening on ws://{}", addr);
    eprintln!("Store directory: {}", service.store().root().display());
    eprintln!("Press Ctrl+C to shutdown");

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    let shutdown_tx = Arc::new(shutdown_tx);

    let shutdown_tx_clone = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            eprintln!("\nShutting down...");
            let _ = shutdown_tx_clone.send(());
        }
    });

    serve(listener, Arc::new(service), shutdown_tx).await;
    eprintln!("Server shutdown complete");

    Ok(ExitCode::SUCCESS)
}

/// Accept connections on `listener` until a value is sent on `shutdown_tx`.
pub async fn serve(
    listener: TcpListener,
    service: Arc<MidiService>,
    shutdown_tx: Arc<broadcast::Sender<()>>,
) {
    let mut shutdown_rx = shutdown_tx.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        info!(%peer_addr, "new connection");
                        let shutdown_rx = shutdown_tx.subscribe();
                        let service = Arc::clone(&service);
                        tokio::spawn(handle_connection(stream, peer_addr, service, shutdown_rx));
                    }
                    Err(e) => {
                        warn!(error = %e, "accept failed");
                    }
                }
            }
            _ = shutdown_rx.recv() => {
                break;
            }
        }
    }
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    service: Arc<MidiService>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%peer_addr, error = %e, "WebSocket handshake failed");
            return;
        }
    };

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg_opt = read.next() => {
                match msg_opt {
                    Some(Ok(msg)) => {
                        if let Some(response) = handler::process_message(&service, msg) {
                            if let Err(e) = write.send(Message::Text(response)).await {
                                warn!(%peer_addr, error = %e, "send failed");
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!(%peer_addr, error = %e, "receive failed");
                        break;
                    }
                    None => break,
                }
            }
            _ = shutdown_rx.recv() => {
                let _ = write.send(Message::Close(None)).await;
                break;
            }
        }
    }

    debug!(%peer_addr, "connection closed");
}
