// src/ws.rs
use std::net::SocketAddr;
use std::sync::Arc;

use crossbeam_channel::Sender;
use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, error, info, warn};
use tokio::sync::broadcast;
use warp::Filter;
use warp::ws::Message;

use crate::types::{CodecCommand, IncomingMessage, OutgoingMessage};

pub async fn start_server(
    cmd_tx: Sender<CodecCommand>,
    mut event_rx: broadcast::Receiver<OutgoingMessage>,
    addr: SocketAddr,
    capacity: usize,
) {
    // Shared Broadcast Channel for WS Clients
    let (ws_tx, _) = broadcast::channel::<OutgoingMessage>(capacity);
    let ws_tx = Arc::new(ws_tx);

    // Forward codec events -> all WS clients
    let ws_tx_clone = ws_tx.clone();
    tokio::spawn(async move {
        while let Some(msg) = next_event(&mut event_rx).await {
            let _ = ws_tx_clone.send(msg);
        }
    });

    let ws_route = warp::path::end()
        .and(warp::ws())
        .map(move |ws: warp::ws::Ws| {
            let cmd_tx = cmd_tx.clone();
            let ws_tx = ws_tx.clone();
            ws.on_upgrade(move |socket| async move {
                let (client_ws_tx, client_ws_rx) = socket.split();
                serve_client(client_ws_rx, client_ws_tx, cmd_tx, ws_tx).await
            })
        });

    let routes = ws_route.with(warp::cors().allow_any_origin());

    info!("WebSocket server running on ws://{}", addr);
    warp::serve(routes).run(addr).await;
}

/// Next event from a broadcast receiver. Lagging only drops the missed
/// events; `None` means the channel is closed.
pub async fn next_event(
    rx: &mut broadcast::Receiver<OutgoingMessage>,
) -> Option<OutgoingMessage> {
    loop {
        match rx.recv().await {
            Ok(msg) => return Some(msg),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Receiver lagged, dropped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => return None,
        }
    }
}

/// Run one client: its requests go to the codec worker, every broadcast
/// reply goes back to it. Returns when the client stops sending.
pub async fn serve_client<S, K>(
    mut incoming: S,
    mut outgoing: K,
    cmd_tx: Sender<CodecCommand>,
    ws_tx: Arc<broadcast::Sender<OutgoingMessage>>,
) where
    S: Stream<Item = Result<Message, warp::Error>> + Unpin,
    K: Sink<Message> + Unpin + Send + 'static,
{
    let mut rx_broadcast = ws_tx.subscribe();

    // Broadcasts -> Client
    let forwarder = tokio::spawn(async move {
        while let Some(msg) = next_event(&mut rx_broadcast).await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize event: {}", e);
                    continue;
                }
            };
            if outgoing.send(Message::text(json)).await.is_err() {
                break;
            }
        }
    });

    // Client -> codec worker
    while let Some(result) = incoming.next().await {
        let msg = match result {
            Ok(msg) => msg,
            Err(e) => {
                debug!("WebSocket receive error: {}", e);
                break;
            }
        };

        let Ok(text) = msg.to_str() else {
            continue;
        };

        match serde_json::from_str::<IncomingMessage>(text) {
            Ok(parsed) => {
                debug!("Incoming request: {:?}", parsed);
                if cmd_tx.send(CodecCommand::from(parsed)).is_err() {
                    error!("Codec worker is gone, closing connection");
                    break;
                }
            }
            Err(e) => warn!("Ignoring malformed client message: {}", e),
        }
    }

    forwarder.abort();
}
