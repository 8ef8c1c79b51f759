use crate::protocol::{ClientMessage, ServerMessage};
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures_util::{Sink, SinkExt, StreamExt};
use minimi_core::assistant::Assistant;
use minimi_core::session::ChatSession;
use minimi_core::{BridgeEvent, Command};
use std::sync::Arc;
use tokio::sync::mpsc;

const OUTBOUND_CAPACITY: usize = 32;

/// Manages an individual WebSocket connection.
///
/// The connection owns one `ChatSession` for its whole lifetime. Inbound
/// frames are handled one at a time, so a turn finishes before the next
/// frame is read. Every outbound frame, errors included, goes through one
/// queue in the order it was produced.
pub async fn handle_socket(socket: WebSocket, assistant: Arc<Assistant>) {
    tracing::info!("WebSocket connection established");

    let (mut sender, mut receiver) = socket.split();
    let (out_tx, out_rx) = mpsc::channel::<ServerMessage>(OUTBOUND_CAPACITY);

    let writer = tokio::spawn(async move { write_outbound(&mut sender, out_rx).await });

    let mut session = ChatSession::new();
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                let msg = match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::warn!("Ignoring malformed frame: {}", e);
                        continue;
                    }
                };
                tracing::debug!("Received frame: {:?}", msg);
                if !dispatch(&mut session, &assistant, msg.into(), &out_tx).await {
                    break;
                }
            }
            Ok(WsMessage::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                // Client disconnected.
                tracing::info!("WebSocket error: {}", e);
                break;
            }
        }
    }

    drop(out_tx);
    if let Err(e) = writer.await {
        tracing::error!("Outbound writer task failed: {}", e);
    }
    tracing::info!(
        messages = session.transcript.len(),
        "WebSocket connection closed, session discarded"
    );
}

/// Runs one event through the session and queues everything it produces.
///
/// The turn's commands are forwarded while it runs; a failure is queued
/// after the last of them. Returns `false` once the writer is gone.
async fn dispatch(
    session: &mut ChatSession,
    assistant: &Assistant,
    event: BridgeEvent,
    out_tx: &mpsc::Sender<ServerMessage>,
) -> bool {
    let (command_tx, mut command_rx) = mpsc::channel::<Command>(OUTBOUND_CAPACITY);

    let turn = async move { session.handle_event(assistant, event, &command_tx).await };
    let forward = async {
        let mut open = true;
        while let Some(command) = command_rx.recv().await {
            // Keep draining after a disconnect so the turn never blocks.
            if open && out_tx.send(ServerMessage::from(command)).await.is_err() {
                open = false;
            }
        }
        open
    };
    let (result, open) = tokio::join!(turn, forward);

    match result {
        Ok(()) => open,
        Err(e) => open && out_tx.send(ServerMessage::error(&e)).await.is_ok(),
    }
}

/// Serializes queued frames onto the socket until the queue closes or the
/// client goes away.
async fn write_outbound<S>(sink: &mut S, mut out_rx: mpsc::Receiver<ServerMessage>)
where
    S: Sink<WsMessage> + Unpin,
{
    while let Some(msg) = out_rx.recv().await {
        match serde_json::to_string(&msg) {
            Ok(text) => {
                if sink.send(WsMessage::Text(text.into())).await.is_err() {
                    // Client disconnected.
                    break;
                }
            }
            Err(e) => tracing::error!("failed to serialize frame: {}", e),
        }
    }
}
