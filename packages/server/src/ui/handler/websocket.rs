//! WebSocket connection handlers.
//!
//! Each connection moves through `CONNECTING → NAMED → ACTIVE → CLOSED`:
//! the first text frame is the handshake, the `init` frame is written
//! directly to the socket before the writer task starts, and from then on
//! every outbound frame goes through the connection's channel.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, OutboundFrame, Participant},
    infrastructure::dto::websocket::{ErrorMessage, HandshakeMessage, InboundEdit, InitMessage},
    ui::{error::ConnectionError, state::AppState},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and writes them to the WebSocket sink.
///
/// The task ends when the channel closes (the connection was removed from
/// the registry) or when a socket write fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<OutboundFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let message = match frame {
                OutboundFrame::Text(text) => Message::Text(text.into()),
                OutboundFrame::Ping => Message::Ping(Default::default()),
            };
            if let Err(e) = sender.send(message).await {
                tracing::debug!("WebSocket write failed: {}", e);
                break;
            }
        }
        let _ = sender.close().await;
    })
}

/// Wait for the handshake frame. `None` means the socket closed first.
async fn read_handshake(receiver: &mut SplitStream<WebSocket>) -> Option<HandshakeMessage> {
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => return Some(HandshakeMessage::parse(text.as_str())),
            Ok(Message::Binary(_)) => return Some(HandshakeMessage::default()),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => return None,
            Err(e) => {
                tracing::debug!("WebSocket error before handshake: {}", e);
                return None;
            }
        }
    }
    None
}

/// Send an error frame and close the socket.
async fn reject(sender: &mut SplitSink<WebSocket, Message>, reason: String) {
    match serde_json::to_string(&ErrorMessage { error: reason }) {
        Ok(json) => {
            let _ = sender.send(Message::Text(json.into())).await;
        }
        Err(e) => tracing::error!("Failed to serialize error frame: {}", e),
    }
    let _ = sender.send(Message::Close(None)).await;
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = ConnectionId::generate();

    let Some(handshake) = read_handshake(&mut receiver).await else {
        tracing::debug!("Connection {} closed before handshake", connection_id);
        return;
    };

    // Create a channel for this client to receive frames
    let (tx, rx) = mpsc::unbounded_channel();

    let participant = match state
        .connect_participant_usecase
        .execute(connection_id, handshake.name, tx)
        .await
    {
        Ok(participant) => participant,
        Err(e) => {
            tracing::warn!("Rejecting connection {}: {}", connection_id, e);
            reject(&mut sender, e.to_string()).await;
            return;
        }
    };
    tracing::info!("Participant '{}' ({}) joined", participant.name, connection_id);

    // Broadcast join to all other clients
    state
        .connect_participant_usecase
        .broadcast_participant_joined(&participant)
        .await;

    if let Err(e) = send_init(&mut sender, &state).await {
        tracing::warn!("Failed to send init to '{}': {}", participant.name, e);
        state
            .disconnect_participant_usecase
            .execute(connection_id)
            .await;
        return;
    }

    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = {
        let state = state.clone();
        let participant = participant.clone();
        tokio::spawn(async move { receive_loop(receiver, &state, &participant).await })
    };

    // If any one of the tasks exit, abort the other
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state
        .disconnect_participant_usecase
        .execute(connection_id)
        .await;
    tracing::info!("Connection {} closed", connection_id);
}

/// Write the `init` frame straight to the socket.
async fn send_init(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &AppState,
) -> Result<(), ConnectionError> {
    let (board, participants) = state.connect_participant_usecase.build_init_state().await;
    let init = InitMessage::new(board, &participants);
    let json = serde_json::to_string(&init)?;
    sender.send(Message::Text(json.into())).await?;
    Ok(())
}

async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: &AppState,
    participant: &Participant,
) {
    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!("WebSocket error from '{}': {}", participant.name, e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                let edit = match InboundEdit::parse(text.as_str()) {
                    Ok(edit) => edit,
                    Err(e) => {
                        tracing::warn!("Dropping malformed frame from '{}': {}", participant.name, e);
                        continue;
                    }
                };
                let relay_json = edit.relay_json(&participant.name);
                state
                    .apply_edit_usecase
                    .execute(participant.connection_id, edit.record, &relay_json)
                    .await;
            }
            Message::Binary(_) => {
                tracing::warn!("Dropping binary frame from '{}'", participant.name);
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }
}
