//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use tokio::sync::broadcast;

use super::state::AppState;
use crate::types::Snapshot;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before reading the current snapshot so nothing published in
    // between is lost
    let mut rx = state.subscribe();

    let current = state.current().await;
    if !send_snapshot(&mut socket, &current).await {
        return; // Client disconnected immediately
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(snapshot) => {
                        if !send_snapshot(&mut socket, &snapshot).await {
                            break; // Client disconnected
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // The retained buffer still ends with the newest
                        // snapshot; sending it out of turn would replay
                        // older ones after it
                        log::debug!("WebSocket client lagged by {} snapshots", n);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break; // Channel closed
                    }
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket).await {
                            break;
                        }
                    }
                    Some(Err(_)) => break, // WebSocket error
                    None => break, // Client disconnected
                }
            }
        }
    }
    log::debug!("WebSocket client disconnected");
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &Snapshot) -> bool {
    match serde_json::to_string(snapshot) {
        Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
        Err(e) => {
            log::error!("Failed to encode snapshot: {}", e);
            true
        }
    }
}

/// Handle a message from the client.
/// Displays never send anything meaningful; text is ignored.
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket) -> bool {
    match msg {
        Message::Text(_) | Message::Binary(_) | Message::Pong(_) => true,
        Message::Ping(data) => {
            let _ = socket.send(Message::Pong(data)).await;
            true
        }
        Message::Close(_) => false, // Client requested close
    }
}
