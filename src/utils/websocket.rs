use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::event::ClientEvent;
use crate::services::session_service::Outbound;
use crate::state::AppState;

pub async fn handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Bridges one socket to the game session until either side closes it.
pub async fn handle_socket(ws: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    info!("socket {} connected", connection_id);

    let (mut sender, mut receiver) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Outbound>();

    if let Err(e) = state.game.connect(connection_id.clone(), tx) {
        warn!("refusing socket {}: {}", connection_id, e);
        return;
    }

    let connection_id_for_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Event(event) => {
                    if let Err(e) = sender.send(Message::Text(event.to_text())).await {
                        warn!("error sending to {}: {}", connection_id_for_send, e);
                        break;
                    }
                }
                Outbound::Close => {
                    info!("closing socket {} on request", connection_id_for_send);
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    let game = state.game.clone();
    let connection_id_for_receive = connection_id.clone();
    let mut receive_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match ClientEvent::from_text(&text) {
                    Ok(event) => {
                        if game
                            .send_event(connection_id_for_receive.clone(), event)
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(e) => warn!(
                        "dropping frame from {}: {}",
                        connection_id_for_receive, e
                    ),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => receive_task.abort(),
        _ = &mut receive_task => send_task.abort(),
    }

    info!("socket {} disconnected", connection_id);
    let _ = state.game.disconnect(connection_id);
}
