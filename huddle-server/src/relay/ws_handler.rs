use crate::relay::{RelayService, SessionSink};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientEvent, ConnId};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub relay: RelayService,
    pub sessions: SessionSink,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn = ConnId::new();
    info!("New WebSocket connection: {}", conn);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.sessions.add_session(conn.clone(), tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server event: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = state.relay.clone();
        let conn = conn.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(ClientEvent::JoinRoom {
                            room_id,
                            peer_id,
                            name,
                        }) => {
                            if let Err(e) = relay
                                .handle_join(conn.clone(), room_id, peer_id, name)
                                .await
                            {
                                // rejected join leaves the session connected
                                warn!("Join rejected for {}: {}", conn, e);
                            }
                        }
                        Ok(ClientEvent::Message(text)) => {
                            relay.handle_message(&conn, text).await;
                        }
                        Err(e) => warn!("Invalid client event from {}: {:?}", conn, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // transport-level close is itself the leave trigger, even when no
    // explicit leave message ever arrived
    state.relay.handle_disconnect(&conn).await;
    state.sessions.remove_session(&conn);
    info!("WebSocket disconnected: {}", conn);
}
