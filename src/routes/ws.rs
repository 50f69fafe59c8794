use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
};

use crate::services::notification_service::NotificationService;
use crate::AppState;

/// Upgrades a dashboard session onto the live event channel. The channel is a
/// liveness layer only; observers also poll, so a dropped or late connection
/// loses nothing durable.
pub async fn observer_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let hub = state.notification_service.clone();
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(mut socket: WebSocket, hub: NotificationService) {
    let (observer_id, mut events) = hub.subscribe();

    loop {
        tokio::select! {
            outbound = events.recv() => {
                match outbound {
                    Some(message) => {
                        if socket.send(Message::Text(message)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    // Observers only listen; anything inbound besides a ping
                    // is ignored until the peer goes away.
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    hub.unsubscribe(observer_id);
}
