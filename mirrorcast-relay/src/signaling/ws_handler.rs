use crate::signaling::RelayService;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::info;

pub fn router(service: RelayService) -> Router {
    Router::new()
        .route("/", get(|| async { "Mirrorcast relay running. Connect on /ws" }))
        .route("/ws", get(ws_handler))
        .with_state(service)
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<RelayService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: RelayService) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let conn_id = service.register(tx);
    info!("New WebSocket connection: {}", conn_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => service.handle_frame(conn_id, text.as_str()),
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

    service.disconnect(conn_id);
    info!("WebSocket disconnected: {}", conn_id);
}
