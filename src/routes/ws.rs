use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header, HeaderMap},
    response::Response,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use serde::Deserialize;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::realtime::{Channel, ChannelReceiver, Hub, Inbound, DEFAULT_QUEUE_CAPACITY};
use crate::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    pub token: Option<String>,
}

/// Upgrades `GET /api/v1/ws` to a persistent channel. A bearer token may
/// arrive in the `Authorization` header or the `token` query parameter;
/// connections without a usable token are served anonymously and can still
/// join rooms and receive broadcasts.
#[axum::debug_handler]
pub async fn upgrade(
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Response {
    let token = bearer_token(&headers).or(query.token);
    let user_id = token.and_then(|t| match state.auth_service.validate_token(&t) {
        Ok(claims) => Some(claims.user_id),
        Err(_) => {
            tracing::debug!("websocket token rejected, serving connection anonymously");
            None
        }
    });

    let hub = state.realtime_service.hub();
    ws.on_upgrade(move |socket| serve_connection(socket, hub, user_id))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

async fn serve_connection(socket: WebSocket, hub: Arc<Hub>, user_id: Option<Uuid>) {
    let (sink, stream) = socket.split();
    let (channel, receiver) = Channel::new(user_id, DEFAULT_QUEUE_CAPACITY);

    hub.register(channel.clone());
    let writer = tokio::spawn(write_loop(sink, receiver));

    read_loop(stream, &hub, &channel).await;

    hub.unregister(&channel);
    let _ = writer.await;
}

/// Drains the outbound queue to the wire in FIFO order. Exits when the
/// channel is closed by the hub, the queue sender side is gone, or the peer
/// stops accepting writes.
async fn write_loop(mut sink: SplitSink<WebSocket, Message>, mut receiver: ChannelReceiver) {
    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            maybe = receiver.rx.recv() => {
                let Some(envelope) = maybe else { break };
                let text = match serde_json::to_string(&envelope) {
                    Ok(text) => text,
                    Err(err) => {
                        tracing::warn!(error = %err, "dropping unencodable outbound frame");
                        continue;
                    }
                };
                if sink.send(Message::Text(text)).await.is_err() {
                    break;
                }
            }
            _ = receiver.close_rx.changed() => break,
            _ = ping.tick() => {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }
    let _ = sink.close().await;
}

/// Parses inbound `{type, payload}` frames. `join_quiz` subscribes the
/// channel to the quiz room; anything unrecognized is ignored.
async fn read_loop(mut stream: SplitStream<WebSocket>, hub: &Hub, channel: &Arc<Channel>) {
    while let Some(Ok(message)) = stream.next().await {
        match message {
            Message::Text(text) => match serde_json::from_str::<Inbound>(&text) {
                Ok(Inbound::JoinQuiz { quiz_id }) => hub.subscribe(channel, quiz_id),
                Err(_) => {
                    tracing::debug!(channel = channel.id(), "ignoring unrecognized frame")
                }
            },
            Message::Close(_) => break,
            _ => {}
        }
    }
}
