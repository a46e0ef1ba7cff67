//! WebSocket streaming API.
//!
//! One persistent connection per client, authenticated at handshake
//! with the same signed token as the REST API. Clients join and leave
//! per-group logical channels; persisted group messages fan out to
//! every connection currently joined to that group's channel.
//!
//! Delivery is best-effort and fire-and-forget: there is no
//! acknowledgment, no cross-channel ordering guarantee, and no replay
//! on rejoin beyond the REST history fetch. A slow subscriber only
//! loses its own events.

#![allow(missing_docs)]

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use async_trait::async_trait;
use reelhub_common::AppResult;
use reelhub_core::channel_events::{ChannelPublisher, GroupMessageEvent};

use crate::middleware::AppState;

/// Streaming query parameters.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Access token for authentication.
    pub token: Option<String>,
}

/// Client-to-server message.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "body")]
pub enum ClientMessage {
    /// Join a group's channel.
    #[serde(rename = "join-group", rename_all = "camelCase")]
    JoinGroup { group_id: String },
    /// Leave a group's channel.
    #[serde(rename = "leave-group", rename_all = "camelCase")]
    LeaveGroup { group_id: String },
}

/// Server-to-client message.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "body")]
pub enum ServerMessage {
    /// Channel joined.
    #[serde(rename = "joined", rename_all = "camelCase")]
    Joined { group_id: String },
    /// Channel left.
    #[serde(rename = "left", rename_all = "camelCase")]
    Left { group_id: String },
    /// A new message in a joined channel.
    #[serde(rename = "new-message")]
    NewMessage(GroupMessageEvent),
    /// A request failed.
    #[serde(rename = "error")]
    Error { message: String },
}

/// Shared fan-out state for group channels.
///
/// A single broadcast bus carries every group message event; each
/// connection filters on the set of channels it has joined. The state
/// is constructed once at startup and handed to both the router and
/// the message service.
#[derive(Clone)]
pub struct ChannelState {
    tx: Arc<broadcast::Sender<GroupMessageEvent>>,
}

impl ChannelState {
    /// Create a new channel state.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1000);
        Self { tx: Arc::new(tx) }
    }

    /// Publish a message event to all subscribers.
    ///
    /// A send with no receivers is not an error; it means nobody is
    /// listening right now.
    pub fn publish(&self, event: GroupMessageEvent) {
        let _ = self.tx.send(event);
    }

    fn subscribe(&self) -> broadcast::Receiver<GroupMessageEvent> {
        self.tx.subscribe()
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelPublisher for ChannelState {
    async fn publish_group_message(&self, event: GroupMessageEvent) -> AppResult<()> {
        self.publish(event);
        Ok(())
    }
}

/// WebSocket handler for streaming.
///
/// The connection is rejected at handshake when the token is missing
/// or invalid.
pub async fn streaming_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<StreamQuery>,
    State(state): State<AppState>,
) -> Response {
    let Some(token) = query.token else {
        return (StatusCode::UNAUTHORIZED, "Missing token").into_response();
    };

    let user = match state.account_service.authenticate_token(&token).await {
        Ok(user) => user,
        Err(_) => {
            return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
        }
    };

    info!(user_id = %user.id, "Streaming connection established");

    ws.on_upgrade(move |socket| handle_socket(socket, state, user.id))
}

/// Drive one WebSocket connection until it closes.
async fn handle_socket(socket: WebSocket, state: AppState, user_id: String) {
    let (mut sender, mut receiver) = socket.split();

    let mut events = state.channels.subscribe();

    // Channels this connection has joined
    let mut joined: HashSet<String> = HashSet::new();

    loop {
        tokio::select! {
            // Handle incoming messages from client
            Some(msg) = receiver.next() => {
                match msg {
                    Ok(Message::Text(text)) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(client_msg) => {
                                let response = handle_client_message(
                                    client_msg,
                                    &state,
                                    &user_id,
                                    &mut joined,
                                ).await;
                                let json = serde_json::to_string(&response).unwrap_or_default();
                                if sender.send(Message::Text(json.into())).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "Failed to parse client message");
                            }
                        }
                    }
                    Ok(Message::Close(_)) => {
                        break;
                    }
                    Ok(Message::Ping(data)) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(error = %e, "WebSocket error");
                        break;
                    }
                }
            }

            // Fan out group message events to joined channels
            event = events.recv() => {
                match event {
                    Ok(event) if joined.contains(&event.group_id) => {
                        let msg = ServerMessage::NewMessage(event);
                        let json = serde_json::to_string(&msg).unwrap_or_default();
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Best-effort delivery: a slow subscriber misses events
                        warn!(user_id = %user_id, skipped, "Streaming subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    info!(user_id = %user_id, "Streaming connection closed");
}

/// Handle one client message, returning the reply to send.
async fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    user_id: &str,
    joined: &mut HashSet<String>,
) -> ServerMessage {
    match msg {
        ClientMessage::JoinGroup { group_id } => {
            // Private groups only admit their members
            match state.group_service.can_view_messages(&group_id, user_id).await {
                Ok(true) => {
                    joined.insert(group_id.clone());
                    info!(user_id = %user_id, group_id = %group_id, "Channel joined");
                    ServerMessage::Joined { group_id }
                }
                Ok(false) => ServerMessage::Error {
                    message: "You must be a member of this group".to_string(),
                },
                Err(e) => ServerMessage::Error {
                    message: e.to_string(),
                },
            }
        }
        ClientMessage::LeaveGroup { group_id } => {
            joined.remove(&group_id);
            info!(user_id = %user_id, group_id = %group_id, "Channel left");
            ServerMessage::Left { group_id }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use reelhub_core::channel_events::MessageAuthor;

    fn sample_event(group_id: &str) -> GroupMessageEvent {
        GroupMessageEvent {
            id: "m1".to_string(),
            group_id: group_id.to_string(),
            text: "hello".to_string(),
            created_at: "2025-06-01T00:00:00Z".to_string(),
            author: MessageAuthor {
                id: "u1".to_string(),
                pseudo: "alice".to_string(),
                avatar_url: None,
            },
        }
    }

    #[test]
    fn test_client_message_wire_format() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"join-group","body":{"groupId":"g1"}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::JoinGroup { group_id } if group_id == "g1"));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"leave-group","body":{"groupId":"g1"}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::LeaveGroup { .. }));
    }

    #[test]
    fn test_server_message_wire_format() {
        let json = serde_json::to_string(&ServerMessage::NewMessage(sample_event("g1"))).unwrap();
        assert!(json.contains("\"type\":\"new-message\""));
        assert!(json.contains("\"groupId\":\"g1\""));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let channels = ChannelState::new();
        channels.publish(sample_event("g1"));
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let channels = ChannelState::new();
        let mut rx = channels.subscribe();

        channels.publish(sample_event("g1"));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.group_id, "g1");
        assert_eq!(event.author.pseudo, "alice");
    }
}
