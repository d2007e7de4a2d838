//! WebSocket handler for progressive common-games results

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::steamspy::GameInfo;
use crate::validate::validate_links;
use crate::AppState;

/// Messages sent from client to server
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Stream the games every linked profile owns in common
    CommonMultiplayerGames { links: Vec<String> },
}

/// Messages sent from server to client. Each result streams as
/// `{done: false, game}`; a lone `{done: true}` terminates the stream.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Game { done: bool, game: GameInfo },
    Done { done: bool },
    Error { message: String },
}

impl ServerMessage {
    fn game(game: GameInfo) -> Self {
        ServerMessage::Game { done: false, game }
    }

    fn done() -> Self {
        ServerMessage::Done { done: true }
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (mut sender, mut receiver) = socket.split();

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(data)) => {
                let _ = sender.send(Message::Pong(data)).await;
                continue;
            }
            _ => continue,
        };

        // Parse client message
        let client_msg: ClientMessage = match serde_json::from_str(&msg) {
            Ok(m) => m,
            Err(e) => {
                let error = ServerMessage::Error {
                    message: format!("Invalid message: {}", e),
                };
                if send_message(&mut sender, &error).await.is_err() {
                    break;
                }
                continue;
            }
        };

        let ClientMessage::CommonMultiplayerGames { links } = client_msg;
        if stream_common_games(&mut sender, &state, &links).await.is_err() {
            break;
        }
    }
}

/// Run the pipeline and stream each game in sorted order, then the terminal
/// done marker. Recognized errors stream with their message, everything else
/// as a generic "Server error".
async fn stream_common_games(
    sender: &mut SplitSink<WebSocket, Message>,
    state: &Arc<AppState>,
    links: &[String],
) -> Result<(), axum::Error> {
    let result = match validate_links(links) {
        Ok(()) => state.service.common_multiplayer_games(links).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(games) => {
            for game in games {
                send_message(sender, &ServerMessage::game(game)).await?;
            }
            send_message(sender, &ServerMessage::done()).await
        }
        Err(err) => {
            let message = err
                .client_message()
                .unwrap_or_else(|| "Server error".to_string());
            send_message(sender, &ServerMessage::Error { message }).await
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(msg).unwrap();
    sender.send(Message::Text(text.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_events_carry_the_game() {
        let msg = ServerMessage::game(GameInfo {
            id: 730,
            name: "Counter-Strike 2".to_string(),
            tags: Vec::new(),
        });
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&msg).unwrap()).unwrap();
        assert_eq!(json["done"], false);
        assert_eq!(json["game"]["id"], 730);
    }

    #[test]
    fn terminal_event_is_done_only() {
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&ServerMessage::done()).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "done": true }));
    }

    #[test]
    fn client_message_parses_the_event_shape() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type": "CommonMultiplayerGames", "links": ["https://steamcommunity.com/id/alice/"]}"#,
        )
        .unwrap();
        let ClientMessage::CommonMultiplayerGames { links } = msg;
        assert_eq!(links.len(), 1);
    }
}
