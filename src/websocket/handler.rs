//! WebSocket Handler
//!
//! Handles WebSocket upgrade requests. Each connection is one dashboard
//! session: it gets its own dispatcher task and selection state, while the
//! dataset is shared read-only.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::hub::SessionHub;
use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::dashboard::{panel_html, spawn_session, Dispatcher, SessionHandle};

/// WebSocket upgrade handler
///
/// This is the entry point for live sessions. It upgrades the HTTP
/// connection to WebSocket and starts the session.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

fn encode(message: &ServerMessage) -> Option<Message> {
    match serde_json::to_string(message) {
        Ok(text) => Some(Message::Text(text)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            None
        }
    }
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();
    run_session(sender, receiver, state).await;
}

/// Drive one session over any message sink and stream
///
/// Returns once the client side closes and the session is unregistered.
async fn run_session<S, R, E>(mut sender: S, mut receiver: R, state: Arc<AppState>)
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Send,
    R: Stream<Item = Result<Message, E>> + Unpin + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    let hub = Arc::clone(&state.sessions);

    // Channel for messages addressed to this session through the hub
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let session_id = match hub.register(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Failed to register session");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            if let Some(msg) = encode(&error_msg) {
                let _ = sender.send(msg).await;
            }
            return;
        }
    };

    let dispatcher = Dispatcher::new(Arc::clone(&state.dataset));
    let (year_disabled, panel) = dispatcher.snapshot();
    let connected_msg = ServerMessage::Connected {
        session_id: session_id.clone(),
        year_disabled,
        html: panel_html(&panel),
    };
    let sent = match encode(&connected_msg) {
        Some(msg) => sender.send(msg).await.is_ok(),
        None => false,
    };
    if !sent {
        tracing::error!(session_id = %session_id, "Failed to send connected message");
        hub.unregister(&session_id).await;
        return;
    }

    let (session, mut updates) = spawn_session(dispatcher);
    let id_for_send = session_id.clone();

    // Task to forward hub messages and dispatcher updates to the socket
    let mut send_task = tokio::spawn(async move {
        loop {
            let outgoing = tokio::select! {
                msg = rx.recv() => msg,
                update = updates.recv() => update.map(ServerMessage::from),
            };
            let Some(outgoing) = outgoing else {
                break;
            };
            let Some(msg) = encode(&outgoing) else {
                continue;
            };
            if sender.send(msg).await.is_err() {
                tracing::debug!(
                    session_id = %id_for_send,
                    "WebSocket send failed, closing session"
                );
                break;
            }
        }
    });

    let hub_for_recv = Arc::clone(&hub);
    let id_for_recv = session_id.clone();

    // Task to receive client messages and turn them into commands
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(msg) => {
                    if !handle_ws_message(&hub_for_recv, &id_for_recv, &session, msg).await {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        session_id = %id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            }
        }
    });

    // Wait for either task to complete
    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    hub.unregister(&session_id).await;
}

/// Handle a received WebSocket message
///
/// Returns false if the connection should be closed.
async fn handle_ws_message(
    hub: &Arc<SessionHub>,
    session_id: &str,
    session: &SessionHandle,
    message: Message,
) -> bool {
    match message {
        Message::Text(text) => {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_client_message(hub, session_id, session, client_msg).await,
                Err(e) => {
                    tracing::debug!(
                        session_id = %session_id,
                        error = %e,
                        text = %text,
                        "Invalid client message"
                    );
                    // Report the error but keep the session open
                    let error_msg = ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = hub.send_to(session_id, error_msg).await;
                    true
                }
            }
        }
        Message::Binary(_) => {
            let error_msg = ServerMessage::Error {
                message: "Binary messages not supported".to_string(),
            };
            let _ = hub.send_to(session_id, error_msg).await;
            true
        }
        // Axum answers pings itself
        Message::Ping(_) | Message::Pong(_) => true,
        Message::Close(_) => {
            tracing::debug!(session_id = %session_id, "Client requested close");
            false
        }
    }
}

/// Handle a parsed client message
///
/// Returns false if the session task is gone.
async fn handle_client_message(
    hub: &Arc<SessionHub>,
    session_id: &str,
    session: &SessionHandle,
    message: ClientMessage,
) -> bool {
    match message.into_command() {
        Ok(Some(command)) => {
            if let Err(e) = session.send(command) {
                tracing::error!(session_id = %session_id, error = %e, "Dispatch failed");
                return false;
            }
        }
        Ok(None) => {
            let _ = hub.send_to(session_id, ServerMessage::Pong).await;
        }
        Err(e) => {
            tracing::debug!(session_id = %session_id, error = %e, "Rejected selection");
            let error_msg = ServerMessage::Error {
                message: e.to_string(),
            };
            let _ = hub.send_to(session_id, error_msg).await;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::dashboard::{CHOOSE_REPORT_PROMPT, SELECT_YEAR_PROMPT};
    use crate::dataset::{Dataset, Month, Record};
    use futures::channel::mpsc as channel;
    use std::convert::Infallible;
    use std::time::Duration;

    struct Client {
        outgoing: channel::UnboundedSender<Result<Message, Infallible>>,
        incoming: channel::UnboundedReceiver<Message>,
    }

    impl Client {
        fn send(&self, json: &str) {
            self.outgoing
                .unbounded_send(Ok(Message::Text(json.to_string())))
                .unwrap();
        }

        async fn recv(&mut self) -> serde_json::Value {
            let msg = tokio::time::timeout(Duration::from_secs(5), self.incoming.next())
                .await
                .expect("timed out waiting for server message")
                .expect("session closed");
            match msg {
                Message::Text(text) => serde_json::from_str(&text).unwrap(),
                other => panic!("Expected text message, got {:?}", other),
            }
        }
    }

    fn state() -> Arc<AppState> {
        let m = |n| Month::new(n).unwrap();
        let dataset = Dataset::new(vec![
            Record::new(1980, m(1), true, "Supperminicar", 456.0, 1558.0, 5.4),
            Record::new(1985, m(3), false, "Mediumfamilycar", 620.0, 3137.0, 3.1),
        ]);
        Arc::new(AppState::new(Arc::new(dataset), "test.csv", &ServerConfig::default()))
    }

    fn connect(state: &Arc<AppState>) -> (Client, tokio::task::JoinHandle<()>) {
        let (client_tx, server_rx) = channel::unbounded();
        let (server_tx, client_rx) = channel::unbounded();
        let task = tokio::spawn(run_session(server_tx, server_rx, Arc::clone(state)));

        (
            Client {
                outgoing: client_tx,
                incoming: client_rx,
            },
            task,
        )
    }

    #[tokio::test]
    async fn test_session_flow() {
        let state = state();
        let (mut client, task) = connect(&state);

        let connected = client.recv().await;
        assert_eq!(connected["type"], "connected");
        assert_eq!(connected["year_disabled"], true);
        assert!(connected["html"].as_str().unwrap().contains(CHOOSE_REPORT_PROMPT));
        assert_eq!(state.session_count().await, 1);

        client.send(r#"{"type": "select_report_type", "value": "Yearly Statistics"}"#);
        let disabled = client.recv().await;
        assert_eq!(disabled["type"], "year_disabled");
        assert_eq!(disabled["disabled"], false);
        let panel = client.recv().await;
        assert_eq!(panel["type"], "panel");
        assert!(panel["html"].as_str().unwrap().contains(SELECT_YEAR_PROMPT));

        client.send(r#"{"type": "select_year", "value": 1985}"#);
        let panel = client.recv().await;
        assert_eq!(panel["type"], "panel");
        assert_eq!(panel["panel"]["type"], "charts");
        assert!(panel["html"].as_str().unwrap().contains("Total Monthly Automobile Sales in 1985"));

        drop(client);
        task.await.unwrap();
        assert_eq!(state.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_invalid_selection_keeps_session_and_state() {
        let state = state();
        let (mut client, _task) = connect(&state);
        client.recv().await;

        client.send(r#"{"type": "select_report_type", "value": "Yearly Statistics"}"#);
        client.recv().await;
        client.recv().await;
        client.send(r#"{"type": "select_year", "value": 1985}"#);
        client.recv().await;

        client.send(r#"{"type": "select_year", "value": 1850}"#);
        let error = client.recv().await;
        assert_eq!(error["type"], "error");
        assert!(error["message"].as_str().unwrap().contains("1850"));

        client.send(r#"{"type": "not_a_message"}"#);
        let error = client.recv().await;
        assert_eq!(error["type"], "error");

        // Re-selecting the report type shows the year chosen before the errors
        client.send(r#"{"type": "select_report_type", "value": "Yearly Statistics"}"#);
        assert_eq!(client.recv().await["type"], "year_disabled");
        let panel = client.recv().await;
        assert!(panel["html"].as_str().unwrap().contains("Total Monthly Automobile Sales in 1985"));

        client.send(r#"{"type": "ping"}"#);
        assert_eq!(client.recv().await["type"], "pong");
    }
}
