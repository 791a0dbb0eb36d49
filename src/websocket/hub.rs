//! Session Hub
//!
//! Tracks every live dashboard session and its outbound message channel.
//! Each session owns its own selection; the hub only knows how to reach it.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::messages::ServerMessage;

/// Unique identifier for a session
pub type SessionId = String;

/// Registry of live sessions
pub struct SessionHub {
    /// Active sessions: SessionId → outbound channel
    sessions: Arc<RwLock<HashMap<SessionId, mpsc::UnboundedSender<ServerMessage>>>>,
    /// Configuration
    config: HubConfig,
}

/// Configuration for the session hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent sessions
    pub max_sessions: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self { max_sessions: 1000 }
    }
}

impl SessionHub {
    /// Create a new session hub
    pub fn new(config: HubConfig) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a new session
    ///
    /// Returns the session ID on success, or an error if the session limit
    /// has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<SessionId, HubError> {
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_sessions {
            return Err(HubError::TooManySessions);
        }

        let id = Uuid::new_v4().to_string();
        sessions.insert(id.clone(), sender);

        tracing::info!(session_id = %id, "Session opened");
        Ok(id)
    }

    /// Remove a session
    pub async fn unregister(&self, id: &str) {
        if self.sessions.write().await.remove(id).is_some() {
            tracing::info!(session_id = %id, "Session closed");
        }
    }

    /// Send a message directly to a specific session
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let sessions = self.sessions.read().await;
        let sender = sessions.get(id).ok_or(HubError::SessionNotFound)?;

        sender.send(message).map_err(|_| HubError::SendFailed)
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Errors that can occur in the session hub
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("Too many sessions")]
    TooManySessions,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}
