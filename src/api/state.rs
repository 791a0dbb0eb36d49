//! Application State
//!
//! Shared state accessible by all handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::ServerConfig;
use crate::dataset::Dataset;
use crate::websocket::{HubConfig, SessionHub};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Dataset loaded at startup, read-only for the process lifetime
    pub dataset: Arc<Dataset>,
    /// Where the dataset was loaded from
    pub source: String,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Live WebSocket sessions
    pub sessions: Arc<SessionHub>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(dataset: Arc<Dataset>, source: impl Into<String>, config: &ServerConfig) -> Self {
        let hub_config = HubConfig {
            max_sessions: config.max_sessions,
        };

        Self {
            dataset,
            source: source.into(),
            start_time: Instant::now(),
            sessions: Arc::new(SessionHub::new(hub_config)),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get live session count
    pub async fn session_count(&self) -> usize {
        self.sessions.session_count().await
    }
}
