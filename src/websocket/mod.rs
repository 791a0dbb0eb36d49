//! WebSocket Live Sessions
//!
//! Drives the dashboard page interactively: every connection is one session
//! with its own selection, fed by the browser's dropdown changes.
//!
//! ## Architecture
//!
//! - **SessionHub**: Tracks live sessions and their outbound channels
//! - **Handler**: Handles WebSocket upgrade and per-session message flow
//! - **Messages**: Defines client and server message formats
//!
//! ## Example
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:8050/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'select_report_type', value: 'Yearly Statistics'}));
//!   ws.send(JSON.stringify({type: 'select_year', value: 1990}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'panel') document.getElementById('output-container').innerHTML = msg.html;
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{HubConfig, HubError, SessionHub, SessionId};
pub use messages::{ClientMessage, ServerMessage};
