//! WebSocket Message Types
//!
//! Defines all message types exchanged between the browser page and a
//! dashboard session.

use serde::{Deserialize, Serialize};

use crate::dashboard::{
    panel_html, validate_year, Command, Panel, ReportType, SelectionError, Update,
};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// The report-type dropdown changed
    SelectReportType {
        /// Selected option value, `null` when cleared
        #[serde(default)]
        value: Option<String>,
    },
    /// The year dropdown changed
    SelectYear {
        /// Selected year, `null` when cleared
        #[serde(default)]
        value: Option<i32>,
    },
    /// Ping for keepalive
    Ping,
}

impl ClientMessage {
    /// Convert a selection message into a dispatcher command
    ///
    /// Returns `Ok(None)` for control messages such as `Ping`.
    pub fn into_command(self) -> Result<Option<Command>, SelectionError> {
        match self {
            ClientMessage::SelectReportType { value } => {
                let report_type = match value.as_deref().map(str::trim) {
                    None | Some("") => None,
                    Some(s) => Some(s.parse::<ReportType>()?),
                };
                Ok(Some(Command::SelectReportType(report_type)))
            }
            ClientMessage::SelectYear { value } => {
                let year = value.map(validate_year).transpose()?;
                Ok(Some(Command::SelectYear(year)))
            }
            ClientMessage::Ping => Ok(None),
        }
    }
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Session established, with the initial output
    Connected {
        /// Unique session identifier
        session_id: String,
        /// Initial year-selector disabled flag
        year_disabled: bool,
        /// Initial output region HTML
        html: String,
    },
    /// New year-selector disabled flag
    YearDisabled { disabled: bool },
    /// New output region content
    Panel {
        /// Rendered HTML for the output region
        html: String,
        /// Declarative content the HTML was rendered from
        panel: Panel,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}

impl From<Update> for ServerMessage {
    fn from(update: Update) -> Self {
        match update {
            Update::YearDisabled(disabled) => ServerMessage::YearDisabled { disabled },
            Update::Panel(panel) => ServerMessage::Panel {
                html: panel_html(&panel),
                panel,
            },
        }
    }
}
