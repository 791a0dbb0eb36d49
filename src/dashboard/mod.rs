//! Reactive Dashboard
//!
//! Selection state, the two reactive rules, the render tree and the command
//! dispatcher that ties them together.
//!
//! ## Architecture
//!
//! - **selection**: `SelectionState` and the report type enum
//! - **rules**: pure rule functions (`year_disabled`, `chart_panel`)
//! - **layout**: immutable render tree built on every dispatch
//! - **dispatcher**: single-threaded command loop owning one session's state
//!
//! ## Control Flow
//!
//! ```text
//! user input → Command → Dispatcher → rules → Update → published to session
//! ```

pub mod dispatcher;
pub mod layout;
pub mod rules;
pub mod selection;

pub use dispatcher::{spawn_session, Command, Dispatcher, SessionClosed, SessionHandle, Update};
pub use layout::{output_region, page, panel_html, render_document, Node};
pub use rules::{chart_panel, no_data_message, year_disabled, Panel, CHOOSE_REPORT_PROMPT, SELECT_YEAR_PROMPT};
pub use selection::{
    validate_year, year_options, ReportType, SelectionError, SelectionState, FIRST_YEAR, LAST_YEAR,
};
