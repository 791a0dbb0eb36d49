//! Command Dispatcher
//!
//! Every user interaction becomes a `Command`. A `Dispatcher` owns one
//! session's `SelectionState`, applies commands one at a time, re-evaluates
//! the affected rules and returns the resulting `Update`s.
//!
//! `spawn_session` runs a dispatcher on its own tokio task: commands queue on
//! an unbounded channel and are handled strictly in order, so a new
//! interaction waits until the previous evaluation finished.

use super::rules::{chart_panel, year_disabled, Panel};
use super::selection::{ReportType, SelectionState};
use crate::dataset::Dataset;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// An input event from the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// The report-type dropdown changed (`None` = cleared)
    SelectReportType(Option<ReportType>),
    /// The year dropdown changed (`None` = cleared)
    SelectYear(Option<i32>),
}

/// A new output value published after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// New disabled flag for the year selector
    YearDisabled(bool),
    /// New content for the output region
    Panel(Panel),
}

/// Applies commands to one session's selection
pub struct Dispatcher {
    dataset: Arc<Dataset>,
    state: SelectionState,
}

impl Dispatcher {
    /// Create a dispatcher in the initial (nothing selected) state
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_state(dataset, SelectionState::new())
    }

    /// Create a dispatcher starting from a given selection
    pub fn with_state(dataset: Arc<Dataset>, state: SelectionState) -> Self {
        Self { dataset, state }
    }

    /// Current selection
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Evaluate both rules against the current selection
    pub fn snapshot(&self) -> (bool, Panel) {
        (
            year_disabled(self.state.report_type),
            chart_panel(&self.dataset, &self.state),
        )
    }

    /// Apply a command and return the outputs that depend on it
    ///
    /// A report-type change re-evaluates both rules; a year change only
    /// affects the chart panel.
    pub fn dispatch(&mut self, command: Command) -> Vec<Update> {
        tracing::debug!(command = ?command, "Dispatching command");

        match command {
            Command::SelectReportType(report_type) => {
                self.state.report_type = report_type;
                vec![
                    Update::YearDisabled(year_disabled(report_type)),
                    Update::Panel(chart_panel(&self.dataset, &self.state)),
                ]
            }
            Command::SelectYear(year) => {
                self.state.year = year;
                vec![Update::Panel(chart_panel(&self.dataset, &self.state))]
            }
        }
    }
}

/// The session task has stopped and accepts no more commands
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Session closed")]
pub struct SessionClosed;

/// Handle to a running session task
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Queue a command for the session
    pub fn send(&self, command: Command) -> Result<(), SessionClosed> {
        self.commands.send(command).map_err(|_| SessionClosed)
    }

    /// Stop the session task
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Run a dispatcher on its own task
///
/// Returns the command handle and the stream of published updates. The task
/// ends when the handle is dropped or the update receiver goes away.
pub fn spawn_session(mut dispatcher: Dispatcher) -> (SessionHandle, mpsc::UnboundedReceiver<Update>) {
    let (command_tx, mut command_rx) = mpsc::unbounded_channel::<Command>();
    let (update_tx, update_rx) = mpsc::unbounded_channel::<Update>();

    let task = tokio::spawn(async move {
        while let Some(command) = command_rx.recv().await {
            for update in dispatcher.dispatch(command) {
                if update_tx.send(update).is_err() {
                    tracing::debug!("Update receiver dropped, ending session");
                    return;
                }
            }
        }
    });

    (
        SessionHandle {
            commands: command_tx,
            task,
        },
        update_rx,
    )
}
