//! # Autodash
//!
//! Automobile Sales Statistics Dashboard - a web dashboard over the
//! historical automobile sales dataset.
//!
//! The user picks a report type (and, for yearly statistics, a year); the
//! dashboard answers with four charts derived from the dataset, or a message
//! when there is nothing to show.
//!
//! ## Modules
//!
//! - [`dataset`]: CSV loading and the typed, immutable record table
//! - [`aggregate`]: Group-and-reduce into derived tables for each report
//! - [`chart`]: Chart specifications and SVG rendering
//! - [`dashboard`]: Selection state, rules, layout and per-session dispatch
//! - [`websocket`]: Live sessions driven from the browser
//! - [`api`]: HTTP server with Axum
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autodash::dashboard::{chart_panel, SelectionState};
//! use autodash::dataset::{load, DatasetSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = DatasetSource::parse("./historical_automobile_sales.csv");
//!     let dataset = load(&source).await?;
//!
//!     let selection = SelectionState::yearly(1990);
//!     let panel = chart_panel(&dataset, &selection);
//!
//!     println!("{}", serde_json::to_string_pretty(&panel)?);
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod websocket;

// Re-export top-level types for convenience
pub use dataset::{Dataset, DatasetSource, DatasetSummary, LoadError, LoadResult, Month, Record};

pub use aggregate::{
    group_reduce, recession_report, yearly_report, DerivedTable, GroupKey, KeyColumn, Measure,
    RecessionReport, Reducer, YearlyReport,
};

pub use chart::{render_svg, ChartKind, ChartSpec};

pub use dashboard::{
    chart_panel, year_disabled, Command, Dispatcher, Panel, ReportType, SelectionError,
    SelectionState, Update,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{ClientMessage, HubConfig, HubError, ServerMessage, SessionHub};

pub use config::{Config, ConfigError, DatasetConfig, LoggingConfig, ServerConfig};
