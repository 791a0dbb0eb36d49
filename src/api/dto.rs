//! Data Transfer Objects
//!
//! Request and response types for the HTTP endpoints.
//! These types are serialized/deserialized to/from JSON and query strings.

use serde::{Deserialize, Serialize};

use crate::dashboard::{Panel, SelectionError, SelectionState};
use crate::dataset::DatasetSummary;

// ============================================
// SELECTION DTOs
// ============================================

/// Selection as submitted by the dashboard form
///
/// Both fields arrive as raw strings: the form sends `""` for an unset
/// dropdown.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionParams {
    #[serde(default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl TryFrom<SelectionParams> for SelectionState {
    type Error = SelectionError;

    fn try_from(params: SelectionParams) -> Result<Self, Self::Error> {
        SelectionState::from_params(params.report_type.as_deref(), params.year.as_deref())
    }
}

/// Output of both rules for one selection
#[derive(Debug, Serialize)]
pub struct PanelResponse {
    pub selection: SelectionState,
    pub year_disabled: bool,
    pub panel: Panel,
}

// ============================================
// OPTIONS DTOs
// ============================================

/// One dropdown option
#[derive(Debug, Serialize)]
pub struct OptionDto {
    pub label: String,
    pub value: String,
}

/// Choices offered by the two dropdowns
#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub report_types: Vec<OptionDto>,
    pub years: Vec<i32>,
}

// ============================================
// DATASET DTOs
// ============================================

/// Description of the loaded dataset
#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub source: String,
    #[serde(flatten)]
    pub summary: DatasetSummary,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Dataset status: "ok" or "empty"
    pub dataset: String,
    /// Number of loaded records
    pub records: usize,
    /// Number of live sessions
    pub sessions: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
