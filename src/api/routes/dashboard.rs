//! Dashboard Routes
//!
//! - GET / - Full dashboard page for the selection in the query string
//! - GET /api/v1/panel - Both rule outputs as JSON
//! - GET /api/v1/panel/html - Output region HTML fragment
//! - GET /api/v1/options - Dropdown choices
//! - GET /api/v1/dataset - Loaded dataset summary

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{DatasetResponse, OptionDto, OptionsResponse, PanelResponse, SelectionParams};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::{
    chart_panel, panel_html, render_document, year_disabled, year_options, ReportType,
    SelectionState,
};

/// GET /
///
/// Renders the whole page server-side. Without JavaScript the dropdown form
/// submits back here; with it, the page switches to a live session.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> ApiResult<Html<String>> {
    let selection = SelectionState::try_from(params)?;
    let panel = chart_panel(&state.dataset, &selection);

    Ok(Html(render_document(&selection, &panel)))
}

/// GET /api/v1/panel
pub async fn panel_json(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> ApiResult<Json<PanelResponse>> {
    let selection = SelectionState::try_from(params)?;

    Ok(Json(PanelResponse {
        selection,
        year_disabled: year_disabled(selection.report_type),
        panel: chart_panel(&state.dataset, &selection),
    }))
}

/// GET /api/v1/panel/html
pub async fn panel_fragment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SelectionParams>,
) -> ApiResult<Html<String>> {
    let selection = SelectionState::try_from(params)?;
    let panel = chart_panel(&state.dataset, &selection);

    Ok(Html(panel_html(&panel)))
}

/// GET /api/v1/options
pub async fn options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        report_types: ReportType::ALL
            .into_iter()
            .map(|r| OptionDto {
                label: r.value().to_string(),
                value: r.value().to_string(),
            })
            .collect(),
        years: year_options().collect(),
    })
}

/// GET /api/v1/dataset
pub async fn dataset_summary(State(state): State<Arc<AppState>>) -> Json<DatasetResponse> {
    Json(DatasetResponse {
        source: state.source.clone(),
        summary: state.dataset.summary(),
    })
}
