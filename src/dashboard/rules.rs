//! Reactive rules
//!
//! Pure functions of (dataset, selection). Every evaluation recomputes its
//! output from scratch and fully replaces whatever was shown before.

use super::selection::{ReportType, SelectionState};
use crate::aggregate::{recession_report, yearly_report};
use crate::chart::{recession_charts, yearly_charts, ChartSpec};
use crate::dataset::Dataset;
use serde::Serialize;

/// Shown when the yearly report is chosen without a year
pub const SELECT_YEAR_PROMPT: &str =
    "Please select a year from the dropdown to see Yearly Statistics.";

/// Shown when no report type is chosen
pub const CHOOSE_REPORT_PROMPT: &str = "Choose a report type to view charts.";

/// Message for a year with no rows
pub fn no_data_message(year: i32) -> String {
    format!("No data available for year {}.", year)
}

/// Content of the output region
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Panel {
    /// A text message in place of charts
    Message { text: String },
    /// Charts laid out as rows of two
    Charts { rows: Vec<[ChartSpec; 2]> },
}

impl Panel {
    pub fn message(text: impl Into<String>) -> Self {
        Panel::Message { text: text.into() }
    }

    /// Arrange four charts as two rows of two
    pub fn grid(charts: [ChartSpec; 4]) -> Self {
        let [a, b, c, d] = charts;
        Panel::Charts {
            rows: vec![[a, b], [c, d]],
        }
    }

    /// All charts in reading order
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        let rows: &[[ChartSpec; 2]] = match self {
            Panel::Charts { rows } => rows,
            Panel::Message { .. } => &[],
        };
        rows.iter().flatten()
    }
}

/// Year-field enablement: the year selector is only usable for the yearly
/// report
pub fn year_disabled(report_type: Option<ReportType>) -> bool {
    report_type != Some(ReportType::Yearly)
}

/// Chart-panel rule
pub fn chart_panel(dataset: &Dataset, state: &SelectionState) -> Panel {
    tracing::debug!(
        report_type = ?state.report_type,
        year = ?state.year,
        "Evaluating chart panel"
    );

    match state.report_type {
        Some(ReportType::Recession) => Panel::grid(recession_charts(&recession_report(dataset))),
        Some(ReportType::Yearly) => match state.year {
            None => Panel::message(SELECT_YEAR_PROMPT),
            Some(year) if !dataset.has_year(year) => Panel::message(no_data_message(year)),
            Some(year) => Panel::grid(yearly_charts(&yearly_report(dataset, year))),
        },
        None => Panel::message(CHOOSE_REPORT_PROMPT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::dataset::{Month, Record};

    fn dataset() -> Dataset {
        let m = |n| Month::new(n).unwrap();
        Dataset::new(vec![
            Record::new(1980, m(1), true, "Sports", 10.0, 100.0, 5.0),
            Record::new(1980, m(2), false, "Trucks", 20.0, 200.0, 4.0),
            Record::new(1982, m(1), true, "Trucks", 30.0, 300.0, 6.0),
            Record::new(1982, m(3), false, "Sports", 40.0, 400.0, 3.5),
        ])
    }

    #[test]
    fn test_year_disabled_unless_yearly() {
        assert!(year_disabled(None));
        assert!(year_disabled(Some(ReportType::Recession)));
        assert!(!year_disabled(Some(ReportType::Yearly)));
    }

    #[test]
    fn test_nothing_selected_prompts_for_report() {
        let panel = chart_panel(&dataset(), &SelectionState::new());
        assert_eq!(panel, Panel::message(CHOOSE_REPORT_PROMPT));
    }

    #[test]
    fn test_yearly_without_year_prompts_for_year() {
        let state = SelectionState::new().with_report_type(Some(ReportType::Yearly));
        let panel = chart_panel(&dataset(), &state);
        assert_eq!(panel, Panel::message(SELECT_YEAR_PROMPT));
    }

    #[test]
    fn test_absent_year_reports_no_data() {
        let panel = chart_panel(&dataset(), &SelectionState::yearly(1981));
        assert_eq!(
            panel,
            Panel::Message {
                text: "No data available for year 1981.".to_string()
            }
        );
    }

    #[test]
    fn test_yearly_panel_has_two_rows_of_two() {
        let panel = chart_panel(&dataset(), &SelectionState::yearly(1982));

        match &panel {
            Panel::Charts { rows } => assert_eq!(rows.len(), 2),
            other => panic!("Expected charts, got {:?}", other),
        }
        let titles: Vec<&str> = panel.charts().map(|c| c.title.as_str()).collect();
        assert_eq!(titles[1], "Total Monthly Automobile Sales in 1982");
        assert_eq!(panel.charts().count(), 4);
    }

    #[test]
    fn test_recession_ignores_year() {
        let with_year = SelectionState::recession().with_year(Some(1981));
        let panel = chart_panel(&dataset(), &with_year);

        assert_eq!(panel, chart_panel(&dataset(), &SelectionState::recession()));
        let kinds: Vec<ChartKind> = panel.charts().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Line, ChartKind::Bar, ChartKind::Pie, ChartKind::Bar]);
    }

    #[test]
    fn test_panel_is_deterministic() {
        let data = dataset();
        for state in [SelectionState::recession(), SelectionState::yearly(1980)] {
            let first = serde_json::to_string(&chart_panel(&data, &state)).unwrap();
            let second = serde_json::to_string(&chart_panel(&data, &state)).unwrap();
            assert_eq!(first, second);
        }
    }
}
