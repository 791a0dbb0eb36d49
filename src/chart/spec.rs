//! Chart specifications
//!
//! A `ChartSpec` is a one-shot, immutable description of a chart: its kind,
//! its data, how columns map to visual channels and its title.

use crate::aggregate::{DerivedTable, RecessionReport, YearlyReport};
use serde::Serialize;
use std::collections::BTreeMap;

/// Kind of chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

/// How table columns map onto the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mapping {
    /// Cartesian charts (line, bar)
    Axes { x: String, y: String },
    /// Pie charts
    Slices { names: String, values: String },
}

/// Declarative description of one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub mapping: Mapping,
    /// Column whose values split the data into colored series
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_by: Option<String>,
    /// Display labels for column names
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    pub data: DerivedTable,
}

impl ChartSpec {
    fn cartesian(kind: ChartKind, title: impl Into<String>, data: DerivedTable) -> Self {
        let x = data.key_columns.first().cloned().unwrap_or_default();
        let y = data.value_column.clone();
        Self {
            kind,
            title: title.into(),
            mapping: Mapping::Axes { x, y },
            color_by: None,
            labels: BTreeMap::new(),
            data,
        }
    }

    /// Line chart of the first key column against the value column
    pub fn line(title: impl Into<String>, data: DerivedTable) -> Self {
        Self::cartesian(ChartKind::Line, title, data)
    }

    /// Bar chart of the first key column against the value column
    pub fn bar(title: impl Into<String>, data: DerivedTable) -> Self {
        Self::cartesian(ChartKind::Bar, title, data)
    }

    /// Pie chart with one slice per value of the first key column
    pub fn pie(title: impl Into<String>, data: DerivedTable) -> Self {
        let names = data.key_columns.first().cloned().unwrap_or_default();
        let values = data.value_column.clone();
        Self {
            kind: ChartKind::Pie,
            title: title.into(),
            mapping: Mapping::Slices { names, values },
            color_by: None,
            labels: BTreeMap::new(),
            data,
        }
    }

    /// Builder method: split series by a key column
    pub fn color_by(mut self, column: impl Into<String>) -> Self {
        self.color_by = Some(column.into());
        self
    }

    /// Builder method: set the display label of a column
    pub fn label(mut self, column: impl Into<String>, text: impl Into<String>) -> Self {
        self.labels.insert(column.into(), text.into());
        self
    }

    /// Display label for a column, falling back to the column name
    pub fn display_name<'a>(&'a self, column: &'a str) -> &'a str {
        self.labels.get(column).map(String::as_str).unwrap_or(column)
    }
}

/// The four charts of the recession report, in panel order
pub fn recession_charts(report: &RecessionReport) -> [ChartSpec; 4] {
    [
        ChartSpec::line(
            "Average Automobile Sales (Recession Years)",
            report.sales_by_year.clone(),
        ),
        ChartSpec::bar(
            "Average Sales by Vehicle Type (Recession)",
            report.sales_by_vehicle_type.clone(),
        ),
        ChartSpec::pie(
            "Advertising Expenditure Share (Recession)",
            report.ad_spend_by_vehicle_type.clone(),
        ),
        ChartSpec::bar(
            "Effect of Unemployment Rate on Vehicle Type and Sales (Recession)",
            report.sales_by_unemployment.clone(),
        )
        .color_by("Vehicle_Type")
        .label("unemployment_rate", "Unemployment Rate")
        .label("Automobile_Sales", "Average Automobile Sales"),
    ]
}

/// The four charts of the yearly report, in panel order
pub fn yearly_charts(report: &YearlyReport) -> [ChartSpec; 4] {
    let year = report.year;
    [
        ChartSpec::line(
            "Average Automobile Sales Over the Years",
            report.sales_trend.clone(),
        ),
        ChartSpec::line(
            format!("Total Monthly Automobile Sales in {}", year),
            report.monthly_sales.clone(),
        ),
        ChartSpec::bar(
            format!("Average Vehicles Sold by Type in {}", year),
            report.sales_by_vehicle_type.clone(),
        ),
        ChartSpec::pie(
            format!("Advertising Expenditure by Type in {}", year),
            report.ad_spend_by_vehicle_type.clone(),
        ),
    ]
}
