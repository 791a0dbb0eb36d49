//! Selection State
//!
//! The two user-controlled fields that drive every derived output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

/// First year offered by the year selector
pub const FIRST_YEAR: i32 = 1980;

/// Last year offered by the year selector
pub const LAST_YEAR: i32 = 2023;

/// Report families the user can choose between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "Yearly Statistics")]
    Yearly,
    #[serde(rename = "Recession Period Statistics")]
    Recession,
}

impl ReportType {
    /// All report types, in dropdown order
    pub const ALL: [ReportType; 2] = [ReportType::Yearly, ReportType::Recession];

    /// Value submitted by the selector (also its display label)
    pub fn value(self) -> &'static str {
        match self {
            ReportType::Yearly => "Yearly Statistics",
            ReportType::Recession => "Recession Period Statistics",
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for ReportType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.value() == s.trim())
            .ok_or_else(|| SelectionError::UnknownReportType(s.to_string()))
    }
}

/// Errors for selections arriving from outside the dropdowns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown report type: {0:?}")]
    UnknownReportType(String),

    #[error("Year {0} is outside 1980-2023")]
    YearOutOfRange(i32),

    #[error("Invalid year: {0:?}")]
    InvalidYear(String),
}

/// Years offered by the year selector
pub fn year_options() -> RangeInclusive<i32> {
    FIRST_YEAR..=LAST_YEAR
}

/// Check that a year is one the selector could have produced
pub fn validate_year(year: i32) -> Result<i32, SelectionError> {
    if year_options().contains(&year) {
        Ok(year)
    } else {
        Err(SelectionError::YearOutOfRange(year))
    }
}

/// Current selection of one session
///
/// `year` is kept while another report type is active but only has meaning
/// for the yearly report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub report_type: Option<ReportType>,
    pub year: Option<i32>,
}

impl SelectionState {
    /// Initial state: nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Yearly report for `year`
    pub fn yearly(year: i32) -> Self {
        Self {
            report_type: Some(ReportType::Yearly),
            year: Some(year),
        }
    }

    /// Recession report
    pub fn recession() -> Self {
        Self {
            report_type: Some(ReportType::Recession),
            year: None,
        }
    }

    /// Builder method: set the report type
    pub fn with_report_type(mut self, report_type: Option<ReportType>) -> Self {
        self.report_type = report_type;
        self
    }

    /// Builder method: set the year
    pub fn with_year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }

    /// Build a state from raw query values; empty strings mean "unset"
    pub fn from_params(report_type: Option<&str>, year: Option<&str>) -> Result<Self, SelectionError> {
        let report_type = match report_type.map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse()?),
        };

        let year = match year.map(str::trim) {
            None | Some("") => None,
            Some(s) => {
                let y = s
                    .parse::<i32>()
                    .map_err(|_| SelectionError::InvalidYear(s.to_string()))?;
                Some(validate_year(y)?)
            }
        };

        Ok(Self { report_type, year })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_type_parse() {
        assert_eq!("Yearly Statistics".parse::<ReportType>().unwrap(), ReportType::Yearly);
        assert_eq!(
            "Recession Period Statistics".parse::<ReportType>().unwrap(),
            ReportType::Recession
        );
        assert!(matches!(
            "Monthly".parse::<ReportType>(),
            Err(SelectionError::UnknownReportType(_))
        ));
    }

    #[test]
    fn test_report_type_serde_uses_display_values() {
        let json = serde_json::to_string(&ReportType::Recession).unwrap();
        assert_eq!(json, "\"Recession Period Statistics\"");
        let parsed: ReportType = serde_json::from_str("\"Yearly Statistics\"").unwrap();
        assert_eq!(parsed, ReportType::Yearly);
    }

    #[test]
    fn test_year_options_cover_44_years() {
        assert_eq!(year_options().count(), 44);
        assert!(validate_year(1980).is_ok());
        assert!(validate_year(2023).is_ok());
        assert_eq!(validate_year(1979), Err(SelectionError::YearOutOfRange(1979)));
        assert_eq!(validate_year(2024), Err(SelectionError::YearOutOfRange(2024)));
    }

    #[test]
    fn test_from_params() {
        assert_eq!(SelectionState::from_params(None, None).unwrap(), SelectionState::new());
        assert_eq!(
            SelectionState::from_params(Some("Yearly Statistics"), Some("1990")).unwrap(),
            SelectionState::yearly(1990)
        );
        assert_eq!(
            SelectionState::from_params(Some(""), Some("")).unwrap(),
            SelectionState::new()
        );
        assert!(matches!(
            SelectionState::from_params(None, Some("19x0")),
            Err(SelectionError::InvalidYear(_))
        ));
        assert!(matches!(
            SelectionState::from_params(None, Some("1900")),
            Err(SelectionError::YearOutOfRange(1900))
        ));
    }
}
