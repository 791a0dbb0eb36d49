//! Core data types for the automobile sales dataset
//!
//! - `Record`: one row of the source CSV
//! - `Month`: calendar month ordinal (1-12)
//! - `Dataset`: the ordered, immutable collection of records

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Calendar month, stored as its ordinal (1 = January)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Month(u8);

impl Month {
    /// Create a month from its ordinal, `None` outside 1..=12
    pub fn new(ordinal: u8) -> Option<Self> {
        (1..=12).contains(&ordinal).then_some(Self(ordinal))
    }

    /// Parse an ordinal ("3"), an abbreviation ("Mar") or a full name ("March")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::new(n);
        }

        let lower = s.to_ascii_lowercase();
        MONTH_NAMES.iter().position(|name| {
            let name = name.to_ascii_lowercase();
            lower == name || (lower.len() == 3 && name.starts_with(&lower))
        })
        .map(|idx| Self(idx as u8 + 1))
    }

    /// Ordinal value, 1-12
    pub fn ordinal(self) -> u8 {
        self.0
    }

    /// Three-letter abbreviation, e.g. "Jan"
    pub fn abbrev(self) -> &'static str {
        &MONTH_NAMES[(self.0 - 1) as usize][..3]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

/// One row of historical automobile sales
///
/// Measure columns are optional: an empty or `NaN` cell is kept as `None`
/// and the row is skipped by any reduction over that column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub year: i32,
    pub month: Month,
    /// True when the row falls in a historical recession period
    pub recession: bool,
    pub vehicle_type: String,
    pub automobile_sales: Option<f64>,
    pub advertising_expenditure: Option<f64>,
    pub unemployment_rate: Option<f64>,
}

impl Record {
    /// Create a record with all measures present
    pub fn new(
        year: i32,
        month: Month,
        recession: bool,
        vehicle_type: impl Into<String>,
        automobile_sales: f64,
        advertising_expenditure: f64,
        unemployment_rate: f64,
    ) -> Self {
        Self {
            year,
            month,
            recession,
            vehicle_type: vehicle_type.into(),
            automobile_sales: Some(automobile_sales),
            advertising_expenditure: Some(advertising_expenditure),
            unemployment_rate: Some(unemployment_rate),
        }
    }
}

/// Ordered collection of records, loaded once and never mutated
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows flagged as recession periods
    pub fn recession_rows(&self) -> impl Iterator<Item = &Record> + Clone {
        self.records.iter().filter(|r| r.recession)
    }

    /// Rows belonging to a single year
    pub fn year_rows(&self, year: i32) -> impl Iterator<Item = &Record> + Clone {
        self.records.iter().filter(move |r| r.year == year)
    }

    /// Check whether any row exists for a year
    pub fn has_year(&self, year: i32) -> bool {
        self.records.iter().any(|r| r.year == year)
    }

    /// Compute a short description of the loaded data
    pub fn summary(&self) -> DatasetSummary {
        let years: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        let vehicle_types: BTreeSet<&str> =
            self.records.iter().map(|r| r.vehicle_type.as_str()).collect();

        DatasetSummary {
            records: self.records.len(),
            recession_records: self.recession_rows().count(),
            first_year: years.first().copied(),
            last_year: years.last().copied(),
            distinct_years: years.len(),
            vehicle_types: vehicle_types.into_iter().map(String::from).collect(),
        }
    }
}

/// Descriptive statistics about a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub recession_records: usize,
    pub first_year: Option<i32>,
    pub last_year: Option<i32>,
    pub distinct_years: usize,
    pub vehicle_types: Vec<String>,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first_year, self.last_year) {
            (Some(first), Some(last)) => write!(
                f,
                "{} records ({} in recession), years {}-{}, {} vehicle types",
                self.records,
                self.recession_records,
                first,
                last,
                self.vehicle_types.len()
            ),
            _ => write!(f, "empty dataset"),
        }
    }
}
