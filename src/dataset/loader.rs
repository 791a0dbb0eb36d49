//! CSV Loader
//!
//! Reads the automobile sales CSV from an HTTP(S) URL or a local file.
//! Column presence and types are checked up front; any violation fails
//! the whole load.

use super::error::{LoadError, LoadResult};
use super::types::{Dataset, Month, Record};
use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Columns that must be present in the header row, by exact name
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "Year",
    "Month",
    "Recession",
    "Vehicle_Type",
    "Automobile_Sales",
    "Advertising_Expenditure",
    "unemployment_rate",
];

/// Where the dataset comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Url(String),
    Path(PathBuf),
}

impl DatasetSource {
    /// Classify a location string: `http://` and `https://` are URLs,
    /// everything else is a filesystem path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load the dataset from its source
///
/// No retries: any failure is returned to the caller.
pub async fn load(source: &DatasetSource) -> LoadResult<Dataset> {
    load_with_timeout(source, Duration::from_secs(30)).await
}

/// Load the dataset, bounding a remote fetch by `timeout`
pub async fn load_with_timeout(source: &DatasetSource, timeout: Duration) -> LoadResult<Dataset> {
    tracing::info!(source = %source, "Loading dataset");

    let dataset = match source {
        DatasetSource::Url(url) => {
            let body = fetch(url, timeout).await?;
            parse_csv(body.as_bytes())?
        }
        DatasetSource::Path(path) => {
            let file = std::fs::File::open(path)?;
            parse_csv(file)?
        }
    };

    tracing::info!(records = dataset.len(), "Dataset loaded");
    Ok(dataset)
}

async fn fetch(url: &str, timeout: Duration) -> LoadResult<String> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response.text().await?)
}

/// Column positions resolved from the header row
struct ColumnIndex {
    year: usize,
    month: usize,
    recession: usize,
    vehicle_type: usize,
    automobile_sales: usize,
    advertising_expenditure: usize,
    unemployment_rate: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::StringRecord) -> LoadResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            year: find(REQUIRED_COLUMNS[0])?,
            month: find(REQUIRED_COLUMNS[1])?,
            recession: find(REQUIRED_COLUMNS[2])?,
            vehicle_type: find(REQUIRED_COLUMNS[3])?,
            automobile_sales: find(REQUIRED_COLUMNS[4])?,
            advertising_expenditure: find(REQUIRED_COLUMNS[5])?,
            unemployment_rate: find(REQUIRED_COLUMNS[6])?,
        })
    }
}

/// Parse CSV data from any reader into a dataset
pub fn parse_csv<R: Read>(reader: R) -> LoadResult<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        records.push(parse_record(&row, &columns, line)?);
    }

    Ok(Dataset::new(records))
}

fn parse_record(row: &csv::StringRecord, columns: &ColumnIndex, line: u64) -> LoadResult<Record> {
    let field = |idx: usize| row.get(idx).unwrap_or("");
    let invalid = |column: &'static str, value: &str| LoadError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    };

    let year_str = field(columns.year);
    let year = year_str
        .parse::<i32>()
        .map_err(|_| invalid("Year", year_str))?;

    let month_str = field(columns.month);
    let month = Month::parse(month_str).ok_or_else(|| invalid("Month", month_str))?;

    let recession_str = field(columns.recession);
    let recession = parse_flag(recession_str).ok_or_else(|| invalid("Recession", recession_str))?;

    Ok(Record {
        year,
        month,
        recession,
        vehicle_type: field(columns.vehicle_type).to_string(),
        automobile_sales: parse_measure(field(columns.automobile_sales))
            .map_err(|v| invalid("Automobile_Sales", v))?,
        advertising_expenditure: parse_measure(field(columns.advertising_expenditure))
            .map_err(|v| invalid("Advertising_Expenditure", v))?,
        unemployment_rate: parse_measure(field(columns.unemployment_rate))
            .map_err(|v| invalid("unemployment_rate", v))?,
    })
}

/// Parse a 0/1 recession flag
fn parse_flag(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" => Some(false),
        _ => None,
    }
}

/// Parse an optional numeric measure; empty and NaN cells are missing
fn parse_measure(s: &str) -> Result<Option<f64>, &str> {
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(s),
    }
}
