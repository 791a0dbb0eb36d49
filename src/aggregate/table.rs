//! Derived tables
//!
//! A `DerivedTable` is the grouped-and-reduced view of a set of records.
//! Rows are ordered ascending by their key tuple, so the same input always
//! yields the same table.

use crate::dataset::Record;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// A single grouping key value
///
/// Real keys compare by IEEE total order, so equality is exact bit-level
/// value match and ordering is deterministic.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Int(i64),
    Real(f64),
    Text(String),
}

impl GroupKey {
    fn rank(&self) -> u8 {
        match self {
            GroupKey::Int(_) => 0,
            GroupKey::Real(_) => 1,
            GroupKey::Text(_) => 2,
        }
    }

    /// Numeric value of the key, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            GroupKey::Int(v) => Some(*v as f64),
            GroupKey::Real(v) => Some(*v),
            GroupKey::Text(_) => None,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Int(a), GroupKey::Int(b)) => a.cmp(b),
            (GroupKey::Real(a), GroupKey::Real(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(v) => write!(f, "{}", v),
            GroupKey::Real(v) => write!(f, "{}", v),
            GroupKey::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for GroupKey {
    fn from(v: i64) -> Self {
        GroupKey::Int(v)
    }
}

impl From<f64> for GroupKey {
    fn from(v: f64) -> Self {
        GroupKey::Real(v)
    }
}

impl From<&str> for GroupKey {
    fn from(v: &str) -> Self {
        GroupKey::Text(v.to_string())
    }
}

/// Columns a table can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyColumn {
    Year,
    Month,
    VehicleType,
    UnemploymentRate,
}

impl KeyColumn {
    /// Column name as it appears in the source CSV
    pub fn name(self) -> &'static str {
        match self {
            KeyColumn::Year => "Year",
            KeyColumn::Month => "Month",
            KeyColumn::VehicleType => "Vehicle_Type",
            KeyColumn::UnemploymentRate => "unemployment_rate",
        }
    }

    /// Extract this column's key from a record; `None` if the value is missing
    pub fn key(self, record: &Record) -> Option<GroupKey> {
        match self {
            KeyColumn::Year => Some(GroupKey::Int(record.year as i64)),
            KeyColumn::Month => Some(GroupKey::Int(record.month.ordinal() as i64)),
            KeyColumn::VehicleType => Some(GroupKey::Text(record.vehicle_type.clone())),
            // -0.0 + 0.0 is +0.0, so both zeros share one group
            KeyColumn::UnemploymentRate => record.unemployment_rate.map(|v| GroupKey::Real(v + 0.0)),
        }
    }
}

/// Numeric columns that can be reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    AutomobileSales,
    AdvertisingExpenditure,
}

impl Measure {
    pub fn name(self) -> &'static str {
        match self {
            Measure::AutomobileSales => "Automobile_Sales",
            Measure::AdvertisingExpenditure => "Advertising_Expenditure",
        }
    }

    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            Measure::AutomobileSales => record.automobile_sales,
            Measure::AdvertisingExpenditure => record.advertising_expenditure,
        }
    }
}

/// Reduction applied to each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Mean,
    Sum,
}

/// One group of a derived table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    pub keys: Vec<GroupKey>,
    pub value: f64,
}

/// Result of grouping records and reducing one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTable {
    pub key_columns: Vec<String>,
    pub value_column: String,
    pub reducer: Reducer,
    pub rows: Vec<DerivedRow>,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up the reduced value for a key tuple
    pub fn get(&self, keys: &[GroupKey]) -> Option<f64> {
        self.rows
            .binary_search_by(|row| row.keys.as_slice().cmp(keys))
            .ok()
            .map(|idx| self.rows[idx].value)
    }

    /// Distinct values of one key column, in table order of first appearance
    pub fn distinct_keys(&self, position: usize) -> Vec<GroupKey> {
        let mut seen: Vec<GroupKey> = Vec::new();
        for row in &self.rows {
            if let Some(key) = row.keys.get(position) {
                if !seen.contains(key) {
                    seen.push(key.clone());
                }
            }
        }
        seen
    }
}

/// Group `records` by `keys` and reduce `measure` with `reducer`
///
/// Rows missing the measure or any key are skipped; groups that end up with
/// no rows do not appear in the output.
pub fn group_reduce<'a, I>(
    records: I,
    keys: &[KeyColumn],
    measure: Measure,
    reducer: Reducer,
) -> DerivedTable
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut groups: BTreeMap<Vec<GroupKey>, (f64, usize)> = BTreeMap::new();

    'rows: for record in records {
        let Some(value) = measure.value(record) else {
            continue;
        };

        let mut key = Vec::with_capacity(keys.len());
        for column in keys {
            match column.key(record) {
                Some(k) => key.push(k),
                None => continue 'rows,
            }
        }

        let acc = groups.entry(key).or_insert((0.0, 0));
        acc.0 += value;
        acc.1 += 1;
    }

    let rows = groups
        .into_iter()
        .map(|(keys, (sum, count))| DerivedRow {
            keys,
            value: match reducer {
                Reducer::Sum => sum,
                Reducer::Mean => sum / count as f64,
            },
        })
        .collect();

    DerivedTable {
        key_columns: keys.iter().map(|k| k.name().to_string()).collect(),
        value_column: measure.name().to_string(),
        reducer,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Month;

    fn record(year: i32, month: u8, vehicle: &str, sales: Option<f64>, rate: Option<f64>) -> Record {
        Record {
            year,
            month: Month::new(month).unwrap(),
            recession: false,
            vehicle_type: vehicle.to_string(),
            automobile_sales: sales,
            advertising_expenditure: Some(1.0),
            unemployment_rate: rate,
        }
    }

    #[test]
    fn test_mean_by_single_key() {
        let records = vec![
            record(1980, 1, "A", Some(10.0), Some(5.0)),
            record(1980, 2, "A", Some(20.0), Some(5.0)),
            record(1981, 1, "A", Some(40.0), Some(5.0)),
        ];

        let table = group_reduce(&records, &[KeyColumn::Year], Measure::AutomobileSales, Reducer::Mean);

        assert_eq!(table.key_columns, vec!["Year"]);
        assert_eq!(table.value_column, "Automobile_Sales");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&[GroupKey::Int(1980)]), Some(15.0));
        assert_eq!(table.get(&[GroupKey::Int(1981)]), Some(40.0));
    }

    #[test]
    fn test_sum_skips_missing_values() {
        let records = vec![
            record(1980, 1, "A", Some(10.0), None),
            record(1980, 1, "A", None, None),
            record(1980, 1, "B", None, None),
        ];

        let table = group_reduce(&records, &[KeyColumn::VehicleType], Measure::AutomobileSales, Reducer::Sum);

        // "B" had no usable rows, so it is absent rather than zero
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&["A".into()]), Some(10.0));
        assert_eq!(table.get(&["B".into()]), None);
    }

    #[test]
    fn test_mean_ignores_missing_in_denominator() {
        let records = vec![
            record(1980, 1, "A", Some(10.0), None),
            record(1980, 1, "A", None, None),
            record(1980, 1, "A", Some(30.0), None),
        ];

        let table = group_reduce(&records, &[KeyColumn::VehicleType], Measure::AutomobileSales, Reducer::Mean);
        assert_eq!(table.get(&["A".into()]), Some(20.0));
    }

    #[test]
    fn test_two_key_grouping_sorted() {
        let records = vec![
            record(1980, 1, "Trucks", Some(30.0), Some(6.5)),
            record(1980, 1, "Sports", Some(10.0), Some(6.5)),
            record(1980, 1, "Sports", Some(20.0), Some(3.0)),
            record(1980, 1, "Sports", Some(50.0), None),
        ];

        let table = group_reduce(
            &records,
            &[KeyColumn::UnemploymentRate, KeyColumn::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        );

        let keys: Vec<String> = table
            .rows
            .iter()
            .map(|r| format!("{}/{}", r.keys[0], r.keys[1]))
            .collect();
        assert_eq!(keys, vec!["3/Sports", "6.5/Sports", "6.5/Trucks"]);
        assert_eq!(table.distinct_keys(1), vec![GroupKey::from("Sports"), GroupKey::from("Trucks")]);
    }

    #[test]
    fn test_signed_zero_rates_share_a_group() {
        let records = vec![
            record(1980, 1, "A", Some(10.0), Some(0.0)),
            record(1980, 2, "A", Some(30.0), Some(-0.0)),
        ];

        let table = group_reduce(
            &records,
            &[KeyColumn::UnemploymentRate, KeyColumn::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&[GroupKey::Real(0.0), "A".into()]), Some(20.0));
        assert_eq!(table.rows[0].keys[0].as_f64().map(f64::is_sign_positive), Some(true));
    }

    #[test]
    fn test_month_sorted_by_ordinal() {
        let records = vec![
            record(1980, 12, "A", Some(1.0), None),
            record(1980, 2, "A", Some(1.0), None),
            record(1980, 10, "A", Some(1.0), None),
        ];

        let table = group_reduce(&records, &[KeyColumn::Month], Measure::AutomobileSales, Reducer::Sum);
        let months: Vec<f64> = table.rows.iter().filter_map(|r| r.keys[0].as_f64()).collect();
        assert_eq!(months, vec![2.0, 10.0, 12.0]);
    }

    #[test]
    fn test_empty_input_gives_empty_table() {
        let records: Vec<Record> = Vec::new();
        let table = group_reduce(&records, &[KeyColumn::Year], Measure::AdvertisingExpenditure, Reducer::Sum);
        assert!(table.is_empty());
        assert_eq!(table.value_column, "Advertising_Expenditure");
    }

    #[test]
    fn test_group_key_serializes_untagged() {
        let keys = vec![GroupKey::Int(1980), GroupKey::Real(5.5), GroupKey::from("Sports")];
        let json = serde_json::to_string(&keys).unwrap();
        assert_eq!(json, r#"[1980,5.5,"Sports"]"#);
    }
}
