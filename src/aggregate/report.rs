//! Report families
//!
//! Each report family produces exactly four derived tables. The recession
//! family only ever sees recession rows; the yearly family sees the selected
//! year, except for its trend table which spans every year.

use super::table::{group_reduce, DerivedTable, KeyColumn, Measure, Reducer};
use crate::dataset::Dataset;
use serde::Serialize;

/// Aggregates over recession periods
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecessionReport {
    /// Mean sales per recession year
    pub sales_by_year: DerivedTable,
    /// Mean sales per vehicle type
    pub sales_by_vehicle_type: DerivedTable,
    /// Total advertising expenditure per vehicle type
    pub ad_spend_by_vehicle_type: DerivedTable,
    /// Mean sales per (unemployment rate, vehicle type)
    pub sales_by_unemployment: DerivedTable,
}

/// Aggregates for a single selected year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyReport {
    pub year: i32,
    /// Mean sales per year across the whole dataset
    pub sales_trend: DerivedTable,
    /// Total sales per month of the selected year
    pub monthly_sales: DerivedTable,
    /// Mean sales per vehicle type in the selected year
    pub sales_by_vehicle_type: DerivedTable,
    /// Total advertising expenditure per vehicle type in the selected year
    pub ad_spend_by_vehicle_type: DerivedTable,
}

/// Compute the recession report
pub fn recession_report(dataset: &Dataset) -> RecessionReport {
    let rows = dataset.recession_rows();

    RecessionReport {
        sales_by_year: group_reduce(
            rows.clone(),
            &[KeyColumn::Year],
            Measure::AutomobileSales,
            Reducer::Mean,
        ),
        sales_by_vehicle_type: group_reduce(
            rows.clone(),
            &[KeyColumn::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        ),
        ad_spend_by_vehicle_type: group_reduce(
            rows.clone(),
            &[KeyColumn::VehicleType],
            Measure::AdvertisingExpenditure,
            Reducer::Sum,
        ),
        sales_by_unemployment: group_reduce(
            rows,
            &[KeyColumn::UnemploymentRate, KeyColumn::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        ),
    }
}

/// Compute the yearly report for `year`
///
/// The caller decides what to do when the year has no rows; here that simply
/// yields empty per-year tables.
pub fn yearly_report(dataset: &Dataset, year: i32) -> YearlyReport {
    let rows = dataset.year_rows(year);

    YearlyReport {
        year,
        sales_trend: group_reduce(
            dataset.records(),
            &[KeyColumn::Year],
            Measure::AutomobileSales,
            Reducer::Mean,
        ),
        monthly_sales: group_reduce(
            rows.clone(),
            &[KeyColumn::Month],
            Measure::AutomobileSales,
            Reducer::Sum,
        ),
        sales_by_vehicle_type: group_reduce(
            rows.clone(),
            &[KeyColumn::VehicleType],
            Measure::AutomobileSales,
            Reducer::Mean,
        ),
        ad_spend_by_vehicle_type: group_reduce(
            rows,
            &[KeyColumn::VehicleType],
            Measure::AdvertisingExpenditure,
            Reducer::Sum,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::GroupKey;
    use crate::dataset::{Month, Record};

    fn month(m: u8) -> Month {
        Month::new(m).unwrap()
    }

    /// Recession rows carry small sales; non-recession rows carry huge values
    /// so any leak would be obvious
    fn mixed_dataset() -> Dataset {
        Dataset::new(vec![
            Record::new(1980, month(1), true, "Sports", 10.0, 100.0, 5.0),
            Record::new(1980, month(2), true, "Trucks", 20.0, 200.0, 5.0),
            Record::new(1980, month(3), false, "Sports", 10_000.0, 90_000.0, 5.0),
            Record::new(1981, month(1), true, "Sports", 30.0, 300.0, 7.5),
            Record::new(1982, month(5), false, "Trucks", 50_000.0, 70_000.0, 3.0),
            Record::new(1982, month(1), false, "Vans", 40_000.0, 60_000.0, 3.0),
        ])
    }

    #[test]
    fn test_recession_uses_only_recession_rows() {
        let report = recession_report(&mixed_dataset());

        assert_eq!(report.sales_by_year.len(), 2);
        assert_eq!(report.sales_by_year.get(&[GroupKey::Int(1980)]), Some(15.0));
        assert_eq!(report.sales_by_year.get(&[GroupKey::Int(1981)]), Some(30.0));
        assert_eq!(report.sales_by_year.get(&[GroupKey::Int(1982)]), None);

        assert_eq!(report.sales_by_vehicle_type.get(&["Sports".into()]), Some(20.0));
        assert_eq!(report.sales_by_vehicle_type.get(&["Trucks".into()]), Some(20.0));
        assert_eq!(report.sales_by_vehicle_type.get(&["Vans".into()]), None);

        assert_eq!(report.ad_spend_by_vehicle_type.get(&["Sports".into()]), Some(400.0));
        assert_eq!(report.ad_spend_by_vehicle_type.get(&["Trucks".into()]), Some(200.0));

        for row in &report.sales_by_unemployment.rows {
            assert!(row.value < 1000.0, "non-recession row leaked: {:?}", row);
        }
        assert_eq!(report.sales_by_unemployment.key_columns, vec!["unemployment_rate", "Vehicle_Type"]);
        assert_eq!(
            report.sales_by_unemployment.get(&[GroupKey::Real(5.0), "Sports".into()]),
            Some(10.0)
        );
    }

    #[test]
    fn test_yearly_trend_spans_all_years() {
        let report = yearly_report(&mixed_dataset(), 1980);

        assert_eq!(report.sales_trend.len(), 3);
        assert_eq!(report.sales_trend.get(&[GroupKey::Int(1982)]), Some(45_000.0));
    }

    #[test]
    fn test_yearly_tables_use_only_selected_year() {
        let report = yearly_report(&mixed_dataset(), 1982);

        let months: Vec<_> = report.monthly_sales.rows.iter().map(|r| r.keys[0].clone()).collect();
        assert_eq!(months, vec![GroupKey::Int(1), GroupKey::Int(5)]);
        assert_eq!(report.monthly_sales.get(&[GroupKey::Int(1)]), Some(40_000.0));

        assert_eq!(report.sales_by_vehicle_type.len(), 2);
        assert_eq!(report.sales_by_vehicle_type.get(&["Sports".into()]), None);
        assert_eq!(report.ad_spend_by_vehicle_type.get(&["Trucks".into()]), Some(70_000.0));
    }

    #[test]
    fn test_yearly_report_for_absent_year_is_empty() {
        let report = yearly_report(&mixed_dataset(), 1999);

        assert!(report.monthly_sales.is_empty());
        assert!(report.sales_by_vehicle_type.is_empty());
        assert!(report.ad_spend_by_vehicle_type.is_empty());
        assert!(!report.sales_trend.is_empty());
    }
}
