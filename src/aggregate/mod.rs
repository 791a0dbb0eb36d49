//! Aggregation Engine
//!
//! Pure functions that group dataset rows by one or more keys and reduce a
//! numeric column (mean or sum). Nothing is cached: every call derives its
//! tables fresh from the dataset.
//!
//! - **table**: `DerivedTable`, group keys and the generic `group_reduce`
//! - **report**: the recession and yearly report families
//!
//! # Pipeline
//!
//! ```text
//! Dataset → Filter (recession | year) → Group by keys → Reduce → DerivedTable
//! ```

pub mod report;
pub mod table;

pub use report::{recession_report, yearly_report, RecessionReport, YearlyReport};
pub use table::{group_reduce, DerivedRow, DerivedTable, GroupKey, KeyColumn, Measure, Reducer};
