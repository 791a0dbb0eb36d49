//! Dataset Loading
//!
//! Loads the historical automobile sales CSV into an immutable, in-memory
//! [`Dataset`] once at startup:
//!
//! - **types**: Core data structures (Record, Month, Dataset)
//! - **loader**: CSV parsing from a URL, a file or any reader
//! - **error**: Error types
//!
//! # Load Path
//!
//! ```text
//! Source (URL | path) → bytes → header check → typed Records → Dataset
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use autodash::dataset::{load, DatasetSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = DatasetSource::parse("./historical_automobile_sales.csv");
//!     let dataset = load(&source).await?;
//!
//!     println!("Loaded {} records", dataset.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod loader;
pub mod types;

pub use error::{LoadError, LoadResult};
pub use loader::{load, load_with_timeout, parse_csv, DatasetSource, REQUIRED_COLUMNS};
pub use types::{Dataset, DatasetSummary, Month, Record};
