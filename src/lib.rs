//! `data-sweeper` loads uploaded tabular files (CSV, Excel) into an in-memory
//! [`types::Table`], cleans them, narrows them to a column subset and exports the result as CSV
//! or `.xlsx`.
//!
//! Every stage is a function from a table (plus parameters) to a new table:
//!
//! 1. [`ingestion::load`]: raw bytes + declared [`format::TableFormat`] → `Table`
//! 2. [`processing::clean`]: deduplication, then a [`processing::MissingValueStrategy`]
//! 3. [`processing::project`]: column subset (empty request = all columns)
//! 4. [`export::export`]: `Table` → bytes
//!
//! [`session::Session`] keeps the per-file tables of one user between those steps, and
//! [`session::sweep_file`] runs all four for a single upload.
//!
//! ## What you can load
//!
//! - **CSV**: `.csv`
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`,
//!   `.xlsb`, `.ods`
//!
//! Each column gets one inferred [`types::DataType`]:
//!
//! - [`types::DataType::Int64`]
//! - [`types::DataType::Float64`]
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//!
//! Empty cells map to [`types::Value::Null`], the missing marker.
//!
//! ## Quick example
//!
//! ```rust
//! use data_sweeper::export::export;
//! use data_sweeper::format::TableFormat;
//! use data_sweeper::ingestion::load;
//! use data_sweeper::processing::{clean, project, CleaningSpec, MissingValueStrategy};
//!
//! # fn main() -> Result<(), data_sweeper::SweepError> {
//! let raw = b"id,city,temp\n1,Oslo,4.5\n2,,\n1,Oslo,4.5\n";
//! let table = load(raw, TableFormat::Csv)?;
//!
//! let spec = CleaningSpec {
//!     remove_duplicates: true,
//!     missing_value_strategy: MissingValueStrategy::FillZeroOrPlaceholder,
//! };
//! let (cleaned, summary) = clean(&table, &spec);
//! assert_eq!(summary.duplicates_removed, 1);
//!
//! let subset = project(&cleaned, &["city", "temp"])?;
//! let csv = export(&subset, TableFormat::Csv)?;
//! assert_eq!(csv, b"city,temp\nOslo,4.5\nN/A,0.0\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: table model
//! - [`format`]: CSV / spreadsheet format handling
//! - [`ingestion`]: byte → table loading
//! - [`processing`]: cleaning, projection, statistics
//! - [`export`]: table → byte export and download naming
//! - [`session`]: per-user state and batch helpers
//! - [`observability`]: observer hooks for stage outcomes
//! - [`error`]: error type shared by all stages

pub mod error;
pub mod export;
pub mod format;
pub mod ingestion;
pub mod observability;
pub mod processing;
pub mod session;
pub mod types;

pub use error::{SweepError, SweepResult};
