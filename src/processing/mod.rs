//! In-memory table transformations.
//!
//! Every function here takes a [`crate::types::Table`] by reference and returns a new one; the
//! input is never modified.
//!
//! - [`clean()`]: deduplication then missing-value handling, with a [`ChangeSummary`]
//! - [`project()`]: column subset selection
//! - [`reduce()`] and [`describe()`]: statistics for previews and chart pickers
//!
//! ## Example: clean → project
//!
//! ```rust
//! use data_sweeper::processing::{clean, project, CleaningSpec, MissingValueStrategy};
//! use data_sweeper::types::{DataType, Field, Schema, Table, Value};
//!
//! let table = Table::new(
//!     Schema::new(vec![
//!         Field::new("id", DataType::Int64),
//!         Field::new("city", DataType::Utf8),
//!     ]),
//!     vec![
//!         vec![Value::Int64(1), Value::Utf8("Oslo".into())],
//!         vec![Value::Int64(2), Value::Null],
//!     ],
//! );
//!
//! let spec = CleaningSpec {
//!     remove_duplicates: false,
//!     missing_value_strategy: MissingValueStrategy::FillZeroOrPlaceholder,
//! };
//! let (cleaned, summary) = clean(&table, &spec);
//! assert_eq!(summary.cells_filled["city"], 1);
//!
//! let only_city = project(&cleaned, &["city"]).unwrap();
//! assert_eq!(only_city.rows[1], vec![Value::Utf8("N/A".into())]);
//! ```

pub mod clean;
pub mod dedup;
pub mod describe;
pub mod missing;
pub mod project;
pub mod reduce;

pub use clean::{ChangeSummary, CleaningSpec, clean, cleaning_specs_from_json};
pub use dedup::drop_duplicates;
pub use describe::{ColumnSummary, describe, dtype_counts, missing_by_column, numeric_columns};
pub use missing::{MissingOutcome, MissingValueStrategy, TEXT_PLACEHOLDER, handle_missing};
pub use project::{ColumnSelection, project, resolve_columns};
pub use reduce::{ReduceOp, reduce};
