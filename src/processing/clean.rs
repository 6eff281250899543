//! The cleaning engine: deduplication followed by missing-value handling.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};
use crate::types::Table;

use super::dedup::drop_duplicates;
use super::missing::{MissingValueStrategy, handle_missing};

/// Cleaning options for one source table.
///
/// Deserializes from JSON such as
/// `{"remove_duplicates": true, "missing_value_strategy": "forward_fill"}`; both fields are
/// optional and default to no-ops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningSpec {
    /// Remove rows that exactly repeat an earlier row.
    pub remove_duplicates: bool,
    /// What to do with missing cells afterwards.
    pub missing_value_strategy: MissingValueStrategy,
}

impl CleaningSpec {
    /// Parse a spec from JSON. Unknown strategies or fields are `InvalidConfiguration`.
    pub fn from_json(json: &str) -> SweepResult<Self> {
        serde_json::from_str(json).map_err(|e| SweepError::InvalidConfiguration {
            message: format!("cleaning spec: {e}"),
        })
    }
}

/// Parse a JSON object mapping source identifiers to [`CleaningSpec`]s.
pub fn cleaning_specs_from_json(json: &str) -> SweepResult<BTreeMap<String, CleaningSpec>> {
    serde_json::from_str(json).map_err(|e| SweepError::InvalidConfiguration {
        message: format!("cleaning specs: {e}"),
    })
}

/// What a [`clean`] call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    /// Rows in the input table.
    pub rows_before: usize,
    /// Rows in the output table.
    pub rows_after: usize,
    /// Rows removed by deduplication.
    pub duplicates_removed: usize,
    /// Rows removed because they held a missing cell.
    pub missing_rows_dropped: usize,
    /// Cells filled by a fill strategy, per column. Columns with no fills are omitted.
    pub cells_filled: BTreeMap<String, usize>,
}

impl ChangeSummary {
    /// Total cells filled across all columns.
    pub fn total_cells_filled(&self) -> usize {
        self.cells_filled.values().sum()
    }

    /// `true` if the cleaning pass changed nothing.
    pub fn is_unchanged(&self) -> bool {
        self.duplicates_removed == 0 && self.missing_rows_dropped == 0 && self.cells_filled.is_empty()
    }
}

/// Clean `table` according to `spec`, returning a new table and a summary of the changes.
///
/// Deduplication always runs before missing-value handling, regardless of how the spec was
/// built.
///
/// ```rust
/// use data_sweeper::processing::{clean, CleaningSpec, MissingValueStrategy};
/// use data_sweeper::types::{DataType, Field, Schema, Table, Value};
///
/// let table = Table::new(
///     Schema::new(vec![Field::new("n", DataType::Int64)]),
///     vec![vec![Value::Int64(1)], vec![Value::Null], vec![Value::Int64(1)]],
/// );
/// let spec = CleaningSpec {
///     remove_duplicates: true,
///     missing_value_strategy: MissingValueStrategy::ForwardFill,
/// };
/// let (out, summary) = clean(&table, &spec);
/// assert_eq!(out.rows, vec![vec![Value::Int64(1)], vec![Value::Int64(1)]]);
/// assert_eq!(summary.duplicates_removed, 1);
/// assert_eq!(summary.cells_filled["n"], 1);
/// ```
pub fn clean(table: &Table, spec: &CleaningSpec) -> (Table, ChangeSummary) {
    let mut summary = ChangeSummary {
        rows_before: table.row_count(),
        ..ChangeSummary::default()
    };

    let deduped;
    let input = if spec.remove_duplicates {
        let (out, removed) = drop_duplicates(table);
        summary.duplicates_removed = removed;
        deduped = out;
        &deduped
    } else {
        table
    };

    let outcome = handle_missing(input, spec.missing_value_strategy);
    summary.missing_rows_dropped = outcome.rows_dropped;
    summary.cells_filled = outcome
        .table
        .schema
        .fields
        .iter()
        .zip(&outcome.filled)
        .filter(|(_, n)| **n > 0)
        .map(|(f, n)| (f.name.clone(), *n))
        .collect();
    summary.rows_after = outcome.table.row_count();

    (outcome.table, summary)
}
