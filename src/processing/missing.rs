//! Missing-value handling strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SweepError;
use crate::processing::reduce::{ReduceOp, reduce};
use crate::types::{DataType, Table, Value};

/// Text written into missing cells of text columns by
/// [`MissingValueStrategy::FillZeroOrPlaceholder`].
pub const TEXT_PLACEHOLDER: &str = "N/A";

/// How missing cells are handled after deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueStrategy {
    /// Leave missing cells as they are.
    #[default]
    Keep,
    /// Remove every row with at least one missing cell.
    DropRows,
    /// Numeric columns get `0`, text columns get [`TEXT_PLACEHOLDER`]; booleans are untouched.
    FillZeroOrPlaceholder,
    /// Copy the nearest preceding non-missing value down each column.
    ForwardFill,
    /// Copy the nearest following non-missing value up each column.
    BackwardFill,
    /// Numeric columns get their mean over non-missing values; other columns are untouched.
    FillMean,
}

impl MissingValueStrategy {
    /// Canonical configuration name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::DropRows => "drop_rows",
            Self::FillZeroOrPlaceholder => "fill_zero_or_placeholder",
            Self::ForwardFill => "forward_fill",
            Self::BackwardFill => "backward_fill",
            Self::FillMean => "fill_mean",
        }
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingValueStrategy {
    type Err = SweepError;

    /// Accepts the snake_case names and the labels shown by the upload UI
    /// ("Keep as is", "Drop rows", "Fill with 0", ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "keep" | "keep_as_is" | "none" => Ok(Self::Keep),
            "drop_rows" | "drop" | "dropna" => Ok(Self::DropRows),
            "fill_zero_or_placeholder" | "fill_with_0" | "fill_zero" => {
                Ok(Self::FillZeroOrPlaceholder)
            }
            "forward_fill" | "ffill" => Ok(Self::ForwardFill),
            "backward_fill" | "bfill" => Ok(Self::BackwardFill),
            "fill_mean" | "fill_with_mean" | "mean" => Ok(Self::FillMean),
            _ => Err(SweepError::InvalidConfiguration {
                message: format!("unknown missing value strategy '{s}'"),
            }),
        }
    }
}

/// Result of applying one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingOutcome {
    /// The new table.
    pub table: Table,
    /// Rows removed by [`MissingValueStrategy::DropRows`].
    pub rows_dropped: usize,
    /// Cells filled, per column index.
    pub filled: Vec<usize>,
}

/// Apply `strategy` to `table`, returning a new table.
pub fn handle_missing(table: &Table, strategy: MissingValueStrategy) -> MissingOutcome {
    let mut filled = vec![0; table.column_count()];
    match strategy {
        MissingValueStrategy::Keep => MissingOutcome {
            table: table.clone(),
            rows_dropped: 0,
            filled,
        },
        MissingValueStrategy::DropRows => {
            let out = table.filter_rows(|row| !table.row_cells(row).any(Value::is_missing));
            MissingOutcome {
                rows_dropped: table.row_count() - out.row_count(),
                table: out,
                filled,
            }
        }
        MissingValueStrategy::FillZeroOrPlaceholder => {
            let mut out = table.to_rectangular();
            for (idx, field) in table.schema.fields.iter().enumerate() {
                let fill = match field.data_type {
                    DataType::Int64 => Value::Int64(0),
                    DataType::Float64 => Value::Float64(0.0),
                    DataType::Utf8 => Value::Utf8(TEXT_PLACEHOLDER.to_string()),
                    DataType::Bool => continue,
                };
                filled[idx] = fill_column(&mut out, idx, &fill);
            }
            MissingOutcome {
                table: out,
                rows_dropped: 0,
                filled,
            }
        }
        MissingValueStrategy::ForwardFill | MissingValueStrategy::BackwardFill => {
            let mut out = table.to_rectangular();
            let backward = strategy == MissingValueStrategy::BackwardFill;
            for (idx, count) in filled.iter_mut().enumerate() {
                *count = propagate_column(&mut out, idx, backward);
            }
            MissingOutcome {
                table: out,
                rows_dropped: 0,
                filled,
            }
        }
        MissingValueStrategy::FillMean => {
            let mut out = table.to_rectangular();
            for (idx, field) in table.schema.fields.iter().enumerate() {
                if !field.data_type.is_numeric() {
                    continue;
                }
                let Some(Value::Float64(mean)) = reduce(table, &field.name, ReduceOp::Mean) else {
                    continue;
                };
                let count = fill_column(&mut out, idx, &Value::Float64(mean));
                if count > 0 && field.data_type == DataType::Int64 {
                    upcast_to_float(&mut out, idx);
                }
                filled[idx] = count;
            }
            MissingOutcome {
                table: out,
                rows_dropped: 0,
                filled,
            }
        }
    }
}

fn fill_column(table: &mut Table, idx: usize, fill: &Value) -> usize {
    let mut count = 0;
    for row in &mut table.rows {
        if row[idx].is_missing() {
            row[idx] = fill.clone();
            count += 1;
        }
    }
    count
}

/// Carry the last seen non-missing value over missing cells. Leading gaps (in scan order)
/// stay missing.
fn propagate_column(table: &mut Table, idx: usize, backward: bool) -> usize {
    let mut last: Option<Value> = None;
    let mut count = 0;
    let mut visit = |row: &mut Vec<Value>| {
        if row[idx].is_missing() {
            if let Some(v) = &last {
                row[idx] = v.clone();
                count += 1;
            }
        } else {
            last = Some(row[idx].clone());
        }
    };
    if backward {
        table.rows.iter_mut().rev().for_each(&mut visit);
    } else {
        table.rows.iter_mut().for_each(&mut visit);
    }
    count
}

fn upcast_to_float(table: &mut Table, idx: usize) {
    table.schema.fields[idx].data_type = DataType::Float64;
    for row in &mut table.rows {
        if let Value::Int64(v) = row[idx] {
            row[idx] = Value::Float64(v as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Schema};

    fn column(values: Vec<Value>, data_type: DataType) -> Table {
        let schema = Schema::new(vec![Field::new("v", data_type)]);
        Table::new(schema, values.into_iter().map(|v| vec![v]).collect())
    }

    fn values(t: &Table) -> Vec<Value> {
        t.rows.iter().map(|r| r[0].clone()).collect()
    }

    fn gappy() -> Table {
        column(
            vec![
                Value::Int64(5),
                Value::Null,
                Value::Null,
                Value::Int64(8),
                Value::Null,
            ],
            DataType::Int64,
        )
    }

    #[test]
    fn forward_fill_copies_down() {
        let out = handle_missing(&gappy(), MissingValueStrategy::ForwardFill);
        assert_eq!(
            values(&out.table),
            [5, 5, 5, 8, 8].map(Value::Int64).to_vec()
        );
        assert_eq!(out.filled, vec![3]);
    }

    #[test]
    fn backward_fill_leaves_trailing_gap() {
        let out = handle_missing(&gappy(), MissingValueStrategy::BackwardFill);
        assert_eq!(
            values(&out.table),
            vec![
                Value::Int64(5),
                Value::Int64(8),
                Value::Int64(8),
                Value::Int64(8),
                Value::Null
            ]
        );
        assert_eq!(out.filled, vec![2]);
    }

    #[test]
    fn forward_fill_leaves_leading_gap() {
        let t = column(vec![Value::Null, Value::Utf8("a".into())], DataType::Utf8);
        let out = handle_missing(&t, MissingValueStrategy::ForwardFill);
        assert_eq!(values(&out.table), vec![Value::Null, Value::Utf8("a".into())]);
    }

    #[test]
    fn fill_zero_or_placeholder_by_type() {
        let schema = Schema::new(vec![
            Field::new("i", DataType::Int64),
            Field::new("f", DataType::Float64),
            Field::new("s", DataType::Utf8),
            Field::new("b", DataType::Bool),
        ]);
        let t = Table::new(schema, vec![vec![Value::Null; 4]]);
        let out = handle_missing(&t, MissingValueStrategy::FillZeroOrPlaceholder);
        assert_eq!(
            out.table.rows[0],
            vec![
                Value::Int64(0),
                Value::Float64(0.0),
                Value::Utf8(TEXT_PLACEHOLDER.to_string()),
                Value::Null,
            ]
        );
        assert_eq!(out.filled, vec![1, 1, 1, 0]);
    }

    #[test]
    fn drop_rows_removes_any_missing() {
        let out = handle_missing(&gappy(), MissingValueStrategy::DropRows);
        assert_eq!(out.rows_dropped, 3);
        assert_eq!(values(&out.table), [5, 8].map(Value::Int64).to_vec());
    }

    #[test]
    fn fill_mean_upcasts_integer_columns() {
        let out = handle_missing(&gappy(), MissingValueStrategy::FillMean);
        assert_eq!(out.table.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(
            values(&out.table),
            [5.0, 6.5, 6.5, 8.0, 6.5].map(Value::Float64).to_vec()
        );
        assert_eq!(out.filled, vec![3]);
    }

    #[test]
    fn fill_mean_skips_all_missing_and_text_columns() {
        let t = column(vec![Value::Null, Value::Null], DataType::Float64);
        let out = handle_missing(&t, MissingValueStrategy::FillMean);
        assert_eq!(out.table, t);

        let t = column(vec![Value::Null], DataType::Utf8);
        let out = handle_missing(&t, MissingValueStrategy::FillMean);
        assert_eq!(out.filled, vec![0]);
    }

    #[test]
    fn keep_is_identity() {
        let out = handle_missing(&gappy(), MissingValueStrategy::Keep);
        assert_eq!(out.table, gappy());
    }

    #[test]
    fn parses_names_and_labels() {
        assert_eq!(
            "Forward fill".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::ForwardFill
        );
        assert_eq!(
            "fill_zero_or_placeholder".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::FillZeroOrPlaceholder
        );
        assert_eq!(
            "Keep as is".parse::<MissingValueStrategy>().unwrap(),
            MissingValueStrategy::Keep
        );
        let err = "interpolate".parse::<MissingValueStrategy>().unwrap_err();
        assert!(matches!(err, SweepError::InvalidConfiguration { .. }));
    }
}
