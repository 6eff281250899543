//! Single-column reductions over a [`crate::types::Table`].

use crate::types::{DataType, Table, Value, cell_at};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count non-missing values.
    Count,
    /// Sum numeric values, ignoring missing cells.
    Sum,
    /// Minimum numeric value, ignoring missing cells.
    Min,
    /// Maximum numeric value, ignoring missing cells.
    Max,
    /// Arithmetic mean of numeric values, ignoring missing cells. Always `Float64`.
    Mean,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - For `Sum`/`Min`/`Max`/`Mean`, returns `Some(Value::Null)` if there are no non-missing
///   values or the column is not numeric.
/// - For `Count`, always returns `Some(Value::Int64(_))`.
pub fn reduce(table: &Table, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = table.schema.index_of(column)?;
    let data_type = table.schema.fields[idx].data_type;
    let present = table.rows.iter().map(|row| cell_at(row, idx)).filter(|v| !v.is_missing());

    let out = match (op, data_type) {
        (ReduceOp::Count, _) => Value::Int64(present.count() as i64),
        (ReduceOp::Mean, dt) if dt.is_numeric() => {
            let (sum, n) = present
                .filter_map(Value::as_f64)
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            if n == 0 {
                Value::Null
            } else {
                Value::Float64(sum / n as f64)
            }
        }
        (_, DataType::Int64) => {
            let ints = present.filter_map(|v| match v {
                Value::Int64(i) => Some(*i),
                _ => None,
            });
            let acc = match op {
                ReduceOp::Sum => ints.reduce(|a, b| a.saturating_add(b)),
                ReduceOp::Min => ints.min(),
                _ => ints.max(),
            };
            acc.map(Value::Int64).unwrap_or(Value::Null)
        }
        (_, DataType::Float64) => {
            let floats = present.filter_map(Value::as_f64);
            let acc = match op {
                ReduceOp::Sum => floats.reduce(|a, b| a + b),
                ReduceOp::Min => floats.reduce(f64::min),
                _ => floats.reduce(f64::max),
            };
            acc.map(Value::Float64).unwrap_or(Value::Null)
        }
        _ => Value::Null,
    };
    Some(out)
}
