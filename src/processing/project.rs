//! Column projection.

use std::collections::{BTreeMap, HashSet};

use crate::error::{SweepError, SweepResult};
use crate::types::Table;

/// Requested columns per source identifier.
pub type ColumnSelection = BTreeMap<String, Vec<String>>;

/// Validate a column request against `table`.
///
/// - An empty request means every column, in table order.
/// - Any unknown name fails with [`SweepError::UnknownColumn`].
/// - Repeated names keep their first position.
pub fn resolve_columns<S: AsRef<str>>(table: &Table, requested: &[S]) -> SweepResult<Vec<String>> {
    if requested.is_empty() {
        return Ok(table.column_names());
    }

    let mut seen = HashSet::with_capacity(requested.len());
    let mut out = Vec::with_capacity(requested.len());
    for name in requested {
        let name = name.as_ref();
        if table.schema.index_of(name).is_none() {
            return Err(SweepError::UnknownColumn {
                column: name.to_string(),
                available: table.column_names(),
            });
        }
        if seen.insert(name) {
            out.push(name.to_string());
        }
    }
    Ok(out)
}

/// Return a table holding exactly the requested columns, in the requested order.
///
/// Rows are carried over unchanged; see [`resolve_columns`] for how the request is validated.
pub fn project<S: AsRef<str>>(table: &Table, requested: &[S]) -> SweepResult<Table> {
    let columns = resolve_columns(table, requested)?;
    let indices: Vec<usize> = columns
        .iter()
        .filter_map(|c| table.schema.index_of(c))
        .collect();
    Ok(table.select_indices(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn xy() -> Table {
        let schema = Schema::new(vec![
            Field::new("x", DataType::Int64),
            Field::new("y", DataType::Utf8),
        ]);
        Table::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Utf8("a".into())],
                vec![Value::Int64(2), Value::Null],
            ],
        )
    }

    #[test]
    fn projects_in_requested_order() {
        let out = project(&xy(), &["y", "x"]).unwrap();
        assert_eq!(out.column_names(), vec!["y", "x"]);
        assert_eq!(out.rows[0], vec![Value::Utf8("a".into()), Value::Int64(1)]);
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn empty_request_means_all_columns() {
        let none: [&str; 0] = [];
        let out = project(&xy(), &none).unwrap();
        assert_eq!(out, xy());
    }

    #[test]
    fn unknown_column_fails() {
        let err = project(&xy(), &["z"]).unwrap_err();
        match err {
            SweepError::UnknownColumn { column, available } => {
                assert_eq!(column, "z");
                assert_eq!(available, vec!["x", "y"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn repeated_names_keep_first_position() {
        let cols = resolve_columns(&xy(), &["y", "x", "y"]).unwrap();
        assert_eq!(cols, vec!["y", "x"]);
    }
}
