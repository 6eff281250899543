//! Exact-duplicate row removal.

use std::collections::HashSet;

use crate::types::{Table, Value};

/// Hashable view of a cell. Floats compare by bit pattern with `-0.0`/`0.0` and all NaNs
/// collapsed, so two NaN cells count as equal the same way two missing cells do.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> From<&'a Value> for CellKey<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Int64(i) => Self::Int(*i),
            Value::Float64(f) if f.is_nan() => Self::Float(f64::NAN.to_bits()),
            Value::Float64(f) if *f == 0.0 => Self::Float(0f64.to_bits()),
            Value::Float64(f) => Self::Float(f.to_bits()),
            Value::Bool(b) => Self::Bool(*b),
            Value::Utf8(s) => Self::Text(s),
        }
    }
}

/// Remove rows that exactly repeat an earlier row across all columns.
///
/// The first occurrence is kept and survivors keep their order. Returns the new table and the
/// number of rows removed.
pub fn drop_duplicates(table: &Table) -> (Table, usize) {
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
    let keep: Vec<bool> = table
        .rows
        .iter()
        .map(|row| seen.insert(table.row_cells(row).map(CellKey::from).collect()))
        .collect();

    let mut flags = keep.iter();
    let out = table.filter_rows(|_| flags.next().copied().unwrap_or(false));
    let removed = table.row_count() - out.row_count();
    (out, removed)
}

#[cfg(test)]
mod tests {
    use super::drop_duplicates;
    use crate::types::{DataType, Field, Schema, Table, Value};

    fn pairs(rows: &[(Option<i64>, &str)]) -> Table {
        let schema = Schema::new(vec![
            Field::new("n", DataType::Int64),
            Field::new("s", DataType::Utf8),
        ]);
        let rows = rows
            .iter()
            .map(|(n, s)| {
                vec![
                    n.map(Value::Int64).unwrap_or(Value::Null),
                    Value::Utf8(s.to_string()),
                ]
            })
            .collect();
        Table::new(schema, rows)
    }

    #[test]
    fn keeps_first_occurrence() {
        let t = pairs(&[(Some(1), "a"), (Some(2), "b"), (Some(1), "a")]);
        let (out, removed) = drop_duplicates(&t);
        assert_eq!(removed, 1);
        assert_eq!(out.rows, pairs(&[(Some(1), "a"), (Some(2), "b")]).rows);
    }

    #[test]
    fn missing_cells_compare_equal() {
        let t = pairs(&[(None, "a"), (Some(1), "a"), (None, "a")]);
        let (out, removed) = drop_duplicates(&t);
        assert_eq!(removed, 1);
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn is_idempotent() {
        let t = pairs(&[(Some(3), "x"), (Some(3), "x"), (Some(4), "y"), (Some(3), "x")]);
        let (once, _) = drop_duplicates(&t);
        let (twice, removed_again) = drop_duplicates(&once);
        assert_eq!(once, twice);
        assert_eq!(removed_again, 0);
    }

    #[test]
    fn signed_zero_and_nan_collapse() {
        let schema = Schema::new(vec![Field::new("f", DataType::Float64)]);
        let t = Table::new(
            schema,
            vec![
                vec![Value::Float64(0.0)],
                vec![Value::Float64(-0.0)],
                vec![Value::Float64(f64::NAN)],
                vec![Value::Float64(f64::NAN)],
            ],
        );
        let (out, removed) = drop_duplicates(&t);
        assert_eq!(removed, 2);
        assert_eq!(out.row_count(), 2);
    }
}
