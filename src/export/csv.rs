//! CSV export.

use crate::error::{SweepError, SweepResult};
use crate::format::TableFormat;
use crate::types::Table;

/// Serialize `table` as CSV: a header line, then one line per row, no index column.
///
/// Missing cells become empty fields and whole floats keep a `.0` so they load back as floats.
pub fn export_csv(table: &Table) -> SweepResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(table.schema.field_names())
        .map_err(|e| SweepError::export(TableFormat::Csv, e))?;
    for row in &table.rows {
        wtr.write_record(table.row_cells(row).map(|v| v.to_string()))
            .map_err(|e| SweepError::export(TableFormat::Csv, e))?;
    }

    wtr.into_inner()
        .map_err(|e| SweepError::export(TableFormat::Csv, e.error()))
}

#[cfg(test)]
mod tests {
    use super::export_csv;
    use crate::types::{DataType, Field, Schema, Table, Value};

    #[test]
    fn writes_header_rows_and_empty_missing_fields() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("note", DataType::Utf8),
            Field::new("score", DataType::Float64),
            Field::new("ok", DataType::Bool),
        ]);
        let t = Table::new(
            schema,
            vec![
                vec![
                    Value::Int64(1),
                    Value::Utf8("a, b".into()),
                    Value::Float64(2.0),
                    Value::Bool(true),
                ],
                vec![Value::Int64(2), Value::Null, Value::Float64(0.25), Value::Null],
            ],
        );

        let out = String::from_utf8(export_csv(&t).unwrap()).unwrap();
        assert_eq!(out, "id,note,score,ok\n1,\"a, b\",2.0,true\n2,,0.25,\n");
    }

    #[test]
    fn empty_table_is_header_only() {
        let schema = Schema::new(vec![Field::new("x", DataType::Int64)]);
        let out = export_csv(&Table::new(schema, vec![])).unwrap();
        assert_eq!(out, b"x\n");
    }
}
