#![cfg(feature = "excel")]

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};

use crate::error::{SweepError, SweepResult};
use crate::format::TableFormat;
use crate::types::{Table, Value};

/// Name of the single worksheet in exported workbooks.
pub const SHEET_NAME: &str = "Sheet1";

const MAX_ROWS: usize = 1_048_576;
const MAX_COLS: usize = 16_384;

/// Largest integer magnitude a worksheet number (an `f64`) holds exactly.
const MAX_EXACT_INT: u64 = 1 << 53;

/// Serialize `table` as a single-sheet `.xlsx` workbook: header row, then data rows, no index
/// column.
///
/// Missing cells and non-finite floats are left blank. A row with no values at all gets an
/// explicit blank cell so the sheet still spans it. Integers beyond ±2^53 cannot be stored
/// exactly and fail with [`SweepError::Export`].
pub fn export_excel(table: &Table) -> SweepResult<Vec<u8>> {
    if table.row_count() + 1 > MAX_ROWS || table.column_count() > MAX_COLS {
        return Err(SweepError::export(
            TableFormat::Spreadsheet,
            format!(
                "table of {} rows x {} columns exceeds the worksheet limit of {MAX_ROWS} x {MAX_COLS}",
                table.row_count(),
                table.column_count()
            ),
        ));
    }
    for (row_idx, row) in table.rows.iter().enumerate() {
        for (field, value) in table.schema.fields.iter().zip(row) {
            if let Value::Int64(v) = value {
                if v.unsigned_abs() > MAX_EXACT_INT {
                    return Err(SweepError::export(
                        TableFormat::Spreadsheet,
                        format!(
                            "row {row_idx} column '{}': integer {v} exceeds the exact range of a worksheet number",
                            field.name
                        ),
                    ));
                }
            }
        }
    }
    write_workbook(table).map_err(|e| SweepError::export(TableFormat::Spreadsheet, e))
}

fn write_workbook(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name(SHEET_NAME)?;

    for (col, name) in table.schema.field_names().enumerate() {
        ws.write_string(0, col as ColNum, name)?;
    }

    let blank = Format::new().set_num_format("@");
    for (row_idx, row) in table.rows.iter().enumerate() {
        let r = (row_idx + 1) as RowNum;
        if table.row_cells(row).all(is_blank) {
            ws.write_blank(r, 0, &blank)?;
            continue;
        }
        for (col, value) in table.row_cells(row).enumerate() {
            let c = col as ColNum;
            match value {
                Value::Null => {}
                Value::Int64(v) => {
                    ws.write_number(r, c, *v as f64)?;
                }
                Value::Float64(v) if v.is_finite() => {
                    ws.write_number(r, c, *v)?;
                }
                Value::Float64(_) => {}
                Value::Bool(v) => {
                    ws.write_boolean(r, c, *v)?;
                }
                Value::Utf8(s) => {
                    ws.write_string(r, c, s)?;
                }
            }
        }
    }

    wb.save_to_buffer()
}

/// `true` if `value` produces no worksheet cell.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Float64(v) => !v.is_finite(),
        Value::Utf8(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Reader, Xlsx, open_workbook_from_rs};

    use super::{SHEET_NAME, export_excel};
    use crate::error::SweepError;
    use crate::types::{DataType, Field, Schema, Table, Value};

    fn open(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
        open_workbook_from_rs(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn produces_a_zip_container() {
        let schema = Schema::new(vec![Field::new("x", DataType::Int64)]);
        let t = Table::new(schema, vec![vec![Value::Int64(1)], vec![Value::Null]]);
        let bytes = export_excel(&t).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn writes_one_sheet_named_sheet1() {
        let schema = Schema::new(vec![Field::new("x", DataType::Utf8)]);
        let t = Table::new(schema, vec![vec![Value::Utf8("a".into())]]);
        let wb = open(export_excel(&t).unwrap());
        assert_eq!(wb.sheet_names(), vec![SHEET_NAME.to_string()]);
        assert_eq!(SHEET_NAME, "Sheet1");
    }

    #[test]
    fn all_missing_rows_stay_inside_the_sheet_dimension() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64),
            Field::new("b", DataType::Utf8),
        ]);
        let t = Table::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Utf8("x".into())],
                vec![Value::Null, Value::Null],
                vec![Value::Null, Value::Utf8(String::new())],
            ],
        );
        let mut wb = open(export_excel(&t).unwrap());
        let reader = wb.worksheet_cells_reader(SHEET_NAME).unwrap();
        assert_eq!(reader.dimensions().end.0, 3);
    }

    #[test]
    fn integers_beyond_f64_precision_are_rejected() {
        let schema = Schema::new(vec![Field::new("id", DataType::Int64)]);
        let exact = Table::new(
            schema.clone(),
            vec![vec![Value::Int64(1 << 53)], vec![Value::Int64(-(1 << 53))]],
        );
        assert!(export_excel(&exact).is_ok());

        let t = Table::new(schema, vec![vec![Value::Int64(9_007_199_254_740_993)]]);
        let err = export_excel(&t).unwrap_err();
        assert!(matches!(err, SweepError::Export { .. }));
        assert!(err.to_string().contains("9007199254740993"));
    }
}
