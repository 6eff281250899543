#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};

use crate::error::{SweepError, SweepResult};
use crate::format::TableFormat;
use crate::types::{DataType, Field, Schema, Table, Value};

use super::infer::{TypeEvidence, normalize_headers};

/// Load a workbook (`.xlsx`, `.xls`, `.ods`, etc.) from memory into a [`Table`].
///
/// Behavior:
/// - Uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Converts cells into typed `Value`s; each column gets one inferred type
/// - For `.xlsx`, trailing rows inside the sheet's declared dimension that hold no values
///   load as all-missing rows
pub fn load_excel_from_bytes(bytes: &[u8]) -> SweepResult<Table> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| SweepError::parse(TableFormat::Spreadsheet, e))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| SweepError::parse(TableFormat::Spreadsheet, "workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| SweepError::parse(TableFormat::Spreadsheet, e))?;

    let last_row = match &mut workbook {
        Sheets::Xlsx(xlsx) => xlsx
            .worksheet_cells_reader(&sheet)
            .ok()
            .map(|reader| reader.dimensions().end.0),
        _ => None,
    };

    load_sheet_range(&sheet, &range, last_row)
}

/// `last_row` is the absolute index of the sheet's last row when the format records it.
fn load_sheet_range(sheet: &str, range: &Range<Data>, last_row: Option<u32>) -> SweepResult<Table> {
    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .ok_or_else(|| {
            SweepError::parse(
                TableFormat::Spreadsheet,
                format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
            )
        })?;

    let mut rows_iter = range.rows().skip(header_row_idx);
    let header_cells: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(cell_to_header_string).collect())
        .unwrap_or_default();
    let names = normalize_headers(header_cells);
    let width = names.len();

    let mut raw_rows: Vec<Vec<Value>> = rows_iter
        .map(|row| {
            (0..width)
                .map(|col| convert_cell(row.get(col).unwrap_or(&Data::Empty)))
                .collect()
        })
        .collect();

    let header_row = range.start().map_or(0, |(r, _)| r) as usize + header_row_idx;
    if let Some(last) = last_row {
        let declared = (last as usize).saturating_sub(header_row);
        if declared > raw_rows.len() {
            raw_rows.resize(declared, vec![Value::Null; width]);
        }
    }

    let mut evidence = vec![TypeEvidence::default(); width];
    for row in &raw_rows {
        for (ev, value) in evidence.iter_mut().zip(row) {
            ev.observe_value(value);
        }
    }
    let fields: Vec<Field> = names
        .into_iter()
        .zip(evidence)
        .map(|(name, ev)| Field::new(name, ev.resolve()))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|row| {
            fields
                .iter()
                .zip(row)
                .map(|(field, value)| coerce(value, field.data_type))
                .collect()
        })
        .collect();

    Ok(Table::new(Schema::new(fields), rows))
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Error(_) | Data::Empty => String::new(),
        other => cell_to_string(other),
    }
}

fn cell_to_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        _ => c.to_string(),
    }
}

/// Native cell value before the column type is known. Error cells count as missing.
fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => Value::Utf8(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            Value::Utf8(cell_to_string(c))
        }
    }
}

/// Bring a native value into the column's inferred type.
fn coerce(value: Value, data_type: DataType) -> Value {
    match (value, data_type) {
        (Value::Null, _) => Value::Null,
        (Value::Float64(f), DataType::Int64) => Value::Int64(f as i64),
        (Value::Int64(i), DataType::Float64) => Value::Float64(i as f64),
        (Value::Int64(i), DataType::Utf8) => Value::Utf8(i.to_string()),
        (Value::Float64(f), DataType::Utf8) => Value::Utf8(f.to_string()),
        (Value::Bool(b), DataType::Utf8) => Value::Utf8(b.to_string()),
        (v, _) => v,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_follows_column_type() {
        assert_eq!(coerce(Value::Float64(3.0), DataType::Int64), Value::Int64(3));
        assert_eq!(coerce(Value::Int64(3), DataType::Float64), Value::Float64(3.0));
        assert_eq!(coerce(Value::Bool(true), DataType::Utf8), Value::Utf8("true".into()));
        assert_eq!(coerce(Value::Null, DataType::Utf8), Value::Null);
    }

    #[test]
    fn header_strings_drop_float_suffix() {
        assert_eq!(cell_to_header_string(&Data::Float(2024.0)), "2024");
        assert_eq!(cell_to_header_string(&Data::Empty), "");
        assert_eq!(cell_to_header_string(&Data::String("name".into())), "name");
    }

    #[test]
    fn garbage_bytes_are_parse_errors() {
        let err = load_excel_from_bytes(b"id,name\n1,Ada\n").unwrap_err();
        assert!(matches!(err, SweepError::ParseError { format: TableFormat::Spreadsheet, .. }));
    }
}
