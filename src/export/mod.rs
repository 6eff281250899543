//! Table export.
//!
//! [`export`] serializes a table into the bytes of a CSV file or a single-sheet `.xlsx`
//! workbook. [`export_artifact`] additionally derives the download name and MIME type.
//!
//! Loading an exported buffer back with the same format reproduces the table's shape, column
//! order and non-missing values. Missing cells come back as missing in both formats; text
//! cells holding the empty string come back as missing too. Whole-valued float columns come
//! back as integers from spreadsheets.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;

use std::path::Path;

use crate::error::SweepResult;
use crate::format::ExportFormat;
use crate::types::Table;

/// Exported bytes plus what a download layer needs to offer them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name, e.g. `cleaned_sales.csv`.
    pub file_name: String,
    /// MIME type for the download.
    pub mime_type: &'static str,
    /// Format of `bytes`.
    pub format: ExportFormat,
    /// Serialized table.
    pub bytes: Vec<u8>,
}

/// Serialize `table` in `format`.
///
/// ```rust
/// use data_sweeper::export::export;
/// use data_sweeper::format::ExportFormat;
/// use data_sweeper::types::{DataType, Field, Schema, Table, Value};
///
/// let table = Table::new(
///     Schema::new(vec![Field::new("id", DataType::Int64), Field::new("name", DataType::Utf8)]),
///     vec![vec![Value::Int64(1), Value::Null]],
/// );
/// let bytes = export(&table, ExportFormat::Csv).unwrap();
/// assert_eq!(bytes, b"id,name\n1,\n");
/// ```
pub fn export(table: &Table, format: ExportFormat) -> SweepResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => csv::export_csv(table),
        ExportFormat::Spreadsheet => export_excel_dispatch(table),
    }
}

/// Serialize `table` and name the result after the source it came from.
pub fn export_artifact(source: &str, table: &Table, format: ExportFormat) -> SweepResult<ExportArtifact> {
    Ok(ExportArtifact {
        file_name: output_file_name(source, format),
        mime_type: format.mime_type(),
        format,
        bytes: export(table, format)?,
    })
}

/// Download name for an export: the source's file name without its extension, prefixed with
/// `cleaned_`, with the export format's extension.
///
/// ```rust
/// use data_sweeper::export::output_file_name;
/// use data_sweeper::format::ExportFormat;
///
/// assert_eq!(output_file_name("sales.xlsx", ExportFormat::Csv), "cleaned_sales.csv");
/// assert_eq!(output_file_name("q1.report.csv", ExportFormat::Spreadsheet), "cleaned_q1.report.xlsx");
/// ```
pub fn output_file_name(source: &str, format: ExportFormat) -> String {
    let path = Path::new(source);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    format!("cleaned_{stem}.{}", format.extension())
}

fn export_excel_dispatch(table: &Table) -> SweepResult<Vec<u8>> {
    #[cfg(feature = "excel")]
    {
        excel::export_excel(table)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = table;
        Err(crate::error::SweepError::UnsupportedFormat {
            name: "spreadsheet (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_names_strip_the_original_extension() {
        assert_eq!(output_file_name("sales.xlsx", ExportFormat::Csv), "cleaned_sales.csv");
        assert_eq!(output_file_name("sales.csv", ExportFormat::Spreadsheet), "cleaned_sales.xlsx");
        assert_eq!(output_file_name("data/in/orders.xls", ExportFormat::Csv), "cleaned_orders.csv");
        assert_eq!(output_file_name("README", ExportFormat::Csv), "cleaned_README.csv");
    }

    #[test]
    fn artifact_carries_name_and_mime() {
        let table = Table::new(crate::types::Schema::new(vec![]), vec![]);
        let artifact = export_artifact("people.csv", &table, ExportFormat::Csv).unwrap();
        assert_eq!(artifact.file_name, "cleaned_people.csv");
        assert_eq!(artifact.mime_type, "text/csv");
        assert_eq!(artifact.format, ExportFormat::Csv);
    }
}
