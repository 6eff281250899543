//! Unified loading entrypoint.
//!
//! Most callers should use [`load`] (declared format, default options) or
//! [`load_with_options`]. [`load_from_path`] reads a file and infers the format from its
//! extension.

use std::path::Path;

use crate::error::SweepResult;
use crate::format::TableFormat;
use crate::types::Table;

use super::csv;

/// Options controlling loading behavior.
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Extra CSV field values treated as missing (exact match). Empty fields are always
    /// missing.
    pub na_values: Vec<String>,
}

/// Parse raw bytes into a [`Table`] under the declared format.
///
/// # Examples
///
/// ```rust
/// use data_sweeper::format::TableFormat;
/// use data_sweeper::ingestion::load;
/// use data_sweeper::types::{DataType, Value};
///
/// # fn main() -> Result<(), data_sweeper::SweepError> {
/// let table = load(b"id,name\n1,Ada\n2,\n", TableFormat::Csv)?;
/// assert_eq!(table.shape(), (2, 2));
/// assert_eq!(table.schema.fields[0].data_type, DataType::Int64);
/// assert_eq!(table.rows[1][1], Value::Null);
/// # Ok(())
/// # }
/// ```
pub fn load(bytes: &[u8], format: TableFormat) -> SweepResult<Table> {
    load_with_options(bytes, format, &LoadOptions::default())
}

/// Like [`load`], with explicit [`LoadOptions`].
pub fn load_with_options(
    bytes: &[u8],
    format: TableFormat,
    options: &LoadOptions,
) -> SweepResult<Table> {
    match format {
        TableFormat::Csv => csv::load_csv_from_bytes(bytes, options),
        TableFormat::Spreadsheet => load_excel_dispatch(bytes),
    }
}

/// Parse bytes whose format is inferred from the original file name.
pub fn load_named(name: &str, bytes: &[u8], options: &LoadOptions) -> SweepResult<Table> {
    let format = TableFormat::from_file_name(name)?;
    load_with_options(bytes, format, options)
}

/// Read a file and load it, inferring the format from its extension.
pub fn load_from_path(path: impl AsRef<Path>, options: &LoadOptions) -> SweepResult<Table> {
    let path = path.as_ref();
    let name = path.to_string_lossy();
    let format = TableFormat::from_file_name(&name)?;
    let bytes = std::fs::read(path)?;
    load_with_options(&bytes, format, options)
}

fn load_excel_dispatch(bytes: &[u8]) -> SweepResult<Table> {
    #[cfg(feature = "excel")]
    {
        super::excel::load_excel_from_bytes(bytes)
    }

    #[cfg(not(feature = "excel"))]
    {
        let _ = bytes;
        Err(crate::error::SweepError::UnsupportedFormat {
            name: "spreadsheet (enable cargo feature 'excel')".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SweepError;

    #[test]
    fn load_named_rejects_unknown_extensions() {
        let err = load_named("notes.txt", b"a\n1\n", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, SweepError::UnsupportedFormat { .. }));
    }

    #[test]
    fn load_named_dispatches_csv() {
        let t = load_named("data.CSV", b"a\n1\n", &LoadOptions::default()).unwrap();
        assert_eq!(t.shape(), (1, 1));
    }

    #[test]
    fn load_from_path_reports_io_errors() {
        let err = load_from_path("definitely/not/here.csv", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, SweepError::Io(_)));
    }
}
