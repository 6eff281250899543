//! File formats understood by the loader and the exporter.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::SweepError;

/// Supported tabular formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableFormat {
    /// Comma-separated values.
    Csv,
    /// Spreadsheet/workbook formats (`.xlsx`, `.xls`, `.ods`, ...). Exports are always `.xlsx`.
    Spreadsheet,
}

/// Output format chosen for a download. Same set of formats as the loader accepts.
pub type ExportFormat = TableFormat;

impl TableFormat {
    /// Parse a format from a file extension (case-insensitive, without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Infer the declared format of an uploaded file from its name.
    pub fn from_file_name(name: &str) -> Result<Self, SweepError> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| SweepError::UnsupportedFormat {
                name: name.to_string(),
            })
    }

    /// Extension (without the dot) used for exported files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Spreadsheet => "xlsx",
        }
    }

    /// MIME type handed to the download layer.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Spreadsheet => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for TableFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => f.write_str("csv"),
            Self::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

impl FromStr for TableFormat {
    type Err = SweepError;

    /// Accepts `csv`, `excel`, `spreadsheet` or any known extension (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().trim_start_matches('.');
        match token.to_ascii_lowercase().as_str() {
            "excel" | "spreadsheet" => Ok(Self::Spreadsheet),
            other => Self::from_extension(other).ok_or_else(|| SweepError::UnsupportedFormat {
                name: s.to_string(),
            }),
        }
    }
}
