use thiserror::Error;

use crate::format::TableFormat;

/// Convenience result type used across loading, cleaning, projection and export.
pub type SweepResult<T> = Result<T, SweepError>;

/// Error type returned by every pipeline stage.
///
/// Each error describes the failure of one table; callers processing several files decide
/// whether to skip the offending file or abort.
#[derive(Debug, Error)]
pub enum SweepError {
    /// Underlying I/O error (only produced by path-based helpers).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// File type, load format or export format is not recognized (or not compiled in).
    #[error("unsupported format: '{name}'")]
    UnsupportedFormat { name: String },

    /// The bytes could not be decoded under the declared format.
    #[error("failed to parse {format} input: {message}")]
    ParseError { format: TableFormat, message: String },

    /// A cleaning strategy or configuration document is outside the defined values.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// A column selection references a name the table does not have.
    #[error("unknown column '{column}'. available={available:?}")]
    UnknownColumn {
        column: String,
        available: Vec<String>,
    },

    /// A session was asked about a source identifier it never loaded.
    #[error("unknown source '{name}'")]
    UnknownSource { name: String },

    /// Rows do not conform to the table schema (arity, value types, duplicate names).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The writer for `format` rejected the table.
    #[error("failed to export {format}: {message}")]
    Export { format: TableFormat, message: String },
}

impl SweepError {
    pub(crate) fn parse(format: TableFormat, err: impl std::fmt::Display) -> Self {
        Self::ParseError {
            format,
            message: err.to_string(),
        }
    }

    pub(crate) fn export(format: TableFormat, err: impl std::fmt::Display) -> Self {
        Self::Export {
            format,
            message: err.to_string(),
        }
    }
}
