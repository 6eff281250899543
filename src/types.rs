//! Core data model.
//!
//! A [`Table`] is an ordered list of uniquely named, typed columns ([`Schema`]) plus row-major
//! [`Value`] storage. Tables are never mutated by the pipeline: every stage returns a new one.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

use crate::error::{SweepError, SweepResult};

/// Logical data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// `true` for `Int64` and `Float64`.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields. Order is display and export order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single cell.
///
/// [`Value::Null`] is the missing marker; it is distinct from `Utf8("")` and from zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// `true` for the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The data type of a present value; `None` for [`Value::Null`].
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Null => None,
            Self::Int64(_) => Some(DataType::Int64),
            Self::Float64(_) => Some(DataType::Float64),
            Self::Bool(_) => Some(DataType::Bool),
            Self::Utf8(_) => Some(DataType::Utf8),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

/// Text form used for CSV fields: missing is the empty string, whole floats keep a `.0`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => f.write_str(&format_float(*v)),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// Format a float so that it never reads back as an integer.
pub(crate) fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

static MISSING: Value = Value::Null;

/// Cell `col` of `row`; cells past the end of a short row read as missing.
pub(crate) fn cell_at(row: &[Value], col: usize) -> &Value {
    row.get(col).unwrap_or(&MISSING)
}

/// In-memory table.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Rows
/// shorter than the schema are read as if padded with [`Value::Null`]; extra trailing values
/// are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows without validation.
    ///
    /// Use [`Table::try_new`] to reject ragged or mistyped rows up front.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Create a table, checking unique column names, row arity and value types.
    pub fn try_new(schema: Schema, rows: Vec<Vec<Value>>) -> SweepResult<Self> {
        let mut seen = HashSet::with_capacity(schema.len());
        for name in schema.field_names() {
            if !seen.insert(name) {
                return Err(SweepError::SchemaMismatch {
                    message: format!("duplicate column name '{name}'"),
                });
            }
        }

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != schema.len() {
                return Err(SweepError::SchemaMismatch {
                    message: format!(
                        "row {row_idx} has {} values, schema has {} columns",
                        row.len(),
                        schema.len()
                    ),
                });
            }
            for (field, value) in schema.fields.iter().zip(row) {
                if let Some(dt) = value.data_type() {
                    if dt != field.data_type {
                        return Err(SweepError::SchemaMismatch {
                            message: format!(
                                "row {row_idx} column '{}': expected {:?}, got {dt:?}",
                                field.name, field.data_type
                            ),
                        });
                    }
                }
            }
        }

        Ok(Self { schema, rows })
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Iterate the values of one column, or `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value>> {
        let idx = self.schema.index_of(name)?;
        Some(self.rows.iter().map(move |row| cell_at(row, idx)))
    }

    /// Total number of missing cells.
    pub fn missing_count(&self) -> usize {
        self.rows
            .iter()
            .map(|row| self.row_cells(row).filter(|v| v.is_missing()).count())
            .sum()
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new table containing only rows that match `predicate`.
    ///
    /// The returned table preserves the original schema and row order.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// The cells of `row` across the schema width.
    pub(crate) fn row_cells<'a>(&self, row: &'a [Value]) -> impl Iterator<Item = &'a Value> {
        (0..self.column_count()).map(move |col| cell_at(row, col))
    }

    /// A copy whose rows are exactly as wide as the schema.
    pub(crate) fn to_rectangular(&self) -> Self {
        let width = self.column_count();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row: Vec<Value> = row.iter().take(width).cloned().collect();
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new table holding the columns at `indices`, in that order.
    pub(crate) fn select_indices(&self, indices: &[usize]) -> Self {
        let fields = indices.iter().map(|&i| self.schema.fields[i].clone()).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| cell_at(row, i).clone()).collect())
            .collect();
        Self {
            schema: Schema::new(fields),
            rows,
        }
    }
}

/// Tables keyed by source identifier (the original file name).
///
/// Iteration order is sorted by name so batch output is deterministic. Inserting under an
/// existing name replaces the previous table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedTableSet {
    tables: BTreeMap<String, Table>,
}

impl NamedTableSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the table for `name`; returns the replaced table, if any.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    /// Look up a table by source identifier.
    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Remove a table.
    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    /// `true` if a table exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Source identifiers in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Iterate `(name, table)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// `true` if the set holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl FromIterator<(String, Table)> for NamedTableSet {
    fn from_iter<I: IntoIterator<Item = (String, Table)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
