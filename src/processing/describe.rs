//! Summary statistics for previews and chart pickers.

use std::collections::BTreeMap;

use crate::types::{DataType, Table, cell_at};

/// Descriptive statistics of one numeric column (missing cells ignored).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (`n - 1` denominator); `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

/// Summarize every numeric column, in table order.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, f)| f.data_type.is_numeric())
        .map(|(idx, field)| {
            let mut values: Vec<f64> = table
                .rows
                .iter()
                .filter_map(|row| cell_at(row, idx).as_f64())
                .filter(|v| !v.is_nan())
                .collect();
            values.sort_by(f64::total_cmp);
            summarize(&field.name, &values)
        })
        .collect()
}

fn summarize(column: &str, sorted: &[f64]) -> ColumnSummary {
    let count = sorted.len();
    let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
    let std = match (mean, count) {
        (Some(m), n) if n > 1 => {
            let var = sorted.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(var.sqrt())
        }
        _ => None,
    };
    ColumnSummary {
        column: column.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied(),
        p25: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        p75: quantile(sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Columns eligible for charting (numeric), in table order.
pub fn numeric_columns(table: &Table) -> Vec<&str> {
    table
        .schema
        .fields
        .iter()
        .filter(|f| f.data_type.is_numeric())
        .map(|f| f.name.as_str())
        .collect()
}

/// Number of columns per data type.
pub fn dtype_counts(table: &Table) -> BTreeMap<DataType, usize> {
    let mut out = BTreeMap::new();
    for field in &table.schema.fields {
        *out.entry(field.data_type).or_insert(0) += 1;
    }
    out
}

/// Missing cells per column, in table order.
pub fn missing_by_column(table: &Table) -> Vec<(&str, usize)> {
    table
        .schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, f)| {
            let n = table.rows.iter().filter(|row| cell_at(row, idx).is_missing()).count();
            (f.name.as_str(), n)
        })
        .collect()
}
