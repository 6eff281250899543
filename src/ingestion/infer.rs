//! Column type inference and header normalization shared by the CSV and spreadsheet loaders.

use std::collections::HashSet;

use crate::types::{DataType, Value};

/// Accumulates which types every observed (non-missing) value of a column fits.
///
/// A column with no observations infers as [`DataType::Float64`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct TypeEvidence {
    seen: bool,
    int: bool,
    float: bool,
    boolean: bool,
}

impl Default for TypeEvidence {
    fn default() -> Self {
        Self {
            seen: false,
            int: true,
            float: true,
            boolean: true,
        }
    }
}

impl TypeEvidence {
    /// Observe a raw text cell.
    pub(crate) fn observe_text(&mut self, raw: &str) {
        self.seen = true;
        let trimmed = raw.trim();
        if self.int && trimmed.parse::<i64>().is_err() {
            self.int = false;
        }
        if self.float && parse_float(trimmed).is_none() {
            self.float = false;
        }
        if self.boolean && parse_bool(trimmed).is_none() {
            self.boolean = false;
        }
    }

    /// Observe an already typed cell (spreadsheets).
    pub(crate) fn observe_value(&mut self, value: &Value) {
        if !value.is_missing() {
            self.seen = true;
        }
        match value {
            Value::Null => {}
            Value::Int64(_) => self.boolean = false,
            Value::Float64(f) => {
                self.boolean = false;
                if !f.is_finite() || f.fract() != 0.0 || f.abs() >= i64::MAX as f64 {
                    self.int = false;
                }
            }
            Value::Bool(_) => {
                self.int = false;
                self.float = false;
            }
            Value::Utf8(_) => {
                self.int = false;
                self.float = false;
                self.boolean = false;
            }
        }
    }

    /// Resolve the column type. Integer evidence wins over float, float over bool.
    pub(crate) fn resolve(self) -> DataType {
        if !self.seen {
            DataType::Float64
        } else if self.int {
            DataType::Int64
        } else if self.float {
            DataType::Float64
        } else if self.boolean {
            DataType::Bool
        } else {
            DataType::Utf8
        }
    }
}

/// Parse a decimal or scientific float. `NaN`/`inf` spellings are text, not numbers.
pub(crate) fn parse_float(s: &str) -> Option<f64> {
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Parse `true`/`false` case-insensitively.
pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Convert a non-missing raw text cell into a value of an inferred column type.
///
/// Inference guarantees the parse succeeds; the text fallback only guards against callers
/// passing a type that was not inferred from this cell.
pub(crate) fn text_to_value(raw: &str, data_type: DataType) -> Value {
    let trimmed = raw.trim();
    let parsed = match data_type {
        DataType::Int64 => trimmed.parse::<i64>().ok().map(Value::Int64),
        DataType::Float64 => parse_float(trimmed).map(Value::Float64),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool),
        DataType::Utf8 => None,
    };
    parsed.unwrap_or_else(|| Value::Utf8(raw.to_owned()))
}

/// Make header names usable as unique column names.
///
/// Blank headers become `Unnamed: {index}`; repeated names get `.1`, `.2`, ... suffixes.
pub(crate) fn normalize_headers<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let named: Vec<String> = raw
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {idx}")
            } else {
                name
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::with_capacity(named.len());
    let mut out = Vec::with_capacity(named.len());
    for name in named {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while taken.contains(&candidate) {
            candidate = format!("{name}.{suffix}");
            suffix += 1;
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(values: &[&str]) -> DataType {
        let mut ev = TypeEvidence::default();
        for v in values {
            ev.observe_text(v);
        }
        ev.resolve()
    }

    #[test]
    fn infers_text_column_types() {
        assert_eq!(infer(&["1", " 2", "-3"]), DataType::Int64);
        assert_eq!(infer(&["1", "2.5"]), DataType::Float64);
        assert_eq!(infer(&["true", "FALSE"]), DataType::Bool);
        assert_eq!(infer(&["1", "x"]), DataType::Utf8);
        assert_eq!(infer(&["true", "1"]), DataType::Utf8);
        assert_eq!(infer(&[]), DataType::Float64);
    }

    #[test]
    fn infers_typed_column_types() {
        let mut ev = TypeEvidence::default();
        ev.observe_value(&Value::Float64(1.0));
        ev.observe_value(&Value::Null);
        ev.observe_value(&Value::Int64(3));
        assert_eq!(ev.resolve(), DataType::Int64);

        ev.observe_value(&Value::Float64(2.5));
        assert_eq!(ev.resolve(), DataType::Float64);

        ev.observe_value(&Value::Utf8("x".into()));
        assert_eq!(ev.resolve(), DataType::Utf8);
    }

    #[test]
    fn columns_without_values_are_float() {
        let mut ev = TypeEvidence::default();
        ev.observe_value(&Value::Null);
        ev.observe_value(&Value::Null);
        assert_eq!(ev.resolve(), DataType::Float64);
    }

    #[test]
    fn nan_and_infinity_spellings_are_text() {
        assert_eq!(infer(&["Nan", "Inf"]), DataType::Utf8);
        assert_eq!(infer(&["1.5", "infinity"]), DataType::Utf8);
        assert_eq!(infer(&["-NaN"]), DataType::Utf8);
        assert_eq!(infer(&["1e3", "-2.5E-2"]), DataType::Float64);
        assert_eq!(parse_float("inf"), None);
        assert_eq!(parse_float(" 4.0"), None);
        assert_eq!(parse_float("4.0"), Some(4.0));
    }

    #[test]
    fn text_to_value_keeps_untrimmed_text() {
        assert_eq!(text_to_value(" 7 ", DataType::Int64), Value::Int64(7));
        assert_eq!(text_to_value(" a ", DataType::Utf8), Value::Utf8(" a ".into()));
        assert_eq!(text_to_value("True", DataType::Bool), Value::Bool(true));
    }

    #[test]
    fn normalizes_blank_and_duplicate_headers() {
        let headers = normalize_headers(
            ["id", "", "id", "id.1", "id"].iter().map(|s| s.to_string()),
        );
        assert_eq!(headers, vec!["id", "Unnamed: 1", "id.1", "id.1.1", "id.2"]);
    }
}
