//! CSV loading.

use crate::error::{SweepError, SweepResult};
use crate::format::TableFormat;
use crate::types::{Field, Schema, Table, Value};

use super::infer::{TypeEvidence, normalize_headers, text_to_value};
use super::unified::LoadOptions;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Load CSV bytes into a [`Table`], inferring column types.
///
/// Rules:
///
/// - The first record is the header row; blank/duplicate names are normalized.
/// - Every record must have the same number of fields as the header.
/// - An empty field (or one of `options.na_values`) is missing.
pub fn load_csv_from_bytes(bytes: &[u8], options: &LoadOptions) -> SweepResult<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    load_csv_from_reader(&mut rdr, options)
}

/// Load CSV data from an existing CSV reader.
pub fn load_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    options: &LoadOptions,
) -> SweepResult<Table> {
    let headers = rdr
        .headers()
        .map_err(|e| SweepError::parse(TableFormat::Csv, e))?
        .clone();
    if headers.is_empty() {
        return Err(SweepError::parse(TableFormat::Csv, "no columns to parse (empty input)"));
    }
    let names = normalize_headers(headers.iter().map(str::to_owned));

    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result.map_err(|e| SweepError::parse(TableFormat::Csv, e))?);
    }

    let is_missing = |raw: &str| raw.is_empty() || options.na_values.iter().any(|na| na == raw);

    let mut evidence = vec![TypeEvidence::default(); names.len()];
    for record in &records {
        for (ev, raw) in evidence.iter_mut().zip(record.iter()) {
            if !is_missing(raw) {
                ev.observe_text(raw);
            }
        }
    }

    let fields: Vec<Field> = names
        .into_iter()
        .zip(evidence)
        .map(|(name, ev)| Field::new(name, ev.resolve()))
        .collect();

    let rows = records
        .iter()
        .map(|record| {
            fields
                .iter()
                .zip(record.iter())
                .map(|(field, raw)| {
                    if is_missing(raw) {
                        Value::Null
                    } else {
                        text_to_value(raw, field.data_type)
                    }
                })
                .collect()
        })
        .collect();

    Ok(Table::new(Schema::new(fields), rows))
}
