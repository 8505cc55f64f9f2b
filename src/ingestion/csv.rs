//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IN_MEMORY, IngestionError, IngestionResult};
use crate::types::{DataType, Field, Schema, Table, Value};

use super::infer::{self, ColumnType};

/// Ingest a comma-separated file into an in-memory [`Table`].
///
/// Rules:
///
/// - The first row is the header and names the columns.
/// - Every record must have as many cells as the header.
/// - Header names and text cells are kept verbatim; empty cells become [`Value::Null`].
/// - Surrounding whitespace is ignored when a cell is read as a number or bool.
/// - Column types are inferred from the cells.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestionResult<Table> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr).map_err(|e| e.located_at(path))
}

/// Ingest CSV data from an existing CSV reader.
///
/// The reader must be configured with `has_headers(true)`.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<Table> {
    let headers = rdr.headers()?.clone();
    if headers.is_empty() {
        return Err(IngestionError::parse(IN_MEMORY, "csv input has no header row"));
    }

    let mut column_types = vec![ColumnType::default(); headers.len()];
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let mut raw_row = Vec::with_capacity(headers.len());
        for (cell, column_type) in record.iter().zip(column_types.iter_mut()) {
            if !cell.is_empty() {
                column_type.observe(infer::text_type(cell.trim()));
            }
            raw_row.push(cell.to_owned());
        }
        raw_rows.push(raw_row);
    }

    let fields: Vec<Field> = headers
        .iter()
        .zip(column_types)
        .map(|(name, column_type)| Field::new(name, column_type.resolve()))
        .collect();

    let rows = raw_rows
        .into_iter()
        .map(|raw_row| {
            raw_row
                .into_iter()
                .zip(fields.iter())
                .map(|(raw, field)| typed_value(field.data_type, raw))
                .collect()
        })
        .collect();

    Ok(Table::new(Schema::new(fields), rows))
}

/// Converts a raw cell into the column's inferred type.
///
/// Every non-empty cell of the column was observed during inference, so conversion to the
/// column type succeeds; text is kept as-is should that ever not hold.
fn typed_value(data_type: DataType, raw: String) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }

    let trimmed = raw.trim();
    let converted = match data_type {
        DataType::Int64 => trimmed.parse::<i64>().ok().map(Value::Int64),
        DataType::Float64 => infer::parse_float(trimmed).map(Value::Float64),
        DataType::Bool => infer::parse_bool(trimmed).map(Value::Bool),
        DataType::Utf8 => None,
    };
    converted.unwrap_or(Value::Utf8(raw))
}
