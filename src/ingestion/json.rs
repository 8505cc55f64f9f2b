//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of records: `[{"a":1}, {"a":2}]`
//! - A column-oriented object of arrays: `{"a":[1,2], "b":["x","y"]}`
//! - A column-oriented object keyed by row label: `{"a":{"0":1,"1":2}, "b":{"0":"x","1":"y"}}`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Columns appear in first-seen key order. A record without some column gets [`Value::Null`]
//! there. Nested arrays/objects are kept as their compact JSON text.

use std::fs;
use std::path::Path;

use serde_json::Map;

use crate::error::{IN_MEMORY, IngestionError, IngestionResult};
use crate::types::{DataType, Field, Schema, Table, Value};

use super::infer::ColumnType;

type JsonValue = serde_json::Value;

/// Ingest a JSON file into an in-memory [`Table`].
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> IngestionResult<Table> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text).map_err(|e| e.located_at(path))
}

/// Ingest JSON from an in-memory string into a [`Table`].
pub fn ingest_json_from_str(input: &str) -> IngestionResult<Table> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::parse(IN_MEMORY, "json input is empty"));
    }

    // First try parsing as a single JSON document.
    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::Array(items)) => records_to_table(items),
        Ok(JsonValue::Object(obj)) => object_to_table(obj),
        Ok(_) => Err(IngestionError::parse(
            IN_MEMORY,
            "json must be an array of records, an object of columns, or NDJSON",
        )),
        Err(doc_err) => {
            // A single line that failed is just malformed JSON, not NDJSON.
            if !trimmed.contains('\n') {
                return Err(doc_err.into());
            }
            let mut values = Vec::new();
            for line in trimmed.lines() {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                values.push(serde_json::from_str::<JsonValue>(line)?);
            }
            records_to_table(values)
        }
    }
}

/// A top-level object maps column names to either arrays or row-label objects.
fn object_to_table(obj: Map<String, JsonValue>) -> IngestionResult<Table> {
    if obj.values().all(JsonValue::is_array) {
        columns_to_table(obj)
    } else if obj.values().all(JsonValue::is_object) {
        labeled_columns_to_table(obj)
    } else {
        Err(IngestionError::parse(
            IN_MEMORY,
            "json object must map every column to an array or to an object keyed by row label",
        ))
    }
}

fn records_to_table(values: Vec<JsonValue>) -> IngestionResult<Table> {
    let mut names: Vec<String> = Vec::new();
    let mut records: Vec<Map<String, JsonValue>> = Vec::with_capacity(values.len());

    for (idx0, v) in values.into_iter().enumerate() {
        let JsonValue::Object(obj) = v else {
            return Err(IngestionError::parse(
                IN_MEMORY,
                format!("record {} is not a json object", idx0 + 1),
            ));
        };
        for key in obj.keys() {
            if !names.iter().any(|n| n == key) {
                names.push(key.clone());
            }
        }
        records.push(obj);
    }

    let columns: Vec<Vec<JsonValue>> = names
        .iter()
        .map(|name| {
            records
                .iter_mut()
                .map(|record| record.remove(name).unwrap_or(JsonValue::Null))
                .collect()
        })
        .collect();

    Ok(build_table(names, columns, records.len()))
}

fn columns_to_table(obj: Map<String, JsonValue>) -> IngestionResult<Table> {
    let mut names = Vec::with_capacity(obj.len());
    let mut columns = Vec::with_capacity(obj.len());
    let mut row_count: Option<usize> = None;

    for (name, v) in obj {
        let JsonValue::Array(cells) = v else {
            return Err(IngestionError::parse(
                IN_MEMORY,
                format!("column '{name}' is not an array"),
            ));
        };
        match row_count {
            Some(n) if n != cells.len() => {
                return Err(IngestionError::parse(
                    IN_MEMORY,
                    format!("column '{name}' has {} values, expected {n}", cells.len()),
                ));
            }
            _ => row_count = Some(cells.len()),
        }
        names.push(name);
        columns.push(cells);
    }

    Ok(build_table(names, columns, row_count.unwrap_or(0)))
}

/// Rows follow the union of row labels in first-seen order; a column without some label gets
/// [`Value::Null`] there.
fn labeled_columns_to_table(obj: Map<String, JsonValue>) -> IngestionResult<Table> {
    let mut labels: Vec<String> = Vec::new();
    let mut names = Vec::with_capacity(obj.len());
    let mut cell_maps = Vec::with_capacity(obj.len());

    for (name, v) in obj {
        let JsonValue::Object(cells) = v else {
            return Err(IngestionError::parse(
                IN_MEMORY,
                format!("column '{name}' is not an object"),
            ));
        };
        for label in cells.keys() {
            if !labels.iter().any(|l| l == label) {
                labels.push(label.clone());
            }
        }
        names.push(name);
        cell_maps.push(cells);
    }

    let columns: Vec<Vec<JsonValue>> = cell_maps
        .into_iter()
        .map(|mut cells| {
            labels
                .iter()
                .map(|label| cells.remove(label).unwrap_or(JsonValue::Null))
                .collect()
        })
        .collect();

    Ok(build_table(names, columns, labels.len()))
}

/// Assembles a table from column-major JSON cells, inferring each column's type.
fn build_table(names: Vec<String>, columns: Vec<Vec<JsonValue>>, row_count: usize) -> Table {
    let mut fields = Vec::with_capacity(names.len());
    let mut typed_columns: Vec<Vec<Value>> = Vec::with_capacity(names.len());

    for (name, cells) in names.into_iter().zip(columns) {
        let mut column_type = ColumnType::default();
        for cell in &cells {
            if let Some(observed) = json_type(cell) {
                column_type.observe(observed);
            }
        }
        let data_type = column_type.resolve();
        typed_columns.push(cells.into_iter().map(|cell| convert_json_value(data_type, cell)).collect());
        fields.push(Field::new(name, data_type));
    }

    let mut rows: Vec<Vec<Value>> = (0..row_count).map(|_| Vec::with_capacity(fields.len())).collect();
    for column in typed_columns {
        for (row, value) in rows.iter_mut().zip(column) {
            row.push(value);
        }
    }

    Table::new(Schema::new(fields), rows)
}

fn json_type(v: &JsonValue) -> Option<DataType> {
    match v {
        JsonValue::Null => None,
        JsonValue::Bool(_) => Some(DataType::Bool),
        JsonValue::Number(n) if n.is_i64() => Some(DataType::Int64),
        JsonValue::Number(_) => Some(DataType::Float64),
        JsonValue::String(_) | JsonValue::Array(_) | JsonValue::Object(_) => Some(DataType::Utf8),
    }
}

fn convert_json_value(data_type: DataType, v: JsonValue) -> Value {
    match (data_type, v) {
        (_, JsonValue::Null) => Value::Null,
        (DataType::Bool, JsonValue::Bool(b)) => Value::Bool(b),
        (DataType::Int64, JsonValue::Number(n)) if n.is_i64() => {
            n.as_i64().map_or(Value::Null, Value::Int64)
        }
        (DataType::Float64, JsonValue::Number(n)) => n.as_f64().map_or(Value::Null, Value::Float64),
        (_, JsonValue::String(s)) => Value::Utf8(s),
        (_, other) => Value::Utf8(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_oriented_object() {
        let table = ingest_json_from_str(r#"{"date":["2021-01-01","2021-01-02"],"price":[10.5,11]}"#).unwrap();
        assert_eq!(table.column_names(), vec!["date", "price"]);
        assert_eq!(table.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(table.rows[1], vec![Value::Utf8("2021-01-02".to_string()), Value::Float64(11.0)]);
    }

    #[test]
    fn column_oriented_object_rejects_unequal_lengths() {
        let err = ingest_json_from_str(r#"{"a":[1,2],"b":[1]}"#).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("column 'b' has 1 values, expected 2"));
    }

    #[test]
    fn columns_keyed_by_row_label() {
        let input = r#"{"date":{"0":"2021-01-01","1":"2021-01-02"},"price":{"0":10.5,"1":11.0}}"#;
        let table = ingest_json_from_str(input).unwrap();
        assert_eq!(table.column_names(), vec!["date", "price"]);
        assert_eq!(
            table.rows,
            vec![
                vec![Value::Utf8("2021-01-01".to_string()), Value::Float64(10.5)],
                vec![Value::Utf8("2021-01-02".to_string()), Value::Float64(11.0)],
            ]
        );
    }

    #[test]
    fn columns_keyed_by_row_label_fill_missing_labels() {
        let table = ingest_json_from_str(r#"{"a":{"0":1,"1":2},"b":{"1":"y"}}"#).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0], vec![Value::Int64(1), Value::Null]);
        assert_eq!(table.rows[1], vec![Value::Int64(2), Value::Utf8("y".to_string())]);
    }

    #[test]
    fn object_of_scalars_is_rejected() {
        let err = ingest_json_from_str(r#"{"id":1,"tags":["a","b"]}"#).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("object keyed by row label"));
    }

    #[test]
    fn large_unsigned_numbers_are_floats() {
        let table = ingest_json_from_str(r#"[{"n":1},{"n":18446744073709551615}]"#).unwrap();
        assert_eq!(table.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(table.rows[0][0], Value::Float64(1.0));
    }
}
