//! Column type inference shared by the CSV and JSON ingesters.
//!
//! A column's type is the narrowest [`DataType`] that holds every non-null cell:
//! `Int64` widens to `Float64`, and any other disagreement widens to `Utf8`.
//! Columns without a single non-null cell are `Utf8`.

use crate::types::DataType;

/// Joins two observed types into the narrowest type that holds both.
pub(crate) fn widen(a: DataType, b: DataType) -> DataType {
    use DataType::*;
    match (a, b) {
        (x, y) if x == y => x,
        (Int64, Float64) | (Float64, Int64) => Float64,
        _ => Utf8,
    }
}

/// Running type of one column while rows are scanned.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ColumnType(Option<DataType>);

impl ColumnType {
    /// Record one non-null cell of type `observed`.
    pub(crate) fn observe(&mut self, observed: DataType) {
        self.0 = Some(match self.0 {
            Some(current) => widen(current, observed),
            None => observed,
        });
    }

    pub(crate) fn resolve(self) -> DataType {
        self.0.unwrap_or(DataType::Utf8)
    }
}

/// Type of a trimmed, non-empty text cell.
pub(crate) fn text_type(raw: &str) -> DataType {
    if raw.parse::<i64>().is_ok() {
        DataType::Int64
    } else if parse_float(raw).is_some() {
        DataType::Float64
    } else if parse_bool(raw).is_some() {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

/// Parses decimal notation only; words such as `inf` or `NaN` stay text.
pub(crate) fn parse_float(s: &str) -> Option<f64> {
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok()
}

pub(crate) fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
