//! Column/value validation against declared column types.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use strsim::levenshtein;

use crate::ast::Value;
use crate::error::{CompileError, CompileResult};
use crate::schema::{ColumnType, TableSchema};

/// Calendar formats accepted for string values of temporal columns.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

/// Check `value` against the declared type of `table.column`.
pub fn validate(table: &TableSchema, column: &str, value: &Value) -> CompileResult<()> {
    let col = table.get_column(column).ok_or_else(|| CompileError::UnknownColumn {
        table: table.name.clone(),
        column: column.to_string(),
        suggestion: did_you_mean(column, table.column_names()),
    })?;

    let context = || (table.name.clone(), column.to_string());

    if value.is_null() {
        if !col.nullable {
            let (table, column) = context();
            return Err(CompileError::NullNotAllowed { table, column });
        }
        return Ok(());
    }

    match &col.typ {
        typ if typ.is_numeric() => {
            if value.as_number().is_none() {
                let (table, column) = context();
                return Err(CompileError::NotNumeric { table, column });
            }
        }
        typ if typ.is_string() => {
            if let (Some(max), Some(text)) = (col.length, value.scalar_text()) {
                let actual = text.chars().count();
                if actual > max as usize {
                    let (table, column) = context();
                    return Err(CompileError::LengthExceeded {
                        table,
                        column,
                        max,
                        actual,
                    });
                }
            }
        }
        typ if typ.is_temporal() => {
            if !is_temporal_value(value) {
                let (table, column) = context();
                return Err(CompileError::BadTemporalFormat { table, column });
            }
        }
        ColumnType::Point => {
            if !is_point_value(value) {
                let (table, column) = context();
                return Err(CompileError::BadPointFormat { table, column });
            }
        }
        _ => {}
    }

    Ok(())
}

/// Temporal value, or a string in one of the accepted calendar formats.
fn is_temporal_value(value: &Value) -> bool {
    match value {
        Value::Date(_) | Value::Time(_) | Value::DateTime(_) => true,
        Value::String(s) => parse_calendar(s.trim()),
        _ => false,
    }
}

fn parse_calendar(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|f| NaiveDateTime::parse_from_str(s, f).is_ok())
        || DATE_FORMATS
            .iter()
            .any(|f| NaiveDate::parse_from_str(s, f).is_ok())
        || TIME_FORMATS
            .iter()
            .any(|f| NaiveTime::parse_from_str(s, f).is_ok())
}

/// Exactly two numeric elements.
pub(crate) fn is_point_value(value: &Value) -> bool {
    match value {
        Value::List(items) => items.len() == 2 && items.iter().all(|v| v.as_number().is_some()),
        _ => false,
    }
}

/// Find the best match with Levenshtein distance <= 3.
pub(crate) fn did_you_mean<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let threshold = match input.len() {
        0..=2 => 0,
        3..=5 => 2,
        _ => 3,
    };

    candidates
        .into_iter()
        .map(|cand| (levenshtein(input, cand), cand))
        .filter(|(dist, _)| *dist <= threshold)
        .min_by_key(|(dist, _)| *dist)
        .map(|(_, cand)| cand.to_string())
}
