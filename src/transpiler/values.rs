//! Value serialization into SQL literals.

use crate::ast::Value;
use crate::error::{CompileError, CompileResult};
use crate::schema::ColumnType;

/// String-literal quoting primitive of the target database.
///
/// Must fully neutralize delimiter and escape-sequence injection, and be
/// callable from several threads at once.
pub trait Quoter: Send + Sync {
    fn quote_literal(&self, raw: &str) -> String;
}

/// MySQL-style quoting (`mysql_real_escape_string` rules, single quotes).
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlQuoter;

impl Quoter for MysqlQuoter {
    fn quote_literal(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 2);
        out.push('\'');
        for c in raw.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\x1a' => out.push_str("\\Z"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                c => out.push(c),
            }
        }
        out.push('\'');
        out
    }
}

/// ANSI quoting: single quotes doubled, nothing else escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiQuoter;

impl Quoter for AnsiQuoter {
    fn quote_literal(&self, raw: &str) -> String {
        format!("'{}'", raw.replace('\'', "''"))
    }
}

/// Serialize a value into a SQL literal, using `typ` as a hint.
pub fn serialize_value(
    value: &Value,
    typ: Option<&ColumnType>,
    quoter: &dyn Quoter,
) -> CompileResult<String> {
    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Date(_) | Value::Time(_) | Value::DateTime(_) => {
            if typ.is_some_and(|t| !t.is_temporal()) {
                return Err(CompileError::UnsupportedValueShape(format!(
                    "date/time value for a {} column",
                    typ.map(ColumnType::as_str).unwrap_or_default()
                )));
            }
            Ok(quoter.quote_literal(&calendar_text(value)))
        }
        Value::List(items) => match (typ, items.as_slice()) {
            (Some(ColumnType::Point), [x, y]) => match (x.as_number(), y.as_number()) {
                (Some(x), Some(y)) => Ok(format!("POINT({},{})", x, y)),
                _ => Err(CompileError::UnsupportedValueShape(
                    "point coordinates must be numeric".to_string(),
                )),
            },
            _ => Err(CompileError::UnsupportedValueShape(format!(
                "unknown value type in query ({})",
                value.describe()
            ))),
        },
        scalar => {
            let text = scalar.scalar_text().ok_or_else(|| {
                CompileError::UnsupportedValueShape(scalar.describe())
            })?;
            Ok(quoter.quote_literal(&text))
        }
    }
}

fn calendar_text(value: &Value) -> String {
    match value {
        Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        Value::Time(t) => t.format("%H:%M:%S").to_string(),
        Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => String::new(),
    }
}
