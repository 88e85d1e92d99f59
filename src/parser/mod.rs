//! Decoding of loosely-typed input into condition trees and joins.
//!
//! Condition input is an ordered mapping from a key to an item:
//!
//! ```text
//! {
//!   "status": "active",                     -- key = item
//!   "age": [">=", 18],                      -- [operator, value]
//!   "OR": { "a": 1, "b": 2 },               -- logical group
//!   "0": "created_at < NOW()",              -- positional raw fragment
//!   "1": ["score", "BETWEEN", [1, 5]],      -- [column, operator, value]
//!   "2": { "sub": {...}, "operator": "OR" } -- explicit sub-group
//! }
//! ```
//!
//! JSON arrays are mappings with only positional keys; object keys that are
//! non-negative integers are positional as well. All shape ambiguity is
//! settled here so the compiler only sees [`Condition`] values.

pub mod joins;
pub mod tokens;

pub use joins::normalize_joins;

use serde_json::{Map, Value as Json};

use crate::ast::*;
use crate::error::{CompileError, CompileResult};
use crate::schema::{ColumnType, TableSchema};

/// Key of one entry in an input mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Key<'a> {
    Positional,
    Named(&'a str),
}

impl<'a> Key<'a> {
    fn of(key: &'a str) -> Self {
        if key.parse::<usize>().is_ok() {
            Key::Positional
        } else {
            Key::Named(key)
        }
    }

    fn logical(&self) -> Option<Glue> {
        match self {
            Key::Named(k) => Glue::logical(k),
            Key::Positional => None,
        }
    }
}

/// Parse a condition input into the conditions of its top level.
///
/// `table` is consulted only to recognise point-typed columns, whose
/// two-element values would otherwise read as `[operator, value]`.
/// A bare integer is shorthand for `{"id": n}`; `null` is no condition.
pub fn parse_condition(input: &Json, table: Option<&TableSchema>) -> CompileResult<Vec<Condition>> {
    match input {
        Json::Null => Ok(Vec::new()),
        Json::Number(n) if n.is_i64() || n.is_u64() => Ok(vec![Condition::Predicate(
            Predicate {
                column: ColumnRef::Single("id".to_string()),
                operator: "=".to_string(),
                value: Value::from_json(input).unwrap_or(Value::Null),
            },
        )]),
        Json::Object(_) | Json::Array(_) => parse_level(input, table),
        other => Err(CompileError::malformed(format!(
            "condition must be a mapping or an id, got {}",
            other
        ))),
    }
}

fn entries(mapping: &Json) -> Vec<(Key<'_>, &Json)> {
    match mapping {
        Json::Object(map) => map.iter().map(|(k, v)| (Key::of(k), v)).collect(),
        Json::Array(items) => items.iter().map(|v| (Key::Positional, v)).collect(),
        _ => Vec::new(),
    }
}

fn is_mapping(json: &Json) -> bool {
    matches!(json, Json::Object(_) | Json::Array(_))
}

fn parse_level(mapping: &Json, table: Option<&TableSchema>) -> CompileResult<Vec<Condition>> {
    entries(mapping)
        .into_iter()
        .map(|(key, item)| parse_item(key, item, table))
        .collect()
}

fn group(glue: Glue, mapping: &Json, table: Option<&TableSchema>) -> CompileResult<Condition> {
    Ok(Condition::Group {
        glue,
        children: parse_level(mapping, table)?,
    })
}

/// `{"OR": {...}}` with exactly one logical entry.
fn single_logical(map: &Map<String, Json>) -> Option<(Glue, &Json)> {
    if map.len() != 1 {
        return None;
    }
    let (k, v) = map.iter().next()?;
    Glue::logical(k).map(|glue| (glue, v))
}

fn parse_item(key: Key<'_>, item: &Json, table: Option<&TableSchema>) -> CompileResult<Condition> {
    // Rule 1: logical key over a mapping
    if let Some(glue) = key.logical() {
        if is_mapping(item) {
            return group(glue, item, table);
        }
    }

    match item {
        Json::Object(map) => {
            // Rule 2: one-entry logical wrapper
            if let Some((glue, inner)) = single_logical(map) {
                if !is_mapping(inner) {
                    return Err(CompileError::OperatorNeedsArray(glue.to_string()));
                }
                return group(glue, inner, table);
            }
            if key == Key::Positional && map.len() == 2 {
                if let (Some(sub), Some(op)) = (map.get("sub"), map.get("operator")) {
                    return parse_sub_group(sub, op, table);
                }
            }
            Err(CompileError::malformed(format!(
                "mapping with {} entries is not a condition",
                map.len()
            )))
        }
        Json::Array(list) => parse_tuple(key, list, item, table),
        Json::String(raw) if key == Key::Positional => Ok(Condition::Raw(raw.clone())),
        _ => match key {
            Key::Named(column) => Ok(Condition::Predicate(Predicate {
                column: ColumnRef::Single(column.to_string()),
                operator: "=".to_string(),
                value: decode_value(item)?,
            })),
            Key::Positional => Err(CompileError::malformed(format!(
                "bad item type at positional key: {}",
                item
            ))),
        },
    }
}

fn parse_sub_group(sub: &Json, op: &Json, table: Option<&TableSchema>) -> CompileResult<Condition> {
    let glue = op
        .as_str()
        .and_then(Glue::logical)
        .ok_or_else(|| CompileError::UnsupportedSubOperator(json_text(op)))?;
    if !is_mapping(sub) {
        return Err(CompileError::malformed("\"sub\" must be a mapping"));
    }
    group(glue, sub, table)
}

fn parse_tuple(
    key: Key<'_>,
    list: &[Json],
    whole: &Json,
    table: Option<&TableSchema>,
) -> CompileResult<Condition> {
    match list {
        [Json::Object(map)] => match single_logical(map) {
            Some((glue, inner)) if is_mapping(inner) => group(glue, inner, table),
            Some((glue, _)) => Err(CompileError::OperatorNeedsArray(glue.to_string())),
            None => Err(CompileError::malformed("wrong items number in array (1)")),
        },
        [first, second] => {
            if let Some(glue) = first.as_str().and_then(Glue::logical) {
                if !is_mapping(second) {
                    return Err(CompileError::OperatorNeedsArray(json_text(first)));
                }
                return group(glue, second, table);
            }
            match key {
                Key::Named(column) => {
                    let is_point = table
                        .and_then(|t| t.get_column(column))
                        .is_some_and(|c| c.typ == ColumnType::Point);
                    if is_point {
                        return Ok(Condition::Predicate(Predicate {
                            column: ColumnRef::Single(column.to_string()),
                            operator: "=".to_string(),
                            value: decode_value(whole)?,
                        }));
                    }
                    Ok(Condition::Predicate(Predicate {
                        column: ColumnRef::Single(column.to_string()),
                        operator: decode_operator(first)?,
                        value: decode_value(second)?,
                    }))
                }
                Key::Positional => Ok(Condition::Predicate(Predicate {
                    column: decode_column(first)?,
                    operator: "=".to_string(),
                    value: decode_value(second)?,
                })),
            }
        }
        [column, operator, value] => Ok(Condition::Predicate(Predicate {
            column: decode_column(column)?,
            operator: decode_operator(operator)?,
            value: decode_value(value)?,
        })),
        _ => Err(CompileError::malformed(format!(
            "wrong items number in array ({})",
            list.len()
        ))),
    }
}

fn decode_column(json: &Json) -> CompileResult<ColumnRef> {
    match json {
        Json::String(name) => Ok(ColumnRef::Single(name.clone())),
        Json::Array(names) if names.is_empty() => Err(CompileError::ColumnMustBeString),
        Json::Array(names) => names
            .iter()
            .map(|n| n.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(ColumnRef::Many)
            .ok_or(CompileError::ColumnMustBeString),
        _ => Err(CompileError::ColumnMustBeString),
    }
}

fn decode_operator(json: &Json) -> CompileResult<String> {
    json.as_str()
        .map(|op| op.trim().to_uppercase())
        .ok_or_else(|| CompileError::malformed(format!("operator must be a string, got {}", json)))
}

fn decode_value(json: &Json) -> CompileResult<Value> {
    Value::from_json(json).ok_or_else(|| {
        CompileError::UnsupportedValueShape(format!("object values are not supported: {}", json))
    })
}

fn json_text(json: &Json) -> String {
    match json {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    }
}
