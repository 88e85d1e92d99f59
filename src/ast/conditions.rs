use serde::{Deserialize, Serialize};

use crate::ast::{Glue, Value};

/// Column side of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnRef {
    Single(String),
    /// Only valid for `MATCH`.
    Many(Vec<String>),
}

impl ColumnRef {
    pub fn names(&self) -> Vec<&str> {
        match self {
            ColumnRef::Single(name) => vec![name.as_str()],
            ColumnRef::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Single(name.to_string())
    }
}

/// A single `column operator value` test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub column: ColumnRef,
    /// Upper-cased operator (`=`, `IN`, `BETWEEN`, `MATCH`, ...)
    pub operator: String,
    pub value: Value,
}

impl Predicate {
    pub fn new(column: impl Into<ColumnRef>, operator: &str, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            operator: operator.trim().to_uppercase(),
            value: value.into(),
        }
    }
}

/// Decoded condition tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Predicate(Predicate),
    /// Children joined by `glue`; rendered in parentheses when nested.
    Group { glue: Glue, children: Vec<Condition> },
    /// Verbatim SQL fragment; never validated or escaped.
    Raw(String),
}

impl Condition {
    /// `column = value`
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Condition::Predicate(Predicate::new(column, "=", value))
    }

    pub fn op(column: &str, operator: &str, value: impl Into<Value>) -> Self {
        Condition::Predicate(Predicate::new(column, operator, value))
    }

    pub fn and(children: Vec<Condition>) -> Self {
        Condition::Group {
            glue: Glue::And,
            children,
        }
    }

    pub fn or(children: Vec<Condition>) -> Self {
        Condition::Group {
            glue: Glue::Or,
            children,
        }
    }

    pub fn raw(sql: &str) -> Self {
        Condition::Raw(sql.to_string())
    }
}
