//! Condition tree compilation.

use serde_json::Value as Json;

use super::columns::{resolve_column, sanitize_identifier, ResolvedColumn};
use super::values::serialize_value;
use super::{CompileOptions, Compiler};
use crate::ast::*;
use crate::error::{CompileError, CompileResult};
use crate::parser::parse_condition;
use crate::schema::{ColumnType, TableSchema};
use crate::validator;

/// Fragment standing in for `IN ()`, which is not valid SQL.
pub const IMPOSSIBLE: &str = "(1=2)";

impl<'s> Compiler<'s> {
    /// Parse and compile a condition input.
    ///
    /// ```
    /// use condsql::prelude::*;
    /// use serde_json::json;
    ///
    /// let schema = Schema::new().with_table(
    ///     TableSchema::new("users").column(ColumnSchema::new("age", "int")),
    /// );
    /// let compiler = Compiler::new(&schema, &MysqlQuoter);
    /// let sql = compiler
    ///     .compile_condition(&json!({"age": [">=", 18]}), &CompileOptions::new("users"))
    ///     .unwrap();
    /// assert_eq!(sql, "`users`.`age` >= '18'");
    /// ```
    pub fn compile_condition(&self, input: &Json, opts: &CompileOptions<'_>) -> CompileResult<String> {
        let table = self.origin_schema(opts)?;
        let conditions = parse_condition(input, table)?;
        self.compile(&conditions, opts)
    }

    /// Compile already-decoded conditions, joined with `opts.glue`.
    pub fn compile(&self, conditions: &[Condition], opts: &CompileOptions<'_>) -> CompileResult<String> {
        self.origin_schema(opts)?;
        let mut fragments: Vec<String> = Vec::with_capacity(conditions.len());

        for condition in conditions {
            match condition {
                Condition::Group { glue, children } => {
                    let inner = self.compile(children, &opts.glue(*glue))?;
                    if inner.is_empty() {
                        tracing::debug!("Dropping empty {} group", glue);
                        continue;
                    }
                    fragments.push(format!("({})", inner));
                }
                Condition::Raw(sql) => fragments.push(format!("({})", sql)),
                Condition::Predicate(pred) => {
                    if let Some(fragment) = self.compile_predicate(pred, opts)? {
                        fragments.push(fragment);
                    }
                }
            }
        }

        Ok(fragments.join(&opts.glue.separator()))
    }

    fn origin_schema(&self, opts: &CompileOptions<'_>) -> CompileResult<Option<&'s TableSchema>> {
        opts.table.map(|t| self.schema.get_table(t)).transpose()
    }

    /// Declared type of a resolved column, checking it exists in its owning table.
    pub(super) fn owning_column(
        &self,
        resolved: &ResolvedColumn,
    ) -> CompileResult<Option<(&'s TableSchema, &'s ColumnType)>> {
        let Some(table) = resolved.table.as_deref() else {
            return Ok(None);
        };
        let schema = self.schema.get_table(table)?;
        let column = schema.get_column(&resolved.column).ok_or_else(|| {
            CompileError::UnknownColumnInTable {
                table: table.to_string(),
                column: resolved.column.clone(),
                suggestion: validator::did_you_mean(&resolved.column, schema.column_names()),
            }
        })?;
        Ok(Some((schema, &column.typ)))
    }

    fn compile_predicate(
        &self,
        pred: &Predicate,
        opts: &CompileOptions<'_>,
    ) -> CompileResult<Option<String>> {
        let mut operator = sanitize_identifier(pred.operator.trim()).to_uppercase();

        if pred.value.is_null() && opts.for_select {
            operator = match operator.as_str() {
                "=" => "IS".to_string(),
                "!=" => "IS NOT".to_string(),
                _ => return Err(CompileError::NullWithUnsupportedOperator(operator.clone())),
            };
        }

        if operator == "MATCH" {
            return self.compile_match(pred, opts).map(Some);
        }

        let column = match &pred.column {
            ColumnRef::Single(name) => name,
            ColumnRef::Many(_) => return Err(CompileError::ColumnMustBeString),
        };
        let resolved = resolve_column(column, opts.table, opts.joins, opts.alias);
        let owner = self.owning_column(&resolved)?;
        let hint = owner.map(|(_, typ)| typ);

        let check = |value: &Value| -> CompileResult<()> {
            if !opts.validate || (resolved.via_join && value.is_null()) {
                return Ok(());
            }
            match owner {
                Some((schema, _)) => validator::validate(schema, &resolved.column, value),
                None => Ok(()),
            }
        };

        let fragment = match operator.as_str() {
            "BETWEEN" => {
                let (low, high) = match &pred.value {
                    Value::List(bounds) => match bounds.as_slice() {
                        [low, high] if !low.is_null() && !high.is_null() => (low, high),
                        _ => return Err(CompileError::BadBetweenShape(resolved.column.clone())),
                    },
                    _ => return Err(CompileError::BadBetweenShape(resolved.column.clone())),
                };
                check(low)?;
                check(high)?;
                format!(
                    "{} BETWEEN {} AND {}",
                    resolved.rendered,
                    serialize_value(low, hint, self.quoter)?,
                    serialize_value(high, hint, self.quoter)?
                )
            }
            "IN" | "NOT IN" => {
                let Value::List(items) = &pred.value else {
                    return Err(CompileError::OperatorNeedsArray(operator.clone()));
                };
                if items.is_empty() {
                    if operator == "IN" {
                        IMPOSSIBLE.to_string()
                    } else {
                        tracing::debug!(
                            "Dropping NOT IN with empty list on {}",
                            resolved.rendered
                        );
                        return Ok(None);
                    }
                } else {
                    let mut literals = Vec::with_capacity(items.len());
                    for item in items {
                        check(item)?;
                        literals.push(serialize_value(item, hint, self.quoter)?);
                    }
                    format!("{} {} ({})", resolved.rendered, operator, literals.join(","))
                }
            }
            _ => {
                check(&pred.value)?;
                format!(
                    "{} {} {}",
                    resolved.rendered,
                    operator,
                    serialize_value(&pred.value, hint, self.quoter)?
                )
            }
        };

        Ok(Some(fragment))
    }

    /// `MATCH(col1,col2) AGAINST(value)`; columns are not type-checked.
    fn compile_match(&self, pred: &Predicate, opts: &CompileOptions<'_>) -> CompileResult<String> {
        let names = pred.column.names();
        if names.is_empty() {
            return Err(CompileError::ColumnMustBeString);
        }
        let mut rendered = Vec::with_capacity(names.len());
        for name in names {
            let resolved = resolve_column(name, opts.table, opts.joins, opts.alias);
            self.owning_column(&resolved)?;
            rendered.push(resolved.rendered);
        }
        Ok(format!(
            "MATCH({}) AGAINST({})",
            rendered.join(","),
            serialize_value(&pred.value, None, self.quoter)?
        ))
    }
}
