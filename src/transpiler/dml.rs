//! Statement assemblers: INSERT, REPLACE, UPDATE, DELETE, SELECT.
//!
//! These are thin templates around the condition compiler; every column and
//! value goes through the same resolution, validation and quoting paths.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::columns::{quote_identifier, quote_qualified, resolve_column};
use super::{CompileOptions, Compiler};
use crate::ast::*;
use crate::error::{CompileError, CompileResult};
use crate::validator;

/// ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    #[serde(default)]
    pub direction: SortOrder,
}

/// A SELECT request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectQuery {
    pub table: String,
    #[serde(default)]
    pub alias: Option<String>,
    /// Origin-table columns; empty selects `alias.*`.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Raw join input, see [`crate::parser::normalize_joins`].
    #[serde(default)]
    pub joins: Json,
    #[serde(default, rename = "where")]
    pub filter: Json,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl SelectQuery {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn joins(mut self, joins: Json) -> Self {
        self.joins = joins;
        self
    }

    pub fn filter(mut self, filter: Json) -> Self {
        self.filter = filter;
        self
    }

    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    pub fn order_by(mut self, column: &str, direction: SortOrder) -> Self {
        self.order_by.push(OrderBy {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}

/// MySQL's "no limit" for OFFSET without LIMIT.
const NO_LIMIT: u64 = u64::MAX;

fn is_empty_input(data: &Json) -> bool {
    match data {
        Json::Null => true,
        Json::Object(map) => map.is_empty(),
        Json::Array(items) => items.is_empty(),
        _ => false,
    }
}

impl<'s> Compiler<'s> {
    /// `INSERT INTO `t` SET ...`
    pub fn insert(&self, table: &str, data: &Json) -> CompileResult<String> {
        self.insert_statement("INSERT", table, data)
    }

    /// `REPLACE INTO `t` SET ...`
    pub fn replace(&self, table: &str, data: &Json) -> CompileResult<String> {
        self.insert_statement("REPLACE", table, data)
    }

    fn insert_statement(&self, verb: &str, table: &str, data: &Json) -> CompileResult<String> {
        if is_empty_input(data) {
            return Ok(format!("{} INTO {}() VALUES()", verb, quote_identifier(table)));
        }

        if self.validate {
            self.validate_data(table, data)?;
        }

        let opts = CompileOptions::assignments(table).validate(self.validate);
        let assignments = self.compile_condition(data, &opts)?;
        Ok(format!("{} INTO {} SET {}", verb, quote_identifier(table), assignments))
    }

    /// Check every `column: value` pair of a data mapping against the schema.
    fn validate_data(&self, table: &str, data: &Json) -> CompileResult<()> {
        let schema = self.schema.get_table(table)?;
        let Json::Object(map) = data else {
            return Ok(());
        };
        for (column, value) in map {
            let value = Value::from_json(value).ok_or_else(|| {
                CompileError::UnsupportedValueShape(format!("object value for \"{}\"", column))
            })?;
            validator::validate(schema, column, &value)?;
        }
        Ok(())
    }

    /// `UPDATE `t` SET ... [WHERE ...]`; `None` when there is nothing to set.
    pub fn update(&self, table: &str, filter: &Json, data: &Json) -> CompileResult<Option<String>> {
        if is_empty_input(data) {
            return Ok(None);
        }

        let filter_sql = self.compile_condition(filter, &self.options(table))?;
        let opts = CompileOptions::assignments(table).validate(self.validate);
        let data_sql = self.compile_condition(data, &opts)?;

        let mut sql = format!("UPDATE {} SET {}", quote_identifier(table), data_sql);
        if !filter_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter_sql);
        }
        Ok(Some(sql))
    }

    /// `DELETE FROM `t` [WHERE ...]`
    pub fn delete(&self, table: &str, filter: &Json) -> CompileResult<String> {
        let filter_sql = self.compile_condition(filter, &self.options(table))?;

        let mut sql = format!("DELETE FROM {}", quote_identifier(table));
        if !filter_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter_sql);
        }
        Ok(sql)
    }

    /// Generate SELECT SQL.
    pub fn select(&self, query: &SelectQuery) -> CompileResult<String> {
        let table = query.table.as_str();
        let alias = query.alias.as_deref();
        self.schema.get_table(table)?;
        let prefix = alias.unwrap_or(table);

        let joins = self.normalize_joins(table, alias, &query.joins)?;

        // Columns
        let mut columns: Vec<String> = Vec::new();
        if query.fields.is_empty() {
            columns.push(format!("{}.*", quote_identifier(prefix)));
        } else {
            for field in &query.fields {
                columns.push(self.checked_column(field, table, &[], alias)?);
            }
        }
        for join in &joins {
            let joined = self.schema.get_table(&join.table)?;
            for field in &join.fields {
                if !joined.has_column(&field.source) {
                    return Err(CompileError::UnknownColumnInTable {
                        table: join.table.clone(),
                        column: field.source.clone(),
                        suggestion: validator::did_you_mean(&field.source, joined.column_names()),
                    });
                }
                let rendered = quote_qualified(join.rendered_name(), &field.source);
                if field.exposed == field.source {
                    columns.push(rendered);
                } else {
                    columns.push(format!("{} AS {}", rendered, quote_identifier(&field.exposed)));
                }
            }
        }

        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), quote_identifier(table));
        if let Some(alias) = alias {
            sql.push_str(" AS ");
            sql.push_str(&quote_identifier(alias));
        }

        // JOIN
        for join in &joins {
            sql.push(' ');
            sql.push_str(&self.render_join_clause(join, self.validate)?);
        }

        // WHERE
        let opts = self.options(table).alias(alias).joins(&joins);
        let filter_sql = self.compile_condition(&query.filter, &opts)?;
        if !filter_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filter_sql);
        }

        // GROUP BY
        if !query.group_by.is_empty() {
            let cols = query
                .group_by
                .iter()
                .map(|c| self.checked_column(c, table, &joins, alias))
                .collect::<CompileResult<Vec<_>>>()?;
            sql.push_str(" GROUP BY ");
            sql.push_str(&cols.join(", "));
        }

        // ORDER BY
        if !query.order_by.is_empty() {
            let cols = query
                .order_by
                .iter()
                .map(|o| {
                    let column = self.checked_column(&o.column, table, &joins, alias)?;
                    Ok(format!("{} {}", column, o.direction.as_str()))
                })
                .collect::<CompileResult<Vec<_>>>()?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&cols.join(", "));
        }

        // LIMIT / OFFSET
        match (query.limit, query.offset) {
            (Some(n), None) => sql.push_str(&format!(" LIMIT {}", n)),
            (Some(n), Some(m)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", n, m)),
            (None, Some(m)) => sql.push_str(&format!(" LIMIT {} OFFSET {}", NO_LIMIT, m)),
            (None, None) => {}
        }

        Ok(sql)
    }

    /// Resolve a column of a SELECT list and check it exists in its owning table.
    fn checked_column(
        &self,
        column: &str,
        table: &str,
        joins: &[NormalizedJoin],
        alias: Option<&str>,
    ) -> CompileResult<String> {
        let resolved = resolve_column(column, Some(table), joins, alias);
        self.owning_column(&resolved)?;
        Ok(resolved.rendered)
    }
}
