//! SQL generation.
//!
//! [`Compiler`] borrows a schema snapshot and a quoting delegate and turns
//! condition trees, joins and statement requests into SQL text. It keeps no
//! state between calls, so one compiler can be shared across threads.

pub mod columns;
pub mod conditions;
pub mod dml;
pub mod joins;
pub mod values;

pub use columns::{quote_identifier, resolve_column, sanitize_identifier, ResolvedColumn};
pub use dml::SelectQuery;
pub use values::{serialize_value, AnsiQuoter, MysqlQuoter, Quoter};

use crate::ast::{Glue, NormalizedJoin};
use crate::schema::SchemaProvider;

/// Per-call compile options. Nested groups override `glue` only.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions<'a> {
    /// Origin table; enables schema checks when set.
    pub table: Option<&'a str>,
    /// Name the origin table is rendered under.
    pub alias: Option<&'a str>,
    pub joins: &'a [NormalizedJoin],
    pub glue: Glue,
    /// Filter mode: `= NULL` becomes `IS NULL`.
    pub for_select: bool,
    pub validate: bool,
}

impl Default for CompileOptions<'_> {
    fn default() -> Self {
        Self {
            table: None,
            alias: None,
            joins: &[],
            glue: Glue::And,
            for_select: true,
            validate: true,
        }
    }
}

impl<'a> CompileOptions<'a> {
    /// Filter options for `table`.
    pub fn new(table: &'a str) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }

    /// Assignment-list options for `table` (`a = 1 , b = 2`).
    pub fn assignments(table: &'a str) -> Self {
        Self {
            table: Some(table),
            glue: Glue::Comma,
            for_select: false,
            ..Self::default()
        }
    }

    pub fn alias(mut self, alias: Option<&'a str>) -> Self {
        self.alias = alias;
        self
    }

    pub fn joins(mut self, joins: &'a [NormalizedJoin]) -> Self {
        self.joins = joins;
        self
    }

    pub fn glue(mut self, glue: Glue) -> Self {
        self.glue = glue;
        self
    }

    pub fn for_select(mut self, for_select: bool) -> Self {
        self.for_select = for_select;
        self
    }

    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Name columns of the origin table are rendered under.
    pub fn rendered_table(&self) -> Option<&'a str> {
        self.alias.or(self.table)
    }
}

/// Schema-aware SQL compiler.
#[derive(Clone, Copy)]
pub struct Compiler<'s> {
    schema: &'s dyn SchemaProvider,
    quoter: &'s dyn Quoter,
    /// Default for statement assemblers; filters take it from [`CompileOptions`].
    validate: bool,
}

impl<'s> Compiler<'s> {
    pub fn new(schema: &'s dyn SchemaProvider, quoter: &'s dyn Quoter) -> Self {
        Self {
            schema,
            quoter,
            validate: true,
        }
    }

    /// Turn value validation on or off for statement assemblers.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Filter options for `table` carrying this compiler's validation setting.
    pub fn options<'a>(&self, table: &'a str) -> CompileOptions<'a> {
        CompileOptions::new(table).validate(self.validate)
    }

    pub fn schema(&self) -> &'s dyn SchemaProvider {
        self.schema
    }

    pub fn quoter(&self) -> &'s dyn Quoter {
        self.quoter
    }
}

#[cfg(test)]
mod tests;
