//! Join clause rendering and foreign-key inference.

use serde_json::Value as Json;

use super::columns::{quote_identifier, quote_qualified};
use super::{CompileOptions, Compiler};
use crate::ast::*;
use crate::error::{CompileError, CompileResult};
use crate::parser;
use crate::schema::{ForeignKeyRef, TableSchema};
use crate::validator;

impl<'s> Compiler<'s> {
    /// Canonicalize raw join input; see [`parser::normalize_joins`].
    pub fn normalize_joins(
        &self,
        origin: &str,
        origin_alias: Option<&str>,
        raw: &Json,
    ) -> CompileResult<Vec<NormalizedJoin>> {
        parser::normalize_joins(origin, origin_alias, raw)
    }

    /// Render `KIND JOIN `table` [AS `alias`] ON ...`.
    ///
    /// A join without `on` gets one inferred from foreign keys, searching
    /// the origin's keys first and the joined table's keys second. The
    /// optional nested filter is AND-combined with the `on` clause.
    pub fn render_join_clause(&self, join: &NormalizedJoin, validate: bool) -> CompileResult<String> {
        let mut clause = format!("{} JOIN {}", join.kind.as_str(), quote_identifier(&join.table));
        if let Some(alias) = &join.alias {
            clause.push_str(" AS ");
            clause.push_str(&quote_identifier(alias));
        }

        let mut parts: Vec<String> = Vec::new();

        if join.on.is_empty() {
            if join.kind != JoinKind::Cross {
                parts.push(self.infer_on(join, None)?);
            }
        } else {
            for entry in &join.on {
                parts.push(match entry {
                    OnEntry::Column(column) => self.infer_on(join, Some(column))?,
                    OnEntry::Pair { origin, joined } => self.explicit_pair(join, origin, joined)?,
                    OnEntry::Raw(expr) => format!("({})", expr),
                });
            }
        }

        if let Some(filter) = &join.filter {
            let opts = CompileOptions::new(&join.table)
                .alias(join.alias.as_deref())
                .validate(validate);
            let sql = self.compile_condition(filter, &opts)?;
            if !sql.is_empty() {
                parts.push(format!("({})", sql));
            }
        }

        if !parts.is_empty() {
            clause.push_str(" ON ");
            clause.push_str(&parts.join(" AND "));
        }

        Ok(clause)
    }

    fn explicit_pair(&self, join: &NormalizedJoin, origin: &str, joined: &str) -> CompileResult<String> {
        let origin_schema = self.schema.get_table(&join.origin)?;
        let joined_schema = self.schema.get_table(&join.table)?;
        require_column(origin_schema, origin)?;
        require_column(joined_schema, joined)?;
        Ok(format!(
            "{} = {}",
            quote_qualified(join.rendered_origin(), origin),
            quote_qualified(join.rendered_name(), joined)
        ))
    }

    /// Find the unique foreign key linking origin and joined table.
    ///
    /// `column` restricts the search to keys owned by that column on
    /// either side (the `on` column shorthand).
    fn infer_on(&self, join: &NormalizedJoin, column: Option<&str>) -> CompileResult<String> {
        let origin = self.schema.get_table(&join.origin)?;
        let joined = self.schema.get_table(&join.table)?;
        let owned_by = |fk: &&ForeignKeyRef| column.is_none_or(|c| fk.owner == c);

        let forward: Vec<&ForeignKeyRef> = origin.foreign_keys_to(&joined.name).filter(owned_by).collect();
        match forward.as_slice() {
            [fk] => {
                let on = format!(
                    "{} = {}",
                    quote_qualified(join.rendered_origin(), &fk.owner),
                    quote_qualified(join.rendered_name(), &fk.column)
                );
                tracing::debug!("Inferred join on {} from {}.{}", on, origin.name, fk.owner);
                return Ok(on);
            }
            [] => {}
            many => return Err(ambiguous(origin, joined, many)),
        }

        let backward: Vec<&ForeignKeyRef> = joined.foreign_keys_to(&origin.name).filter(owned_by).collect();
        match backward.as_slice() {
            [fk] => {
                let on = format!(
                    "{} = {}",
                    quote_qualified(join.rendered_origin(), &fk.column),
                    quote_qualified(join.rendered_name(), &fk.owner)
                );
                tracing::debug!("Inferred join on {} from {}.{}", on, joined.name, fk.owner);
                Ok(on)
            }
            [] => Err(CompileError::NoForeignKeyFound {
                origin: origin.name.clone(),
                joined: joined.name.clone(),
            }),
            many => Err(ambiguous(joined, origin, many)),
        }
    }
}

fn ambiguous(owner: &TableSchema, target: &TableSchema, candidates: &[&ForeignKeyRef]) -> CompileError {
    CompileError::AmbiguousForeignKey {
        origin: owner.name.clone(),
        joined: target.name.clone(),
        candidates: candidates
            .iter()
            .map(|fk| format!("{}.{} -> {}.{}", owner.name, fk.owner, fk.table, fk.column))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn require_column(table: &TableSchema, column: &str) -> CompileResult<()> {
    if table.has_column(column) {
        return Ok(());
    }
    Err(CompileError::UnknownColumnInTable {
        table: table.name.clone(),
        column: column.to_string(),
        suggestion: validator::did_you_mean(column, table.column_names()),
    })
}
