//! Column reference resolution and identifier rendering.

use crate::ast::NormalizedJoin;
use crate::parser::tokens::split_qualified;

/// Result of resolving a column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// Real table owning the column, when it is known to the schema graph.
    pub table: Option<String>,
    /// Column name inside that table.
    pub column: String,
    /// Quoted identifier ready to be embedded in SQL.
    pub rendered: String,
    /// Satisfied through a join projection.
    pub via_join: bool,
}

/// Strip every character outside `[a-zA-Z0-9_.,()!=<> -]`.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || matches!(c, '_' | '.' | ',' | '(' | ')' | '!' | '=' | '<' | '>' | ' ' | '-')
        })
        .collect()
}

/// `` `name` ``, sanitized.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", sanitize_identifier(name))
}

/// `` `table`.`column` ``, sanitized.
pub fn quote_qualified(table: &str, column: &str) -> String {
    format!("{}.{}", quote_identifier(table), quote_identifier(column))
}

/// Resolve `column_ref` against the origin table and the active joins.
///
/// A qualified `table.column` is taken as-is. Otherwise the first join
/// projection exposing the name wins; failing that the column belongs to
/// `origin`, rendered under `alias` when given.
pub fn resolve_column(
    column_ref: &str,
    origin: Option<&str>,
    joins: &[NormalizedJoin],
    alias: Option<&str>,
) -> ResolvedColumn {
    let clean = sanitize_identifier(column_ref);

    if let Some((table, column)) = split_qualified(&clean) {
        return ResolvedColumn {
            table: None,
            column: column.to_string(),
            rendered: quote_qualified(table, column),
            via_join: false,
        };
    }

    for join in joins {
        if let Some(field) = join.projected(&clean) {
            return ResolvedColumn {
                table: Some(join.table.clone()),
                column: field.source.clone(),
                rendered: quote_qualified(join.rendered_name(), &field.source),
                via_join: true,
            };
        }
    }

    let rendered = match alias.or(origin) {
        Some(prefix) => quote_qualified(prefix, &clean),
        None => quote_identifier(&clean),
    };

    ResolvedColumn {
        table: origin.map(str::to_string),
        column: clean,
        rendered,
        via_join: false,
    }
}
